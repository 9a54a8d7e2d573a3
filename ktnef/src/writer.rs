//! Producing TNEF streams.
//!
//! The writer emits attribute records in the order it is told to; it is up to
//! the caller to follow the usual layout (message attributes, then for each
//! attachment an attAttachRendData record followed by its other attributes).


use std::io::Write;

use chrono::{Datelike, NaiveDateTime, Timelike};
use encoding_rs::{Encoding, WINDOWS_1252};

use crate::attribute::checksum;
use crate::binread::BinaryWriter;
use crate::defs::{TnefAttributeId, TnefAttributeLevel, TnefAttributeType, TNEF_SIGNATURE};
use crate::error::TnefError;
use crate::mapi::{encode_properties, Property};


pub struct TnefWriter<W: Write> {
    writer: W,
    encoding: &'static Encoding,
}
impl<W: Write> TnefWriter<W> {
    /// Writes the signature and the cross-reference key.
    pub fn new(writer: W, cross_reference_key: u16) -> Result<Self, TnefError> {
        Self::with_encoding(writer, cross_reference_key, WINDOWS_1252)
    }

    pub fn with_encoding(mut writer: W, cross_reference_key: u16, encoding: &'static Encoding) -> Result<Self, TnefError> {
        writer.write_u32_le(TNEF_SIGNATURE)?;
        writer.write_u16_le(cross_reference_key)?;
        Ok(Self { writer, encoding })
    }

    /// Writes one attribute record around `data`.
    pub fn write_attribute(
        &mut self,
        level: TnefAttributeLevel,
        id: TnefAttributeId,
        attr_type: TnefAttributeType,
        data: &[u8],
    ) -> Result<(), TnefError> {
        let length = u32::try_from(data.len())
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "attribute too long"))?;
        let word = (u32::from(attr_type.to_base_type()) << 16) | u32::from(id.to_base_type());

        self.writer.write_u8(level.to_base_type())?;
        self.writer.write_u32_le(word)?;
        self.writer.write_u32_le(length)?;
        self.writer.write_all(data)?;
        self.writer.write_u16_le(checksum(data))?;
        Ok(())
    }

    /// Writes a NUL-terminated 8-bit string in the writer's encoding.
    pub fn write_string(&mut self, level: TnefAttributeLevel, id: TnefAttributeId, value: &str) -> Result<(), TnefError> {
        let (bytes, _encoding_used, _had_errors) = self.encoding.encode(value);
        let mut data = bytes.into_owned();
        data.push(0);
        self.write_attribute(level, id, TnefAttributeType::String, &data)
    }

    pub fn write_date(&mut self, level: TnefAttributeLevel, id: TnefAttributeId, value: &NaiveDateTime) -> Result<(), TnefError> {
        let fields = [
            u16::try_from(value.year()).unwrap_or(0),
            value.month() as u16,
            value.day() as u16,
            value.hour() as u16,
            value.minute() as u16,
            value.second() as u16,
            value.weekday().num_days_from_sunday() as u16,
        ];
        let data: Vec<u8> = fields.iter()
            .flat_map(|f| f.to_le_bytes())
            .collect();
        self.write_attribute(level, id, TnefAttributeType::Date, &data)
    }

    pub fn write_word(&mut self, level: TnefAttributeLevel, id: TnefAttributeId, value: u16) -> Result<(), TnefError> {
        self.write_attribute(level, id, TnefAttributeType::Short, &value.to_le_bytes())
    }

    pub fn write_dword(&mut self, level: TnefAttributeLevel, id: TnefAttributeId, value: u32) -> Result<(), TnefError> {
        self.write_attribute(level, id, TnefAttributeType::Long, &value.to_le_bytes())
    }

    /// Writes a MAPI property block (attMsgProps, attAttachment).
    pub fn write_properties(&mut self, level: TnefAttributeLevel, id: TnefAttributeId, properties: &[Property]) -> Result<(), TnefError> {
        let mut data = Vec::new();
        encode_properties(&mut data, properties, self.encoding)?;
        self.write_attribute(level, id, TnefAttributeType::Byte, &data)
    }

    pub fn flush(&mut self) -> Result<(), TnefError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}


#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_header_and_record_layout() {
        let mut writer = TnefWriter::new(Vec::new(), 0x1234).unwrap();
        writer.write_string(TnefAttributeLevel::Message, TnefAttributeId::Subject, "Hi").unwrap();
        let bytes = writer.into_inner();

        assert_eq!(&bytes[0..4], &[0x78, 0x9F, 0x3E, 0x22]);
        assert_eq!(&bytes[4..6], &[0x34, 0x12]);
        assert_eq!(bytes[6], 0x01);
        assert_eq!(&bytes[7..11], &[0x04, 0x80, 0x01, 0x00]);
        assert_eq!(&bytes[11..15], &[3, 0, 0, 0]);
        assert_eq!(&bytes[15..18], b"Hi\0");
        let sum = u16::from(b'H') + u16::from(b'i');
        assert_eq!(&bytes[18..20], &sum.to_le_bytes());
        assert_eq!(bytes.len(), 20);
    }

    #[test]
    fn test_date_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            .and_hms_opt(13, 5, 9).unwrap();
        let mut writer = TnefWriter::new(Vec::new(), 0).unwrap();
        writer.write_date(TnefAttributeLevel::Message, TnefAttributeId::DateSent, &date).unwrap();
        let bytes = writer.into_inner();
        let fields: Vec<u16> = bytes[15..29]
            .chunks_exact(2)
            .map(|p| u16::from_le_bytes([p[0], p[1]]))
            .collect();
        // 2024-02-29 was a Thursday
        assert_eq!(fields, vec![2024, 2, 29, 13, 5, 9, 4]);
    }
}
