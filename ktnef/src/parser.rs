//! The TNEF stream parser.
//!
//! A stream is a signature, a cross-reference key and a sequence of attribute
//! records, each of which is a level byte, an attribute word (tag in the lower
//! half, type in the upper half), a length, the value and a checksum.


use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use encoding_rs::{Encoding, WINDOWS_1252};
use log::{debug, warn};

use crate::attach::{Attachment, ParseState};
use crate::attribute::{checksum, tnef_date, AttrValue, Attribute};
use crate::binread::{BinaryReader, StreamCursor};
use crate::defs::{
    mapi_tag, status_to_message_flags, MapiType, TnefAttributeId, TnefAttributeLevel,
    TnefAttributeType, IID_IMESSAGE, TNEF_SIGNATURE,
};
use crate::error::TnefError;
use crate::mapi::{decode_properties, decode_property, PropValue, Property};
use crate::message::TnefMessage;
use crate::mime::{mime_from_content, mime_from_extension, needs_sniffing, MS_TNEF, OCTET_STREAM, SNIFF_LENGTH};
use crate::property_set::PropertySet;


/// Knobs for [`parse_with_options`].
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Encoding of 8-bit strings until the stream names its OEM code page.
    pub encoding: &'static Encoding,
    /// Reject attributes whose checksum does not match their content.
    ///
    /// Producers get this wrong often enough that it is off by default.
    pub verify_checksums: bool,
}
impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Uses the encoding of a Windows code page; `None` if it is unknown.
    pub fn with_codepage(self, codepage: u16) -> Option<Self> {
        codepage::to_encoding(codepage)
            .map(|encoding| self.with_encoding(encoding))
    }

    pub fn with_checksum_verification(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }
}
impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            encoding: WINDOWS_1252,
            verify_checksums: false,
        }
    }
}


/// Parses a TNEF stream with the default options.
pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<TnefMessage, TnefError> {
    parse_with_options(reader, ParseOptions::default())
}

pub fn parse_with_options<R: Read + Seek>(reader: &mut R, options: ParseOptions) -> Result<TnefMessage, TnefError> {
    let parser = Parser {
        reader,
        encoding: options.encoding,
        verify_checksums: options.verify_checksums,
        message: TnefMessage::new(),
        current: None,
    };
    parser.run()
}

/// Parses the TNEF file at `path`.
pub fn parse_file<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<TnefMessage, TnefError> {
    let mut reader = BufReader::new(File::open(path)?);
    parse_with_options(&mut reader, options)
}


/// Formats one row of the recipient table as `"To: Name <address>"`.
pub fn format_recipient(props: &PropertySet) -> String {
    let display_name = props.find_prop(mapi_tag::DISPLAY_NAME).unwrap_or_default();
    let address = props.find_prop(mapi_tag::EMAIL_ADDRESS).unwrap_or_default();
    let kind = match props.property(mapi_tag::RECIPIENT_TYPE).and_then(|v| v.as_u32()) {
        Some(0) => "From:",
        Some(1) => "To:",
        Some(2) => "Cc:",
        Some(3) => "Bcc:",
        _ => "",
    };

    let mut s = String::from(kind);
    if !display_name.is_empty() {
        s.push(' ');
        s.push_str(&display_name);
    }
    if !address.is_empty() && address != display_name {
        s.push_str(" <");
        s.push_str(&address);
        s.push('>');
    }
    s.trim().to_owned()
}


struct AttributeHeader {
    id: TnefAttributeId,
    attr_type: TnefAttributeType,
    length: u32,
    start: u64,
    calculated_checksum: Option<u16>,
}
impl AttributeHeader {
    fn end(&self) -> u64 {
        self.start + u64::from(self.length)
    }

    fn tag(&self) -> u16 {
        self.id.to_base_type()
    }
}


struct Parser<'r, R> {
    reader: &'r mut R,
    encoding: &'static Encoding,
    verify_checksums: bool,
    message: TnefMessage,
    current: Option<Attachment>,
}
impl<'r, R: Read + Seek> Parser<'r, R> {
    fn run(mut self) -> Result<TnefMessage, TnefError> {
        // a stream too short for a signature is not TNEF either
        let mut signature_bytes = Vec::with_capacity(4);
        Read::take(&mut *self.reader, 4).read_to_end(&mut signature_bytes)?;
        signature_bytes.resize(4, 0);
        let signature = u32::from_le_bytes([signature_bytes[0], signature_bytes[1], signature_bytes[2], signature_bytes[3]]);
        if signature != TNEF_SIGNATURE {
            return Err(TnefError::NotATnefFile { expected: TNEF_SIGNATURE, obtained: signature });
        }

        self.message.cross_reference_key = self.reader.read_u16_le()?;
        debug!("attachment cross reference key: 0x{:04X}", self.message.cross_reference_key);

        loop {
            let offset = self.reader.tell()?;
            let Some(level_u8) = self.reader.read_u8_or_eof()? else { break };
            match TnefAttributeLevel::from_base_type(level_u8) {
                TnefAttributeLevel::Message => self.decode_message_attribute()?,
                TnefAttributeLevel::Attachment => self.decode_attachment_attribute()?,
                TnefAttributeLevel::Other(level) => {
                    return Err(TnefError::UnknownLevel { level, offset });
                },
            }
        }

        if let Some(pending) = self.current.take() {
            self.finalize_attachment(pending)?;
        }
        Ok(self.message)
    }

    fn read_header(&mut self) -> Result<AttributeHeader, TnefError> {
        let word = self.reader.read_u32_le()?;
        let id = TnefAttributeId::from_base_type((word & 0xFFFF) as u16);
        let attr_type = TnefAttributeType::from_base_type((word >> 16) as u16);
        let length = self.reader.read_u32_le()?;
        let start = self.reader.tell()?;

        let calculated_checksum = if self.verify_checksums {
            let data = self.reader.read_bytes(usize::try_from(length).unwrap_or(usize::MAX))?;
            self.reader.seek_to(start)?;
            Some(checksum(&data))
        } else {
            None
        };

        Ok(AttributeHeader { id, attr_type, length, start, calculated_checksum })
    }

    /// Repositions to the declared end of the value and reads the checksum.
    fn finish_attribute(&mut self, header: &AttributeHeader) -> Result<u16, TnefError> {
        let position = self.reader.tell()?;
        if position != header.end() {
            warn!(
                "attribute {:?} consumed {} bytes but declares {}; seeking to its end",
                header.id, position as i64 - header.start as i64, header.length,
            );
            self.reader.seek_to(header.end())?;
        }

        let obtained = self.reader.read_u16_le()?;
        if let Some(calculated) = header.calculated_checksum {
            if calculated != obtained {
                return Err(TnefError::ChecksumMismatch { tag: header.tag(), obtained, calculated });
            }
        }
        Ok(obtained)
    }

    fn read_string(&mut self, length: u32) -> Result<String, TnefError> {
        let bytes = self.reader.read_bytes(usize::try_from(length).unwrap_or(usize::MAX))?;
        Ok(decode_8bit(&bytes, self.encoding))
    }

    fn read_date(&mut self, length: u32) -> Result<AttrValue, TnefError> {
        if length < 14 {
            warn!("date attribute with only {} bytes", length);
            return Ok(AttrValue::Bytes(self.read_data(length)?));
        }
        let mut fields = [0u16; 7];
        for field in &mut fields {
            *field = self.reader.read_u16_le()?;
        }
        let date = tnef_date(fields);
        if date.is_none() {
            warn!("invalid date {:?}", fields);
        }
        Ok(AttrValue::Date(date))
    }

    fn read_data(&mut self, length: u32) -> Result<Vec<u8>, TnefError> {
        Ok(self.reader.read_bytes(usize::try_from(length).unwrap_or(usize::MAX))?)
    }

    /// Decodes an attribute nobody asked for by its declared type only.
    fn read_generic(&mut self, header: &AttributeHeader) -> Result<AttrValue, TnefError> {
        match header.attr_type {
            TnefAttributeType::Text|TnefAttributeType::String => Ok(AttrValue::Text(self.read_string(header.length)?)),
            TnefAttributeType::Date => self.read_date(header.length),
            _ => Ok(AttrValue::Bytes(self.read_data(header.length)?)),
        }
    }

    fn add_message_property(&mut self, key: u16, prop_type: MapiType, value: PropValue) {
        self.message.properties.add_property(Property::new(key, prop_type, value), false);
    }

    fn add_message_date(&mut self, key: u16, value: &AttrValue) {
        if let AttrValue::Date(Some(date)) = value {
            self.add_message_property(key, MapiType::Time, PropValue::Time(naive_to_utc(date)));
        }
    }

    fn decode_message_attribute(&mut self) -> Result<(), TnefError> {
        let header = self.read_header()?;
        debug!("message attribute {:?} (length={})", header.id, header.length);

        let value = match header.id {
            TnefAttributeId::AidOwner => {
                let owner = self.reader.read_u32_le()?;
                self.add_message_property(mapi_tag::OWNER_APPT_ID, MapiType::Ulong, PropValue::Ulong(owner));
                AttrValue::Dword(owner)
            },
            TnefAttributeId::RequestRes => {
                let requested = self.reader.read_u16_le()?;
                self.add_message_property(mapi_tag::RESPONSE_REQUESTED, MapiType::Uint16, PropValue::Uint16(requested));
                AttrValue::Flag(requested != 0)
            },
            TnefAttributeId::DateRecd => {
                let value = self.read_date(header.length)?;
                self.add_message_date(mapi_tag::DATE_RECEIVED, &value);
                value
            },
            TnefAttributeId::DateSent => {
                let value = self.read_date(header.length)?;
                self.add_message_date(mapi_tag::DATE_SENT, &value);
                value
            },
            TnefAttributeId::DateModified => {
                let value = self.read_date(header.length)?;
                self.add_message_date(mapi_tag::DATE_MODIFIED, &value);
                value
            },
            TnefAttributeId::MessageClass => {
                let class = self.read_string(header.length)?;
                self.add_message_property(mapi_tag::MESSAGE_CLASS, MapiType::String8, PropValue::String8(class.clone()));
                AttrValue::Text(class)
            },
            TnefAttributeId::Subject => {
                let subject = self.read_string(header.length)?;
                self.add_message_property(mapi_tag::SUBJECT, MapiType::String8, PropValue::String8(subject.clone()));
                AttrValue::Text(subject)
            },
            TnefAttributeId::Body => {
                let body = self.read_string(header.length)?;
                self.add_message_property(mapi_tag::BODY, MapiType::String8, PropValue::String8(body.clone()));
                AttrValue::Text(body)
            },
            TnefAttributeId::MessageId => {
                let id = self.read_string(header.length)?;
                self.add_message_property(mapi_tag::MESSAGE_ID, MapiType::String8, PropValue::String8(id.clone()));
                AttrValue::Text(id)
            },
            TnefAttributeId::Priority => {
                let priority = self.reader.read_u16_le()?;
                // TNEF counts 1 (high) to 3 (low); MAPI 1 (urgent) to -1 (non-urgent)
                let mapi_priority = 2i32 - i32::from(priority);
                self.add_message_property(mapi_tag::PRIORITY, MapiType::Ulong, PropValue::Ulong(mapi_priority as u32));
                AttrValue::Word(priority)
            },
            TnefAttributeId::MessageStatus => {
                let status = self.reader.read_u8()?;
                self.add_message_property(mapi_tag::MESSAGE_FLAGS, MapiType::Ulong, PropValue::Ulong(status_to_message_flags(status)));
                AttrValue::Byte(status)
            },
            TnefAttributeId::From => {
                let data = self.read_data(header.length)?;
                match read_address(&data, self.encoding) {
                    Some(from) => self.add_message_property(mapi_tag::FROM, MapiType::String8, PropValue::String8(from)),
                    None => warn!("truncated sender address"),
                }
                AttrValue::Bytes(data)
            },
            TnefAttributeId::RecipTable => {
                let data = self.read_data(header.length)?;
                let recipients = read_recipient_table(&data, self.encoding)?;
                debug!("{} recipients", recipients.len());
                let values = recipients.into_iter().map(PropValue::String8).collect();
                self.add_message_property(mapi_tag::RECIPIENT_TABLE, MapiType::String8, PropValue::Multiple(values));
                AttrValue::Bytes(data)
            },
            TnefAttributeId::MsgProps => {
                let properties = decode_properties(&mut *self.reader, self.encoding)?;
                let mut added = 0;
                for property in properties {
                    if self.message.properties.add_property(property, false) {
                        added += 1;
                    }
                }
                debug!("{} message properties", added);
                AttrValue::Properties(added)
            },
            TnefAttributeId::TnefVersion => AttrValue::Dword(self.reader.read_u32_le()?),
            TnefAttributeId::OemCodepage => {
                let data = self.read_data(header.length)?;
                if data.len() >= 2 {
                    let codepage_id = u16::from_le_bytes([data[0], data[1]]);
                    match codepage::to_encoding(codepage_id) {
                        Some(encoding) => {
                            debug!("OEM code page {} ({})", codepage_id, encoding.name());
                            self.encoding = encoding;
                        },
                        None => warn!("unknown OEM code page {}", codepage_id),
                    }
                }
                AttrValue::Bytes(data)
            },
            _ => self.read_generic(&header)?,
        };

        let checksum = self.finish_attribute(&header)?;
        self.message.properties.add_attribute(Attribute {
            level: TnefAttributeLevel::Message,
            id: header.id,
            attr_type: header.attr_type,
            length: header.length,
            value,
            checksum,
        }, true);
        Ok(())
    }

    fn decode_attachment_attribute(&mut self) -> Result<(), TnefError> {
        let header = self.read_header()?;
        debug!("attachment attribute {:?} (length={})", header.id, header.length);
        self.check_current(header.tag())?;

        let value = match header.id {
            TnefAttributeId::AttachTitle => {
                let title = self.read_string(header.length)?;
                let current = self.current_attachment();
                current.name = title.clone();
                current.state.insert(ParseState::TITLE);
                AttrValue::Text(title)
            },
            TnefAttributeId::AttachData => {
                self.current_attachment().set_data(header.start, header.length);
                self.reader.skip(u64::from(header.length))?;
                AttrValue::DataRef { offset: header.start, size: header.length }
            },
            TnefAttributeId::Attachment => {
                let count = self.read_attachment_properties()?;
                self.current_attachment().apply_info();
                AttrValue::Properties(count)
            },
            TnefAttributeId::AttachModifyDate|TnefAttributeId::AttachCreateDate => self.read_date(header.length)?,
            TnefAttributeId::AttachMetaFile => AttrValue::Bytes(self.read_data(header.length)?),
            _ => self.read_generic(&header)?,
        };

        let checksum = self.finish_attribute(&header)?;
        self.current_attachment().properties.add_attribute(Attribute {
            level: TnefAttributeLevel::Attachment,
            id: header.id,
            attr_type: header.attr_type,
            length: header.length,
            value,
            checksum,
        }, true);
        Ok(())
    }

    fn current_attachment(&mut self) -> &mut Attachment {
        self.current.get_or_insert_with(Attachment::new)
    }

    /// Reads the attachment's property block, locating the attachment data
    /// if it lives in PR_ATTACH_DATA.
    fn read_attachment_properties(&mut self) -> Result<usize, TnefError> {
        let prop_count = self.reader.read_u32_le()?;
        debug!("attachment prop count: {}", prop_count);

        let mut found_data = false;
        let mut added = 0;
        for _ in 0..prop_count {
            let property = decode_property(&mut *self.reader, self.encoding)?;

            if property.key == mapi_tag::ATTACH_DATA {
                // the reader sits right after the (padded) value
                let end = self.reader.tell()?;
                let current = self.current.get_or_insert_with(Attachment::new);
                match &property.value {
                    PropValue::Object(bytes) => {
                        let data_start = end - padded_len(bytes.len());
                        let is_message = bytes.len() >= 16
                            && u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) == IID_IMESSAGE;
                        if is_message {
                            debug!("embedded message: size={}", bytes.len());
                            current.set_data(data_start + 16, (bytes.len() - 16) as u32);
                            current.mime_tag = MS_TNEF.to_owned();
                            current.display_name = "Embedded Message".to_owned();
                        }
                    },
                    PropValue::Binary(bytes) if !current.has_data() => {
                        let data_start = end - padded_len(bytes.len());
                        let size = bytes.len() as u32;
                        debug!("attachment data in properties: size={}", size);
                        current.set_data(data_start, size);
                        current.properties.add_attribute(Attribute {
                            level: TnefAttributeLevel::Attachment,
                            id: TnefAttributeId::AttachData,
                            attr_type: TnefAttributeType::Byte,
                            length: size,
                            value: AttrValue::DataRef { offset: data_start, size },
                            checksum: 0,
                        }, false);
                        found_data = true;
                    },
                    _ => {},
                }
            }

            let current = self.current_attachment();
            if current.properties.add_property(property, false) {
                added += 1;
            }
        }

        if found_data {
            let current = self.current_attachment();
            current.apply_info();
            if current.name.is_empty() {
                current.name = current.file_name.clone();
            }
        }
        Ok(added)
    }

    /// Starts a new attachment if the current one already has `tag`.
    fn check_current(&mut self, tag: u16) -> Result<(), TnefError> {
        match self.current.take() {
            None => {
                self.current = Some(Attachment::new());
            },
            Some(current) => {
                if current.properties.has_attribute(tag) {
                    self.finalize_attachment(current)?;
                    self.current = Some(Attachment::new());
                } else {
                    self.current = Some(current);
                }
            },
        }
        Ok(())
    }

    /// Appends a finished attachment to the message; one without data is dropped.
    fn finalize_attachment(&mut self, mut attachment: Attachment) -> Result<(), TnefError> {
        if !attachment.has_data() {
            debug!("discarding attachment {:?} without data", attachment.name);
            return Ok(());
        }

        if attachment.name.is_empty() {
            attachment.name = "Unnamed".to_owned();
        }
        if attachment.mime_tag.is_empty() {
            attachment.mime_tag = self.guess_mime(&attachment)?;
        }
        debug!("attachment {:?} ({}, {} bytes)", attachment.name, attachment.mime_tag, attachment.size);
        self.message.attachments.push(attachment);
        Ok(())
    }

    fn guess_mime(&mut self, attachment: &Attachment) -> Result<String, TnefError> {
        let by_extension = if attachment.file_name.is_empty() {
            mime_from_extension(&attachment.name)
        } else {
            mime_from_extension(&attachment.file_name)
        };
        if !needs_sniffing(by_extension) {
            return Ok(by_extension.unwrap_or(OCTET_STREAM).to_owned());
        }

        let mut by_content = None;
        if let (Some(offset), true) = (attachment.offset, attachment.size > 0) {
            let sniff_len = SNIFF_LENGTH.min(attachment.size as usize);
            let resume_at = self.reader.tell()?;
            self.reader.seek_to(offset)?;
            let prefix = self.reader.read_bytes(sniff_len)?;
            self.reader.seek_to(resume_at)?;
            by_content = mime_from_content(&prefix);
        }

        Ok(by_content
            .or(by_extension)
            .unwrap_or(OCTET_STREAM)
            .to_owned())
    }
}


fn padded_len(length: usize) -> u64 {
    (length + crate::binread::padding_to_4(length)) as u64
}

fn naive_to_utc(date: &NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(*date, Utc)
}

fn decode_8bit(bytes: &[u8], encoding: &'static Encoding) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (cow_string, _had_errors) = encoding.decode_without_bom_handling(&bytes[..end]);
    cow_string.into_owned()
}

/// Decodes the triples structure of attFrom into `"name <address>"`.
fn read_address(data: &[u8], encoding: &'static Encoding) -> Option<String> {
    let mut cursor = Cursor::new(data);
    let _triple_id = cursor.read_u16_le().ok()?;
    let _total_length = cursor.read_u16_le().ok()?;
    let name_length = cursor.read_u16_le().ok()?;
    let address_length = cursor.read_u16_le().ok()?;
    let name = cursor.read_bytes(usize::from(name_length)).ok()?;
    let address = cursor.read_bytes(usize::from(address_length)).ok()?;
    Some(format!("{} <{}>", decode_8bit(&name, encoding), decode_8bit(&address, encoding)))
}

fn read_recipient_table(data: &[u8], encoding: &'static Encoding) -> Result<Vec<String>, TnefError> {
    let mut cursor = Cursor::new(data);
    let row_count = cursor.read_u32_le()?;
    let mut recipients = Vec::with_capacity(row_count.min(1024) as usize);
    for _ in 0..row_count {
        let mut row = PropertySet::new();
        for property in decode_properties(&mut cursor, encoding)? {
            row.add_property(property, false);
        }
        recipients.push(format_recipient(&row));
    }
    Ok(recipients)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_address() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x0004u16.to_le_bytes());
        data.extend_from_slice(&28u16.to_le_bytes());
        data.extend_from_slice(&5u16.to_le_bytes());
        data.extend_from_slice(&15u16.to_le_bytes());
        data.extend_from_slice(b"Jane\0");
        data.extend_from_slice(b"SMTP:j@example\0");
        assert_eq!(read_address(&data, WINDOWS_1252).as_deref(), Some("Jane <SMTP:j@example>"));
        assert_eq!(read_address(&data[..10], WINDOWS_1252), None);
    }

    #[test]
    fn test_format_recipient() {
        let mut row = PropertySet::new();
        row.add_property(Property::new(mapi_tag::DISPLAY_NAME, MapiType::String8, PropValue::String8("Bob".to_owned())), false);
        row.add_property(Property::new(mapi_tag::EMAIL_ADDRESS, MapiType::String8, PropValue::String8("bob@example.org".to_owned())), false);
        row.add_property(Property::new(mapi_tag::RECIPIENT_TYPE, MapiType::Ulong, PropValue::Ulong(2)), false);
        assert_eq!(format_recipient(&row), "Cc: Bob <bob@example.org>");

        let mut same = PropertySet::new();
        same.add_property(Property::new(mapi_tag::DISPLAY_NAME, MapiType::String8, PropValue::String8("a@b".to_owned())), false);
        same.add_property(Property::new(mapi_tag::EMAIL_ADDRESS, MapiType::String8, PropValue::String8("a@b".to_owned())), false);
        assert_eq!(format_recipient(&same), "a@b");
    }

    #[test]
    fn test_options() {
        let options = ParseOptions::new();
        assert_eq!(options.encoding, WINDOWS_1252);
        assert!(!options.verify_checksums);
        let cyrillic = options.with_codepage(1251).unwrap();
        assert_eq!(cyrillic.encoding, encoding_rs::WINDOWS_1251);
        assert!(ParseOptions::new().with_codepage(1).is_none());
    }
}
