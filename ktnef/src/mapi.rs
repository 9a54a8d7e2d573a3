//! Decoding (and encoding) of individual MAPI properties as they appear in
//! TNEF property blocks.


use std::fmt;
use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use from_to_repr::FromToRepr;
use log::{debug, warn};
use uuid::Uuid;

use crate::binread::{BinaryReader, BinaryWriter};
use crate::defs::{is_named_tag, MapiType, MAPI_TYPE_MASK, MAPI_TYPE_VECTOR};
use crate::error::TnefError;


/// 100-nanosecond ticks between 1601-01-01 and 1970-01-01.
pub const FILETIME_UNIX_EPOCH_OFFSET: u64 = 116_444_736_000_000_000;
const FILETIME_TICKS_PER_SECOND: u64 = 10_000_000;


/// Converts a Windows FILETIME into Unix seconds.
///
/// Values that do not fit into an unsigned 32-bit second count (including
/// anything before 1970) are clamped to `u32::MAX`.
pub fn filetime_to_unix(ticks: u64) -> u32 {
    let seconds = ticks
        .checked_sub(FILETIME_UNIX_EPOCH_OFFSET)
        .map(|since_epoch| since_epoch / FILETIME_TICKS_PER_SECOND);
    match seconds.and_then(|s| u32::try_from(s).ok()) {
        Some(s) => s,
        None => {
            warn!("FILETIME 0x{:016X} out of range; clamping", ticks);
            u32::MAX
        },
    }
}

pub fn filetime_to_datetime(ticks: u64) -> DateTime<Utc> {
    let seconds = filetime_to_unix(ticks);
    DateTime::from_timestamp(i64::from(seconds), 0)
        .unwrap_or_default()
}

/// The inverse of [`filetime_to_datetime`], to whole seconds.
///
/// Times before 1970 become the epoch; times beyond the FILETIME range
/// saturate at `u64::MAX`.
pub fn datetime_to_filetime(value: &DateTime<Utc>) -> u64 {
    let seconds = u64::try_from(value.timestamp()).unwrap_or(0);
    seconds
        .checked_mul(FILETIME_TICKS_PER_SECOND)
        .and_then(|ticks| ticks.checked_add(FILETIME_UNIX_EPOCH_OFFSET))
        .unwrap_or_else(|| {
            warn!("{} does not fit into a FILETIME; saturating", value);
            u64::MAX
        })
}


/// The value of a MAPI property.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum PropValue {
    Uint16(u16),
    Ulong(u32),
    Boolean(bool),
    /// The raw bits of a 32-bit float; they are kept but not interpreted.
    Float(u32),
    Double(f64),
    Time(DateTime<Utc>),
    String8(String),
    UString(String),
    Binary(Vec<u8>),
    Object(Vec<u8>),
    Multiple(Vec<PropValue>),
}
impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String8(s) | Self::UString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Uint16(v) => Some(u32::from(*v)),
            Self::Ulong(v) => Some(*v),
            Self::Boolean(b) => Some(u32::from(*b)),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) | Self::Object(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Number of elements; 1 for anything that is not a vector.
    pub fn count(&self) -> usize {
        match self {
            Self::Multiple(values) => values.len(),
            _ => 1,
        }
    }
}
impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint16(v) => write!(f, "{}", v),
            Self::Ulong(v) => write!(f, "{}", v),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Float(bits) => write!(f, "<float 0x{:08X}>", bits),
            Self::Double(v) => write!(f, "{}", v),
            Self::Time(t) => write!(f, "{}", t.format("%Y-%m-%dT%H:%M:%S")),
            Self::String8(s) | Self::UString(s) => f.write_str(s),
            Self::Binary(bytes) | Self::Object(bytes) => {
                // short printable prefixes are shown as text
                let printable = bytes
                    .iter()
                    .take(8)
                    .all(|&b| b == b'\t' || b == b'\r' || b == b'\n' || (0x20..0x7F).contains(&b));
                if printable {
                    f.write_str(&String::from_utf8_lossy(bytes))
                } else {
                    f.write_str("[")?;
                    for b in bytes.iter().take(32) {
                        write!(f, "{:02x}", b)?;
                    }
                    if bytes.len() > 32 {
                        f.write_str("...")?;
                    }
                    f.write_str("]")
                }
            },
            Self::Multiple(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            },
        }
    }
}

#[derive(Clone, Debug, Eq, FromToRepr, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u32)]
pub enum PropIdType {
    Number = 0x00_00_00_00,
    String = 0x00_00_00_01,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PropId {
    Number(u32),
    String(String),
}
impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "0x{:04X}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// The identity of a named property: its property set and its name in it.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PropName {
    pub guid: Uuid,
    pub id: PropId,
}

#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Property {
    pub key: u16,
    pub prop_type: MapiType,
    pub value: PropValue,
    pub name: Option<PropName>,
}
impl Property {
    pub fn new(key: u16, prop_type: MapiType, value: PropValue) -> Self {
        Self {
            key,
            prop_type,
            value,
            name: None,
        }
    }

    pub fn named(key: u16, prop_type: MapiType, value: PropValue, name: PropName) -> Self {
        Self {
            key,
            prop_type,
            value,
            name: Some(name),
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self.value, PropValue::Multiple(_))
    }
}


fn decode_string8(bytes: &[u8], encoding: &'static Encoding) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (cow_string, _had_errors) = encoding.decode_without_bom_handling(&bytes[..end]);
    cow_string.into_owned()
}

fn decode_utf16(bytes: &[u8]) -> String {
    if bytes.len() % 2 != 0 {
        warn!("odd length {} of UTF-16 string; dropping last byte", bytes.len());
    }
    let words: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&w| w != 0)
        .collect();
    String::from_utf16_lossy(&words)
}

/// Reads a 4-byte length, that many bytes, then the padding to 4 bytes.
fn read_counted_bytes<R: Read>(reader: &mut R) -> Result<Vec<u8>, TnefError> {
    let length: usize = reader.read_u32_le()?
        .try_into()
        .unwrap_or(usize::MAX);
    let bytes = reader.read_bytes(length)?;
    reader.pad_to_4(length)?;
    Ok(bytes)
}

fn read_name<R: Read>(reader: &mut R, tag: u16) -> Result<PropName, TnefError> {
    let mut guid_buf = [0u8; 16];
    reader.read_exact(&mut guid_buf)?;
    let guid = Uuid::from_bytes_le(guid_buf);
    debug!("guid: {}", guid);

    let id_type_u32 = reader.read_u32_le()?;
    let id_type: PropIdType = match id_type_u32.try_into() {
        Ok(it) => it,
        Err(obtained) => return Err(TnefError::InvalidNameKind { tag, obtained }),
    };

    let id = match id_type {
        PropIdType::Number => PropId::Number(reader.read_u32_le()?),
        PropIdType::String => {
            let bytes = read_counted_bytes(reader)?;
            PropId::String(decode_utf16(&bytes))
        },
    };
    debug!("prop name: {}", id);
    Ok(PropName { guid, id })
}

/// Reads one element of the given base type.
///
/// String, binary and object elements of a vector are a single length-prefixed
/// value each; outside a vector they carry their own value count, and the last
/// value read wins.
fn decode_element<R: Read>(
    reader: &mut R,
    tag: u16,
    type_u16: u16,
    base_type: MapiType,
    in_vector: bool,
    encoding: &'static Encoding,
) -> Result<PropValue, TnefError> {
    let value = match base_type {
        MapiType::Uint16 => {
            let val = reader.read_u32_le()?;
            PropValue::Uint16((val & 0xFFFF) as u16)
        },
        MapiType::Ulong => PropValue::Ulong(reader.read_u32_le()?),
        MapiType::Boolean => PropValue::Boolean(reader.read_u32_le()? != 0),
        MapiType::Float => PropValue::Float(reader.read_u32_le()?),
        MapiType::Double => PropValue::Double(reader.read_f64_le()?),
        MapiType::Time => {
            let low = reader.read_u32_le()?;
            let high = reader.read_u32_le()?;
            let ticks = (u64::from(high) << 32) | u64::from(low);
            PropValue::Time(filetime_to_datetime(ticks))
        },
        MapiType::String8|MapiType::UString|MapiType::Binary|MapiType::Object => {
            let value_count = if in_vector { 1 } else { reader.read_u32_le()? };
            if value_count != 1 {
                debug!("{:?} property 0x{:04X} has {} values", base_type, tag, value_count);
            }
            let mut bytes = Vec::new();
            for _ in 0..value_count {
                bytes = read_counted_bytes(reader)?;
            }
            match base_type {
                MapiType::String8 => PropValue::String8(decode_string8(&bytes, encoding)),
                MapiType::UString => PropValue::UString(decode_utf16(&bytes)),
                MapiType::Binary => PropValue::Binary(bytes),
                MapiType::Object => PropValue::Object(bytes),
                _ => unreachable!(),
            }
        },
        MapiType::Unspecified|MapiType::Null|MapiType::Currency
                |MapiType::AppTime|MapiType::Error|MapiType::LongLong
                |MapiType::Clsid|MapiType::Other(_) => {
            return Err(TnefError::UnsupportedPropertyType { tag, prop_type: type_u16 });
        },
    };
    Ok(value)
}

/// Decodes one property whose type/tag word has already been read.
pub fn decode_property_value<R: Read>(
    reader: &mut R,
    type_u16: u16,
    tag: u16,
    encoding: &'static Encoding,
) -> Result<Property, TnefError> {
    let name = if is_named_tag(tag) {
        Some(read_name(reader, tag)?)
    } else {
        None
    };

    let base_type = MapiType::from_base_type(type_u16 & MAPI_TYPE_MASK);
    let value = if type_u16 & 0xF000 == MAPI_TYPE_VECTOR {
        let value_count = reader.read_u32_le()?;
        debug!("vector of {} values", value_count);
        let capacity: usize = value_count.min(1024).try_into().unwrap_or(0);
        let mut values = Vec::with_capacity(capacity);
        for _ in 0..value_count {
            values.push(decode_element(reader, tag, type_u16, base_type, true, encoding)?);
        }
        PropValue::Multiple(values)
    } else {
        decode_element(reader, tag, type_u16, base_type, false, encoding)?
    };

    Ok(Property {
        key: tag,
        prop_type: base_type,
        value,
        name,
    })
}

/// Decodes one property including its type/tag word.
pub fn decode_property<R: Read>(reader: &mut R, encoding: &'static Encoding) -> Result<Property, TnefError> {
    let word = reader.read_u32_le()?;
    let type_u16 = (word & 0xFFFF) as u16;
    let tag = (word >> 16) as u16;
    debug!("prop tag 0x{:04X} type 0x{:04X}", tag, type_u16);
    decode_property_value(reader, type_u16, tag, encoding)
}

/// Decodes a count-prefixed property block.
pub fn decode_properties<R: Read>(reader: &mut R, encoding: &'static Encoding) -> Result<Vec<Property>, TnefError> {
    let prop_count = reader.read_u32_le()?;
    debug!("prop count: {}", prop_count);
    let mut properties = Vec::with_capacity(prop_count.min(1024).try_into().unwrap_or(0));
    for _ in 0..prop_count {
        properties.push(decode_property(reader, encoding)?);
    }
    Ok(properties)
}


fn write_counted_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<(), TnefError> {
    let length = u32::try_from(bytes.len())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "value too long"))?;
    writer.write_u32_le(length)?;
    writer.write_all(bytes)?;
    writer.write_padding_to_4(bytes.len())?;
    Ok(())
}

fn encode_string8(value: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _encoding_used, _had_errors) = encoding.encode(value);
    let mut bytes = bytes.into_owned();
    bytes.push(0);
    bytes
}

fn encode_utf16(value: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = value
        .encode_utf16()
        .flat_map(|w| w.to_le_bytes())
        .collect();
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

fn encode_element<W: Write>(
    writer: &mut W,
    key: u16,
    value: &PropValue,
    in_vector: bool,
    encoding: &'static Encoding,
) -> Result<(), TnefError> {
    let counted = |writer: &mut W, bytes: &[u8]| -> Result<(), TnefError> {
        if !in_vector {
            writer.write_u32_le(1)?;
        }
        write_counted_bytes(writer, bytes)
    };
    match value {
        PropValue::Uint16(v) => writer.write_u32_le(u32::from(*v))?,
        PropValue::Ulong(v) => writer.write_u32_le(*v)?,
        PropValue::Boolean(b) => writer.write_u32_le(u32::from(*b))?,
        PropValue::Float(bits) => writer.write_u32_le(*bits)?,
        PropValue::Double(v) => writer.write_f64_le(*v)?,
        PropValue::Time(t) => writer.write_u64_le(datetime_to_filetime(t))?,
        PropValue::String8(s) => counted(writer, &encode_string8(s, encoding))?,
        PropValue::UString(s) => counted(writer, &encode_utf16(s))?,
        PropValue::Binary(b) | PropValue::Object(b) => counted(writer, b)?,
        PropValue::Multiple(_) => {
            return Err(TnefError::UnsupportedPropertyType { tag: key, prop_type: MAPI_TYPE_VECTOR });
        },
    }
    Ok(())
}

/// Writes one property (type/tag word, name, value) in property-block form.
pub fn encode_property<W: Write>(writer: &mut W, property: &Property, encoding: &'static Encoding) -> Result<(), TnefError> {
    let mut type_u16 = property.prop_type.to_base_type();
    if property.is_vector() {
        type_u16 |= MAPI_TYPE_VECTOR;
    }
    writer.write_u32_le((u32::from(property.key) << 16) | u32::from(type_u16))?;

    if is_named_tag(property.key) {
        let name = property.name.clone().unwrap_or(PropName {
            guid: Uuid::nil(),
            id: PropId::Number(0),
        });
        writer.write_all(&name.guid.to_bytes_le())?;
        match &name.id {
            PropId::Number(n) => {
                writer.write_u32_le(PropIdType::Number as u32)?;
                writer.write_u32_le(*n)?;
            },
            PropId::String(s) => {
                writer.write_u32_le(PropIdType::String as u32)?;
                write_counted_bytes(writer, &encode_utf16(s))?;
            },
        }
    }

    match &property.value {
        PropValue::Multiple(values) => {
            let count = u32::try_from(values.len()).unwrap_or(u32::MAX);
            writer.write_u32_le(count)?;
            for value in values {
                encode_element(writer, property.key, value, true, encoding)?;
            }
        },
        other => encode_element(writer, property.key, other, false, encoding)?,
    }
    Ok(())
}

/// Writes a count-prefixed property block.
pub fn encode_properties<W: Write>(writer: &mut W, properties: &[Property], encoding: &'static Encoding) -> Result<(), TnefError> {
    let count = u32::try_from(properties.len()).unwrap_or(u32::MAX);
    writer.write_u32_le(count)?;
    for property in properties {
        encode_property(writer, property, encoding)?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;
    use encoding_rs::WINDOWS_1252;

    use super::*;

    fn round_trip(property: &Property) -> Property {
        let mut buf = Vec::new();
        encode_property(&mut buf, property, WINDOWS_1252).unwrap();
        assert_eq!(buf.len() % 4, 0, "encoded properties stay 4-byte aligned");
        let mut cursor = Cursor::new(&buf);
        let decoded = decode_property(&mut cursor, WINDOWS_1252).unwrap();
        assert_eq!(cursor.position() as usize, buf.len(), "decoder consumed everything");
        decoded
    }

    #[test]
    fn test_filetime_epoch() {
        assert_eq!(filetime_to_unix(FILETIME_UNIX_EPOCH_OFFSET), 0);
        assert_eq!(filetime_to_unix(FILETIME_UNIX_EPOCH_OFFSET + 10_000_000), 1);
    }

    #[test]
    fn test_filetime_clamps() {
        let beyond = FILETIME_UNIX_EPOCH_OFFSET + (u64::from(u32::MAX) + 1) * 10_000_000;
        assert_eq!(filetime_to_unix(beyond), u32::MAX);
        assert_eq!(filetime_to_unix(u64::MAX), u32::MAX);
        // before 1970
        assert_eq!(filetime_to_unix(0), u32::MAX);
    }

    #[test]
    fn test_far_future_time_saturates() {
        let far = Utc.with_ymd_and_hms(100_000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(datetime_to_filetime(&far), u64::MAX);

        // encodes without overflowing and decodes to the clamped maximum
        let property = Property::new(0x0039, MapiType::Time, PropValue::Time(far));
        let decoded = round_trip(&property);
        assert_eq!(
            decoded.value,
            PropValue::Time(DateTime::from_timestamp(i64::from(u32::MAX), 0).unwrap()),
        );
    }

    #[test]
    fn test_round_trip_scalars() {
        let when = Utc.with_ymd_and_hms(2004, 7, 13, 9, 30, 0).unwrap();
        let properties = [
            Property::new(0x0037, MapiType::String8, PropValue::String8("Test".to_owned())),
            Property::new(0x3001, MapiType::UString, PropValue::UString("D\u{e9}j\u{e0} vu \u{1F600}".to_owned())),
            Property::new(0x0E21, MapiType::Ulong, PropValue::Ulong(0xDEAD_BEEF)),
            Property::new(0x0017, MapiType::Uint16, PropValue::Uint16(2)),
            Property::new(0x0E1B, MapiType::Boolean, PropValue::Boolean(true)),
            Property::new(0x0039, MapiType::Time, PropValue::Time(when)),
            Property::new(0x3701, MapiType::Binary, PropValue::Binary(vec![1, 2, 3, 4, 5])),
            Property::new(0x3FFF, MapiType::Double, PropValue::Double(-2.5)),
        ];
        for property in &properties {
            assert_eq!(&round_trip(property), property);
        }
    }

    #[test]
    fn test_round_trip_named() {
        let guid = Uuid::from_bytes([
            0x00, 0x06, 0x20, 0x02, 0x00, 0x00, 0x00, 0x00,
            0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
        ]);
        let by_number = Property::named(
            0x8005, MapiType::Ulong, PropValue::Ulong(7),
            PropName { guid, id: PropId::Number(0x8503) },
        );
        assert_eq!(round_trip(&by_number), by_number);

        let by_string = Property::named(
            0x8006, MapiType::String8, PropValue::String8("work".to_owned()),
            PropName { guid, id: PropId::String("Keywords".to_owned()) },
        );
        assert_eq!(round_trip(&by_string), by_string);
    }

    #[test]
    fn test_vector_count_matches() {
        let property = Property::new(
            0x1234,
            MapiType::String8,
            PropValue::Multiple(vec![
                PropValue::String8("a".to_owned()),
                PropValue::String8("bcde".to_owned()),
                PropValue::String8(String::new()),
            ]),
        );
        let decoded = round_trip(&property);
        assert!(decoded.is_vector());
        assert_eq!(decoded.value.count(), 3);
        assert_eq!(decoded, property);
    }

    #[test]
    fn test_uint16_masks_upper_half() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0017_0002u32.to_le_bytes());
        buf.extend_from_slice(&0xABCD_0003u32.to_le_bytes());
        let decoded = decode_property(&mut Cursor::new(&buf), WINDOWS_1252).unwrap();
        assert_eq!(decoded.value, PropValue::Uint16(3));
    }

    #[test]
    fn test_float_consumes_four_bytes() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x1234_0004u32.to_le_bytes());
        buf.extend_from_slice(&1.5f32.to_le_bytes());
        buf.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        let mut cursor = Cursor::new(&buf);
        let decoded = decode_property(&mut cursor, WINDOWS_1252).unwrap();
        assert_eq!(decoded.prop_type, MapiType::Float);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_string8_stops_at_nul_and_pads() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0037_001Eu32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&5u32.to_le_bytes());
        buf.extend_from_slice(b"Hi\0xy\0\0\0");
        let mut cursor = Cursor::new(&buf);
        let decoded = decode_property(&mut cursor, WINDOWS_1252).unwrap();
        assert_eq!(decoded.value, PropValue::String8("Hi".to_owned()));
        assert_eq!(cursor.position() as usize, buf.len());
    }

    #[test]
    fn test_string8_uses_encoding() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x0037_001Eu32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(&[b'c', 0xE9, b'!', 0]);
        let decoded = decode_property(&mut Cursor::new(&buf), WINDOWS_1252).unwrap();
        assert_eq!(decoded.value.as_str(), Some("c\u{e9}!"));
    }

    #[test]
    fn test_unsupported_type() {
        let mut buf = Vec::new();
        // PT_I8 is not something the decoder knows how to size
        buf.extend_from_slice(&0x0020_0014u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8]);
        let err = decode_property(&mut Cursor::new(&buf), WINDOWS_1252).unwrap_err();
        assert!(matches!(err, TnefError::UnsupportedPropertyType { tag: 0x0020, prop_type: 0x0014 }));
    }

    #[test]
    fn test_invalid_name_kind() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x8001_0003u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 16]);
        buf.extend_from_slice(&2u32.to_le_bytes());
        let err = decode_property(&mut Cursor::new(&buf), WINDOWS_1252).unwrap_err();
        assert!(matches!(err, TnefError::InvalidNameKind { tag: 0x8001, obtained: 2 }));
    }

    #[test]
    fn test_display() {
        assert_eq!(PropValue::Binary(vec![0x00, 0xFF]).to_string(), "[00ff]");
        assert_eq!(PropValue::Binary(b"plain".to_vec()).to_string(), "plain");
        let list = PropValue::Multiple(vec![PropValue::Ulong(1), PropValue::Ulong(2)]);
        assert_eq!(list.to_string(), "1,2");
    }
}
