use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::defs::{TnefAttributeId, TnefAttributeLevel, TnefAttributeType};


/// A decoded TNEF attribute value.
///
/// Attributes that are only bookkeeping for something stored elsewhere (the
/// attachment data, a property block) keep a summary instead of the bytes.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum AttrValue {
    Text(String),
    /// A TNEF date; `None` if the stored fields do not form a valid date.
    Date(Option<NaiveDateTime>),
    Flag(bool),
    Byte(u8),
    Word(u16),
    Dword(u32),
    Bytes(Vec<u8>),
    /// Attachment data left in place in the source stream.
    DataRef { offset: u64, size: u32 },
    /// A property block; the properties went into the owning property set.
    Properties(usize),
}
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Date(Some(d)) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            Self::Date(None) => f.write_str("<invalid date>"),
            Self::Flag(b) => write!(f, "{}", b),
            Self::Byte(b) => write!(f, "0x{:02X}", b),
            Self::Word(w) => write!(f, "{}", w),
            Self::Dword(d) => write!(f, "{}", d),
            Self::Bytes(b) => write!(f, "< {} bytes >", b.len()),
            Self::DataRef { size, .. } => write!(f, "< size={} >", size),
            Self::Properties(count) => write!(f, "< {} properties >", count),
        }
    }
}

/// One attribute record from the TNEF stream.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Attribute {
    pub level: TnefAttributeLevel,
    pub id: TnefAttributeId,
    pub attr_type: TnefAttributeType,
    pub length: u32,
    pub value: AttrValue,
    pub checksum: u16,
}
impl Attribute {
    pub fn tag(&self) -> u16 {
        self.id.to_base_type()
    }
}


/// Builds a date from the seven 16-bit fields of a TNEF date
/// (year, month, day, hour, minute, second, day of week).
pub fn tnef_date(fields: [u16; 7]) -> Option<NaiveDateTime> {
    let [year, month, day, hour, minute, second, _day_of_week] = fields;
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
        .and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
}

/// Computes the attribute checksum: the sum of all value bytes modulo 65536.
pub fn checksum(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}
