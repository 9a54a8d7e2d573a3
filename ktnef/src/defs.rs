//! Numeric spaces of the TNEF container and the MAPI properties it carries.


use from_to_repr::from_to_other;


/// The first four bytes of every TNEF stream, read as a little-endian `u32`.
pub const TNEF_SIGNATURE: u32 = 0x223E9F78;

/// Set in a MAPI property type if the property holds a list of values.
pub const MAPI_TYPE_VECTOR: u16 = 0x1000;
pub const MAPI_TYPE_MASK: u16 = 0x0FFF;

/// Property tags in this range are named; a GUID and a name precede the value.
pub const NAMED_PROPERTY_FIRST: u16 = 0x8000;
pub const NAMED_PROPERTY_LAST: u16 = 0xFFFE;

/// Interface identifier heading an embedded message in PR_ATTACH_DATA_OBJ.
pub const IID_IMESSAGE: u32 = 0x00020307;


/// The level byte that opens each attribute record.
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u8, derive_compare = "as_int")]
pub enum TnefAttributeLevel {
    Message = 0x01,
    Attachment = 0x02,
    Other(u8),
}

/// The declared value type of an attribute (upper half of the attribute word).
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u16, derive_compare = "as_int")]
pub enum TnefAttributeType {
    Triples = 0x0000,
    String = 0x0001,
    Text = 0x0002,
    Date = 0x0003,
    Short = 0x0004,
    Long = 0x0005,
    Byte = 0x0006,
    Word = 0x0007,
    Dword = 0x0008,
    Other(u16),
}

/// The semantic identifier of an attribute (lower half of the attribute word).
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u16, derive_compare = "as_int")]
pub enum TnefAttributeId {
    Owner = 0x0000,
    SentFor = 0x0001,
    Delegate = 0x0002,
    DateStart = 0x0006,
    DateEnd = 0x0007,
    AidOwner = 0x0008,
    RequestRes = 0x0009,
    From = 0x8000,
    Subject = 0x8004,
    DateSent = 0x8005,
    DateRecd = 0x8006,
    MessageStatus = 0x8007,
    MessageClass = 0x8008,
    MessageId = 0x8009,
    ParentId = 0x800A,
    ConversationId = 0x800B,
    Body = 0x800C,
    Priority = 0x800D,
    AttachData = 0x800F,
    AttachTitle = 0x8010,
    AttachMetaFile = 0x8011,
    AttachCreateDate = 0x8012,
    AttachModifyDate = 0x8013,
    DateModified = 0x8020,
    AttachTransportFilename = 0x9001,
    AttachRendData = 0x9002,
    MsgProps = 0x9003,
    RecipTable = 0x9004,
    Attachment = 0x9005,
    TnefVersion = 0x9006,
    OemCodepage = 0x9007,
    Other(u16),
}

/// The base type of a MAPI property (vector flag stripped).
#[derive(Clone, Copy, Debug)]
#[from_to_other(base_type = u16, derive_compare = "as_int")]
pub enum MapiType {
    Unspecified = 0x0000,
    Null = 0x0001,
    Uint16 = 0x0002,
    Ulong = 0x0003,
    Float = 0x0004,
    Double = 0x0005,
    Currency = 0x0006,
    AppTime = 0x0007,
    Error = 0x000A,
    Boolean = 0x000B,
    Object = 0x000D,
    LongLong = 0x0014,
    String8 = 0x001E,
    UString = 0x001F,
    Time = 0x0040,
    Clsid = 0x0048,
    Binary = 0x0102,
    Other(u16),
}


/// MAPI property tags the parser fills in or looks at.
pub mod mapi_tag {
    pub const MESSAGE_CLASS: u16 = 0x001A;
    pub const FROM: u16 = 0x0024;
    pub const PRIORITY: u16 = 0x0026;
    pub const SUBJECT: u16 = 0x0037;
    pub const DATE_SENT: u16 = 0x0039;
    pub const OWNER_APPT_ID: u16 = 0x0062;
    pub const RESPONSE_REQUESTED: u16 = 0x0063;
    pub const RECIPIENT_TYPE: u16 = 0x0C15;
    pub const DATE_RECEIVED: u16 = 0x0E06;
    pub const MESSAGE_FLAGS: u16 = 0x0E07;
    pub const RECIPIENT_TABLE: u16 = 0x0E12;
    pub const ATTACH_SIZE: u16 = 0x0E20;
    pub const ATTACH_NUM: u16 = 0x0E21;
    pub const BODY: u16 = 0x1000;
    pub const RTF_COMPRESSED: u16 = 0x1009;
    pub const DISPLAY_NAME: u16 = 0x3001;
    pub const EMAIL_ADDRESS: u16 = 0x3003;
    pub const DATE_MODIFIED: u16 = 0x3008;
    pub const MESSAGE_ID: u16 = 0x300B;
    pub const ATTACH_DATA: u16 = 0x3701;
    pub const ATTACH_EXTENSION: u16 = 0x3703;
    pub const ATTACH_LONG_FILENAME: u16 = 0x3707;
    pub const ATTACH_MIME_TAG: u16 = 0x370E;
}

/// Bits of the one-byte attMessageStatus value.
pub mod message_status {
    pub const MODIFIED: u8 = 0x01;
    pub const LOCAL: u8 = 0x02;
    pub const SUBMITTED: u8 = 0x04;
    pub const READ: u8 = 0x20;
    pub const HAS_ATTACH: u8 = 0x80;
}

/// Bits of PR_MESSAGE_FLAGS.
pub mod message_flags {
    pub const READ: u32 = 0x0000_0001;
    pub const UNMODIFIED: u32 = 0x0000_0002;
    pub const SUBMIT: u32 = 0x0000_0004;
    pub const UNSENT: u32 = 0x0000_0008;
    pub const HAS_ATTACH: u32 = 0x0000_0010;
}


/// Returns whether `tag` lies in the named-property range.
#[inline]
pub fn is_named_tag(tag: u16) -> bool {
    tag >= NAMED_PROPERTY_FIRST && tag <= NAMED_PROPERTY_LAST
}

/// Maps the attMessageStatus byte onto PR_MESSAGE_FLAGS.
pub fn status_to_message_flags(status: u8) -> u32 {
    let mut flags = 0;
    if status & message_status::READ != 0 {
        flags |= message_flags::READ;
    }
    if status & message_status::MODIFIED == 0 {
        flags |= message_flags::UNMODIFIED;
    }
    if status & message_status::SUBMITTED != 0 {
        flags |= message_flags::SUBMIT;
    }
    if status & message_status::HAS_ATTACH != 0 {
        flags |= message_flags::HAS_ATTACH;
    }
    if status & message_status::LOCAL != 0 {
        flags |= message_flags::UNSENT;
    }
    flags
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_word_halves() {
        // attSubject is 0x00018004: atpString in the upper half
        let word: u32 = 0x0001_8004;
        let id = TnefAttributeId::from_base_type((word & 0xFFFF) as u16);
        let attr_type = TnefAttributeType::from_base_type((word >> 16) as u16);
        assert_eq!(id, TnefAttributeId::Subject);
        assert_eq!(attr_type, TnefAttributeType::String);
        assert_eq!(TnefAttributeId::from_base_type(0x1234), TnefAttributeId::Other(0x1234));
    }

    #[test]
    fn test_status_flags() {
        assert_eq!(status_to_message_flags(0x00), message_flags::UNMODIFIED);
        assert_eq!(
            status_to_message_flags(message_status::READ | message_status::MODIFIED | message_status::HAS_ATTACH),
            message_flags::READ | message_flags::HAS_ATTACH,
        );
    }

    #[test]
    fn test_named_range() {
        assert!(!is_named_tag(0x7FFF));
        assert!(is_named_tag(0x8000));
        assert!(is_named_tag(0xFFFE));
        assert!(!is_named_tag(0xFFFF));
    }
}
