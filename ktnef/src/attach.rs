use bitflags::bitflags;

use crate::defs::mapi_tag;
use crate::property_set::PropertySet;


bitflags! {
    /// Which parts of an attachment have been seen in the stream.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct ParseState: u8 {
        const TITLE = 0x01;
        const DATA = 0x02;
        const INFO = 0x04;
    }
}


/// One attachment of a TNEF message.
///
/// The data itself stays in the source stream; `offset` and `size` locate it
/// for [`crate::extract`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub file_name: String,
    pub display_name: String,
    pub mime_tag: String,
    pub extension: String,
    pub index: u32,
    pub offset: Option<u64>,
    pub size: u32,
    pub display_size: u32,
    pub state: ParseState,
    pub properties: PropertySet,
}
impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_data(&self) -> bool {
        self.offset.is_some()
    }

    /// The name to use when writing the attachment to disk.
    pub fn output_name(&self) -> &str {
        if !self.file_name.is_empty() {
            &self.file_name
        } else {
            &self.name
        }
    }

    /// Whether the attachment answers to `name` (its name or file name).
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.file_name == name
    }

    /// Marks the data as located at `offset` with `size` bytes.
    pub(crate) fn set_data(&mut self, offset: u64, size: u32) {
        self.offset = Some(offset);
        self.size = size;
        self.state.insert(ParseState::DATA);
    }

    /// Fills the convenience fields from the decoded MAPI properties.
    pub(crate) fn apply_info(&mut self) {
        let props = &self.properties;
        self.index = props.property(mapi_tag::ATTACH_NUM)
            .and_then(|v| v.as_u32())
            .unwrap_or(0);
        self.display_size = props.property(mapi_tag::ATTACH_SIZE)
            .and_then(|v| v.as_u32())
            .unwrap_or(0);
        if let Some(display_name) = props.find_prop(mapi_tag::DISPLAY_NAME).filter(|s| !s.is_empty()) {
            self.display_name = display_name;
        }
        self.file_name = props.find_prop(mapi_tag::ATTACH_LONG_FILENAME).unwrap_or_default();
        if let Some(mime_tag) = props.find_prop(mapi_tag::ATTACH_MIME_TAG).filter(|s| !s.is_empty()) {
            self.mime_tag = mime_tag;
        }
        self.extension = props.find_prop(mapi_tag::ATTACH_EXTENSION).unwrap_or_default();
        self.state.insert(ParseState::INFO);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::MapiType;
    use crate::mapi::{PropValue, Property};

    #[test]
    fn test_apply_info() {
        let mut attachment = Attachment::new();
        let props = &mut attachment.properties;
        props.add_property(Property::new(mapi_tag::ATTACH_NUM, MapiType::Ulong, PropValue::Ulong(3)), false);
        props.add_property(Property::new(mapi_tag::ATTACH_SIZE, MapiType::Ulong, PropValue::Ulong(1234)), false);
        props.add_property(Property::new(mapi_tag::DISPLAY_NAME, MapiType::String8, PropValue::String8("Report".to_owned())), false);
        props.add_property(Property::new(mapi_tag::ATTACH_LONG_FILENAME, MapiType::UString, PropValue::UString("report.pdf".to_owned())), false);
        props.add_property(Property::new(mapi_tag::ATTACH_EXTENSION, MapiType::String8, PropValue::String8(".pdf".to_owned())), false);

        attachment.apply_info();
        assert_eq!(attachment.index, 3);
        assert_eq!(attachment.display_size, 1234);
        assert_eq!(attachment.display_name, "Report");
        assert_eq!(attachment.file_name, "report.pdf");
        assert_eq!(attachment.extension, ".pdf");
        assert_eq!(attachment.mime_tag, "");
        assert!(attachment.state.contains(ParseState::INFO));
        assert_eq!(attachment.output_name(), "report.pdf");
        assert!(attachment.matches("report.pdf"));
    }

    #[test]
    fn test_data_state() {
        let mut attachment = Attachment::new();
        assert!(!attachment.has_data());
        attachment.set_data(100, 5);
        assert!(attachment.has_data());
        assert!(attachment.state.contains(ParseState::DATA));
        assert!(!attachment.state.contains(ParseState::TITLE));
    }
}
