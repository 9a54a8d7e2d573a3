use crate::attach::Attachment;
use crate::defs::mapi_tag;
use crate::property_set::PropertySet;


/// A decoded TNEF message: its own properties and its attachments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TnefMessage {
    /// The attachment cross-reference key following the signature.
    pub cross_reference_key: u16,
    pub properties: PropertySet,
    pub attachments: Vec<Attachment>,
}
impl TnefMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds an attachment by name or file name.
    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.attachments
            .iter()
            .find(|a| a.matches(name))
    }

    pub fn find_prop(&self, key: u16) -> Option<String> {
        self.properties.find_prop(key)
    }

    pub fn find_named_prop(&self, name: &str) -> Option<String> {
        self.properties.find_named_prop(name)
    }

    pub fn subject(&self) -> Option<&str> {
        self.properties.property(mapi_tag::SUBJECT)
            .and_then(|v| v.as_str())
    }

    pub fn message_class(&self) -> Option<&str> {
        self.properties.property(mapi_tag::MESSAGE_CLASS)
            .and_then(|v| v.as_str())
    }

    pub fn body(&self) -> Option<&str> {
        self.properties.property(mapi_tag::BODY)
            .and_then(|v| v.as_str())
    }

    /// The raw PR_RTF_COMPRESSED bytes, if the message carries them.
    pub fn compressed_rtf(&self) -> Option<&[u8]> {
        self.properties.property(mapi_tag::RTF_COMPRESSED)
            .and_then(|v| v.as_bytes())
    }
}
