use std::collections::BTreeMap;

use log::debug;

use crate::attribute::{AttrValue, Attribute};
use crate::mapi::{PropId, PropValue, Property};


/// The MAPI properties and TNEF attributes of a message or attachment.
///
/// Both maps are keyed by tag; they share the number space but not meaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertySet {
    properties: BTreeMap<u16, Property>,
    attributes: BTreeMap<u16, Attribute>,
}
impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `property`; an existing one with the same key is only replaced
    /// if `overwrite` is set. Returns whether the property was stored.
    pub fn add_property(&mut self, property: Property, overwrite: bool) -> bool {
        if !overwrite && self.properties.contains_key(&property.key) {
            debug!("keeping existing property 0x{:04X}", property.key);
            return false;
        }
        self.properties.insert(property.key, property);
        true
    }

    pub fn get(&self, key: u16) -> Option<&Property> {
        self.properties.get(&key)
    }

    pub fn property(&self, key: u16) -> Option<&PropValue> {
        self.properties.get(&key).map(|p| &p.value)
    }

    pub fn properties(&self) -> &BTreeMap<u16, Property> {
        &self.properties
    }

    /// The formatted value of the property `key`.
    pub fn find_prop(&self, key: u16) -> Option<String> {
        self.property(key).map(|v| v.to_string())
    }

    /// The formatted value of the named property called `name`.
    ///
    /// Numeric names match in their `0xNNNN` form; comparison ignores case.
    pub fn find_named_prop(&self, name: &str) -> Option<String> {
        let wanted = name.to_uppercase();
        self.properties
            .values()
            .find(|p| match &p.name {
                Some(prop_name) => match &prop_name.id {
                    PropId::String(s) => s.to_uppercase() == wanted,
                    PropId::Number(n) => format!("0X{:04X}", n) == wanted,
                },
                None => false,
            })
            .map(|p| p.value.to_string())
    }

    pub fn add_attribute(&mut self, attribute: Attribute, overwrite: bool) -> bool {
        let key = attribute.tag();
        if !overwrite && self.attributes.contains_key(&key) {
            return false;
        }
        self.attributes.insert(key, attribute);
        true
    }

    pub fn attribute(&self, key: u16) -> Option<&AttrValue> {
        self.attributes.get(&key).map(|a| &a.value)
    }

    pub fn has_attribute(&self, key: u16) -> bool {
        self.attributes.contains_key(&key)
    }

    pub fn attributes(&self) -> &BTreeMap<u16, Attribute> {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn clear(&mut self) {
        self.properties.clear();
        self.attributes.clear();
    }
}


#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::defs::{MapiType, TnefAttributeId, TnefAttributeLevel, TnefAttributeType};
    use crate::mapi::PropName;

    fn string8(key: u16, s: &str) -> Property {
        Property::new(key, MapiType::String8, PropValue::String8(s.to_owned()))
    }

    #[test]
    fn test_overwrite_is_explicit() {
        let mut set = PropertySet::new();
        assert!(set.add_property(string8(0x0037, "first"), false));
        assert!(!set.add_property(string8(0x0037, "second"), false));
        assert_eq!(set.find_prop(0x0037).as_deref(), Some("first"));
        assert!(set.add_property(string8(0x0037, "third"), true));
        assert_eq!(set.find_prop(0x0037).as_deref(), Some("third"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_find_named_prop() {
        let mut set = PropertySet::new();
        let guid = Uuid::nil();
        set.add_property(Property::named(
            0x8001, MapiType::String8, PropValue::String8("Business".to_owned()),
            PropName { guid, id: PropId::String("Keywords".to_owned()) },
        ), false);
        set.add_property(Property::named(
            0x8002, MapiType::Ulong,
            PropValue::Multiple(vec![PropValue::Ulong(1), PropValue::Ulong(5)]),
            PropName { guid, id: PropId::Number(0x8554) },
        ), false);

        assert_eq!(set.find_named_prop("keywords").as_deref(), Some("Business"));
        assert_eq!(set.find_named_prop("0x8554").as_deref(), Some("1,5"));
        assert_eq!(set.find_named_prop("missing"), None);
    }

    #[test]
    fn test_attributes_separate_from_properties() {
        let mut set = PropertySet::new();
        set.add_attribute(Attribute {
            level: TnefAttributeLevel::Message,
            id: TnefAttributeId::Subject,
            attr_type: TnefAttributeType::String,
            length: 5,
            value: AttrValue::Text("Test".to_owned()),
            checksum: 0,
        }, true);
        assert!(set.has_attribute(0x8004));
        assert!(set.property(0x8004).is_none());
        assert!(set.is_empty());
    }
}
