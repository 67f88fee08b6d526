//! Collection tag enumeration.

use serde::{Deserialize, Serialize};

use crate::collection::metadata::Metadata;

/// Property key carrying the collection tag.
pub const TAG_PROPERTY: &str = "tag";

/// What kind of resources a collection holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionTag {
    /// Plain collection.
    #[default]
    None,
    /// Address book holding vCards.
    AddressBook,
    /// Calendar holding iCalendar objects.
    Calendar,
}

impl CollectionTag {
    /// Decode the nullable `tag` column.
    pub fn from_column(value: Option<i16>) -> Self {
        match value {
            Some(0) => Self::AddressBook,
            Some(1) => Self::Calendar,
            _ => Self::None,
        }
    }

    /// Encode for the nullable `tag` column.
    pub fn to_column(self) -> Option<i16> {
        match self {
            Self::None => None,
            Self::AddressBook => Some(0),
            Self::Calendar => Some(1),
        }
    }

    /// Parse the value of the `tag` property.
    pub fn from_property(value: &str) -> Self {
        match value {
            "VADDRESSBOOK" => Self::AddressBook,
            "VCALENDAR" => Self::Calendar,
            _ => Self::None,
        }
    }

    /// Read the tag out of a property map.
    pub fn from_props(props: &Metadata) -> Self {
        props
            .get(TAG_PROPERTY)
            .map(|v| Self::from_property(v))
            .unwrap_or_default()
    }

    /// Href suffix given to items imported into a collection with this tag.
    /// Untagged collections have none; the item's own format decides.
    pub fn item_suffix(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::AddressBook => Some(".vcf"),
            Self::Calendar => Some(".ics"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_roundtrip() {
        for tag in [CollectionTag::None, CollectionTag::AddressBook, CollectionTag::Calendar] {
            assert_eq!(CollectionTag::from_column(tag.to_column()), tag);
        }
        assert_eq!(CollectionTag::from_column(Some(7)), CollectionTag::None);
    }

    #[test]
    fn test_from_props() {
        let mut props = Metadata::new();
        assert_eq!(CollectionTag::from_props(&props), CollectionTag::None);
        props.insert(TAG_PROPERTY.to_string(), "VCALENDAR".to_string());
        assert_eq!(CollectionTag::from_props(&props), CollectionTag::Calendar);
        assert_eq!(CollectionTag::Calendar.item_suffix(), Some(".ics"));
        assert_eq!(CollectionTag::None.item_suffix(), None);
    }
}
