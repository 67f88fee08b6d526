//! Item kinds and href-derived identities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use davstore_core::error::AppError;
use davstore_core::result::AppResult;

/// The two resource formats the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// vCard contact (`.vcf`).
    VCard,
    /// iCalendar object (`.ics`).
    VCalendar,
}

impl ItemKind {
    /// Detect the kind from an href's file extension.
    pub fn from_href(href: &str) -> Option<Self> {
        if href.ends_with(".vcf") {
            Some(Self::VCard)
        } else if href.ends_with(".ics") {
            Some(Self::VCalendar)
        } else {
            None
        }
    }

    /// File extension including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::VCard => ".vcf",
            Self::VCalendar => ".ics",
        }
    }
}

/// Identity of an item derived from the href it is uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrefIdentity {
    /// Row identifier of the item.
    pub id: Uuid,
    /// Href the item is stored under (may differ from the requested one).
    pub href: String,
    /// Resource format.
    pub kind: ItemKind,
    /// Whether `id` was freshly generated instead of read from the href.
    pub minted: bool,
}

impl HrefIdentity {
    /// Derive the identity for an upload.
    ///
    /// vCard hrefs must be `<uuid>.vcf`; any other stem is replaced by a
    /// fresh UUID and the href rewritten to match. iCalendar hrefs are kept
    /// verbatim; their row id is the stem when it parses as a UUID and a
    /// fresh one otherwise.
    pub fn resolve(href: &str) -> AppResult<Self> {
        let kind = ItemKind::from_href(href)
            .ok_or_else(|| AppError::validation(format!("Invalid file extension: {href}")))?;
        let stem = &href[..href.len() - kind.extension().len()];
        let parsed = Uuid::parse_str(stem).ok();

        let identity = match (kind, parsed) {
            (_, Some(id)) => Self {
                id,
                href: href.to_string(),
                kind,
                minted: false,
            },
            (ItemKind::VCard, None) => {
                let id = Uuid::new_v4();
                Self {
                    id,
                    href: format!("{id}{}", kind.extension()),
                    kind,
                    minted: true,
                }
            }
            (ItemKind::VCalendar, None) => Self {
                id: Uuid::new_v4(),
                href: href.to_string(),
                kind,
                minted: true,
            },
        };
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use davstore_core::error::ErrorKind;

    #[test]
    fn test_vcard_with_uuid_stem_is_kept() {
        let href = "11111111-1111-1111-1111-111111111111.vcf";
        let identity = HrefIdentity::resolve(href).unwrap();
        assert_eq!(identity.href, href);
        assert_eq!(identity.id.to_string(), "11111111-1111-1111-1111-111111111111");
        assert_eq!(identity.kind, ItemKind::VCard);
        assert!(!identity.minted);
    }

    #[test]
    fn test_vcard_with_other_stem_is_rewritten() {
        let identity = HrefIdentity::resolve("alice.vcf").unwrap();
        assert!(identity.minted);
        assert_eq!(identity.href, format!("{}.vcf", identity.id));
    }

    #[test]
    fn test_calendar_keeps_href() {
        let identity = HrefIdentity::resolve("meeting-42.ics").unwrap();
        assert_eq!(identity.href, "meeting-42.ics");
        assert_eq!(identity.kind, ItemKind::VCalendar);
        assert!(identity.minted);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = HrefIdentity::resolve("notes.txt").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
