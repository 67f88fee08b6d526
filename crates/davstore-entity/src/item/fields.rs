//! Denormalized search columns extracted from item payloads.

use serde::{Deserialize, Serialize};

/// Searchable fields of an item. Every field is optional; absent or blank
/// values are stored as null and categories as an empty array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub full_name: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub ext_number: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub categories: Vec<String>,
}

impl ItemFields {
    /// Trim every scalar field and turn blanks into `None`.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.full_name,
            &mut self.prefix,
            &mut self.suffix,
            &mut self.first_name,
            &mut self.last_name,
            &mut self.middle_name,
            &mut self.phone_number,
            &mut self.ext_number,
            &mut self.company,
            &mut self.title,
            &mut self.department,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_blanks_become_none() {
        let fields = ItemFields {
            full_name: Some("  Alice Doe ".into()),
            prefix: Some("   ".into()),
            title: Some(String::new()),
            categories: vec![" friends ".into()],
            ..Default::default()
        }
        .normalized();

        assert_eq!(fields.full_name.as_deref(), Some("Alice Doe"));
        assert_eq!(fields.prefix, None);
        assert_eq!(fields.title, None);
        assert_eq!(fields.categories, vec![" friends ".to_string()]);
    }
}
