//! Item filters understood by [`CollectionHandle::get_filtered`].
//!
//! [`CollectionHandle::get_filtered`]: super::CollectionHandle::get_filtered

use davstore_entity::item::Item;

/// How a text-match compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
}

/// A client filter, reduced to the shape the store can push down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFilter {
    /// A single text-match on some property.
    TextMatch {
        /// Property the match applies to, if known.
        property: Option<String>,
        /// Text to look for.
        text: String,
        /// Comparison.
        match_type: MatchType,
    },
    /// Any other filter; evaluated by the caller.
    Other,
}

impl ItemFilter {
    /// Text usable as a raw-payload contains search, if the filter set
    /// allows one.
    pub(crate) fn push_down(filters: &[ItemFilter]) -> Option<&str> {
        match filters {
            [
                ItemFilter::TextMatch {
                    text,
                    match_type: MatchType::Contains | MatchType::Equals,
                    ..
                },
            ] => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Candidate items for a filter. Callers must still evaluate the filter
/// against every item: a narrowed set is a superset of the matches.
#[derive(Debug, Clone)]
pub struct FilteredItems {
    /// Candidates.
    pub items: Vec<Item>,
    /// Whether the candidates were narrowed by a contains search.
    pub narrowed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_match(match_type: MatchType) -> ItemFilter {
        ItemFilter::TextMatch {
            property: Some("FN".into()),
            text: "Alice".into(),
            match_type,
        }
    }

    #[test]
    fn test_single_contains_or_equals_is_pushed_down() {
        assert_eq!(ItemFilter::push_down(&[text_match(MatchType::Contains)]), Some("Alice"));
        assert_eq!(ItemFilter::push_down(&[text_match(MatchType::Equals)]), Some("Alice"));
    }

    #[test]
    fn test_other_shapes_fall_back() {
        assert_eq!(ItemFilter::push_down(&[]), None);
        assert_eq!(ItemFilter::push_down(&[text_match(MatchType::StartsWith)]), None);
        assert_eq!(ItemFilter::push_down(&[ItemFilter::Other]), None);
        assert_eq!(
            ItemFilter::push_down(&[text_match(MatchType::Contains), text_match(MatchType::Contains)]),
            None
        );
    }
}
