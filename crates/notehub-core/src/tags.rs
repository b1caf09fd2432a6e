//! Tag and search normalization applied before a list request leaves the
//! client, plus decoding of the tag filter route segment.

use serde::{Deserialize, Serialize};

use crate::defaults::ALL_TAGS_SLUG;

/// Title-case a tag for the notes service: first character uppercase, the
/// remainder lowercase. Blank input yields `None`, meaning "no tag filter".
///
/// Whitespace only decides blankness; it is not stripped from the value. The
/// result is not checked against [`crate::NoteTag`]; unknown values are
/// forwarded and the service decides what to return.
pub fn format_tag(tag: &str) -> Option<String> {
    if tag.trim().is_empty() {
        return None;
    }
    let mut chars = tag.chars();
    let first = chars.next()?;
    let mut formatted: String = first.to_uppercase().collect();
    formatted.push_str(&chars.as_str().to_lowercase());
    Some(formatted)
}

/// Trim search text; blank input yields `None` so the parameter is omitted.
pub fn normalize_search(search: &str) -> Option<&str> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Tag filter taken from the filtered list route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TagFilter(Option<String>);

impl TagFilter {
    /// No filtering.
    pub fn all() -> Self {
        Self(None)
    }

    /// Filter by a raw tag value as it appeared in the route.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self(Some(tag.into()))
    }

    /// Decode a percent-encoded route segment. The literal `all` disables
    /// filtering.
    pub fn from_slug(segment: &str) -> Self {
        let decoded = urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| segment.to_string());
        if decoded == ALL_TAGS_SLUG {
            Self(None)
        } else {
            Self(Some(decoded))
        }
    }

    /// Decode the first segment of a catch-all route; no segments means no
    /// filter.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        segments
            .first()
            .map(|s| Self::from_slug(s.as_ref()))
            .unwrap_or_default()
    }

    /// The raw tag value, if filtering.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_all(&self) -> bool {
        self.0.is_none()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tag_title_cases() {
        assert_eq!(format_tag("work").as_deref(), Some("Work"));
        assert_eq!(format_tag("WORK").as_deref(), Some("Work"));
        assert_eq!(format_tag("sHoPpInG").as_deref(), Some("Shopping"));
        assert_eq!(format_tag("Todo").as_deref(), Some("Todo"));
    }

    #[test]
    fn test_format_tag_blank_is_none() {
        assert_eq!(format_tag(""), None);
        assert_eq!(format_tag("   "), None);
    }

    #[test]
    fn test_format_tag_forwards_unknown_values() {
        assert_eq!(format_tag("groceries").as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_format_tag_keeps_surrounding_whitespace() {
        assert_eq!(format_tag(" work").as_deref(), Some(" work"));
        assert_eq!(format_tag("work ").as_deref(), Some("Work "));
    }

    #[test]
    fn test_format_tag_single_char() {
        assert_eq!(format_tag("x").as_deref(), Some("X"));
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  meeting "), Some("meeting"));
        assert_eq!(normalize_search(""), None);
        assert_eq!(normalize_search("\t\n"), None);
    }

    #[test]
    fn test_slug_all_means_no_filter() {
        assert!(TagFilter::from_slug("all").is_all());
        assert_eq!(TagFilter::from_slug("all"), TagFilter::all());
    }

    #[test]
    fn test_slug_is_percent_decoded() {
        let filter = TagFilter::from_slug("Work%20Stuff");
        assert_eq!(filter.as_deref(), Some("Work Stuff"));
    }

    #[test]
    fn test_slug_keeps_raw_casing() {
        assert_eq!(TagFilter::from_slug("work").as_deref(), Some("work"));
    }

    #[test]
    fn test_segments_use_first() {
        let filter = TagFilter::from_segments(&["Meeting", "ignored"]);
        assert_eq!(filter.as_deref(), Some("Meeting"));

        let empty: [&str; 0] = [];
        assert!(TagFilter::from_segments(&empty).is_all());
    }
}
