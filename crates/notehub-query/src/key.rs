//! Query keys and cached query values.

use serde::{Deserialize, Serialize};

use notehub_core::defaults::{FIRST_PAGE, NOTES_NAMESPACE};
use notehub_core::{Note, NoteListPage, TagFilter};

/// Identity of a list query: exactly the (page, effective search, tag)
/// triple. The tag is the raw route value, before title-casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListKey {
    pub page: u32,
    pub search: String,
    pub tag: Option<String>,
}

impl ListKey {
    pub fn new(page: u32, search: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            page,
            search: search.into(),
            tag,
        }
    }

    /// First page, no search, for the given route filter.
    pub fn initial(filter: &TagFilter) -> Self {
        Self::new(FIRST_PAGE, "", filter.as_deref().map(str::to_string))
    }
}

/// Every cacheable query. Lists and details share the "notes" namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryKey {
    NoteList(ListKey),
    Note { id: String },
}

impl QueryKey {
    pub fn note(id: impl Into<String>) -> Self {
        QueryKey::Note { id: id.into() }
    }

    pub fn namespace(&self) -> &'static str {
        NOTES_NAMESPACE
    }

    /// Stable serialized form used as the cache map key, e.g.
    /// `["notes",1,"",null]` or `["notes","<id>"]`.
    pub fn hash_key(&self) -> String {
        let value = match self {
            QueryKey::NoteList(key) => {
                serde_json::json!([self.namespace(), key.page, key.search, key.tag])
            }
            QueryKey::Note { id } => serde_json::json!([self.namespace(), id]),
        };
        value.to_string()
    }
}

impl From<ListKey> for QueryKey {
    fn from(key: ListKey) -> Self {
        QueryKey::NoteList(key)
    }
}

/// Resolved value of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum QueryData {
    NoteList(NoteListPage),
    Note(Note),
}

impl QueryData {
    pub fn as_list(&self) -> Option<&NoteListPage> {
        match self {
            QueryData::NoteList(page) => Some(page),
            QueryData::Note(_) => None,
        }
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            QueryData::Note(note) => Some(note),
            QueryData::NoteList(_) => None,
        }
    }

    pub fn into_list(self) -> Option<NoteListPage> {
        match self {
            QueryData::NoteList(page) => Some(page),
            QueryData::Note(_) => None,
        }
    }

    pub fn into_note(self) -> Option<Note> {
        match self {
            QueryData::Note(note) => Some(note),
            QueryData::NoteList(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_key_list() {
        let key = QueryKey::from(ListKey::new(1, "", None));
        assert_eq!(key.hash_key(), r#"["notes",1,"",null]"#);

        let key = QueryKey::from(ListKey::new(3, "meeting", Some("work".to_string())));
        assert_eq!(key.hash_key(), r#"["notes",3,"meeting","work"]"#);
    }

    #[test]
    fn test_hash_key_note() {
        assert_eq!(QueryKey::note("abc").hash_key(), r#"["notes","abc"]"#);
    }

    #[test]
    fn test_equal_tuples_equal_keys() {
        let a = QueryKey::from(ListKey::new(2, "x", Some("Todo".into())));
        let b = QueryKey::from(ListKey::new(2, "x", Some("Todo".into())));
        assert_eq!(a, b);
        assert_eq!(a.hash_key(), b.hash_key());
    }

    #[test]
    fn test_tag_casing_is_part_of_identity() {
        let raw = QueryKey::from(ListKey::new(1, "", Some("work".into())));
        let titled = QueryKey::from(ListKey::new(1, "", Some("Work".into())));
        assert_ne!(raw.hash_key(), titled.hash_key());
    }

    #[test]
    fn test_initial_key_from_filter() {
        let key = ListKey::initial(&TagFilter::from_slug("all"));
        assert_eq!(key, ListKey::new(1, "", None));

        let key = ListKey::initial(&TagFilter::from_slug("Work"));
        assert_eq!(key.tag.as_deref(), Some("Work"));
    }

    #[test]
    fn test_query_data_accessors() {
        let data = QueryData::NoteList(NoteListPage::default());
        assert!(data.as_list().is_some());
        assert!(data.as_note().is_none());
        assert!(data.into_note().is_none());
    }
}
