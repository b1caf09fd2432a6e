//! Notes API request and response types.

use serde::{Deserialize, Serialize};

use notehub_core::{format_tag, normalize_search};

/// Query string of `GET /notes`.
///
/// `search` and `tag` are omitted entirely when blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesParams {
    pub per_page: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ListNotesParams {
    /// Normalize raw list inputs into outgoing parameters.
    pub fn new(page: u32, search: &str, tag: Option<&str>, per_page: u32) -> Self {
        Self {
            per_page,
            page,
            search: normalize_search(search).map(str::to_string),
            tag: tag.and_then(format_tag),
        }
    }
}

/// Error body returned by the notes API. Either field may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable message, falling back to `fallback`.
    pub fn into_message(self, fallback: &str) -> String {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_omit_blank_inputs() {
        let params = ListNotesParams::new(1, "   ", None, 12);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, serde_json::json!({"perPage": 12, "page": 1}));
    }

    #[test]
    fn test_params_trim_search_and_format_tag() {
        let params = ListNotesParams::new(3, "  meeting ", Some("work"), 12);
        assert_eq!(params.search.as_deref(), Some("meeting"));
        assert_eq!(params.tag.as_deref(), Some("Work"));
        assert_eq!(params.page, 3);
    }

    #[test]
    fn test_params_blank_tag_is_omitted() {
        let params = ListNotesParams::new(1, "", Some(" "), 12);
        assert!(params.tag.is_none());

        let params = ListNotesParams::new(1, "", Some(" work"), 12);
        assert_eq!(params.tag.as_deref(), Some(" work"));
    }

    #[test]
    fn test_error_body_message_preference() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"message":"Note not found","error":"x"}"#).unwrap();
        assert_eq!(body.into_message("fallback"), "Note not found");

        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"Bad Request"}"#).unwrap();
        assert_eq!(body.into_message("fallback"), "Bad Request");

        assert_eq!(ApiErrorBody::default().into_message("fallback"), "fallback");
    }
}
