//! Plain-text list and detail views.

use std::fmt::Write;

use notehub_core::{FieldErrors, Note};
use notehub_query::{ListView, QueryState};

pub const LOADING: &str = "loading notes...";
pub const SERVER_ERROR: &str = "Server error. Sorry!";
pub const EMPTY: &str = "No notes found.";
pub const NOTE_ERROR: &str = "Something went wrong.";

/// Render the list view for the given state.
pub fn list_view(view: &ListView, state: &QueryState) -> String {
    let mut out = String::new();

    let tag = state.tag.as_deref().unwrap_or("all");
    let _ = writeln!(out, "Tag: {}  Search: {}", tag, state.search_text);

    let total_pages = view.total_pages();
    if total_pages > 1 {
        let _ = writeln!(out, "Page {} of {}", state.page, total_pages);
    }
    if view.is_placeholder() {
        out.push_str("(updating...)\n");
    }

    match view {
        ListView::Loading => {
            let _ = writeln!(out, "{}", LOADING);
        }
        ListView::Failed { .. } => {
            let _ = writeln!(out, "{}", SERVER_ERROR);
        }
        _ => {}
    }

    if let Some(page) = view.data() {
        if page.is_empty() {
            let _ = writeln!(out, "{}", EMPTY);
        }
        for note in &page.notes {
            out.push_str(&list_item(note));
        }
    }
    out
}

fn list_item(note: &Note) -> String {
    let mut out = format!("- {} [{}]\n", note.title, note.tag);
    if !note.content.is_empty() {
        out.push_str(&format!("  {}\n", note.content));
    }
    out.push_str(&format!("  id: {}\n", note.id));
    out
}

/// Render the note detail view.
pub fn note_detail(note: &Note) -> String {
    format!(
        "{}\n{}\n\nTag: {}\nCreated: {}\n",
        note.title,
        note.content,
        note.tag,
        note.created_at.format("%Y-%m-%d %H:%M")
    )
}

/// One line per field message.
pub fn field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}\n", e.field, e.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use notehub_core::{Error, NoteListPage, NoteTag, TagFilter};

    fn note(id: &str, title: &str) -> Note {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: "body".to_string(),
            tag: NoteTag::Meeting,
            created_at: at,
            updated_at: at,
        }
    }

    fn state(page: u32) -> QueryState {
        QueryState {
            page,
            search_text: "sync".to_string(),
            effective_search: "sync".to_string(),
            tag: TagFilter::tag("Meeting"),
        }
    }

    #[test]
    fn test_pagination_only_with_several_pages() {
        let single = ListView::Ready(NoteListPage {
            notes: vec![note("a", "Standup")],
            total_pages: 1,
        });
        let out = list_view(&single, &state(1));
        assert!(!out.contains("Page "));
        assert!(out.contains("- Standup [Meeting]"));

        let many = ListView::Ready(NoteListPage {
            notes: vec![note("a", "Standup")],
            total_pages: 4,
        });
        assert!(list_view(&many, &state(2)).contains("Page 2 of 4"));
    }

    #[test]
    fn test_loading_and_error_messages() {
        assert!(list_view(&ListView::Loading, &state(1)).contains("loading notes..."));
        let failed = ListView::Failed {
            error: Error::Request("offline".into()),
            previous: None,
        };
        assert!(list_view(&failed, &state(1)).contains("Server error. Sorry!"));
    }

    #[test]
    fn test_error_keeps_previous_list_visible() {
        let failed = ListView::Failed {
            error: Error::Request("offline".into()),
            previous: Some(NoteListPage {
                notes: vec![note("a", "Standup")],
                total_pages: 1,
            }),
        };
        let out = list_view(&failed, &state(2));
        assert!(out.contains("Server error. Sorry!"));
        assert!(out.contains("- Standup [Meeting]"));
    }

    #[test]
    fn test_empty_page() {
        let view = ListView::Ready(NoteListPage::default());
        assert!(list_view(&view, &state(1)).contains(EMPTY));
    }

    #[test]
    fn test_note_detail() {
        let out = note_detail(&note("a", "Standup"));
        assert!(out.starts_with("Standup\nbody\n"));
        assert!(out.contains("Created: 2025-03-01 10:00"));
    }
}
