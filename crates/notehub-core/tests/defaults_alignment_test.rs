/// Verifies that validation limits and request defaults stay aligned with the
/// values the notes service enforces.
use notehub_core::defaults;
use notehub_core::{validate_draft, NoteDraft, NoteField, NoteTag};

#[test]
fn test_title_limits_match_defaults() {
    let at_min = NoteDraft::new("a".repeat(defaults::TITLE_MIN_CHARS), "", NoteTag::Todo);
    assert!(validate_draft(&at_min).is_ok());

    let below_min = NoteDraft::new(
        "a".repeat(defaults::TITLE_MIN_CHARS - 1),
        "",
        NoteTag::Todo,
    );
    let errors = validate_draft(&below_min).unwrap_err();
    assert!(errors.get(NoteField::Title).is_some());

    let above_max = NoteDraft::new(
        "a".repeat(defaults::TITLE_MAX_CHARS + 1),
        "",
        NoteTag::Todo,
    );
    assert!(validate_draft(&above_max).is_err());
}

#[test]
fn test_content_limit_matches_defaults() {
    let at_max = NoteDraft::new("Title", "c".repeat(defaults::CONTENT_MAX_CHARS), NoteTag::Work);
    assert!(validate_draft(&at_max).is_ok());
}

#[test]
fn test_every_enumerated_tag_validates() {
    for tag in NoteTag::ALL {
        let draft = NoteDraft::new("Title", "", tag);
        assert_eq!(validate_draft(&draft).unwrap().tag, tag);
    }
}

#[test]
fn test_request_defaults() {
    assert_eq!(defaults::PER_PAGE, 12, "list pages hold 12 notes");
    assert_eq!(defaults::DEBOUNCE_MS, 300, "search debounce is 300ms");
    assert_eq!(defaults::FIRST_PAGE, 1);
    assert_eq!(defaults::NOTES_NAMESPACE, "notes");
}
