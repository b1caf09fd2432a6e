//! Create-note form: validate locally, submit once, invalidate on success.
//!
//! `Idle -> Validating -> Submitting -> Idle`. Validation failures never
//! reach the network. A failed submit keeps the entered values so the user
//! can resubmit.

use tracing::{debug, info, warn};

use notehub_core::{validate_draft, Error, FieldErrors, NewNote, Note, NoteDraft, NoteField};

use crate::query_client::QueryClient;

pub const SUBMIT_LABEL: &str = "Create note";
pub const SUBMITTING_LABEL: &str = "Creating new note...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
}

/// Result of one submit attempt.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Note created; the hosting view should close.
    Created(Note),
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The service rejected the create or could not be reached.
    Failed(Error),
    /// A submit is already in flight.
    Busy,
}

impl SubmitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateNoteForm {
    draft: NoteDraft,
    errors: FieldErrors,
    phase: FormPhase,
    last_error: Option<Error>,
}

impl CreateNoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: NoteDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    /// Edit values. Ignored while submitting.
    pub fn draft_mut(&mut self) -> Option<&mut NoteDraft> {
        match self.phase {
            FormPhase::Submitting => None,
            _ => Some(&mut self.draft),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, field: NoteField) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        match self.phase {
            FormPhase::Submitting => SUBMITTING_LABEL,
            _ => SUBMIT_LABEL,
        }
    }

    /// Validate and enter `Submitting`. On `Err` the form is back in `Idle`
    /// (or was already submitting) and nothing must be sent.
    pub fn begin_submit(&mut self) -> Result<NewNote, SubmitOutcome> {
        if self.phase == FormPhase::Submitting {
            return Err(SubmitOutcome::Busy);
        }

        self.phase = FormPhase::Validating;
        match validate_draft(&self.draft) {
            Ok(note) => {
                self.errors = FieldErrors::default();
                self.last_error = None;
                self.phase = FormPhase::Submitting;
                Ok(note)
            }
            Err(errors) => {
                debug!(
                    subsystem = "query",
                    component = "form",
                    errors = %errors,
                    "Draft rejected locally"
                );
                self.errors = errors.clone();
                self.phase = FormPhase::Idle;
                Err(SubmitOutcome::Invalid(errors))
            }
        }
    }

    /// Settle a submit started with [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, result: notehub_core::Result<Note>) -> SubmitOutcome {
        self.phase = FormPhase::Idle;
        match result {
            Ok(note) => {
                self.draft = NoteDraft::default();
                self.errors = FieldErrors::default();
                self.last_error = None;
                SubmitOutcome::Created(note)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Validate, create through `client` and settle. A successful create
    /// invalidates every cached "notes" query.
    pub async fn submit(&mut self, client: &QueryClient) -> SubmitOutcome {
        let note = match self.begin_submit() {
            Ok(note) => note,
            Err(outcome) => return outcome,
        };

        let result = client.create_note(&note).await;
        match &result {
            Ok(created) => info!(
                subsystem = "query",
                component = "form",
                note_id = %created.id,
                "Note form submitted"
            ),
            Err(e) => warn!(
                subsystem = "query",
                component = "form",
                error = %e,
                "Note form submit failed"
            ),
        }
        self.finish_submit(result)
    }
}
