//! In-memory notes service for tests.
//!
//! Filters and paginates the way the remote service does, counts every call,
//! and can simulate latency and failures.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use notehub_core::defaults::PER_PAGE;
use notehub_core::{
    format_tag, normalize_search, Error, NewNote, Note, NoteListPage, NoteTag, NotesService,
    Result,
};

/// A recorded `list_notes` call with normalized parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub page: u32,
    pub search: Option<String>,
    pub tag: Option<String>,
}

#[derive(Default)]
pub struct MockNotesService {
    notes: Mutex<Vec<Note>>,
    list_calls: Mutex<Vec<ListCall>>,
    latency: Mutex<Duration>,
    fail_lists: AtomicBool,
    fail_creates: AtomicBool,
    get_count: AtomicUsize,
    create_count: AtomicUsize,
    delete_count: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockNotesService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `count` notes cycling through every tag.
    pub fn with_notes(count: usize) -> Self {
        let service = Self::new();
        {
            let mut notes = service.notes.lock().unwrap();
            for i in 0..count {
                let tag = NoteTag::ALL[i % NoteTag::ALL.len()];
                notes.push(sample_note(&format!("seed-{}", i), &format!("Note {}", i), tag));
            }
        }
        service
    }

    pub fn insert(&self, note: Note) {
        self.notes.lock().unwrap().push(note);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.list_count() + self.get_count() + self.create_count() + self.delete_count()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

pub fn sample_note(id: &str, title: &str, tag: NoteTag) -> Note {
    let now = Utc::now();
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("content of {}", title),
        tag,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl NotesService for MockNotesService {
    async fn list_notes(&self, page: u32, search: &str, tag: Option<&str>) -> Result<NoteListPage> {
        let call = ListCall {
            page,
            search: normalize_search(search).map(str::to_string),
            tag: tag.and_then(format_tag),
        };
        self.list_calls.lock().unwrap().push(call.clone());
        self.simulate_latency().await;

        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(Error::Service {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }

        let notes = self.notes.lock().unwrap();
        let matching: Vec<Note> = notes
            .iter()
            .filter(|n| match &call.tag {
                Some(tag) => n.tag.as_str() == tag,
                None => true,
            })
            .filter(|n| match &call.search {
                Some(s) => {
                    let s = s.to_lowercase();
                    n.title.to_lowercase().contains(&s) || n.content.to_lowercase().contains(&s)
                }
                None => true,
            })
            .cloned()
            .collect();

        let per_page = PER_PAGE as usize;
        let total_pages = matching.len().div_ceil(per_page) as u32;
        let start = (page.saturating_sub(1) as usize) * per_page;
        Ok(NoteListPage {
            notes: matching.into_iter().skip(start).take(per_page).collect(),
            total_pages,
        })
    }

    async fn get_note(&self, id: &str) -> Result<Note> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.notes
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(Error::Service {
                status: 400,
                message: "Rejected by server: duplicate title".to_string(),
            });
        }
        let id = format!("created-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut created = sample_note(&id, &note.title, note.tag);
        created.content = note.content.clone();
        self.notes.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let mut notes = self.notes.lock().unwrap();
        let index = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("Note {} not found", id)))?;
        Ok(notes.remove(index))
    }
}
