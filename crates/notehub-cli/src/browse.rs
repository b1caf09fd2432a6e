//! Interactive list browser over stdin.
//!
//! Every plain line is search input and goes through the debounce. Commands
//! start with a colon: `:page N`, `:new TITLE`, `:quit`.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use notehub_core::{NoteDraft, NoteTag, NotesService};
use notehub_query::{
    prefetch_notes_page, CoordinatorEvent, CoordinatorOptions, CreateNoteForm, QueryClient,
    QueryCoordinator, SubmitOutcome,
};

use crate::render;

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Search(String),
    Page(u32),
    New(String),
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let Some(command) = line.strip_prefix(':') else {
        return Input::Search(line.to_string());
    };
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command.trim(), ""));

    match name {
        "quit" | "q" => Input::Quit,
        "page" | "p" => match arg.parse::<u32>() {
            Ok(page) if page > 0 => Input::Page(page),
            _ => Input::Unknown(format!("invalid page: {:?}", arg)),
        },
        "new" => Input::New(arg.to_string()),
        other => Input::Unknown(format!("unknown command: {}", other)),
    }
}

async fn show(coordinator: &mut QueryCoordinator) {
    let view = coordinator.resolve().await;
    println!("{}", render::list_view(&view, coordinator.state()));
}

/// Prefetch the route, hydrate a fresh client from the snapshot and run the
/// input loop until `:quit` or end of input.
pub async fn run(
    service: Arc<dyn NotesService>,
    slug: &str,
    options: CoordinatorOptions,
) -> anyhow::Result<()> {
    let prefetch = prefetch_notes_page(Arc::clone(&service), &[slug]).await;
    let client = QueryClient::new(service);
    let hydrated = client.hydrate(&prefetch.state).await;
    info!(
        subsystem = "cli",
        component = "browse",
        hydrated,
        "Browser ready"
    );

    let mut coordinator = QueryCoordinator::mount(client.clone(), prefetch.initial_tag, options);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    show(&mut coordinator).await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Search(text) => coordinator.on_search_input(text),
                    Input::Page(page) => {
                        coordinator.on_page_change(page);
                        show(&mut coordinator).await;
                    }
                    Input::New(title) => {
                        let mut form =
                            CreateNoteForm::with_draft(NoteDraft::new(title, "", NoteTag::Todo));
                        match form.submit(&client).await {
                            SubmitOutcome::Created(note) => println!("Created note {}", note.id),
                            SubmitOutcome::Invalid(errors) => {
                                print!("{}", render::field_errors(&errors))
                            }
                            SubmitOutcome::Failed(e) => eprintln!("Create failed: {}", e),
                            SubmitOutcome::Busy => {}
                        }
                    }
                    Input::Unknown(message) => eprintln!("{}", message),
                }
            }
            event = coordinator.next_event() => {
                debug!(subsystem = "cli", component = "browse", ?event, "Coordinator event");
                match event {
                    CoordinatorEvent::Settled { current: false, .. } => {}
                    _ => show(&mut coordinator).await,
                }
            }
        }
    }

    coordinator.unmount();
    Ok(())
}
