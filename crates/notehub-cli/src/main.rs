//! notehub: terminal client for the notehub notes service.

mod browse;
mod render;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notehub_client::NotehubClient;
use notehub_core::defaults::ALL_TAGS_SLUG;
use notehub_core::{NoteDraft, NoteTag, NotesService, TagFilter};
use notehub_query::{
    prefetch_note_detail, prefetch_notes_page, CoordinatorOptions, CreateNoteForm, QueryClient,
    QueryCoordinator, SubmitOutcome,
};

#[derive(Parser)]
#[command(name = "notehub")]
#[command(author, version, about = "Browse and manage notes on a notehub service")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes for a tag slug
    List {
        /// Tag slug, percent-encoded; "all" disables filtering
        #[arg(default_value = ALL_TAGS_SLUG)]
        slug: String,

        /// Page to show
        #[arg(short, long)]
        page: Option<u32>,

        /// Search text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a single note
    Show {
        /// Note identifier
        id: String,
    },

    /// Create a note
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,

        /// One of Todo, Work, Personal, Meeting, Shopping
        #[arg(long, default_value_t = NoteTag::default().to_string())]
        tag: String,
    },

    /// Delete a note
    Delete {
        /// Note identifier
        id: String,
    },

    /// Interactive list: type to search, `:page N`, `:new TITLE`, `:quit`
    Browse {
        #[arg(default_value = ALL_TAGS_SLUG)]
        slug: String,
    },

    /// Print the prefetched cache snapshot for a tag slug as JSON
    Snapshot {
        #[arg(default_value = ALL_TAGS_SLUG)]
        slug: String,
    },
}

/// Initialize tracing on stderr (or a daily rolling file).
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "notehub=info")
fn init_logging() -> Option<WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notehub=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("notehub.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_logging();

    let cli = Cli::parse();
    let service: Arc<dyn NotesService> = Arc::new(NotehubClient::from_env()?);
    let options = CoordinatorOptions::from_env();

    match cli.command {
        Commands::List { slug, page, search } => {
            let client = QueryClient::new(service);
            let mut coordinator =
                QueryCoordinator::mount(client, TagFilter::from_slug(&slug), options);
            if let Some(search) = search {
                coordinator.on_search_input(search);
                coordinator.flush_search();
            }
            if let Some(page) = page {
                coordinator.on_page_change(page);
            }
            let view = coordinator.settle().await;
            print!("{}", render::list_view(&view, coordinator.state()));
        }
        Commands::Show { id } => {
            let prefetch = prefetch_note_detail(Arc::clone(&service), &id).await;
            let client = QueryClient::new(service);
            client.hydrate(&prefetch.state).await;
            match client.fetch_note(&prefetch.id).await {
                Ok(note) => print!("{}", render::note_detail(&note)),
                Err(e) => {
                    println!("{}", render::NOTE_ERROR);
                    return Err(e.into());
                }
            }
        }
        Commands::Create {
            title,
            content,
            tag,
        } => {
            let client = QueryClient::new(service);
            let mut form = CreateNoteForm::with_draft(NoteDraft {
                title,
                content,
                tag,
            });
            match form.submit(&client).await {
                SubmitOutcome::Created(note) => println!("Created note {}", note.id),
                SubmitOutcome::Invalid(errors) => {
                    print!("{}", render::field_errors(&errors));
                    anyhow::bail!("note was not created");
                }
                SubmitOutcome::Failed(e) => return Err(e.into()),
                SubmitOutcome::Busy => anyhow::bail!("a submit is already in flight"),
            }
        }
        Commands::Delete { id } => {
            let deleted = QueryClient::new(service).delete_note(&id).await?;
            println!("Deleted note {} ({})", deleted.id, deleted.title);
        }
        Commands::Browse { slug } => {
            browse::run(service, &slug, options).await?;
        }
        Commands::Snapshot { slug } => {
            let prefetch = prefetch_notes_page(service, &[slug.as_str()]).await;
            println!("{}", serde_json::to_string_pretty(&prefetch.state)?);
        }
    }

    Ok(())
}
