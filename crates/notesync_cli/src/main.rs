//! Terminal front end for notesync.
//!
//! # Responsibility
//! - Build one store handle and inject it down the data source, repository
//!   and use-case layers.
//! - Drive the same reducers a screen would, printing their state.
//!
//! # Invariants
//! - Command-line flags override config file values.
//! - Failures exit with status 1 and a single line on stderr.

use clap::{Parser, Subcommand};
use log::info;
use notesync_core::{
    init_logging, init_stderr_logging, DocumentStore, Note, NoteDetailReducer, NoteDetailState,
    NoteSyncConfig, NoteUseCases, NotesListReducer, RemoteNoteDataSource, RemoteNoteRepository,
    SqliteDocumentStore,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "notesync", version, about = "Live-synced notes from the terminal")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite store file; an in-memory store is used when absent
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Document collection holding the notes
    #[arg(long, global = true)]
    collection: Option<String>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logs go to stderr otherwise
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check core linkage
    Ping,
    /// Print the current notes
    List,
    /// Print one note
    Show { id: String },
    /// Create a note and print its id
    Add { title: String, description: String },
    /// Overwrite a note's title and description
    Update {
        id: String,
        title: String,
        description: String,
    },
    /// Delete a note
    Delete { id: String },
    /// Print every snapshot of the collection as it changes
    Watch {
        /// Stop after this many snapshots
        #[arg(long)]
        snapshots: Option<usize>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("notesync_core ping={}", notesync_core::ping());
        println!("notesync_core version={}", notesync_core::core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    match &config.log_dir {
        Some(dir) => init_logging(&config.log_level, dir)?,
        None => init_stderr_logging(&config.log_level)?,
    }

    let store = match &config.db_path {
        Some(path) => SqliteDocumentStore::open(path),
        None => SqliteDocumentStore::open_in_memory(),
    }
    .map_err(|err| err.to_string())?;
    info!(
        "event=cli_start module=cli status=ok collection={} persistent={}",
        config.collection,
        config.db_path.is_some()
    );

    let store: Arc<dyn DocumentStore> = Arc::new(store);
    let source = RemoteNoteDataSource::new(store, config.collection.clone());
    let repo = RemoteNoteRepository::with_lookup_policy(source, config.lookup_policy());
    let use_cases = NoteUseCases::new(Arc::new(repo));

    match cli.command {
        Command::Ping => Ok(()),
        Command::List => list(&use_cases).await,
        Command::Show { id } => show(&use_cases, &id).await,
        Command::Add { title, description } => add(&use_cases, title, description).await,
        Command::Update {
            id,
            title,
            description,
        } => update(&use_cases, &id, title, description).await,
        Command::Delete { id } => delete(&use_cases, &id).await,
        Command::Watch { snapshots } => watch(&use_cases, snapshots).await,
    }
}

fn resolve_config(cli: &Cli) -> Result<NoteSyncConfig, String> {
    let mut config = match &cli.config {
        Some(path) => NoteSyncConfig::load(path).map_err(|err| err.to_string())?,
        None => NoteSyncConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.db_path = Some(db.clone());
    }
    if let Some(collection) = &cli.collection {
        config.collection = collection.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

async fn list(use_cases: &NoteUseCases) -> Result<(), String> {
    let reducer = NotesListReducer::new(use_cases);
    let state = reducer
        .subscribe()
        .wait_for(|state| !state.is_loading)
        .await
        .map_err(|err| err.to_string())?
        .clone();
    reducer.close().await;

    if let Some(error) = state.error {
        return Err(error);
    }
    print_notes(&state.notes);
    Ok(())
}

async fn show(use_cases: &NoteUseCases, id: &str) -> Result<(), String> {
    let state = load_detail(use_cases, id).await?.1;
    println!("id: {id}");
    println!("title: {}", state.title);
    println!("description: {}", state.description);
    Ok(())
}

async fn add(use_cases: &NoteUseCases, title: String, description: String) -> Result<(), String> {
    let reducer = NoteDetailReducer::new(use_cases, None);
    reducer.on_title_changed(title);
    reducer.on_description_changed(description);
    reducer.save_note().await;

    let state = saved_state(&reducer)?;
    println!("{}", state.id.unwrap_or_default());
    Ok(())
}

async fn update(
    use_cases: &NoteUseCases,
    id: &str,
    title: String,
    description: String,
) -> Result<(), String> {
    let (reducer, _) = load_detail(use_cases, id).await?;
    reducer.on_title_changed(title);
    reducer.on_description_changed(description);
    reducer.save_note().await;

    saved_state(&reducer)?;
    println!("updated {id}");
    Ok(())
}

async fn delete(use_cases: &NoteUseCases, id: &str) -> Result<(), String> {
    let confirmed = use_cases
        .delete_note
        .execute(id)
        .await
        .map_err(|err| err.to_string())?;
    if !confirmed {
        return Err("Failed to delete note".to_string());
    }
    println!("deleted {id}");
    Ok(())
}

async fn watch(use_cases: &NoteUseCases, limit: Option<usize>) -> Result<(), String> {
    let reducer = NotesListReducer::new(use_cases);
    let mut states = reducer.subscribe();
    let mut printed = 0usize;

    loop {
        tokio::select! {
            changed = states.changed() => {
                changed.map_err(|err| err.to_string())?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        let state = states.borrow_and_update().clone();
        if let Some(error) = state.error {
            reducer.close().await;
            return Err(error);
        }
        if state.is_loading {
            continue;
        }

        printed += 1;
        println!("--- snapshot {printed} ({} notes)", state.notes.len());
        print_notes(&state.notes);
        if limit.is_some_and(|limit| printed >= limit) {
            break;
        }
    }

    reducer.close().await;
    Ok(())
}

/// Opens an edit-mode detail reducer and waits for its load.
async fn load_detail(
    use_cases: &NoteUseCases,
    id: &str,
) -> Result<(NoteDetailReducer, NoteDetailState), String> {
    let reducer = NoteDetailReducer::new(use_cases, Some(id));
    let state = reducer
        .subscribe()
        .wait_for(|state| !state.is_loading)
        .await
        .map_err(|err| err.to_string())?
        .clone();
    if !state.is_edit_mode {
        return Err("Note ID cannot be empty".to_string());
    }
    if let Some(error) = &state.error {
        return Err(error.clone());
    }
    Ok((reducer, state))
}

fn saved_state(reducer: &NoteDetailReducer) -> Result<NoteDetailState, String> {
    let state = reducer.state();
    match (&state.error, state.is_saved()) {
        (Some(error), _) => Err(error.clone()),
        (None, true) => Ok(state),
        (None, false) => Err("note was not saved".to_string()),
    }
}

fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("(no notes)");
        return;
    }
    for note in notes {
        println!("{}\t{}\t{}", note.id, note.title, note.description);
    }
}
