// src/lib.rs
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{Context, Result};
use application::{NoteBoard, NoteRepository};
use domain::{DomainError, NoteDraft, NoteId};
use infrastructure::{Config, HttpNoteRepository};
use ports::TextPresenter;
use serde::Serialize;
use tracing::{debug, info};
use crate::cli::args::{Args, Command};
use crate::util::text::extract_share_token;

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting noteshare with arguments");

    // Initialize infrastructure
    let config = Config::resolve(args.config.as_deref())?.with_base_url(args.base_url);
    debug!(?config, "Resolved configuration");
    let repository =
        HttpNoteRepository::new(&config).context("Failed to set up the notes API client")?;

    // Initialize application and presentation
    let mut board = NoteBoard::new(repository);
    let presenter = TextPresenter::new();

    // Execute use case; main reports the failure
    let output = execute(&mut board, &presenter, args.command)
        .await
        .inspect_err(|e| debug!(error = %format!("{e:#}"), "Action failed"))?;

    print!("{output}");
    Ok(())
}

/// Run one command against the board and return what should be printed.
pub async fn execute<R: NoteRepository>(
    board: &mut NoteBoard<R>,
    presenter: &TextPresenter,
    command: Command,
) -> Result<String> {
    match command {
        Command::List { json } => {
            let notes = board.load().await.context("Failed to fetch notes")?;
            info!(count = notes.len(), "Listing notes");
            if json {
                to_json(&notes)
            } else {
                Ok(presenter.render_list(notes))
            }
        }
        Command::Create {
            title,
            content,
            json,
        } => {
            let note = board
                .create(NoteDraft::new(title, content))
                .await
                .context("Failed to create note")?;
            if json {
                to_json(note)
            } else {
                Ok(format!(
                    "Created note {}\n\n{}",
                    note.id,
                    presenter.render_note(note)
                ))
            }
        }
        Command::Edit {
            note_id,
            title,
            content,
        } => {
            let id = NoteId::from(note_id);
            board.load().await.context("Failed to fetch notes")?;

            let buffer = board.begin_edit(&id).context("Cannot edit note")?;
            if let Some(title) = title {
                buffer.title = title;
            }
            if let Some(content) = content {
                buffer.content = content;
            }

            let note = board.save_edit().await.context("Failed to update note")?;
            Ok(format!(
                "Updated note {}\n\n{}",
                note.id,
                presenter.render_note(note)
            ))
        }
        Command::Delete { note_id } => {
            let id = NoteId::from(note_id);
            board.delete(&id).await.context("Failed to delete note")?;
            Ok(format!("Deleted note {id}\n"))
        }
        Command::Share { note_id } => {
            let link = board
                .share(&NoteId::from(note_id))
                .await
                .context("Failed to create shareable link")?;
            Ok(presenter.render_share(&link))
        }
        Command::Shared { token, json } => {
            let token = extract_share_token(&token).ok_or_else(|| {
                DomainError::Validation(format!("no share token found in '{token}'"))
            })?;
            let note = board
                .open_shared(&token)
                .await
                .context("Failed to open shared note")?;
            if json {
                to_json(&note)
            } else {
                Ok(presenter.render_note(&note))
            }
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}
