// src/ports/text.rs
use crate::domain::{Note, ShareLink};
use crate::util::text::preview;
use std::fmt::Write;

const PREVIEW_WIDTH: usize = 60;

/// Renders notes for the terminal.
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One line per note: id, title and the first line of the content.
    pub fn render_list(&self, notes: &[Note]) -> String {
        if notes.is_empty() {
            return "No notes yet!\n".to_string();
        }

        let id_width = notes.iter().map(|n| n.id.as_str().chars().count()).max().unwrap_or(0);
        let mut out = String::new();
        for note in notes {
            let _ = writeln!(
                out,
                "{:>width$}  {}  {}",
                note.id,
                note.title,
                preview(&note.content, PREVIEW_WIDTH),
                width = id_width
            );
        }
        out
    }

    /// Title, underline, full content.
    pub fn render_note(&self, note: &Note) -> String {
        let underline = "=".repeat(note.title.chars().count().max(1));
        format!("{}\n{}\n\n{}\n", note.title, underline, note.content)
    }

    pub fn render_share(&self, link: &ShareLink) -> String {
        format!("Shareable link:\n{}\n", link.public_url)
    }
}
