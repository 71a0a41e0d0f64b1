// src/application/mod.rs
pub mod note_board;
pub mod repository;

pub use note_board::{Mode, NoteBoard};
pub use repository::NoteRepository;
