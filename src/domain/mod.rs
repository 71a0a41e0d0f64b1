// src/domain/mod.rs
pub mod error;
pub mod note;

pub use error::{DomainError, Operation};
pub use note::{Note, NoteDraft, NoteId, ShareLink};
