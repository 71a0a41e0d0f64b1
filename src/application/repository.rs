// src/application/repository.rs
use crate::domain::{DomainError, Note, NoteDraft, NoteId, ShareLink};
use async_trait::async_trait;

/// Remote notes API. Every method performs exactly one request and keeps no
/// local state between calls.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Note>, DomainError>;

    /// Create a note; the server assigns the id.
    async fn create(&self, draft: &NoteDraft) -> Result<Note, DomainError>;

    /// Replace title and content of an existing note.
    async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<Note, DomainError>;

    async fn remove(&self, id: &NoteId) -> Result<(), DomainError>;

    /// Ask the server for a public link to the note.
    async fn share(&self, id: &NoteId) -> Result<ShareLink, DomainError>;

    /// Read a note through its public share token. No authentication.
    async fn fetch_shared(&self, token: &str) -> Result<Note, DomainError>;
}
