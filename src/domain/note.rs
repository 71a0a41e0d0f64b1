// src/domain/note.rs
use crate::domain::DomainError;
use crate::util::text::extract_share_token;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned note identifier.
///
/// Backends hand out either numeric or string ids; both are kept as text
/// so the client never has to interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for NoteId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => NoteId(n.to_string()),
            RawId::Text(s) => NoteId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

impl Note {
    /// The editable part of the note, used to seed an edit buffer.
    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Request body for create and update. Update is a full replace, so both
/// fields are always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Reject drafts with an empty title or content before any request is made.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation(
                "title must not be empty".to_string(),
            ));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "content must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Response of the share endpoint: a public, unauthenticated URL for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub public_url: String,
}

impl ShareLink {
    /// The opaque share token carried in the last path segment of the URL.
    pub fn token(&self) -> Option<String> {
        extract_share_token(&self.public_url)
    }
}
