// src/domain/error.rs
use std::fmt;
use thiserror::Error;

/// The API call an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
    Share,
    FetchShared,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Share => "share",
            Operation::FetchShared => "fetch shared",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Failed to {operation} note: request did not reach the server: {message}")]
    Network {
        operation: Operation,
        message: String,
    },
    #[error("Failed to {operation} note: server answered {status}: {message}")]
    Http {
        operation: Operation,
        status: u16,
        message: String,
    },
    #[error("Failed to {operation} note: unexpected response body: {message}")]
    Decode {
        operation: Operation,
        message: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// The API call that failed, if the error came from one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            DomainError::Network { operation, .. }
            | DomainError::Http { operation, .. }
            | DomainError::Decode { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
