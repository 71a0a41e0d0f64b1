// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::NoteRepository;
use crate::domain::{DomainError, Note, NoteDraft, NoteId, Operation, ShareLink};

/// Base of the public links handed out by the mock.
pub const MOCK_SHARE_BASE: &str = "https://notes.test/n";

struct MockState {
    notes: Vec<Note>,
    next_id: i64,
    failures: HashMap<Operation, DomainError>,
    shares: HashMap<String, NoteId>,
    calls: Vec<Operation>,
}

/// In-memory stand-in for the notes server.
///
/// Behaves like a well-formed backend: assigns increasing ids, keeps notes in
/// creation order, answers unknown ids with `NotFound` and hands out a fresh
/// share token per share call. Failures can be injected per operation.
///
/// # Examples
///
/// ```
/// use noteshare::util::testing::MockNoteRepository;
/// use noteshare::domain::{DomainError, Note, NoteId, Operation};
///
/// let mock = MockNoteRepository::builder()
///     .with_note(Note {
///         id: NoteId::from(1),
///         title: "Title".to_string(),
///         content: "Body".to_string(),
///     })
///     .with_failure(Operation::Share, DomainError::Http {
///         operation: Operation::Share,
///         status: 500,
///         message: "boom".to_string(),
///     })
///     .build();
/// assert_eq!(mock.server_notes().len(), 1);
/// ```
pub struct MockNoteRepository {
    state: Mutex<MockState>,
}

impl MockNoteRepository {
    pub fn builder() -> MockNoteRepositoryBuilder {
        MockNoteRepositoryBuilder::new()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every following call of `operation` fail with `error`.
    pub fn fail_on(&self, operation: Operation, error: DomainError) {
        self.state().failures.insert(operation, error);
    }

    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }

    /// Notes as the "server" currently holds them.
    pub fn server_notes(&self) -> Vec<Note> {
        self.state().notes.clone()
    }

    /// Operations in the order they were called, failed ones included.
    pub fn calls(&self) -> Vec<Operation> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    fn begin(&self, operation: Operation) -> Result<MutexGuard<'_, MockState>, DomainError> {
        let mut state = self.state();
        state.calls.push(operation);
        if let Some(err) = state.failures.get(&operation).cloned() {
            return Err(err);
        }
        Ok(state)
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn list(&self) -> Result<Vec<Note>, DomainError> {
        let state = self.begin(Operation::List)?;
        Ok(state.notes.clone())
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, DomainError> {
        let mut state = self.begin(Operation::Create)?;
        draft.validate()?;

        let note = Note {
            id: NoteId::from(state.next_id),
            title: draft.title.clone(),
            content: draft.content.clone(),
        };
        state.next_id += 1;
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<Note, DomainError> {
        let mut state = self.begin(Operation::Update)?;
        if id.is_empty() {
            return Err(DomainError::Validation("note id is missing".to_string()));
        }
        draft.validate()?;

        let note = state
            .notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        note.title = draft.title.clone();
        note.content = draft.content.clone();
        Ok(note.clone())
    }

    async fn remove(&self, id: &NoteId) -> Result<(), DomainError> {
        let mut state = self.begin(Operation::Delete)?;
        let idx = state
            .notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        state.notes.remove(idx);
        state.shares.retain(|_, shared| shared != id);
        Ok(())
    }

    async fn share(&self, id: &NoteId) -> Result<ShareLink, DomainError> {
        let mut state = self.begin(Operation::Share)?;
        if !state.notes.iter().any(|n| &n.id == id) {
            return Err(DomainError::NotFound(id.to_string()));
        }

        let token = format!("tok-{}-{}", id, state.shares.len() + 1);
        state.shares.insert(token.clone(), id.clone());
        Ok(ShareLink {
            public_url: format!("{MOCK_SHARE_BASE}/{token}"),
        })
    }

    async fn fetch_shared(&self, token: &str) -> Result<Note, DomainError> {
        let state = self.begin(Operation::FetchShared)?;
        let id = state
            .shares
            .get(token)
            .ok_or_else(|| DomainError::NotFound(token.to_string()))?;
        state
            .notes
            .iter()
            .find(|n| &n.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(token.to_string()))
    }
}

/// Builder for MockNoteRepository
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteRepositoryBuilder {
    notes: Vec<Note>,
    next_id: Option<i64>,
    failures: HashMap<Operation, DomainError>,
}

impl MockNoteRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            next_id: None,
            failures: HashMap::new(),
        }
    }

    /// Seed a note the server already holds
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_notes(mut self, notes: impl IntoIterator<Item = Note>) -> Self {
        self.notes.extend(notes);
        self
    }

    /// Id given to the next created note (defaults to one past the largest numeric seed id)
    pub fn with_next_id(mut self, id: i64) -> Self {
        self.next_id = Some(id);
        self
    }

    /// Configure an operation to fail
    pub fn with_failure(mut self, operation: Operation, error: DomainError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    pub fn build(self) -> MockNoteRepository {
        let next_id = self.next_id.unwrap_or_else(|| {
            self.notes
                .iter()
                .filter_map(|n| n.id.as_str().parse::<i64>().ok())
                .max()
                .map_or(1, |max| max + 1)
        });

        MockNoteRepository {
            state: Mutex::new(MockState {
                notes: self.notes,
                next_id,
                failures: self.failures,
                shares: HashMap::new(),
                calls: vec![],
            }),
        }
    }
}

impl Default for MockNoteRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "mio", "wiremock"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
