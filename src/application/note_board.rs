// src/application/note_board.rs
use crate::application::NoteRepository;
use crate::domain::{DomainError, Note, NoteDraft, NoteId, ShareLink};
use tracing::{debug, info, instrument};

/// UI mode of the board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Viewing,
    /// A note is being edited; `buffer` holds the unsaved title/content.
    Editing { id: NoteId, buffer: NoteDraft },
}

/// In-memory list of notes kept in step with the server.
///
/// Every mutation goes through the repository first; the local collection is
/// only touched after the call succeeded, so a failed call leaves it as it was.
pub struct NoteBoard<R: NoteRepository> {
    repository: R,
    notes: Vec<Note>,
    mode: Mode,
}

impl<R: NoteRepository> NoteBoard<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            notes: Vec::new(),
            mode: Mode::Viewing,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|n| &n.id == id)
    }

    /// Replace the collection with the server's list.
    #[instrument(level = "debug", skip(self))]
    pub async fn load(&mut self) -> Result<&[Note], DomainError> {
        let notes = self.repository.list().await?;
        debug!(count = notes.len(), "Loaded notes");
        self.notes = notes;
        Ok(&self.notes)
    }

    /// Create a note and append the server's copy, replacing any entry with the same id.
    #[instrument(level = "debug", skip(self))]
    pub async fn create(&mut self, draft: NoteDraft) -> Result<&Note, DomainError> {
        draft.validate()?;
        let note = self.repository.create(&draft).await?;
        info!(note_id = %note.id, "Created note");

        let idx = match self.position(&note.id) {
            Some(idx) => {
                self.notes[idx] = note;
                idx
            }
            None => {
                self.notes.push(note);
                self.notes.len() - 1
            }
        };
        Ok(&self.notes[idx])
    }

    /// Switch to editing mode for `id`, seeding the buffer from the local copy.
    ///
    /// Starting a new edit while another one is open discards the old buffer.
    pub fn begin_edit(&mut self, id: &NoteId) -> Result<&mut NoteDraft, DomainError> {
        let buffer = self
            .find(id)
            .map(Note::to_draft)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;

        debug!(note_id = %id, "Editing note");
        self.mode = Mode::Editing {
            id: id.clone(),
            buffer,
        };
        self.edit_buffer_mut()
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut NoteDraft> {
        match &mut self.mode {
            Mode::Editing { buffer, .. } => Some(buffer),
            Mode::Viewing => None,
        }
    }

    /// Leave editing mode without contacting the server.
    ///
    /// Returns whether an edit was open.
    pub fn cancel_edit(&mut self) -> bool {
        let was_editing = self.is_editing();
        if was_editing {
            debug!("Edit cancelled");
        }
        self.mode = Mode::Viewing;
        was_editing
    }

    /// Send the edit buffer as a full replace and merge the result in place.
    ///
    /// On failure the board stays in editing mode with the buffer intact.
    #[instrument(level = "debug", skip(self))]
    pub async fn save_edit(&mut self) -> Result<&Note, DomainError> {
        let (id, buffer) = match &self.mode {
            Mode::Editing { id, buffer } => (id.clone(), buffer.clone()),
            Mode::Viewing => {
                return Err(DomainError::Validation(
                    "no note is being edited".to_string(),
                ))
            }
        };
        buffer.validate()?;

        let updated = self.repository.update(&id, &buffer).await?;
        info!(note_id = %id, "Updated note");

        let idx = match self.position(&id) {
            Some(idx) => {
                self.notes[idx] = updated;
                idx
            }
            None => {
                self.notes.push(updated);
                self.notes.len() - 1
            }
        };
        self.mode = Mode::Viewing;
        Ok(&self.notes[idx])
    }

    /// Delete a note on the server, then drop it from the list.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&mut self, id: &NoteId) -> Result<(), DomainError> {
        self.repository.remove(id).await?;

        let before = self.notes.len();
        self.notes.retain(|n| &n.id != id);
        info!(
            note_id = %id,
            removed_locally = before - self.notes.len(),
            "Deleted note"
        );

        if matches!(&self.mode, Mode::Editing { id: editing, .. } if editing == id) {
            self.mode = Mode::Viewing;
        }
        Ok(())
    }

    /// Request a public link. The collection is not touched.
    #[instrument(level = "debug", skip(self))]
    pub async fn share(&self, id: &NoteId) -> Result<ShareLink, DomainError> {
        let link = self.repository.share(id).await?;
        info!(note_id = %id, url = %link.public_url, "Shared note");
        Ok(link)
    }

    /// Read someone else's shared note. The collection is not touched.
    #[instrument(level = "debug", skip(self))]
    pub async fn open_shared(&self, token: &str) -> Result<Note, DomainError> {
        self.repository.fetch_shared(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Operation;
    use crate::util::testing::MockNoteRepository;

    fn note(id: i64, title: &str, content: &str) -> Note {
        Note {
            id: NoteId::from(id),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    async fn loaded_board(notes: Vec<Note>) -> NoteBoard<MockNoteRepository> {
        let repo = MockNoteRepository::builder().with_notes(notes).build();
        let mut board = NoteBoard::new(repo);
        board.load().await.expect("load should succeed");
        board
    }

    #[tokio::test]
    async fn given_server_notes_when_loading_then_board_mirrors_server_order() {
        // Arrange
        let repo = MockNoteRepository::builder()
            .with_note(note(2, "Second", "b"))
            .with_note(note(1, "First", "a"))
            .build();
        let mut board = NoteBoard::new(repo);

        // Act
        let notes = board.load().await.unwrap();

        // Assert
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn given_list_failure_when_loading_then_keeps_previous_collection() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "Keep", "me")]).await;
        board.repository().fail_on(
            Operation::List,
            DomainError::Network {
                operation: Operation::List,
                message: "connection refused".to_string(),
            },
        );

        // Act
        let result = board.load().await;

        // Assert
        assert!(matches!(result, Err(DomainError::Network { .. })));
        assert_eq!(board.notes().len(), 1);
        assert_eq!(board.notes()[0].title, "Keep");
    }

    #[tokio::test]
    async fn given_valid_draft_when_creating_then_appends_server_note() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "Existing", "x")]).await;

        // Act
        let created = board
            .create(NoteDraft::new("New", "note"))
            .await
            .unwrap()
            .clone();

        // Assert
        assert_eq!(board.notes().len(), 2);
        assert_eq!(board.notes()[1], created);
        assert_eq!(created.title, "New");
    }

    #[tokio::test]
    async fn given_empty_title_when_creating_then_fails_without_request() {
        // Arrange
        let mut board = loaded_board(vec![]).await;

        // Act
        let result = board.create(NoteDraft::new("", "content")).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(board.notes().is_empty());
        assert_eq!(board.repository().call_count(Operation::Create), 0);
    }

    #[tokio::test]
    async fn given_server_rejects_create_when_creating_then_collection_unchanged() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "A", "a")]).await;
        board.repository().fail_on(
            Operation::Create,
            DomainError::Http {
                operation: Operation::Create,
                status: 500,
                message: "db down".to_string(),
            },
        );

        // Act
        let result = board.create(NoteDraft::new("B", "b")).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Http { status: 500, .. })));
        assert_eq!(board.notes().len(), 1);
    }

    #[tokio::test]
    async fn given_create_returning_known_id_when_creating_then_replaces_entry() {
        // Arrange
        let repo = MockNoteRepository::builder()
            .with_note(note(1, "Old", "x"))
            .with_next_id(1)
            .build();
        let mut board = NoteBoard::new(repo);
        board.load().await.unwrap();

        // Act
        board.create(NoteDraft::new("Fresh", "y")).await.unwrap();

        // Assert
        assert_eq!(board.notes(), &[note(1, "Fresh", "y")]);
    }

    #[tokio::test]
    async fn given_open_edit_when_beginning_another_then_buffer_follows_new_note() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "One", "1"), note(2, "Two", "2")]).await;
        board.begin_edit(&NoteId::from(1)).unwrap().title = "Unsaved".to_string();

        // Act
        let buffer = board.begin_edit(&NoteId::from(2)).unwrap();
        buffer.content = "edited".to_string();

        // Assert
        assert_eq!(
            board.mode(),
            &Mode::Editing {
                id: NoteId::from(2),
                buffer: NoteDraft::new("Two", "edited"),
            }
        );
    }

    #[tokio::test]
    async fn given_known_note_when_beginning_edit_then_buffer_is_seeded() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "Title", "Body")]).await;

        // Act
        let buffer = board.begin_edit(&NoteId::from(1)).unwrap().clone();

        // Assert
        assert_eq!(buffer, NoteDraft::new("Title", "Body"));
        assert!(board.is_editing());
    }

    #[tokio::test]
    async fn given_unknown_note_when_beginning_edit_then_stays_viewing() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "Title", "Body")]).await;

        // Act
        let result = board.begin_edit(&NoteId::from(99));

        // Assert
        assert!(matches!(result, Err(DomainError::NotFound(id)) if id == "99"));
        assert_eq!(board.mode(), &Mode::Viewing);
    }

    #[tokio::test]
    async fn given_edit_when_saving_then_replaces_only_target_in_place() {
        // Arrange
        let mut board = loaded_board(vec![
            note(1, "One", "1"),
            note(2, "Two", "2"),
            note(3, "Three", "3"),
        ])
        .await;
        board.begin_edit(&NoteId::from(2)).unwrap().title = "Two edited".to_string();

        // Act
        board.save_edit().await.unwrap();

        // Assert
        assert_eq!(board.mode(), &Mode::Viewing);
        assert_eq!(board.notes()[0], note(1, "One", "1"));
        assert_eq!(board.notes()[1], note(2, "Two edited", "2"));
        assert_eq!(board.notes()[2], note(3, "Three", "3"));
    }

    #[tokio::test]
    async fn given_update_failure_when_saving_then_keeps_buffer_and_collection() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "One", "1")]).await;
        board.begin_edit(&NoteId::from(1)).unwrap().content = "changed".to_string();
        board.repository().fail_on(
            Operation::Update,
            DomainError::Http {
                operation: Operation::Update,
                status: 503,
                message: "unavailable".to_string(),
            },
        );

        // Act
        let result = board.save_edit().await;

        // Assert
        assert!(result.is_err());
        assert_eq!(board.notes()[0].content, "1");
        assert_eq!(
            board.edit_buffer_mut().map(|b| b.content.clone()),
            Some("changed".to_string())
        );
    }

    #[tokio::test]
    async fn given_blank_buffer_when_saving_then_fails_without_request() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "One", "1")]).await;
        board.begin_edit(&NoteId::from(1)).unwrap().content = "  ".to_string();

        // Act
        let result = board.save_edit().await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(board.repository().call_count(Operation::Update), 0);
        assert!(board.is_editing());
    }

    #[tokio::test]
    async fn given_viewing_mode_when_saving_then_returns_validation_error() {
        let mut board = loaded_board(vec![]).await;

        let result = board.save_edit().await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn given_open_edit_when_cancelling_then_discards_buffer_without_request() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "One", "1")]).await;
        board.begin_edit(&NoteId::from(1)).unwrap().title = "Discard me".to_string();

        // Act
        let was_editing = board.cancel_edit();

        // Assert
        assert!(was_editing);
        assert_eq!(board.mode(), &Mode::Viewing);
        assert_eq!(board.notes()[0].title, "One");
        assert_eq!(board.repository().call_count(Operation::Update), 0);
    }

    #[tokio::test]
    async fn given_existing_note_when_deleting_then_removes_exactly_that_entry() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "A", "a"), note(2, "B", "b")]).await;

        // Act
        board.delete(&NoteId::from(1)).await.unwrap();

        // Assert
        assert_eq!(board.notes(), &[note(2, "B", "b")]);
    }

    #[tokio::test]
    async fn given_unknown_note_when_deleting_then_reports_not_found_and_keeps_list() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "A", "a")]).await;

        // Act
        let result = board.delete(&NoteId::from(42)).await;

        // Assert
        assert!(matches!(result, Err(DomainError::NotFound(id)) if id == "42"));
        assert_eq!(board.notes().len(), 1);
    }

    #[tokio::test]
    async fn given_note_only_on_server_when_deleting_then_local_list_is_untouched() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "A", "a")]).await;
        let remote = board
            .repository()
            .create(&NoteDraft::new("Elsewhere", "b"))
            .await
            .unwrap();

        // Act
        let result = board.delete(&remote.id).await;

        // Assert
        assert_eq!(result, Ok(()));
        assert_eq!(board.notes(), &[note(1, "A", "a")]);
        assert_eq!(board.repository().server_notes(), vec![note(1, "A", "a")]);
    }

    #[tokio::test]
    async fn given_note_being_edited_when_deleting_it_then_returns_to_viewing() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "A", "a")]).await;
        board.begin_edit(&NoteId::from(1)).unwrap();

        // Act
        board.delete(&NoteId::from(1)).await.unwrap();

        // Assert
        assert_eq!(board.mode(), &Mode::Viewing);
        assert!(board.notes().is_empty());
    }

    #[tokio::test]
    async fn given_note_when_sharing_twice_then_both_links_resolve_and_notes_unchanged() {
        // Arrange
        let mut board = loaded_board(vec![note(1, "Shared", "body")]).await;
        let before = board.notes().to_vec();

        // Act
        let first = board.share(&NoteId::from(1)).await.unwrap();
        let second = board.share(&NoteId::from(1)).await.unwrap();

        // Assert
        for link in [first, second] {
            let token = link.token().expect("link carries a token");
            let shared = board.open_shared(&token).await.unwrap();
            assert_eq!(shared, note(1, "Shared", "body"));
        }
        assert_eq!(board.notes(), before.as_slice());
        board.load().await.unwrap();
        assert_eq!(board.notes(), before.as_slice());
    }

    #[tokio::test]
    async fn given_unknown_token_when_opening_shared_then_returns_not_found() {
        let board = loaded_board(vec![]).await;

        let result = board.open_shared("nope").await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
