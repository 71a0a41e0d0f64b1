// src/infrastructure/http.rs
use crate::application::NoteRepository;
use crate::domain::{DomainError, Note, NoteDraft, NoteId, Operation, ShareLink};
use crate::infrastructure::Config;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

/// Notes API client over HTTP/JSON.
///
/// Every call checks the response status before touching the body, so a
/// non-2xx answer always turns into a typed error instead of a parse failure.
#[derive(Debug, Clone)]
pub struct HttpNoteRepository {
    client: Client,
    base_url: Url,
    shared_path: String,
}

impl HttpNoteRepository {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        config.validate()?;
        let base_url = config.base_url()?;
        let shared_path = config.shared_path()?.to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::Config(format!("failed to create HTTP client: {e}")))?;

        info!(%base_url, "Using notes API");
        Ok(Self {
            client,
            base_url,
            shared_path,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DomainError::Config(format!("base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        operation: Operation,
        subject: Option<&str>,
        request: RequestBuilder,
    ) -> Result<Response, DomainError> {
        let response = request.send().await.map_err(|e| DomainError::Network {
            operation,
            message: e.to_string(),
        })?;
        check_status(operation, subject, response).await
    }
}

/// Map a non-2xx response to the matching error; pass 2xx responses through.
async fn check_status(
    operation: Operation,
    subject: Option<&str>,
    response: Response,
) -> Result<Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    debug!(%operation, %status, "Request rejected");
    if let Some(subject) = subject {
        let gone = operation == Operation::FetchShared && status == StatusCode::GONE;
        if status == StatusCode::NOT_FOUND || gone {
            return Err(DomainError::NotFound(subject.to_string()));
        }
    }

    let body = response.text().await.unwrap_or_default();
    let message = match body.trim() {
        "" => status.canonical_reason().unwrap_or("no reason given").to_string(),
        text => text.to_string(),
    };
    Err(DomainError::Http {
        operation,
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T, DomainError> {
    response.json::<T>().await.map_err(|e| DomainError::Decode {
        operation,
        message: e.to_string(),
    })
}

fn require_id(id: &NoteId) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::Validation("note id is missing".to_string()));
    }
    Ok(())
}

#[async_trait]
impl NoteRepository for HttpNoteRepository {
    #[instrument(level = "debug", skip(self))]
    async fn list(&self) -> Result<Vec<Note>, DomainError> {
        let url = self.endpoint(&["notes"])?;
        debug!(%url, "GET");

        let response = self
            .send(Operation::List, None, self.client.get(url))
            .await?;
        decode(Operation::List, response).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn create(&self, draft: &NoteDraft) -> Result<Note, DomainError> {
        draft.validate()?;
        let url = self.endpoint(&["notes"])?;
        debug!(%url, "POST");

        let response = self
            .send(Operation::Create, None, self.client.post(url).json(draft))
            .await?;
        decode(Operation::Create, response).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn update(&self, id: &NoteId, draft: &NoteDraft) -> Result<Note, DomainError> {
        require_id(id)?;
        draft.validate()?;
        let url = self.endpoint(&["notes", id.as_str()])?;
        debug!(%url, "PUT");

        let response = self
            .send(
                Operation::Update,
                Some(id.as_str()),
                self.client.put(url).json(draft),
            )
            .await?;
        decode(Operation::Update, response).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn remove(&self, id: &NoteId) -> Result<(), DomainError> {
        require_id(id)?;
        let url = self.endpoint(&["notes", id.as_str()])?;
        debug!(%url, "DELETE");

        // Backends answer with a boolean, the removed note or nothing; the status is what counts.
        self.send(Operation::Delete, Some(id.as_str()), self.client.delete(url))
            .await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn share(&self, id: &NoteId) -> Result<ShareLink, DomainError> {
        require_id(id)?;
        let url = self.endpoint(&["notes", id.as_str(), "share"])?;
        debug!(%url, "POST");

        let response = self
            .send(Operation::Share, Some(id.as_str()), self.client.post(url))
            .await?;
        decode(Operation::Share, response).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_shared(&self, token: &str) -> Result<Note, DomainError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::Validation("share token is missing".to_string()));
        }
        let url = self.endpoint(&[self.shared_path.as_str(), token])?;
        debug!(%url, "GET");

        let response = self
            .send(Operation::FetchShared, Some(token), self.client.get(url))
            .await?;
        decode(Operation::FetchShared, response).await
    }
}
