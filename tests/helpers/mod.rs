use noteshare::infrastructure::{Config, HttpNoteRepository};
use serde_json::{json, Value};
use wiremock::MockServer;

/// Test fixture wrapping a mock notes server
pub struct TestServer {
    pub server: MockServer,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a fresh mock server on a random local port
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL the way deployments configure it, with an `/api` prefix
    pub fn base_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    pub fn config(&self) -> Config {
        Config::default().with_base_url(Some(self.base_url()))
    }

    /// Open a client pointed at this server
    pub fn repository(&self) -> HttpNoteRepository {
        HttpNoteRepository::new(&self.config()).expect("mock server config is valid")
    }
}

/// JSON body of a note as the server sends it
#[allow(dead_code)]
pub fn note_json(id: i64, title: &str, content: &str) -> Value {
    json!({ "id": id, "title": title, "content": content })
}

/// Address where nothing listens, for network failures
#[allow(dead_code)]
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:1/api";
