//! reqwest implementation of the notes service.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use notehub_core::defaults::{ENV_TOKEN, SLOW_REQUEST_MS};
use notehub_core::{Error, NewNote, Note, NoteListPage, NotesService, Result};

use crate::config::ClientConfig;
use crate::error::{to_notehub_error, ApiErrorCode};
use crate::types::{ApiErrorBody, ListNotesParams};

/// HTTP client for the remote notes API.
#[derive(Debug, Clone)]
pub struct NotehubClient {
    client: Client,
    config: ClientConfig,
}

impl NotehubClient {
    /// Create a client with the given configuration.
    ///
    /// A missing token is not an error here; requests fail with
    /// `Error::Config` until one is supplied.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "client",
            component = "http",
            base_url = %config.base_url,
            token_set = config.token.is_some(),
            per_page = config.per_page,
            "Initializing notes service client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build an authenticated request.
    fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", ENV_TOKEN)))?;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let request_id = Uuid::now_v7();
        debug!(request_id = %request_id, method = %method, url = %url, "Sending request");

        Ok(self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .header("X-Request-Id", request_id.to_string()))
    }

    /// Send a request and decode a JSON body, mapping non-2xx responses.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let start = Instant::now();

        let response = request
            .send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        let elapsed = start.elapsed().as_millis() as u64;
        if elapsed > SLOW_REQUEST_MS {
            warn!(
                duration_ms = elapsed,
                status = status.as_u16(),
                slow = true,
                "Slow notes service request"
            );
        }

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown error");
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => body.into_message(reason),
                Err(_) if !text.trim().is_empty() => text.trim().to_string(),
                Err(_) => reason.to_string(),
            };
            warn!(
                status = status.as_u16(),
                duration_ms = elapsed,
                error = %message,
                "Notes service returned an error"
            );
            let code = ApiErrorCode::from_status(status.as_u16());
            return Err(to_notehub_error(code, status.as_u16(), &message));
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))?;

        debug!(status = status.as_u16(), duration_ms = elapsed, "Request complete");
        Ok(body)
    }

    fn note_path(id: &str) -> String {
        format!("/notes/{}", urlencoding::encode(id))
    }
}

#[async_trait]
impl NotesService for NotehubClient {
    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "list_notes"))]
    async fn list_notes(
        &self,
        page: u32,
        search: &str,
        tag: Option<&str>,
    ) -> Result<NoteListPage> {
        let params = ListNotesParams::new(page, search, tag, self.config.per_page);
        let request = self.request(Method::GET, "/notes")?.query(&params);
        let result: NoteListPage = self.send(request).await?;

        debug!(
            result_count = result.notes.len(),
            total_pages = result.total_pages,
            "Listed notes"
        );
        Ok(result)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "get_note"))]
    async fn get_note(&self, id: &str) -> Result<Note> {
        let request = self.request(Method::GET, &Self::note_path(id))?;
        self.send(request).await
    }

    #[instrument(skip(self, note), fields(subsystem = "client", component = "http", op = "create_note", tag = %note.tag))]
    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        let request = self.request(Method::POST, "/notes")?.json(note);
        let created: Note = self.send(request).await?;
        info!(note_id = %created.id, "Note created");
        Ok(created)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "delete_note"))]
    async fn delete_note(&self, id: &str) -> Result<Note> {
        let request = self.request(Method::DELETE, &Self::note_path(id))?;
        let deleted: Note = self.send(request).await?;
        info!(note_id = %deleted.id, "Note deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_without_token() {
        let client = NotehubClient::new(ClientConfig::default());
        assert!(client.is_ok());
        assert!(client.unwrap().config().token.is_none());
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let client = NotehubClient::new(ClientConfig::default()).unwrap();
        let err = client.request(Method::GET, "/notes").unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(ENV_TOKEN)));
    }

    #[test]
    fn test_request_url_joins_base() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080/api/")
            .with_token("t");
        let client = NotehubClient::new(config).unwrap();
        let request = client
            .request(Method::GET, "/notes")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/notes");
        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Bearer t"
        );
        assert!(request.headers().contains_key("X-Request-Id"));
    }

    #[test]
    fn test_note_path_encodes_id() {
        assert_eq!(NotehubClient::note_path("abc123"), "/notes/abc123");
        assert_eq!(NotehubClient::note_path("a/b"), "/notes/a%2Fb");
    }
}
