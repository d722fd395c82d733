//! REST client for the Tenga backend
//!
//! Single point of HTTP egress. Wraps a `reqwest::Client`, injects the
//! bearer key from the injected [`Session`] into every request, and
//! exposes one method per backend endpoint under `/api/v1`.
//!
//! Response handling is centralized in [`ApiClient::check`]: a 401 from
//! any endpoint expires the session (clearing the stored key and
//! emitting [`SessionEvent::Expired`]) before the error is returned to
//! the caller. There are no retries; every failure is terminal for that
//! call.
//!
//! [`SessionEvent::Expired`]: crate::session::SessionEvent::Expired

use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    CreateDocumentRequest, Document, DocumentVersion, Page, SearchQuery, SearchResult, Tag,
    UpdateDocumentRequest,
};
use crate::session::Session;

/// Path prefix of the backend API
const API_PREFIX: &str = "/api/v1";

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 30;

/// REST client for the Tenga backend
#[derive(Clone)]
pub struct ApiClient {
    /// Underlying HTTP client
    http: reqwest::Client,
    /// Backend base URL including the API prefix
    base_url: String,
    /// Credential holder, shared with the rest of the application
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .user_agent(concat!("tenga/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http,
            base_url: join_base(&config.api_url),
            session,
        })
    }

    /// The session this client injects credentials from
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The resolved base URL (including the API prefix)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ==================== Documents ====================

    /// List documents, paginated
    pub async fn list_documents(&self, page: i64, size: i64) -> Result<Page<Document>, ApiError> {
        debug!("GET /documents page={} size={}", page, size);
        let req = self
            .http
            .get(self.url("/documents"))
            .query(&[("page", page), ("size", size)]);
        self.send(req).await
    }

    /// List documents carrying a tag, paginated (server-side filter)
    pub async fn documents_by_tag(
        &self,
        tag: &str,
        page: i64,
        size: i64,
    ) -> Result<Page<Document>, ApiError> {
        debug!("GET /documents tag={} page={} size={}", tag, page, size);
        let req = self
            .http
            .get(self.url("/documents"))
            .query(&[("tag", tag)])
            .query(&[("page", page), ("size", size)]);
        self.send(req).await
    }

    /// Fetch a single document
    pub async fn get_document(&self, id: i64) -> Result<Document, ApiError> {
        debug!("GET /documents/{}", id);
        self.send(self.http.get(self.url(&format!("/documents/{}", id))))
            .await
    }

    /// Create a document
    pub async fn create_document(
        &self,
        request: &CreateDocumentRequest,
    ) -> Result<Document, ApiError> {
        debug!("POST /documents title={:?}", request.title);
        let req = self.http.post(self.url("/documents")).json(request);
        self.send(req).await
    }

    /// Update a document (creates a new version server-side)
    pub async fn update_document(
        &self,
        id: i64,
        request: &UpdateDocumentRequest,
    ) -> Result<Document, ApiError> {
        debug!("PUT /documents/{}", id);
        let req = self
            .http
            .put(self.url(&format!("/documents/{}", id)))
            .json(request);
        self.send(req).await
    }

    /// Soft-delete a document
    pub async fn delete_document(&self, id: i64) -> Result<(), ApiError> {
        debug!("DELETE /documents/{}", id);
        self.send_empty(self.http.delete(self.url(&format!("/documents/{}", id))))
            .await
    }

    /// Restore a soft-deleted document
    pub async fn restore_document(&self, id: i64) -> Result<Document, ApiError> {
        debug!("POST /documents/{}/restore", id);
        self.send(
            self.http
                .post(self.url(&format!("/documents/{}/restore", id))),
        )
        .await
    }

    // ==================== Tags ====================

    /// List all tags, flat
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        debug!("GET /tags");
        self.send(self.http.get(self.url("/tags"))).await
    }

    /// List root tags with children materialized
    pub async fn tag_hierarchy(&self) -> Result<Vec<Tag>, ApiError> {
        debug!("GET /tags/hierarchy");
        self.send(self.http.get(self.url("/tags/hierarchy"))).await
    }

    /// Fetch a single tag
    pub async fn get_tag(&self, id: i64) -> Result<Tag, ApiError> {
        debug!("GET /tags/{}", id);
        self.send(self.http.get(self.url(&format!("/tags/{}", id))))
            .await
    }

    /// Create a tag, optionally nested under a parent
    pub async fn create_tag(&self, name: &str, parent_id: Option<i64>) -> Result<Tag, ApiError> {
        debug!("POST /tags name={:?} parent={:?}", name, parent_id);
        let req = self
            .http
            .post(self.url("/tags"))
            .json(&serde_json::json!({ "name": name, "parentId": parent_id }));
        self.send(req).await
    }

    /// Rename a tag
    pub async fn rename_tag(&self, id: i64, name: &str) -> Result<Tag, ApiError> {
        debug!("PUT /tags/{} name={:?}", id, name);
        let req = self
            .http
            .put(self.url(&format!("/tags/{}", id)))
            .query(&[("name", name)]);
        self.send(req).await
    }

    /// Delete a tag
    pub async fn delete_tag(&self, id: i64) -> Result<(), ApiError> {
        debug!("DELETE /tags/{}", id);
        self.send_empty(self.http.delete(self.url(&format!("/tags/{}", id))))
            .await
    }

    /// Search tags by name fragment
    pub async fn search_tags(&self, query: &str) -> Result<Vec<Tag>, ApiError> {
        debug!("GET /tags/search q={:?}", query);
        let req = self
            .http
            .get(self.url("/tags/search"))
            .query(&[("q", query)]);
        self.send(req).await
    }

    /// Associate a tag with a document
    pub async fn tag_document(&self, tag_id: i64, document_id: i64) -> Result<(), ApiError> {
        debug!("POST /tags/{}/documents/{}", tag_id, document_id);
        self.send_empty(
            self.http
                .post(self.url(&format!("/tags/{}/documents/{}", tag_id, document_id))),
        )
        .await
    }

    /// Remove a tag from a document
    pub async fn untag_document(&self, tag_id: i64, document_id: i64) -> Result<(), ApiError> {
        debug!("DELETE /tags/{}/documents/{}", tag_id, document_id);
        self.send_empty(
            self.http
                .delete(self.url(&format!("/tags/{}/documents/{}", tag_id, document_id))),
        )
        .await
    }

    // ==================== Versions ====================

    /// List all versions of a document, newest first
    pub async fn version_history(&self, document_id: i64) -> Result<Vec<DocumentVersion>, ApiError> {
        debug!("GET /documents/{}/versions", document_id);
        self.send(
            self.http
                .get(self.url(&format!("/documents/{}/versions", document_id))),
        )
        .await
    }

    /// Fetch a specific version snapshot
    pub async fn get_version(
        &self,
        document_id: i64,
        version_number: i32,
    ) -> Result<DocumentVersion, ApiError> {
        debug!("GET /documents/{}/versions/{}", document_id, version_number);
        self.send(self.http.get(self.url(&format!(
            "/documents/{}/versions/{}",
            document_id, version_number
        ))))
        .await
    }

    /// Restore a document to an earlier version
    ///
    /// Returns the version snapshot that now heads the document's
    /// history.
    pub async fn restore_version(
        &self,
        document_id: i64,
        version_number: i32,
    ) -> Result<DocumentVersion, ApiError> {
        debug!(
            "POST /documents/{}/versions/{}/restore",
            document_id, version_number
        );
        self.send(self.http.post(self.url(&format!(
            "/documents/{}/versions/{}/restore",
            document_id, version_number
        ))))
        .await
    }

    /// Compare two versions of a document
    ///
    /// The backend returns a plain-text diff, not JSON.
    pub async fn compare_versions(
        &self,
        document_id: i64,
        v1: i32,
        v2: i32,
    ) -> Result<String, ApiError> {
        debug!("GET /documents/{}/versions/compare v1={} v2={}", document_id, v1, v2);
        let req = self
            .http
            .get(self.url(&format!("/documents/{}/versions/compare", document_id)))
            .query(&[("v1", v1), ("v2", v2)]);
        self.send_text(req).await
    }

    // ==================== Search ====================

    /// Full-text search across documents
    pub async fn search(&self, query: &SearchQuery) -> Result<Page<SearchResult>, ApiError> {
        debug!("GET /search q={:?} tags={:?}", query.text, query.tags);
        let req = self.http.get(self.url("/search")).query(&query.to_params());
        self.send(req).await
    }

    /// Semantic (embedding-based) search across documents
    pub async fn semantic_search(
        &self,
        query: &str,
        page: i64,
        size: i64,
    ) -> Result<Page<SearchResult>, ApiError> {
        debug!("POST /search/semantic q={:?}", query);
        let req = self
            .http
            .post(self.url("/search/semantic"))
            .query(&[("q", query)])
            .query(&[("page", page), ("size", size)]);
        self.send(req).await
    }

    // ==================== Credentials ====================

    /// Check whether the stored key is accepted by the backend
    ///
    /// Issues a cheap real request (documents page of size 1). A
    /// rejected key reports `false`; other failures (network, server
    /// errors) propagate so the caller can tell an unreachable backend
    /// from an invalid key.
    pub async fn validate_api_key(&self) -> Result<bool, ApiError> {
        match self.list_documents(0, 1).await {
            Ok(_) => Ok(true),
            Err(ApiError::Unauthorized) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ==================== Plumbing ====================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.api_key() {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(req).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    async fn send_text(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let response = self.dispatch(req).await?;
        response.text().await.map_err(ApiError::Decode)
    }

    async fn send_empty(&self, req: RequestBuilder) -> Result<(), ApiError> {
        self.dispatch(req).await?;
        Ok(())
    }

    async fn dispatch(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .apply_auth(req)
            .send()
            .await
            .map_err(ApiError::Network)?;
        self.check(response).await
    }

    /// Map a non-success response to an error
    ///
    /// A 401 from any endpoint expires the session before returning;
    /// this is the one cross-cutting side effect in the client.
    async fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("API key rejected by {}, expiring session", response.url());
            self.session.expire();
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }
}

/// Join the configured backend URL with the API prefix
fn join_base(api_url: &str) -> String {
    format!("{}{}", api_url.trim_end_matches('/'), API_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_client(api_url: &str) -> (ApiClient, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let session =
            Arc::new(Session::load_from_path(temp_dir.path().join("api_key")).unwrap());
        let config = Config {
            api_url: api_url.to_string(),
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        (ApiClient::new(&config, session).unwrap(), temp_dir)
    }

    #[test]
    fn test_join_base() {
        assert_eq!(
            join_base("http://localhost:8080"),
            "http://localhost:8080/api/v1"
        );
        assert_eq!(
            join_base("https://tenga.example.com/"),
            "https://tenga.example.com/api/v1"
        );
    }

    #[test]
    fn test_client_base_url() {
        let (client, _dir) = test_client("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
        assert_eq!(client.url("/documents"), "http://localhost:8080/api/v1/documents");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 1 is unassigned on loopback; the connection is refused.
        let (client, _dir) = test_client("http://127.0.0.1:1");

        let err = client.list_documents(0, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_validate_propagates_network_error() {
        let (client, _dir) = test_client("http://127.0.0.1:1");

        assert!(client.validate_api_key().await.is_err());
    }
}
