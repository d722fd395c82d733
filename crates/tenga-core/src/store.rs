//! Client-side application store
//!
//! The `AppStore` is the view-model between the UI and the REST client:
//! it caches the loaded documents and tag hierarchy, tracks the current
//! selection and filter state, and delegates all persistence to the
//! [`ApiClient`].
//!
//! ## Operation contract
//!
//! Every backend-touching operation sets the loading flag and clears
//! the previous error before the call, keeps the local collection
//! consistent with the backend response on success (prepend on create,
//! replace-by-id on update, remove-by-id on delete), records a
//! human-readable error message and re-raises on failure, and clears
//! the loading flag on both paths.
//!
//! ## Filtering
//!
//! The filtered document view is a pure function of the loaded
//! collection and the filter state (see [`filter_documents`]); it never
//! queries the backend and only covers the currently loaded page.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{CreateDocumentRequest, Document, Page, Tag, UpdateDocumentRequest};

/// Client-side filter state for the document list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    /// A document must carry every one of these tag names
    pub selected_tags: Vec<String>,
    /// Case-insensitive substring matched against title and content
    pub search_text: String,
}

impl DocumentFilter {
    /// Whether any filtering is in effect
    pub fn is_active(&self) -> bool {
        !self.selected_tags.is_empty() || !self.search_text.is_empty()
    }
}

/// Compute the filtered document view
///
/// Applies, in order: the tag-intersection filter (every selected tag
/// name must appear among the document's tags), then the
/// case-insensitive substring filter against title and content.
pub fn filter_documents<'a>(
    documents: &'a [Document],
    filter: &DocumentFilter,
) -> Vec<&'a Document> {
    documents
        .iter()
        .filter(|doc| doc.has_all_tags(&filter.selected_tags))
        .filter(|doc| filter.search_text.is_empty() || doc.matches_text(&filter.search_text))
        .collect()
}

/// Application store: cached collections plus transient UI state
pub struct AppStore {
    /// REST client all persistence is delegated to
    client: ApiClient,
    /// Currently loaded page of documents
    documents: Vec<Document>,
    /// Currently selected document, if any
    selected: Option<Document>,
    /// Loaded tag hierarchy
    tags: Vec<Tag>,
    /// Active filter state
    filter: DocumentFilter,
    /// True while a backend call is in flight
    loading: bool,
    /// Message from the most recent failure, if any
    error: Option<String>,
}

impl AppStore {
    /// Create a store backed by the given client
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            documents: Vec::new(),
            selected: None,
            tags: Vec::new(),
            filter: DocumentFilter::default(),
            loading: false,
            error: None,
        }
    }

    /// The underlying REST client
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // ==================== Document Operations ====================

    /// Load a page of documents into the store
    pub async fn load_documents(
        &mut self,
        page: i64,
        size: i64,
    ) -> Result<Page<Document>, ApiError> {
        self.begin();
        match self.client.list_documents(page, size).await {
            Ok(page) => {
                self.documents = page.content.clone();
                self.finish();
                Ok(page)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Load a page of documents carrying a tag (server-side filter)
    pub async fn load_documents_by_tag(
        &mut self,
        tag: &str,
        page: i64,
        size: i64,
    ) -> Result<Page<Document>, ApiError> {
        self.begin();
        match self.client.documents_by_tag(tag, page, size).await {
            Ok(page) => {
                self.documents = page.content.clone();
                self.finish();
                Ok(page)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Load a single document and select it
    pub async fn load_document(&mut self, id: i64) -> Result<Document, ApiError> {
        self.begin();
        match self.client.get_document(id).await {
            Ok(doc) => {
                self.selected = Some(doc.clone());
                self.finish();
                Ok(doc)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Create a document and prepend it to the collection
    pub async fn create_document(
        &mut self,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<Document, ApiError> {
        self.begin();
        let request = CreateDocumentRequest {
            title: title.to_string(),
            content: content.to_string(),
            tags,
        };
        match self.client.create_document(&request).await {
            Ok(doc) => {
                self.apply_created(doc.clone());
                self.finish();
                Ok(doc)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Update a document, replacing the cached copy (and the selection,
    /// if it is the selected one)
    pub async fn update_document(
        &mut self,
        id: i64,
        request: UpdateDocumentRequest,
    ) -> Result<Document, ApiError> {
        self.begin();
        match self.client.update_document(id, &request).await {
            Ok(doc) => {
                self.apply_updated(doc.clone());
                self.finish();
                Ok(doc)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Soft-delete a document and drop it from the collection
    pub async fn delete_document(&mut self, id: i64) -> Result<(), ApiError> {
        self.begin();
        match self.client.delete_document(id).await {
            Ok(()) => {
                self.apply_deleted(id);
                self.finish();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Restore a soft-deleted document into the collection
    pub async fn restore_document(&mut self, id: i64) -> Result<Document, ApiError> {
        self.begin();
        match self.client.restore_document(id).await {
            Ok(doc) => {
                self.apply_restored(doc.clone());
                self.finish();
                Ok(doc)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // ==================== Tag Operations ====================

    /// Load the tag hierarchy into the store
    pub async fn load_tags(&mut self) -> Result<(), ApiError> {
        self.begin();
        match self.client.tag_hierarchy().await {
            Ok(tags) => {
                self.tags = tags;
                self.finish();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // ==================== Filter State ====================

    /// Toggle a tag name in the selected-tag set
    pub fn toggle_tag(&mut self, name: &str) {
        if let Some(pos) = self.filter.selected_tags.iter().position(|t| t == name) {
            self.filter.selected_tags.remove(pos);
        } else {
            self.filter.selected_tags.push(name.to_string());
        }
    }

    /// Set the substring filter
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.filter.search_text = text.into();
    }

    /// Clear all filters
    pub fn clear_filters(&mut self) {
        self.filter = DocumentFilter::default();
    }

    /// The loaded documents narrowed by the active filters
    pub fn filtered_documents(&self) -> Vec<&Document> {
        filter_documents(&self.documents, &self.filter)
    }

    // ==================== Accessors ====================

    /// All loaded documents, unfiltered
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The selected document, if any
    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.as_ref()
    }

    /// The loaded tag hierarchy
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// The active filter state
    pub fn filter(&self) -> &DocumentFilter {
        &self.filter
    }

    /// True while a backend call is in flight
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Message from the most recent failure, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ==================== Collection Mutations ====================

    fn apply_created(&mut self, doc: Document) {
        self.documents.insert(0, doc);
    }

    fn apply_updated(&mut self, doc: Document) {
        if let Some(existing) = self.documents.iter_mut().find(|d| d.id == doc.id) {
            *existing = doc.clone();
        }
        if self.selected.as_ref().map(|d| d.id) == Some(doc.id) {
            self.selected = Some(doc);
        }
    }

    fn apply_deleted(&mut self, id: i64) {
        self.documents.retain(|d| d.id != id);
        if self.selected.as_ref().map(|d| d.id) == Some(id) {
            self.selected = None;
        }
    }

    fn apply_restored(&mut self, doc: Document) {
        if self.documents.iter().any(|d| d.id == doc.id) {
            self.apply_updated(doc);
        } else {
            self.documents.insert(0, doc);
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.loading = false;
    }

    fn fail(&mut self, err: ApiError) -> ApiError {
        self.error = Some(err.to_string());
        self.loading = false;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::Session;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn doc(id: i64, title: &str, content: &str, tags: &[&str]) -> Document {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "content": content,
            "tags": tags,
            "createdAt": "2024-01-01T00:00:00",
            "updatedAt": "2024-01-01T00:00:00",
            "currentVersion": 1
        }))
        .unwrap()
    }

    /// Store backed by an unroutable backend, for failure-path tests
    fn offline_store() -> (AppStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let session =
            Arc::new(Session::load_from_path(temp_dir.path().join("api_key")).unwrap());
        let config = Config {
            api_url: "http://127.0.0.1:1".to_string(),
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let client = ApiClient::new(&config, session).unwrap();
        (AppStore::new(client), temp_dir)
    }

    fn seeded_store() -> (AppStore, TempDir) {
        let (mut store, temp_dir) = offline_store();
        store.documents = vec![
            doc(1, "Roadmap", "Q3 planning", &["work", "planning"]),
            doc(2, "Groceries", "milk and eggs", &["personal"]),
            doc(3, "Retro notes", "what went well in Q3", &["work"]),
        ];
        (store, temp_dir)
    }

    #[test]
    fn test_filter_by_selected_tags_is_intersection() {
        let (store, _dir) = seeded_store();
        let filter = DocumentFilter {
            selected_tags: vec!["work".to_string()],
            ..Default::default()
        };

        let filtered = filter_documents(store.documents(), &filter);
        assert_eq!(
            filtered.iter().map(|d| d.id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let filter = DocumentFilter {
            selected_tags: vec!["work".to_string(), "planning".to_string()],
            ..Default::default()
        };
        let filtered = filter_documents(store.documents(), &filter);
        assert_eq!(filtered.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_search_text_narrows_tag_filter() {
        let (store, _dir) = seeded_store();
        let filter = DocumentFilter {
            selected_tags: vec!["work".to_string()],
            search_text: "q3 PLANNING".to_string(),
        };

        // Both work docs mention Q3, only one matches the full phrase
        let filtered = filter_documents(store.documents(), &filter);
        assert_eq!(filtered.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_search_text_matches_title_and_content() {
        let (store, _dir) = seeded_store();
        let filter = DocumentFilter {
            search_text: "retro".to_string(),
            ..Default::default()
        };
        let filtered = filter_documents(store.documents(), &filter);
        assert_eq!(filtered.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3]);

        let filter = DocumentFilter {
            search_text: "MILK".to_string(),
            ..Default::default()
        };
        let filtered = filter_documents(store.documents(), &filter);
        assert_eq!(filtered.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let (store, _dir) = seeded_store();
        let filtered = store.filtered_documents();
        assert_eq!(filtered.len(), 3);
        assert!(!store.filter().is_active());
    }

    #[test]
    fn test_toggle_tag_twice_is_identity() {
        let (mut store, _dir) = seeded_store();

        store.toggle_tag("foo");
        assert_eq!(store.filter().selected_tags, vec!["foo"]);

        store.toggle_tag("foo");
        assert!(store.filter().selected_tags.is_empty());
    }

    #[test]
    fn test_clear_filters() {
        let (mut store, _dir) = seeded_store();
        store.toggle_tag("work");
        store.set_search_text("q3");
        assert!(store.filter().is_active());

        store.clear_filters();
        assert!(!store.filter().is_active());
        assert_eq!(store.filtered_documents().len(), 3);
    }

    #[test]
    fn test_apply_created_prepends() {
        let (mut store, _dir) = seeded_store();
        store.apply_created(doc(4, "New", "fresh", &[]));

        assert_eq!(store.documents()[0].id, 4);
        assert_eq!(store.documents().len(), 4);
    }

    #[test]
    fn test_apply_updated_replaces_match_and_selection() {
        let (mut store, _dir) = seeded_store();
        store.selected = Some(doc(1, "Roadmap", "Q3 planning", &["work", "planning"]));

        store.apply_updated(doc(1, "Roadmap v2", "Q4 planning", &["work"]));

        assert_eq!(store.documents().len(), 3);
        assert_eq!(store.documents()[0].title, "Roadmap v2");
        assert_eq!(store.selected_document().unwrap().title, "Roadmap v2");
    }

    #[test]
    fn test_apply_updated_unknown_id_is_noop() {
        let (mut store, _dir) = seeded_store();

        store.apply_updated(doc(99, "Ghost", "not loaded", &[]));

        assert_eq!(store.documents().len(), 3);
        assert!(store.documents().iter().all(|d| d.id != 99));
    }

    #[test]
    fn test_apply_deleted_removes_and_clears_selection() {
        let (mut store, _dir) = seeded_store();
        store.selected = Some(doc(2, "Groceries", "milk and eggs", &["personal"]));

        store.apply_deleted(2);

        assert_eq!(store.documents().len(), 2);
        assert!(store.documents().iter().all(|d| d.id != 2));
        assert!(store.selected_document().is_none());
    }

    #[test]
    fn test_apply_deleted_keeps_unrelated_selection() {
        let (mut store, _dir) = seeded_store();
        store.selected = Some(doc(1, "Roadmap", "Q3 planning", &["work", "planning"]));

        store.apply_deleted(2);

        assert_eq!(store.selected_document().unwrap().id, 1);
    }

    #[test]
    fn test_apply_restored_reinserts_missing_document() {
        let (mut store, _dir) = seeded_store();

        store.apply_restored(doc(9, "Recovered", "was deleted", &[]));
        assert_eq!(store.documents()[0].id, 9);

        // Restoring an already-present document replaces it in place
        store.apply_restored(doc(1, "Roadmap restored", "Q3 planning", &[]));
        assert_eq!(store.documents().len(), 4);
        assert_eq!(
            store
                .documents()
                .iter()
                .find(|d| d.id == 1)
                .unwrap()
                .title,
            "Roadmap restored"
        );
    }

    #[test]
    fn test_begin_sets_loading_and_clears_error() {
        let (mut store, _dir) = seeded_store();
        store.error = Some("old failure".to_string());

        store.begin();
        assert!(store.loading());
        assert!(store.error().is_none());

        store.finish();
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_failed_load_records_error_and_clears_loading() {
        let (mut store, _dir) = seeded_store();

        let result = store.load_documents(0, 20).await;

        assert!(result.is_err());
        assert!(!store.loading());
        assert!(store.error().is_some());
        // The collection is left as it was
        assert_eq!(store.documents().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_collection_untouched() {
        let (mut store, _dir) = seeded_store();
        store.selected = Some(doc(2, "Groceries", "milk and eggs", &["personal"]));

        let result = store.delete_document(2).await;

        assert!(result.is_err());
        assert!(!store.loading());
        assert_eq!(store.documents().len(), 3);
        assert!(store.selected_document().is_some());
    }

    #[tokio::test]
    async fn test_failed_create_does_not_grow_collection() {
        let (mut store, _dir) = seeded_store();

        let result = store.create_document("T", "C", vec![]).await;

        assert!(result.is_err());
        assert_eq!(store.documents().len(), 3);
        assert!(store.error().is_some());
    }
}
