//! Data models for the Tenga backend API
//!
//! Defines the wire-format types exchanged with the server: documents,
//! tags, version snapshots, search results, and the pagination envelope.
//! Field names follow the backend's camelCase JSON; timestamps are
//! `NaiveDateTime` because the server serializes them without a UTC
//! offset.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A document with its tags and version counter
///
/// The client holds a cached, possibly stale copy; the backend owns the
/// canonical state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier (assigned by the backend)
    pub id: i64,
    /// Document title
    pub title: String,
    /// Document body content
    pub content: String,
    /// Names of associated tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// When this document was created
    pub created_at: NaiveDateTime,
    /// When this document was last updated
    pub updated_at: NaiveDateTime,
    /// Set when the document has been soft-deleted
    #[serde(default)]
    pub deleted_at: Option<NaiveDateTime>,
    /// Current version number (monotonic, starts at 1)
    pub current_version: i32,
}

impl Document {
    /// Whether every name in `names` appears among this document's tags
    pub fn has_all_tags<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names
            .iter()
            .all(|name| self.tags.iter().any(|t| t == name.as_ref()))
    }

    /// Case-insensitive substring match against title or content
    pub fn matches_text(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.content.to_lowercase().contains(&query)
    }

    /// Whether the document has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A tag, optionally part of a hierarchy via `parent_id`
///
/// The hierarchy endpoint materializes `children`; the flat list
/// endpoint leaves it empty. Cycle-freedom is enforced server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag name
    pub name: String,
    /// Parent tag, if this tag is nested
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Child tags (populated by the hierarchy endpoint)
    #[serde(default)]
    pub children: Option<Vec<Tag>>,
    /// Number of documents carrying this tag, when the server reports it
    #[serde(default)]
    pub document_count: Option<i64>,
}

impl Tag {
    /// Whether this tag sits at the top of the hierarchy
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// An immutable historical snapshot of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    /// Unique identifier of the snapshot itself
    pub id: i64,
    /// The document this version belongs to
    pub document_id: i64,
    /// Version number, monotonic per document
    pub version_number: i32,
    /// Title at the time of the snapshot
    pub title: String,
    /// Content at the time of the snapshot
    pub content: String,
    /// Serialized tag names at the time of the snapshot
    #[serde(default)]
    pub tags_snapshot: Option<String>,
    /// When this version was created
    pub created_at: NaiveDateTime,
    /// Optional human-readable change summary
    #[serde(default)]
    pub change_summary: Option<String>,
}

/// A full-text search hit: a document projection plus ranking data
///
/// Ephemeral per query, never persisted client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The matching document
    pub document_id: i64,
    /// Title of the matching document
    pub title: String,
    /// Excerpt around the match, if the server produced one
    #[serde(default)]
    pub snippet: Option<String>,
    /// Backend-computed ranking value, opaque to the client
    #[serde(default)]
    pub relevance_score: Option<f32>,
}

/// Pagination envelope returned by list and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in server order
    pub content: Vec<T>,
    /// Total matching elements across all pages
    pub total_elements: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Zero-based index of this page
    pub number: i64,
    /// Requested page size
    pub size: i64,
    /// Whether a following page exists
    #[serde(default)]
    pub has_next: bool,
    /// Whether a preceding page exists
    #[serde(default)]
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Whether this page carries no items
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Payload for creating a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for updating a document
///
/// Unset fields are omitted from the JSON body and left untouched by
/// the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_summary: Option<String>,
}

/// Parameters for the full-text search endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Free-text query
    pub text: Option<String>,
    /// Restrict results to documents carrying all of these tags
    pub tags: Vec<String>,
    /// Lower bound on document update time
    pub start_date: Option<NaiveDateTime>,
    /// Upper bound on document update time
    pub end_date: Option<NaiveDateTime>,
    /// Zero-based page index
    pub page: i64,
    /// Page size
    pub size: i64,
}

impl SearchQuery {
    /// Create a query for `text` with default paging
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            size: 20,
            ..Self::default()
        }
    }

    /// Render as query-string pairs, tags comma-joined
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref text) = self.text {
            params.push(("q", text.clone()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        if let Some(start) = self.start_date {
            params.push(("startDate", start.format("%Y-%m-%dT%H:%M:%S").to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("endDate", end.format("%Y-%m-%dT%H:%M:%S").to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("size", self.size.to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "title": "Meeting notes",
            "content": "Discussed the Q3 roadmap",
            "tags": ["work", "meetings"],
            "createdAt": "2024-01-15T10:30:00",
            "updatedAt": "2024-01-16T08:05:12",
            "deletedAt": null,
            "currentVersion": 3
        }))
        .unwrap()
    }

    #[test]
    fn test_document_wire_format() {
        let doc = sample_document();
        assert_eq!(doc.id, 42);
        assert_eq!(doc.tags, vec!["work", "meetings"]);
        assert_eq!(doc.current_version, 3);
        assert!(!doc.is_deleted());
        assert_eq!(doc.created_at.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn test_document_has_all_tags() {
        let doc = sample_document();
        assert!(doc.has_all_tags(&["work"]));
        assert!(doc.has_all_tags(&["work", "meetings"]));
        assert!(!doc.has_all_tags(&["work", "personal"]));
        assert!(doc.has_all_tags::<&str>(&[]));
    }

    #[test]
    fn test_document_matches_text() {
        let doc = sample_document();
        assert!(doc.matches_text("MEETING"));
        assert!(doc.matches_text("q3 roadmap"));
        assert!(!doc.matches_text("budget"));
    }

    #[test]
    fn test_tag_hierarchy_parse() {
        let tags: Vec<Tag> = serde_json::from_value(serde_json::json!([
            {
                "id": 1,
                "name": "projects",
                "parentId": null,
                "children": [
                    {"id": 2, "name": "tenga", "parentId": 1, "documentCount": 7}
                ],
                "documentCount": 12
            }
        ]))
        .unwrap();

        assert_eq!(tags.len(), 1);
        assert!(tags[0].is_root());
        let children = tags[0].children.as_ref().unwrap();
        assert_eq!(children[0].name, "tenga");
        assert_eq!(children[0].parent_id, Some(1));
        assert!(!children[0].is_root());
    }

    #[test]
    fn test_page_envelope_parse() {
        let page: Page<SearchResult> = serde_json::from_value(serde_json::json!({
            "content": [
                {"documentId": 5, "title": "Notes", "snippet": "...the Q3...", "relevanceScore": 0.82}
            ],
            "totalElements": 31,
            "totalPages": 2,
            "number": 0,
            "size": 20,
            "hasNext": true,
            "hasPrevious": false
        }))
        .unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 31);
        assert!(page.has_next);
        assert!(!page.has_previous);
        assert!(!page.is_empty());
    }

    #[test]
    fn test_page_flags_default_when_absent() {
        // Stricter envelopes omit the flags; the fields default to false.
        let page: Page<Document> = serde_json::from_value(serde_json::json!({
            "content": [],
            "totalElements": 0,
            "totalPages": 0,
            "number": 0,
            "size": 20
        }))
        .unwrap();

        assert!(page.is_empty());
        assert!(!page.has_next);
    }

    #[test]
    fn test_version_parse() {
        let version: DocumentVersion = serde_json::from_value(serde_json::json!({
            "id": 900,
            "documentId": 42,
            "versionNumber": 2,
            "title": "Meeting notes",
            "content": "Older content",
            "tagsSnapshot": "work,meetings",
            "createdAt": "2024-01-10T09:00:00",
            "changeSummary": "initial import"
        }))
        .unwrap();

        assert_eq!(version.document_id, 42);
        assert_eq!(version.version_number, 2);
        assert_eq!(version.change_summary.as_deref(), Some("initial import"));
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let request = UpdateDocumentRequest {
            title: Some("New title".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"title": "New title"}));
    }

    #[test]
    fn test_create_request_serialization() {
        let request = CreateDocumentRequest {
            title: "T".to_string(),
            content: "C".to_string(),
            tags: vec!["a".to_string()],
        };

        let json = serde_json::to_string(&request).unwrap();
        let parsed: CreateDocumentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_search_query_params() {
        let query = SearchQuery {
            text: Some("roadmap".to_string()),
            tags: vec!["work".to_string(), "q3".to_string()],
            page: 1,
            size: 10,
            ..Default::default()
        };

        let params = query.to_params();
        assert!(params.contains(&("q", "roadmap".to_string())));
        assert!(params.contains(&("tags", "work,q3".to_string())));
        assert!(params.contains(&("page", "1".to_string())));
        assert!(params.contains(&("size", "10".to_string())));
    }

    #[test]
    fn test_search_query_omits_empty_parts() {
        let query = SearchQuery {
            size: 20,
            ..Default::default()
        };

        let params = query.to_params();
        assert!(!params.iter().any(|(k, _)| *k == "q"));
        assert!(!params.iter().any(|(k, _)| *k == "tags"));
        assert!(!params.iter().any(|(k, _)| *k == "startDate"));
    }
}
