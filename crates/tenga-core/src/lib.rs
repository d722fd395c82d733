//! Tenga Core Library
//!
//! This crate provides the client-side core for Tenga, a document
//! management service with tags, full-text search, and per-document
//! version history. All persistence lives in the backend; this library
//! is the typed HTTP client plus the state the views work against.
//!
//! # Architecture
//!
//! - **Session**: explicit credential holder; the bearer key is loaded
//!   from durable storage at startup, set on login, cleared on logout
//!   or when the backend rejects it. Lifecycle changes are emitted as
//!   events rather than acted on in the transport layer.
//! - **ApiClient**: one method per backend endpoint; injects the bearer
//!   key and centralizes 401 handling.
//! - **AppStore**: client-side cache of documents and tags with filter
//!   state and the loading/error contract the views rely on.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let session = Arc::new(Session::load(&config)?);
//! let client = ApiClient::new(&config, session.clone())?;
//!
//! let mut store = AppStore::new(client);
//! store.load_documents(0, config.page_size).await?;
//! store.toggle_tag("work");
//! let visible = store.filtered_documents();
//! ```
//!
//! # Modules
//!
//! - `client`: REST client wrapping the backend API
//! - `config`: client configuration
//! - `error`: API error taxonomy
//! - `models`: wire-format data structures
//! - `routes`: route model and navigation guard
//! - `session`: credential lifecycle and session events
//! - `store`: client-side application store

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod store;

pub use client::ApiClient;
pub use config::Config;
pub use error::{ApiError, ErrorBody};
pub use models::{
    CreateDocumentRequest, Document, DocumentVersion, Page, SearchQuery, SearchResult, Tag,
    UpdateDocumentRequest,
};
pub use routes::{guard, Navigation, Route};
pub use session::{Session, SessionEvent};
pub use store::{filter_documents, AppStore, DocumentFilter};
