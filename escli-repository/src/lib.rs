//! # escli Repository
//!
//! This crate provides the client abstraction used by the escli command
//! layer: the `SearchClient` trait, the normalized `ClientError` taxonomy,
//! request and response types, connection configuration, and a concrete
//! implementation backed by OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::{ConnectionConfig, ConnectionOptions, Credentials, TlsConfig};
pub use errors::{ClientError, ConfigError};
pub use interfaces::SearchClient;
pub use opensearch::OpenSearchClient;
pub use types::{
    BulkSummary, Document, FieldMapping, IndexAcknowledgement, IndexFilter, IndexState,
    Pagination, SearchRequest, SortOrder, SortSpec,
};
