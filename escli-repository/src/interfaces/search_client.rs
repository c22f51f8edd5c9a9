//! Search client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::ClientError;
use crate::types::{
    BulkSummary, Document, FieldMapping, IndexAcknowledgement, IndexFilter, SearchRequest,
};

/// Abstract interface for search engine operations.
///
/// # Error Handling
///
/// Every method returns `Result<T, ClientError>`. Implementations must map
/// every backend failure to one of the `ClientError` variants; no
/// backend-specific error type may escape this trait.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// The backend endpoint this client talks to.
    fn endpoint(&self) -> &str;

    /// Send a `HEAD` request to the service root.
    ///
    /// # Returns
    ///
    /// * `Ok(u16)` - The HTTP status code of the response, whatever it was
    /// * `Err(ClientError)` - If no response was received
    async fn ping(&self) -> Result<u16, ClientError>;

    /// Retrieve cluster and system information.
    async fn info(&self) -> Result<Value, ClientError>;

    /// List the indexes matching `filter`, keyed by name.
    async fn get_indexes(&self, filter: &IndexFilter) -> Result<Map<String, Value>, ClientError>;

    /// Create an index, optionally with explicit field mappings.
    async fn create_index(
        &self,
        name: &str,
        mappings: &[FieldMapping],
    ) -> Result<IndexAcknowledgement, ClientError>;

    /// Delete an index.
    async fn delete_index(&self, name: &str) -> Result<IndexAcknowledgement, ClientError>;

    /// Execute a search and return the source body of each hit.
    ///
    /// Search metadata (`_id`, `_index`, `_score`) is stripped from the
    /// results. Hits come back in the order the backend ranked them.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let request = SearchRequest::new("tickets")
    ///     .with_query("status=open")
    ///     .with_sort("~created")
    ///     .with_page(10, 1);
    /// let documents = client.search(&request).await?;
    /// ```
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ClientError>;

    /// Index a single document with a backend-assigned id.
    ///
    /// The backend response is returned as-is; its shape is backend-defined.
    async fn ingest(&self, target: &str, document: &Document) -> Result<Value, ClientError>;

    /// Index many documents in a single bulk request.
    ///
    /// Individual rejections are counted in the summary rather than failing
    /// the whole call.
    async fn bulk_ingest(
        &self,
        target: &str,
        documents: &[Document],
    ) -> Result<BulkSummary, ClientError>;
}
