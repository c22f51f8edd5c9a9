//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchClient`
//! using the OpenSearch Rust client. Every call, including construction,
//! runs through the failure boundary in `failure.rs`.

use std::collections::HashMap;

use async_trait::async_trait;
use opensearch::{
    auth::Credentials as BasicAuth,
    cert::{Certificate, CertificateValidation},
    http::{
        headers::{HeaderValue, AUTHORIZATION},
        transport::{SingleNodeConnectionPool, Transport, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesGetParts},
    params::{ExpandWildcards, Refresh},
    BulkOperation, BulkParts, IndexParts, OpenSearch, SearchParts,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::config::{ConnectionConfig, Credentials};
use crate::errors::ClientError;
use crate::interfaces::SearchClient;
use crate::opensearch::failure::{guarded, read_json, translate, OpenSearchFailure};
use crate::opensearch::queries::{build_index_body, build_search_body};
use crate::types::{
    BulkSummary, Document, FieldMapping, IndexAcknowledgement, IndexFilter, IndexState,
    SearchRequest,
};

/// Wildcard expansion for an index listing.
fn expand_wildcards(filter: &IndexFilter) -> Vec<ExpandWildcards> {
    match (filter.state, filter.include_hidden) {
        (IndexState::Any, true) => vec![ExpandWildcards::All],
        (IndexState::Any, false) => vec![ExpandWildcards::Open, ExpandWildcards::Closed],
        (IndexState::Open, hidden) => with_hidden(ExpandWildcards::Open, hidden),
        (IndexState::Closed, hidden) => with_hidden(ExpandWildcards::Closed, hidden),
    }
}

fn with_hidden(state: ExpandWildcards, hidden: bool) -> Vec<ExpandWildcards> {
    if hidden {
        vec![state, ExpandWildcards::Hidden]
    } else {
        vec![state]
    }
}

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// use escli_repository::{ConnectionConfig, OpenSearchClient, SearchClient};
///
/// let config = ConnectionConfig::new("http://localhost:9200".parse()?);
/// let client = OpenSearchClient::new(&config)?;
/// let info = client.info().await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    endpoint: String,
}

impl OpenSearchClient {
    /// Create a new client for the configured endpoint.
    ///
    /// No request is sent; an unreachable backend only surfaces on the first
    /// call. Invalid TLS material or headers fail here as
    /// `ClientError::Connection`.
    pub fn new(config: &ConnectionConfig) -> Result<Self, ClientError> {
        let transport =
            build_transport(config).map_err(|failure| translate("connect", failure))?;

        info!(url = %config.url, "Created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
            endpoint: config.url.to_string(),
        })
    }
}

fn build_transport(config: &ConnectionConfig) -> Result<Transport, OpenSearchFailure> {
    let pool = SingleNodeConnectionPool::new(config.url.clone());
    let mut builder = TransportBuilder::new(pool).disable_proxy();

    match &config.credentials {
        Some(Credentials::Basic { user, password }) => {
            builder = builder.auth(BasicAuth::Basic(user.clone(), password.clone()));
        }
        Some(Credentials::ApiKey(encoded)) => {
            let value = HeaderValue::from_str(&format!("ApiKey {}", encoded))
                .map_err(OpenSearchFailure::transport)?;
            builder = builder.header(AUTHORIZATION, value);
        }
        None => {}
    }

    if config.tls.insecure {
        builder = builder.cert_validation(CertificateValidation::None);
    } else if let Some(pem) = &config.tls.ca_cert_pem {
        let certificate = Certificate::from_pem(pem)?;
        builder = builder.cert_validation(CertificateValidation::Full(certificate));
    }

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(OpenSearchFailure::transport)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source", default)]
    source: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(default)]
    status: u16,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

impl BulkResponse {
    fn summarize(self, total: usize) -> BulkSummary {
        let mut summary = BulkSummary {
            total,
            ..Default::default()
        };

        for item in self.items.into_iter().flat_map(HashMap::into_values) {
            if item.error.is_some() || !(200..300).contains(&item.status) {
                debug!(status = item.status, error = ?item.error, "Bulk item rejected");
                summary.failed += 1;
            } else {
                let result = item.result.unwrap_or_else(|| "indexed".to_string());
                *summary.results.entry(result).or_insert(0) += 1;
            }
        }

        summary
    }
}

#[async_trait]
impl SearchClient for OpenSearchClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<u16, ClientError> {
        guarded("ping", async {
            let response = self.client.ping().send().await?;
            Ok(response.status_code().as_u16())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn info(&self) -> Result<Value, ClientError> {
        guarded("info", async {
            let response = self.client.info().send().await?;
            read_json(response).await
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_indexes(&self, filter: &IndexFilter) -> Result<Map<String, Value>, ClientError> {
        guarded("get_indexes", async {
            let patterns = filter.patterns();
            let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
            let wildcards = expand_wildcards(filter);

            let response = self
                .client
                .indices()
                .get(IndicesGetParts::Index(&patterns))
                .expand_wildcards(&wildcards)
                .send()
                .await?;
            read_json(response).await
        })
        .await
    }

    #[instrument(skip(self, mappings), fields(mappings = mappings.len()))]
    async fn create_index(
        &self,
        name: &str,
        mappings: &[FieldMapping],
    ) -> Result<IndexAcknowledgement, ClientError> {
        guarded("create_index", async {
            let indices = self.client.indices();
            let request = indices.create(IndicesCreateParts::Index(name));
            let response = match build_index_body(mappings) {
                Some(body) => request.body(body).send().await?,
                None => request.send().await?,
            };
            let ack: IndexAcknowledgement = read_json(response).await?;

            debug!(index = %name, acknowledged = ack.acknowledged, "Index created");
            Ok(ack)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, name: &str) -> Result<IndexAcknowledgement, ClientError> {
        guarded("delete_index", async {
            let response = self
                .client
                .indices()
                .delete(IndicesDeleteParts::Index(&[name]))
                .send()
                .await?;
            let ack: IndexAcknowledgement = read_json(response).await?;

            debug!(index = %name, acknowledged = ack.acknowledged, "Index deleted");
            Ok(ack)
        })
        .await
    }

    #[instrument(skip(self, request), fields(target = %request.target))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ClientError> {
        guarded("search", async {
            let body = build_search_body(request);
            debug!(body = %body, "Executing search");

            let response = self
                .client
                .search(SearchParts::Index(&[request.target.as_str()]))
                .body(body)
                .send()
                .await?;
            let parsed: SearchResponse = read_json(response).await?;

            Ok(parsed
                .hits
                .hits
                .into_iter()
                .map(|hit| hit.source.unwrap_or_default())
                .collect())
        })
        .await
    }

    #[instrument(skip(self, document))]
    async fn ingest(&self, target: &str, document: &Document) -> Result<Value, ClientError> {
        guarded("ingest", async {
            let response = self
                .client
                .index(IndexParts::Index(target))
                .body(document)
                .send()
                .await?;
            read_json(response).await
        })
        .await
    }

    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    async fn bulk_ingest(
        &self,
        target: &str,
        documents: &[Document],
    ) -> Result<BulkSummary, ClientError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        guarded("bulk_ingest", async {
            let body: Vec<BulkOperation<Value>> = documents
                .iter()
                .map(|document| BulkOperation::index(Value::Object(document.clone())).into())
                .collect();

            let response = self
                .client
                .bulk(BulkParts::Index(target))
                .refresh(Refresh::WaitFor)
                .body(body)
                .send()
                .await?;
            let parsed: BulkResponse = read_json(response).await?;

            let summary = parsed.summarize(documents.len());
            debug!(
                succeeded = summary.succeeded(),
                failed = summary.failed,
                "Bulk ingest completed"
            );
            Ok(summary)
        })
        .await
    }
}
