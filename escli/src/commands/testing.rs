//! In-memory search client and helpers for command tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use escli_repository::{
    BulkSummary, ClientError, Document, FieldMapping, IndexAcknowledgement, IndexFilter,
    SearchClient, SearchRequest,
};
use serde_json::{json, Map, Value};

use crate::cli::CliError;
use crate::commands::{CommandRegistry, Context};

/// Which error a failing mock returns.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Connection,
    Auth,
    Api,
}

impl Failure {
    fn error(self) -> ClientError {
        match self {
            Self::Connection => ClientError::connection("connection refused"),
            Self::Auth => ClientError::auth("401 security_exception: unable to authenticate"),
            Self::Api => ClientError::api("404 index_not_found_exception: no such index"),
        }
    }
}

/// A `SearchClient` that answers from canned data and records each call.
#[derive(Default)]
pub struct MockClient {
    info: Value,
    indexes: Map<String, Value>,
    hits: Vec<Document>,
    failure: Option<Failure>,
    calls: Mutex<Vec<String>>,
    listings: Mutex<Vec<IndexFilter>>,
    searches: Mutex<Vec<SearchRequest>>,
    created: Mutex<Vec<(String, Vec<FieldMapping>)>>,
    ingested: Mutex<Vec<(String, Document)>>,
    batches: Mutex<Vec<usize>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.info = info;
        self
    }

    pub fn with_indexes(mut self, indexes: Value) -> Self {
        self.indexes = indexes.as_object().cloned().unwrap_or_default();
        self
    }

    pub fn with_hits(mut self, hits: Vec<Value>) -> Self {
        self.hits = hits
            .into_iter()
            .filter_map(|hit| hit.as_object().cloned())
            .collect();
        self
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn listings(&self) -> Vec<IndexFilter> {
        self.listings.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(String, Vec<FieldMapping>)> {
        self.created.lock().unwrap().clone()
    }

    pub fn ingested(&self) -> Vec<(String, Document)> {
        self.ingested.lock().unwrap().clone()
    }

    pub fn batches(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call.to_string());
        match self.failure {
            Some(failure) => Err(failure.error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SearchClient for MockClient {
    fn endpoint(&self) -> &str {
        "http://mock:9200/"
    }

    async fn ping(&self) -> Result<u16, ClientError> {
        self.record("ping")?;
        Ok(200)
    }

    async fn info(&self) -> Result<Value, ClientError> {
        self.record("info")?;
        Ok(self.info.clone())
    }

    async fn get_indexes(&self, filter: &IndexFilter) -> Result<Map<String, Value>, ClientError> {
        self.record("get_indexes")?;
        self.listings.lock().unwrap().push(filter.clone());
        let matches_pattern = |name: &str| match filter.pattern.as_deref() {
            None => true,
            Some(pattern) => match pattern.strip_suffix('*') {
                Some(prefix) => name.starts_with(prefix),
                None => name == pattern,
            },
        };
        Ok(self
            .indexes
            .iter()
            .filter(|(name, _)| filter.include_hidden || !name.starts_with('.'))
            .filter(|(name, _)| matches_pattern(name))
            .map(|(name, definition)| (name.clone(), definition.clone()))
            .collect())
    }

    async fn create_index(
        &self,
        name: &str,
        mappings: &[FieldMapping],
    ) -> Result<IndexAcknowledgement, ClientError> {
        self.record("create_index")?;
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), mappings.to_vec()));
        Ok(IndexAcknowledgement {
            acknowledged: true,
            index: Some(name.to_string()),
        })
    }

    async fn delete_index(&self, _name: &str) -> Result<IndexAcknowledgement, ClientError> {
        self.record("delete_index")?;
        Ok(IndexAcknowledgement {
            acknowledged: true,
            index: None,
        })
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ClientError> {
        self.record("search")?;
        self.searches.lock().unwrap().push(request.clone());
        Ok(self.hits.clone())
    }

    async fn ingest(&self, target: &str, document: &Document) -> Result<Value, ClientError> {
        self.record("ingest")?;
        self.ingested
            .lock()
            .unwrap()
            .push((target.to_string(), document.clone()));
        Ok(json!({ "_index": target, "_id": "generated", "result": "created" }))
    }

    async fn bulk_ingest(
        &self,
        _target: &str,
        documents: &[Document],
    ) -> Result<BulkSummary, ClientError> {
        self.record("bulk_ingest")?;
        self.batches.lock().unwrap().push(documents.len());
        Ok(BulkSummary {
            total: documents.len(),
            results: BTreeMap::from([("created".to_string(), documents.len())]),
            failed: 0,
        })
    }
}

/// Parse `args` (without the program name), run the command and return stdout.
pub async fn run(client: &MockClient, args: &[&str]) -> Result<String, CliError> {
    run_with_stdin(client, args, "").await
}

/// Like [`run`], with `stdin` as the command's standard input.
pub async fn run_with_stdin(
    client: &MockClient,
    args: &[&str],
    stdin: &str,
) -> Result<String, CliError> {
    let registry = CommandRegistry::with_defaults();
    let matches = registry
        .parser()
        .try_get_matches_from(std::iter::once("escli").chain(args.iter().copied()))
        .map_err(|e| CliError::usage(e.to_string()))?;

    let mut stdout = Vec::new();
    let mut input = stdin.as_bytes();
    let mut ctx = Context {
        client,
        stdout: &mut stdout,
        stdin: &mut input,
    };
    registry.dispatch(&mut ctx, &matches).await?;

    Ok(String::from_utf8_lossy(&stdout).into_owned())
}
