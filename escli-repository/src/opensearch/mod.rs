//! OpenSearch implementation of the search client.
//!
//! This module provides a concrete implementation of `SearchClient`
//! using OpenSearch as the backend.

mod client;
mod failure;
mod queries;

pub use client::OpenSearchClient;
pub use failure::{ErrorBody, OpenSearchFailure};
pub use queries::{build_index_body, build_query, build_search_body, build_sort};
