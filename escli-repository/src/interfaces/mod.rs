//! Interface definitions for the search client.
//!
//! This module defines the abstract `SearchClient` trait that the command
//! layer depends on, so backends can be swapped (or mocked in tests).

mod search_client;

pub use search_client::SearchClient;
