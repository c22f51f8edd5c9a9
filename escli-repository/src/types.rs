//! Request and response types for search client operations.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON document as stored in, or returned from, the backend.
pub type Document = Map<String, Value>;

/// Default number of hits per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// The backend keyword for this order.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A single-field sort.
///
/// Parsed from the CLI form: a bare field name sorts ascending, a field name
/// prefixed with `~` sorts descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    /// Parse a sort specifier. Returns `None` when no field name is given.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let (field, order) = match spec.strip_prefix('~') {
            Some(field) => (field, SortOrder::Desc),
            None => (spec, SortOrder::Asc),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            order,
        })
    }
}

/// Page-based pagination, with 1-indexed page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: u32,
    pub page_number: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl Pagination {
    pub fn new(page_size: u32, page_number: u32) -> Self {
        Self {
            page_size,
            page_number,
        }
    }

    /// Number of hits to skip. Page 0 is treated as page 1.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page_number.saturating_sub(1))
    }

    /// Maximum number of hits to return.
    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

/// Parameters of a search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Index, alias or pattern to search.
    pub target: String,
    /// Simplified query (`field=value`), or `None` for match-all.
    pub query: Option<String>,
    /// Source fields to return. Empty means the whole source.
    pub fields: Vec<String>,
    pub sort: Option<SortSpec>,
    pub pagination: Pagination,
}

impl SearchRequest {
    /// Create a match-all request for the first page of `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            query: None,
            fields: Vec::new(),
            sort: None,
            pagination: Pagination::default(),
        }
    }

    /// Set the query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Restrict the returned source fields.
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Set the sort from its CLI form (`name` or `~name`).
    pub fn with_sort(mut self, spec: &str) -> Self {
        self.sort = SortSpec::parse(spec);
        self
    }

    /// Set the page size and 1-indexed page number.
    pub fn with_page(mut self, page_size: u32, page_number: u32) -> Self {
        self.pagination = Pagination::new(page_size, page_number);
        self
    }
}

/// A field mapping given as `name:type` when creating an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub name: String,
    pub field_type: String,
}

impl FromStr for FieldMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, field_type)) if !name.is_empty() && !field_type.is_empty() => Ok(Self {
                name: name.to_string(),
                field_type: field_type.to_string(),
            }),
            _ => Err(format!("invalid mapping '{}', expected NAME:TYPE", s)),
        }
    }
}

impl fmt::Display for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.field_type)
    }
}

/// Index states matched by a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexState {
    /// Open and closed indexes.
    #[default]
    Any,
    Open,
    Closed,
}

impl IndexState {
    /// Combine `--open` and `--closed` flags. Both or neither match any state.
    pub fn from_flags(open: bool, closed: bool) -> Self {
        match (open, closed) {
            (true, false) => Self::Open,
            (false, true) => Self::Closed,
            _ => Self::Any,
        }
    }
}

/// Selection of indexes for a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexFilter {
    /// Index name or pattern; `None` lists every index.
    pub pattern: Option<String>,
    pub state: IndexState,
    /// Include hidden and dot-prefixed system indexes.
    pub include_hidden: bool,
}

impl IndexFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_state(mut self, state: IndexState) -> Self {
        self.state = state;
        self
    }

    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Index expressions to request.
    ///
    /// Dot-prefixed indexes are excluded from wildcard patterns unless
    /// hidden indexes are included or the pattern itself starts with a dot.
    pub fn patterns(&self) -> Vec<String> {
        let pattern = self.pattern.as_deref().unwrap_or("*");
        let exclude_system =
            !self.include_hidden && pattern.contains('*') && !pattern.starts_with('.');

        let mut patterns = vec![pattern.to_string()];
        if exclude_system {
            patterns.push("-.*".to_string());
        }
        patterns
    }
}

/// Acknowledgement returned by index creation and deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexAcknowledgement {
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// Summary of a bulk ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    /// Number of documents sent.
    pub total: usize,
    /// Count of successful items by backend result (`created`, `updated`, ...).
    pub results: BTreeMap<String, usize>,
    /// Number of items the backend rejected.
    pub failed: usize,
}

impl BulkSummary {
    /// Number of items the backend accepted.
    pub fn succeeded(&self) -> usize {
        self.results.values().sum()
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: BulkSummary) {
        self.total += other.total;
        self.failed += other.failed;
        for (result, count) in other.results {
            *self.results.entry(result).or_insert(0) += count;
        }
    }
}
