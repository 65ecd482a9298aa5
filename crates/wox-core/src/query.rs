//! Query and batch types.

use serde::{Deserialize, Serialize};

use crate::item::ResultItem;

/// Kind of query submitted to producers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Typed into the query box.
    #[default]
    Text,
}

/// A query as submitted on the channel.
///
/// Identity is the text alone: two queries are the same query iff their
/// strings are equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
    #[serde(rename = "query")]
    pub text: String,

    #[serde(rename = "type", default)]
    pub query_type: QueryType,
}

impl Query {
    /// Create a text query.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            query_type: QueryType::Text,
        }
    }

    /// Check whether this query has the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.text == text
    }
}

/// One asynchronous delivery of results.
///
/// Items carry their own `associated_query`; a batch is not guaranteed to
/// be homogeneous.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ResultBatch {
    pub items: Vec<ResultItem>,
}

impl ResultBatch {
    pub fn new(items: Vec<ResultItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl From<Vec<ResultItem>> for ResultBatch {
    fn from(items: Vec<ResultItem>) -> Self {
        Self::new(items)
    }
}
