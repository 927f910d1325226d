//! ObjectStore trait definition
//!
//! This trait defines the small slice of S3 that kot needs.
//! It allows the core to be decoupled from the specific S3 SDK implementation.

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::Result;

/// Streaming body of an object
///
/// Dropping the reader releases the underlying connection.
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// One page of a delimited listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Directory-like groupings, in backend order
    pub common_prefixes: Vec<String>,

    /// Leaf object keys, in backend order
    pub contents: Vec<String>,

    /// Whether the backend has more results after this page
    pub truncated: bool,

    /// Token to request the next page
    pub continuation_token: Option<String>,
}

impl ListingPage {
    /// Whether the page holds a single common prefix and nothing else
    pub fn single_common_prefix(&self) -> Option<&str> {
        match (self.common_prefixes.as_slice(), self.contents.is_empty()) {
            ([only], true) => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Options for list operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Prefix to filter by
    pub prefix: String,

    /// Delimiter for grouping (usually "/")
    pub delimiter: Option<String>,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the names of all buckets visible to the session
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// List one page of objects in a bucket
    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListingPage>;

    /// Open a streaming read of an object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader>;
}
