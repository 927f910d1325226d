//! Storage reference parsing
//!
//! Turns `s3://bucket/key` strings into a [`StorageRef`]. The host becomes the
//! bucket and the path, minus its leading slashes, becomes the key prefix.

use url::Url;

use crate::error::{Error, Result};

/// The only URL scheme kot understands
pub const SCHEME: &str = "s3";

/// A parsed reference into an object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRef {
    /// Bucket name (empty when the URL carries no host)
    pub bucket: String,
    /// Key or key prefix, never starting with '/'
    pub prefix: String,
}

impl StorageRef {
    /// Create a new StorageRef
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            bucket: bucket.into(),
            prefix: prefix.trim_start_matches('/').to_string(),
        }
    }

    /// Whether only a bucket (or bucket fragment) was given
    pub fn is_bucket_only(&self) -> bool {
        self.prefix.is_empty()
    }
}

impl std::fmt::Display for StorageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{SCHEME}://{}", self.bucket)
        } else {
            write!(f, "{SCHEME}://{}/{}", self.bucket, self.prefix)
        }
    }
}

/// Parse a raw reference into bucket and prefix
///
/// Fails with [`Error::MalformedUrl`] when the string is not a URL and with
/// [`Error::InvalidScheme`] when the scheme is anything other than `s3`.
pub fn resolve(raw: &str) -> Result<StorageRef> {
    let url = Url::parse(raw).map_err(|e| Error::MalformedUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != SCHEME {
        return Err(Error::InvalidScheme(raw.to_string()));
    }

    // The url crate keeps non-special paths percent-encoded
    let path = urlencoding::decode(url.path()).map_err(|e| Error::MalformedUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    Ok(StorageRef::new(url.host_str().unwrap_or_default(), path))
}
