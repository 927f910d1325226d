//! Connection profiles
//!
//! A profile is a configuration section describing how to reach an
//! S3-compatible endpoint: where it lives and which credentials to present.
//! Fields left out fall back to the SDK's default provider chain.

use std::path::Path;

use crate::config::{lookup, ConfigSection};
use crate::error::{Error, Result};

/// Keys understood in a profile section
const KNOWN_KEYS: &[&str] = &[
    "endpoint_url",
    "region",
    "access_key_id",
    "secret_access_key",
    "session_token",
    "bucket_lookup",
];

/// Bucket addressing style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BucketLookup {
    /// Path-style for custom endpoints, virtual-hosted for AWS
    #[default]
    Auto,
    /// Always `https://endpoint/bucket/key`
    Path,
    /// Always `https://bucket.endpoint/key`
    Dns,
}

impl std::str::FromStr for BucketLookup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "path" => Ok(Self::Path),
            "dns" => Ok(Self::Dns),
            other => Err(Error::Config(format!(
                "bucket_lookup must be one of auto, path, dns (got '{other}')"
            ))),
        }
    }
}

/// Static credentials
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

/// Settings for one S3-compatible endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Name of the section the profile came from
    pub name: String,

    /// Custom endpoint URL
    pub endpoint_url: Option<String>,

    /// Region name
    pub region: Option<String>,

    /// Static credentials, if any
    pub credentials: Option<StaticCredentials>,

    /// Bucket addressing style
    pub bucket_lookup: BucketLookup,
}

impl Profile {
    /// Build a profile from a configuration section
    pub fn from_section(section: &ConfigSection) -> Result<Self> {
        for (key, _) in section.iter() {
            if !KNOWN_KEYS.contains(&key) {
                tracing::debug!(section = section.name(), key, "ignoring unknown profile key");
            }
        }

        let non_empty = |key: &str| {
            section
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let credentials = match (non_empty("access_key_id"), non_empty("secret_access_key")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
                session_token: non_empty("session_token"),
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(format!(
                    "profile '{}' must set both access_key_id and secret_access_key",
                    section.name()
                )));
            }
        };

        let bucket_lookup = match non_empty("bucket_lookup") {
            Some(value) => value.parse()?,
            None => BucketLookup::default(),
        };

        Ok(Self {
            name: section.name().to_string(),
            endpoint_url: non_empty("endpoint_url"),
            region: non_empty("region"),
            credentials,
            bucket_lookup,
        })
    }

    /// Look up the profile whose section name starts with `name` in `path`
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        let section = lookup(name, path)?;
        Self::from_section(&section)
    }

    /// Whether requests should use path-style addressing
    pub fn force_path_style(&self) -> bool {
        match self.bucket_lookup {
            BucketLookup::Path => true,
            BucketLookup::Dns => false,
            BucketLookup::Auto => self.endpoint_url.is_some(),
        }
    }
}
