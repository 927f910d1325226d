//! kot-core: Core library for the kot S3 reader
//!
//! This crate provides the core functionality for the kot CLI, including:
//! - Parsing `s3://bucket/key` references
//! - Listing buckets and prefixes one level at a time
//! - Resolving partial references into completion candidates
//! - Streaming objects to any async sink
//! - Reading connection profiles from the configuration file
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! so everything here can be exercised against a fake [`ObjectStore`].

pub mod completion;
pub mod config;
pub mod error;
pub mod lister;
pub mod path;
pub mod predict;
pub mod profile;
pub mod reader;
pub mod traits;

pub use completion::{resolve_candidates, Candidate, ErrorPolicy};
pub use config::{default_config_path, lookup, ConfigSection};
pub use error::{Error, Result};
pub use path::{resolve, StorageRef, SCHEME};
pub use predict::{Predictor, StorePredictor};
pub use profile::{BucketLookup, Profile, StaticCredentials};
pub use reader::stream;
pub use traits::{ListOptions, ListingPage, ObjectReader, ObjectStore};
