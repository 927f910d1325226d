//! In-memory object store used by the scenario tests

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kot_core::{Error, ListOptions, ListingPage, ObjectReader, ObjectStore, Result};

/// Buckets in creation order, keys sorted like S3 returns them
#[derive(Default)]
pub struct MemoryStore {
    buckets: Vec<(String, BTreeMap<String, Vec<u8>>)>,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, name: &str) -> Self {
        self.buckets.push((name.to_string(), BTreeMap::new()));
        self
    }

    pub fn with_object(mut self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) -> Self {
        if !self.buckets.iter().any(|(name, _)| name == bucket) {
            self = self.with_bucket(bucket);
        }
        let (_, objects) = self
            .buckets
            .iter_mut()
            .find(|(name, _)| name == bucket)
            .unwrap();
        objects.insert(key.to_string(), data.into());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn bucket(&self, bucket: &str) -> Result<&BTreeMap<String, Vec<u8>>> {
        self.buckets
            .iter()
            .find(|(name, _)| name == bucket)
            .map(|(_, objects)| objects)
            .ok_or_else(|| Error::NotFound(format!("Bucket not found: {bucket}")))
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self.buckets.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListingPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let objects = self.bucket(bucket)?;
        let mut page = ListingPage::default();

        for key in objects.keys().filter(|k| k.starts_with(&options.prefix)) {
            let rest = &key[options.prefix.len()..];
            let split = options
                .delimiter
                .as_deref()
                .and_then(|d| rest.find(d).map(|pos| pos + d.len()));

            match split {
                Some(end) => {
                    let common = format!("{}{}", options.prefix, &rest[..end]);
                    if page.common_prefixes.last() != Some(&common) {
                        page.common_prefixes.push(common);
                    }
                }
                None => page.contents.push(key.clone()),
            }
        }

        Ok(page)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        let data = self
            .bucket(bucket)?
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("s3://{bucket}/{key}")))?;
        Ok(Box::pin(Cursor::new(data)) as ObjectReader)
    }
}
