//! Object and bucket listing
//!
//! Thin layer over [`ObjectStore`] that fixes the one-level delimiter and
//! the bucket-name filtering used by completion.

use crate::error::Result;
use crate::traits::{ListOptions, ListingPage, ObjectStore};

/// Path delimiter used for every listing
pub const DELIMITER: &str = "/";

/// List the immediate children of `prefix` in `bucket`
///
/// Only the first page is returned. Keys past the backend's page size are
/// not seen; the truncation is logged at debug level.
pub async fn list<S>(store: &S, bucket: &str, prefix: &str) -> Result<ListingPage>
where
    S: ObjectStore + ?Sized,
{
    let page = store.list_objects(bucket, options_for(prefix, None)).await?;

    if page.truncated {
        tracing::debug!(bucket, prefix, "listing truncated after the first page");
    }

    Ok(page)
}

/// List the immediate children of `prefix`, following continuation tokens
pub async fn list_all<S>(store: &S, bucket: &str, prefix: &str) -> Result<ListingPage>
where
    S: ObjectStore + ?Sized,
{
    let mut listing = ListingPage::default();
    let mut continuation_token = None;

    loop {
        let page = store
            .list_objects(bucket, options_for(prefix, continuation_token))
            .await?;

        listing.common_prefixes.extend(page.common_prefixes);
        listing.contents.extend(page.contents);

        match page.continuation_token {
            Some(token) if page.truncated => continuation_token = Some(token),
            _ => break,
        }
    }

    Ok(listing)
}

/// Names of all buckets starting with `name_hint`, in backend order
pub async fn list_buckets<S>(store: &S, name_hint: &str) -> Result<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let names = store.list_buckets().await?;
    Ok(names
        .into_iter()
        .filter(|name| name.starts_with(name_hint))
        .collect())
}

fn options_for(prefix: &str, continuation_token: Option<String>) -> ListOptions {
    ListOptions {
        prefix: prefix.to_string(),
        delimiter: Some(DELIMITER.to_string()),
        continuation_token,
        ..Default::default()
    }
}
