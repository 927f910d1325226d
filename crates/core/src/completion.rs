//! Completion candidate resolution
//!
//! Takes a partial `s3://` reference and produces the references one step
//! more specific than it:
//!
//! - a bare bucket fragment is matched against the bucket list; a unique
//!   match is completed and entered, anything else is offered as-is
//! - inside a bucket, chains of single-child prefixes are skipped in one
//!   step so that `s3://b/a` can complete straight to `s3://b/a/b/c/`
//!
//! Candidates are rendered without the scheme (`//bucket/key`) because
//! shells split words on the colon.

use crate::error::Result;
use crate::lister::{list, list_buckets};
use crate::path::{resolve, StorageRef};
use crate::traits::ObjectStore;

/// One proposed completion, `//bucket` or `//bucket/key`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate(String);

impl Candidate {
    /// Candidate naming a bucket only
    pub fn bucket(name: &str) -> Self {
        Self(format!("//{name}"))
    }

    /// Candidate naming a prefix or key inside a bucket
    pub fn entry(bucket: &str, key: &str) -> Self {
        Self(format!("//{bucket}/{key}"))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Candidate {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// What to do when resolution hits an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Swallow the error and return whatever was collected (shell completion)
    Tolerant,
    /// Surface the error to the caller (interactive use)
    Fatal,
}

impl ErrorPolicy {
    fn settle(self, outcome: Result<Vec<Candidate>>) -> Result<Vec<Candidate>> {
        match (self, outcome) {
            (ErrorPolicy::Tolerant, Err(e)) => {
                tracing::debug!(error = %e, "completion suppressed an error");
                Ok(Vec::new())
            }
            (_, outcome) => outcome,
        }
    }
}

/// Resolve `raw` into the ordered list of next-step candidates
///
/// With [`ErrorPolicy::Tolerant`] this never returns `Err`.
pub async fn resolve_candidates<S>(
    store: &S,
    raw: &str,
    policy: ErrorPolicy,
) -> Result<Vec<Candidate>>
where
    S: ObjectStore + ?Sized,
{
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    policy.settle(drill(store, raw).await)
}

async fn drill<S>(store: &S, raw: &str) -> Result<Vec<Candidate>>
where
    S: ObjectStore + ?Sized,
{
    let StorageRef { mut bucket, mut prefix } = resolve(raw)?;

    if prefix.is_empty() {
        let mut matches = list_buckets(store, &bucket).await?;
        if matches.len() != 1 {
            tracing::debug!(hint = %bucket, matches = matches.len(), "bucket name is not unique");
            return Ok(matches.iter().map(|name| Candidate::bucket(name)).collect());
        }
        bucket = matches.remove(0);
    }

    let page = loop {
        let page = list(store, &bucket, &prefix).await?;
        let next = page
            .single_common_prefix()
            .filter(|only| *only != prefix)
            .map(str::to_string);

        match next {
            Some(next) => {
                tracing::debug!(%bucket, from = %prefix, to = %next, "collapsing single-child prefix");
                prefix = next;
            }
            None => break page,
        }
    };

    Ok(page
        .common_prefixes
        .iter()
        .chain(page.contents.iter())
        .map(|key| Candidate::entry(&bucket, key))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::traits::{ListingPage, MockObjectStore};
    use mockall::Sequence;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn page(prefixes: &[&str], contents: &[&str]) -> ListingPage {
        ListingPage {
            common_prefixes: strings(prefixes),
            contents: strings(contents),
            ..Default::default()
        }
    }

    fn rendered(candidates: Vec<Candidate>) -> Vec<String> {
        candidates.into_iter().map(Candidate::into_string).collect()
    }

    #[test]
    fn test_candidate_rendering() {
        assert_eq!(Candidate::bucket("logs"), "//logs");
        assert_eq!(Candidate::entry("logs", "2024/"), "//logs/2024/");
        assert_eq!(Candidate::entry("logs", "a.txt").to_string(), "//logs/a.txt");
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let store = MockObjectStore::new();
        for policy in [ErrorPolicy::Tolerant, ErrorPolicy::Fatal] {
            let candidates = resolve_candidates(&store, "", policy).await.unwrap();
            assert!(candidates.is_empty());
        }
    }

    #[tokio::test]
    async fn test_ambiguous_bucket_stops_without_listing() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .times(1)
            .returning(|| Ok(strings(&["archive", "my-bucket", "my-bucket2"])));
        store.expect_list_objects().times(0);

        let candidates = resolve_candidates(&store, "s3://my-buck", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert_eq!(rendered(candidates), strings(&["//my-bucket", "//my-bucket2"]));
    }

    #[tokio::test]
    async fn test_no_matching_bucket_is_empty_not_error() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .returning(|| Ok(strings(&["alpha", "beta"])));
        store.expect_list_objects().times(0);

        let candidates = resolve_candidates(&store, "s3://zeta", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_unique_bucket_is_entered() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .returning(|| Ok(strings(&["logs", "photos"])));
        store
            .expect_list_objects()
            .withf(|bucket, options| bucket == "photos" && options.prefix.is_empty())
            .times(1)
            .returning(|_, _| Ok(page(&["2023/", "2024/"], &["index.html"])));

        let candidates = resolve_candidates(&store, "s3://ph", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert_eq!(
            rendered(candidates),
            strings(&["//photos/2023/", "//photos/2024/", "//photos/index.html"])
        );
    }

    #[tokio::test]
    async fn test_single_child_chain_is_collapsed() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();
        store.expect_list_buckets().times(0);
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix == "a")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a/"], &[])));
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix == "a/")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a/b/"], &[])));
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix == "a/b/")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a/b/c/", "a/b/d/"], &["a/b/e.txt"])));

        let candidates = resolve_candidates(&store, "s3://bucket/a", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert_eq!(
            rendered(candidates),
            strings(&["//bucket/a/b/c/", "//bucket/a/b/d/", "//bucket/a/b/e.txt"])
        );
    }

    #[tokio::test]
    async fn test_single_prefix_with_contents_is_not_collapsed() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .returning(|_, _| Ok(page(&["dir/"], &["dir.txt"])));

        let candidates = resolve_candidates(&store, "s3://bucket/dir", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert_eq!(rendered(candidates), strings(&["//bucket/dir/", "//bucket/dir.txt"]));
    }

    #[tokio::test]
    async fn test_self_referencing_prefix_terminates() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .returning(|_, _| Ok(page(&["loop/"], &[])));

        let candidates = resolve_candidates(&store, "s3://bucket/loop/", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert_eq!(rendered(candidates), strings(&["//bucket/loop/"]));
    }

    #[tokio::test]
    async fn test_order_is_backend_order_without_dedup() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Ok(page(&["z/", "a/"], &["y", "b", "y"])));

        let candidates = resolve_candidates(&store, "s3://bucket/x", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert_eq!(
            rendered(candidates),
            strings(&["//bucket/z/", "//bucket/a/", "//bucket/y", "//bucket/b", "//bucket/y"])
        );
    }

    #[tokio::test]
    async fn test_empty_listing_yields_nothing() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Ok(ListingPage::default()));

        let candidates = resolve_candidates(&store, "s3://bucket/nothing", ErrorPolicy::Fatal)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_bad_scheme_depends_on_policy() {
        let store = MockObjectStore::new();

        let candidates = resolve_candidates(&store, "gs://bucket/key", ErrorPolicy::Tolerant)
            .await
            .unwrap();
        assert!(candidates.is_empty());

        let err = resolve_candidates(&store, "gs://bucket/key", ErrorPolicy::Fatal)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidScheme(_)));
    }

    #[tokio::test]
    async fn test_malformed_url_depends_on_policy() {
        let store = MockObjectStore::new();

        let candidates = resolve_candidates(&store, "just words", ErrorPolicy::Tolerant)
            .await
            .unwrap();
        assert!(candidates.is_empty());

        let err = resolve_candidates(&store, "just words", ErrorPolicy::Fatal)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedUrl { .. }));
    }

    #[tokio::test]
    async fn test_backend_error_depends_on_policy() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_buckets()
            .times(2)
            .returning(|| Err(Error::Backend("expired token".into())));

        let candidates = resolve_candidates(&store, "s3://b", ErrorPolicy::Tolerant)
            .await
            .unwrap();
        assert!(candidates.is_empty());

        let err = resolve_candidates(&store, "s3://b", ErrorPolicy::Fatal)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }

    #[tokio::test]
    async fn test_error_during_drill_down_is_swallowed_when_tolerant() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a/"], &[])));
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::Backend("connection reset".into())));

        let candidates = resolve_candidates(&store, "s3://bucket/a", ErrorPolicy::Tolerant)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_error_during_drill_down_is_returned_when_fatal() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a/"], &[])));
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::Backend("connection reset".into())));

        let err = resolve_candidates(&store, "s3://bucket/a", ErrorPolicy::Fatal)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }
}
