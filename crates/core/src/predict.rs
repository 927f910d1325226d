//! Prediction entry point for shell completion hosts
//!
//! A completion host hands over the word being typed and expects a list of
//! strings back. Nothing here may fail: a completion callback that errors
//! breaks the user's shell, an empty list does not.

use async_trait::async_trait;

use crate::completion::{resolve_candidates, Candidate, ErrorPolicy};
use crate::traits::ObjectStore;

/// Something that can suggest completions for a partial argument
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Suggest continuations of `partial`
    async fn predict(&self, partial: &str) -> Vec<String>;
}

/// Predictor backed by an [`ObjectStore`]
pub struct StorePredictor<S> {
    store: S,
}

impl<S> StorePredictor<S>
where
    S: ObjectStore,
{
    /// Create a new predictor over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> Predictor for StorePredictor<S>
where
    S: ObjectStore,
{
    async fn predict(&self, partial: &str) -> Vec<String> {
        resolve_candidates(&self.store, partial, ErrorPolicy::Tolerant)
            .await
            .unwrap_or_default()
            .into_iter()
            .map(Candidate::into_string)
            .collect()
    }
}
