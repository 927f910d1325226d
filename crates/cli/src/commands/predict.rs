//! --test mode - Print completion candidates
//!
//! Runs the same prediction the shell completion hook runs, one candidate
//! per line. With `--strict` errors are reported instead of swallowed.

use kot_core::{
    resolve_candidates, Candidate, ErrorPolicy, ObjectStore, Predictor, Result, StorePredictor,
};

use super::SessionArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Execute the completion test mode
pub async fn execute(
    partial: &str,
    strict: bool,
    session: &SessionArgs,
    formatter: &Formatter,
) -> ExitCode {
    let client = match session.connect().await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from(&e);
        }
    };

    let candidates = if strict {
        match strict_candidates(&client, partial).await {
            Ok(candidates) => candidates,
            Err(e) => {
                formatter.error(&format!("Failed to complete '{partial}': {e}"));
                return ExitCode::from(&e);
            }
        }
    } else {
        StorePredictor::new(client).predict(partial).await
    };

    if formatter.is_json() {
        formatter.json(&candidates);
    } else {
        for candidate in &candidates {
            formatter.println(candidate);
        }
    }

    ExitCode::Success
}

async fn strict_candidates<S>(store: &S, partial: &str) -> Result<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    Ok(resolve_candidates(store, partial, ErrorPolicy::Fatal)
        .await?
        .into_iter()
        .map(Candidate::into_string)
        .collect())
}
