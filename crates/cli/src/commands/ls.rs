//! --ls mode - List buckets and objects
//!
//! Lists buckets when a reference has no bucket (`s3://`), or every
//! directory and key directly under the reference otherwise.

use kot_core::lister::{list_all, list_buckets};
use kot_core::{resolve, ObjectStore, Result, StorageRef};
use serde::Serialize;

use super::SessionArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Output structure for one listed reference (JSON format)
#[derive(Debug, Serialize, PartialEq, Eq)]
struct LsOutput {
    bucket: String,
    prefix: String,
    common_prefixes: Vec<String>,
    contents: Vec<String>,
}

impl LsOutput {
    /// Lines printed in human mode: directories first, then keys
    fn lines(&self) -> impl Iterator<Item = &str> {
        self.common_prefixes
            .iter()
            .chain(self.contents.iter())
            .map(String::as_str)
    }
}

/// Execute the listing mode
pub async fn execute(
    references: &[String],
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

    for raw in references {
        let listing = match resolve(raw) {
            Ok(reference) => list_reference(&client, reference).await,
            Err(e) => Err(e),
        };

        match listing {
            Ok(output) if formatter.is_json() => formatter.json(&output),
            Ok(output) => output.lines().for_each(|line| formatter.println(line)),
            Err(e) => {
                formatter.error(&format!("Failed to list {raw}: {e}"));
                return ExitCode::from(&e);
            }
        }
    }

    ExitCode::Success
}

async fn list_reference<S>(store: &S, reference: StorageRef) -> Result<LsOutput>
where
    S: ObjectStore + ?Sized,
{
    if reference.bucket.is_empty() {
        return Ok(LsOutput {
            bucket: String::new(),
            prefix: String::new(),
            common_prefixes: list_buckets(store, "").await?,
            contents: Vec::new(),
        });
    }

    let page = list_all(store, &reference.bucket, &reference.prefix).await?;
    Ok(LsOutput {
        bucket: reference.bucket,
        prefix: reference.prefix,
        common_prefixes: page.common_prefixes,
        contents: page.contents,
    })
}
