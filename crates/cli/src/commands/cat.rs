//! Default mode - Display object contents
//!
//! Streams each referenced object to stdout, in argument order.

use std::io::ErrorKind;

use kot_core::{resolve, stream, Error, ObjectStore, Result, StorageRef};
use tokio::io::AsyncWrite;

use super::SessionArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Execute the default (cat) mode
pub async fn execute(
    references: &[String],
    session: &SessionArgs,
    formatter: &Formatter,
) -> ExitCode {
    // Reject typos before opening a session
    let references = match parse_references(references) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from(&e);
        }
    };

    let client = match session.connect().await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from(&e);
        }
    };

    let mut stdout = tokio::io::stdout();
    read_all(&client, &references, &mut stdout, formatter).await
}

fn parse_references(references: &[String]) -> Result<Vec<StorageRef>> {
    references.iter().map(|r| resolve(r)).collect()
}

/// Stream every reference into `sink`, stopping at the first failure
async fn read_all<S, W>(
    store: &S,
    references: &[StorageRef],
    sink: &mut W,
    formatter: &Formatter,
) -> ExitCode
where
    S: ObjectStore + ?Sized,
    W: AsyncWrite + Unpin,
{
    for reference in references {
        match stream(store, reference, sink).await {
            Ok(_) => {}
            // The reader went away (`kot ... | head`); nothing left to do
            Err(Error::Io(e)) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!(%reference, "output closed early");
                return ExitCode::Success;
            }
            Err(e) => {
                formatter.error(&format!("Failed to read {reference}: {e}"));
                return ExitCode::from(&e);
            }
        }
    }

    ExitCode::Success
}
