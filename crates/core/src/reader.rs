//! Object streaming
//!
//! Copies an object to any async sink in fixed-size chunks, so objects
//! larger than memory can be read.

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::path::StorageRef;
use crate::traits::ObjectStore;

/// Size of the intermediate copy buffer
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Stream the object named by `reference` into `sink`
///
/// Returns the number of bytes copied. The object body is dropped before
/// returning, whether the copy succeeded or not.
pub async fn stream<S, W>(store: &S, reference: &StorageRef, sink: &mut W) -> Result<u64>
where
    S: ObjectStore + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    if reference.is_bucket_only() {
        return Err(Error::NotFound(format!(
            "{reference} names a bucket, not an object"
        )));
    }

    let mut body = store
        .get_object(&reference.bucket, &reference.prefix)
        .await?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut copied: u64 = 0;

    loop {
        let n = body
            .read(&mut buffer)
            .await
            .map_err(|e| Error::Backend(format!("reading {reference}: {e}")))?;
        if n == 0 {
            break;
        }
        sink.write_all(&buffer[..n]).await?;
        copied += n as u64;
    }

    sink.flush().await?;
    tracing::debug!(%reference, bytes = copied, "object streamed");

    Ok(copied)
}
