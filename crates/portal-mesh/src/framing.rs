//! Newline-delimited framing over TCP halves, shared by hub and spoke.

use futures_util::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

use crate::MeshError;

/// Reads one announcement line at a time.
pub(crate) struct LineReader {
    inner: FramedRead<OwnedReadHalf, LinesCodec>,
}

impl LineReader {
    pub fn new(read: OwnedReadHalf, max_line_length: usize) -> Self {
        Self {
            inner: FramedRead::new(read, LinesCodec::new_with_max_length(max_line_length)),
        }
    }

    /// Next line, or `None` once the peer closed its side.
    pub async fn next_line(&mut self) -> Result<Option<String>, MeshError> {
        match self.inner.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(MeshError::Codec(e)),
            None => Ok(None),
        }
    }
}

/// Writes lines, appending the newline.
pub(crate) struct LineWriter {
    inner: FramedWrite<OwnedWriteHalf, LinesCodec>,
}

impl LineWriter {
    pub fn new(write: OwnedWriteHalf) -> Self {
        Self {
            inner: FramedWrite::new(write, LinesCodec::new()),
        }
    }

    pub async fn send(&mut self, line: &str) -> Result<(), MeshError> {
        self.inner.send(line).await.map_err(MeshError::Codec)
    }
}
