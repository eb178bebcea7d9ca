//! Chunk stream scanner
//!
//! Walks a PNG buffer from just past the signature and yields each chunk in
//! order. Scanning ends after IEND; anything following it is ignored. The
//! iterator is fused: after the terminal chunk or the first error it only
//! returns `None`.

use crate::{
    chunk::{decode_chunk_at, Chunk, PNG_SIGNATURE},
    error::{Error, Result},
};
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning { cursor: usize },
    /// IEND seen; `end` is the offset just past it
    Done { end: usize },
    Failed { offset: usize },
}

/// Iterator over the chunks of a PNG buffer
#[derive(Debug, Clone)]
pub struct ChunkScanner<'a> {
    buffer: &'a [u8],
    state: ScanState,
}

impl<'a> ChunkScanner<'a> {
    /// Check the signature and position the cursor on the first chunk
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        check_signature(buffer)?;
        Ok(Self {
            buffer,
            state: ScanState::Scanning {
                cursor: PNG_SIGNATURE.len(),
            },
        })
    }

    /// The signature bytes at the start of the buffer
    pub fn signature(&self) -> &'a [u8] {
        &self.buffer[..PNG_SIGNATURE.len()]
    }

    /// Offset just past IEND, once it has been reached
    pub fn end_offset(&self) -> Option<usize> {
        match self.state {
            ScanState::Done { end } => Some(end),
            _ => None,
        }
    }

    /// Offset where scanning failed, if it did
    pub fn failed_at(&self) -> Option<usize> {
        match self.state {
            ScanState::Failed { offset } => Some(offset),
            _ => None,
        }
    }

    /// Bytes after IEND (zero until IEND is reached)
    pub fn trailing_len(&self) -> usize {
        self.end_offset()
            .map(|end| self.buffer.len() - end)
            .unwrap_or(0)
    }
}

impl<'a> Iterator for ChunkScanner<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let ScanState::Scanning { cursor } = self.state else {
            return None;
        };

        if cursor == self.buffer.len() {
            self.state = ScanState::Failed { offset: cursor };
            return Some(Err(Error::MissingTerminalChunk {
                offset: cursor as u64,
            }));
        }

        match decode_chunk_at(self.buffer, cursor) {
            Ok((chunk, next)) => {
                trace!(
                    offset = cursor,
                    chunk_type = %chunk.chunk_type(),
                    len = chunk.data().len(),
                    "scanned chunk"
                );
                self.state = if chunk.is_terminal() {
                    if next < self.buffer.len() {
                        warn!(
                            trailing = self.buffer.len() - next,
                            "ignoring bytes after IEND"
                        );
                    }
                    ScanState::Done { end: next }
                } else {
                    ScanState::Scanning { cursor: next }
                };
                Some(Ok(chunk))
            }
            Err(e) => {
                self.state = ScanState::Failed { offset: cursor };
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for ChunkScanner<'_> {}

/// Fail with [`Error::InvalidSignature`] unless `buffer` starts with the PNG signature
pub fn check_signature(buffer: &[u8]) -> Result<()> {
    if buffer.starts_with(PNG_SIGNATURE) {
        Ok(())
    } else {
        Err(Error::InvalidSignature { offset: 0 })
    }
}
