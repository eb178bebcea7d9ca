//! Text chunk rewriting and output assembly
//!
//! The rewriter walks the scanner output once. Matching `tEXt` chunks are
//! dropped, new chunks are placed immediately before IEND, and everything else
//! is carried over by its raw span so unknown chunks and their CRCs are never
//! re-encoded.

use crate::{
    chunk::{encode_chunk, Chunk, ChunkType, TextChunk},
    error::Result,
    scanner::ChunkScanner,
};
use std::io::Write;
use tracing::debug;

/// One piece of the output stream
#[derive(Debug, Clone)]
enum Piece<'a> {
    /// Bytes copied verbatim from the input
    Copied(&'a [u8]),
    /// A newly encoded chunk record
    Inserted(Vec<u8>),
}

impl Piece<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Piece::Copied(bytes) => bytes,
            Piece::Inserted(record) => record,
        }
    }
}

/// The rewritten container as an ordered list of spans
///
/// Holds borrowed slices of the input for pass-through chunks, so it can be
/// written out without first building the whole buffer.
#[derive(Debug, Clone)]
pub struct Rewrite<'a> {
    pieces: Vec<Piece<'a>>,
    removed: usize,
    inserted: usize,
}

impl Rewrite<'_> {
    /// Total size of the output in bytes
    pub fn output_len(&self) -> usize {
        self.pieces.iter().map(|p| p.bytes().len()).sum()
    }

    /// Number of input chunks that were dropped
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Number of chunks that were inserted
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Concatenate all pieces into a new buffer
    pub fn to_vec(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.output_len());
        for piece in &self.pieces {
            output.extend_from_slice(piece.bytes());
        }
        output
    }

    /// Stream all pieces into `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for piece in &self.pieces {
            writer.write_all(piece.bytes())?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Rewrite the `tEXt` chunks of a container
///
/// Every `tEXt` chunk whose keyword matches an entry of `strip`, ignoring
/// ASCII case, is removed. Each `(keyword, text)` in `insert` becomes a new
/// `tEXt` chunk, in order, immediately before IEND.
pub fn rewrite_text_chunks<'a>(
    container: &'a [u8],
    strip: &[String],
    insert: &[(&str, &[u8])],
) -> Result<Rewrite<'a>> {
    let scanner = ChunkScanner::new(container)?;

    let mut pieces = Vec::new();
    pieces.push(Piece::Copied(scanner.signature()));

    let mut removed = 0;

    for chunk in scanner {
        let chunk = chunk?;

        if chunk.is_terminal() {
            for (keyword, text) in insert {
                let data = TextChunk::encode(keyword, text);
                let record = encode_chunk(ChunkType::TEXT, &data)?;
                debug!(
                    keyword,
                    offset = chunk.offset(),
                    len = record.len(),
                    "inserting tEXt chunk"
                );
                pieces.push(Piece::Inserted(record));
            }
            pieces.push(Piece::Copied(chunk.raw()));
            break;
        }

        if should_strip(&chunk, strip) {
            debug!(
                offset = chunk.offset(),
                len = chunk.span_len(),
                "dropping tEXt chunk"
            );
            removed += 1;
            continue;
        }

        pieces.push(Piece::Copied(chunk.raw()));
    }

    let rewrite = Rewrite {
        pieces,
        removed,
        inserted: insert.len(),
    };
    debug!(
        input = container.len(),
        output = rewrite.output_len(),
        removed,
        inserted = rewrite.inserted,
        "rewrote container"
    );
    Ok(rewrite)
}

fn should_strip(chunk: &Chunk<'_>, strip: &[String]) -> bool {
    chunk
        .text()
        .is_some_and(|text| strip.iter().any(|k| text.keyword_is(k)))
}
