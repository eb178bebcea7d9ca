//! Structure representation for parsed containers

use crate::{
    chunk::{ChunkType, PNG_SIGNATURE},
    error::Result,
    scanner::ChunkScanner,
};

/// A byte range in a buffer (offset and size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// Offset from start of buffer
    pub offset: u64,
    /// Size in bytes
    pub size: u64,
}

impl ByteRange {
    /// Create a new byte range
    pub fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// Get the end offset of this range
    pub fn end_offset(&self) -> u64 {
        self.offset + self.size
    }

    /// Check if this range is immediately followed by another (contiguous)
    pub fn is_contiguous_with(&self, other: &ByteRange) -> bool {
        self.end_offset() == other.offset
    }
}

/// One chunk as seen during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Full record span: length + type + data + CRC
    pub range: ByteRange,

    pub chunk_type: ChunkType,

    /// Keyword of a `tEXt` chunk, as Latin-1 text
    pub keyword: Option<String>,

    /// Whether the stored CRC matches `type ‖ data`
    pub crc_valid: bool,
}

impl ChunkInfo {
    /// Size of the chunk data alone
    pub fn data_size(&self) -> u64 {
        self.range.size - 12
    }
}

/// The discovered chunk layout of a PNG buffer
///
/// Used for diagnostics; rewriting works directly on the scanner and does not
/// need a parsed structure.
#[derive(Debug, Clone)]
pub struct Structure {
    /// All chunks in order, IEND last
    pub chunks: Vec<ChunkInfo>,

    /// Offset just past IEND
    pub total_size: u64,

    /// Bytes found after IEND (ignored by rewriting)
    pub trailing_size: u64,
}

impl Structure {
    /// Parse the chunk layout of `container` in a single pass
    pub fn parse(container: &[u8]) -> Result<Self> {
        let mut scanner = ChunkScanner::new(container)?;
        let mut chunks = Vec::new();

        for chunk in scanner.by_ref() {
            let chunk = chunk?;
            let keyword = chunk
                .text()
                .map(|text| text.keyword.iter().map(|&b| b as char).collect());
            chunks.push(ChunkInfo {
                range: ByteRange::new(chunk.offset(), chunk.span_len() as u64),
                chunk_type: chunk.chunk_type(),
                keyword,
                crc_valid: chunk.crc_matches(),
            });
        }

        let total_size = scanner
            .end_offset()
            .map(|end| end as u64)
            .unwrap_or(container.len() as u64);

        Ok(Self {
            chunks,
            total_size,
            trailing_size: scanner.trailing_len() as u64,
        })
    }

    /// Range of the signature
    pub fn signature_range(&self) -> ByteRange {
        ByteRange::new(0, PNG_SIGNATURE.len() as u64)
    }

    /// Indices of chunks with the given type
    pub fn indices_of(&self, chunk_type: ChunkType) -> Vec<usize> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.chunk_type == chunk_type)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of `tEXt` chunks whose keyword matches, ignoring ASCII case
    pub fn text_indices(&self, keyword: &str) -> Vec<usize> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.keyword
                    .as_deref()
                    .is_some_and(|k| k.eq_ignore_ascii_case(keyword))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Chunks whose stored CRC does not match their contents
    pub fn corrupt_chunks(&self) -> impl Iterator<Item = &ChunkInfo> {
        self.chunks.iter().filter(|c| !c.crc_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PngBuilder;

    #[test]
    fn test_parse_layout() {
        let data = PngBuilder::minimal()
            .text("Comment", b"hi")
            .text("CCV3", b"e30=")
            .idat(&[0u8; 10])
            .build();

        let structure = Structure::parse(&data).unwrap();
        assert_eq!(structure.chunks.len(), 5);
        assert_eq!(structure.total_size, data.len() as u64);
        assert_eq!(structure.trailing_size, 0);

        let first = &structure.chunks[0];
        assert_eq!(first.chunk_type, ChunkType::IHDR);
        assert_eq!(first.range, ByteRange::new(8, 25));
        assert_eq!(first.data_size(), 13);
        assert!(structure.signature_range().is_contiguous_with(&first.range));

        assert_eq!(structure.text_indices("ccv3"), vec![2]);
        assert_eq!(structure.indices_of(ChunkType::TEXT), vec![1, 2]);
        assert_eq!(structure.indices_of(ChunkType::IEND), vec![4]);
        assert_eq!(structure.corrupt_chunks().count(), 0);
    }

    #[test]
    fn test_parse_reports_bad_crc_and_trailing_bytes() {
        let mut data = PngBuilder::minimal()
            .chunk_with_crc(ChunkType(*b"tIME"), &[0u8; 7], 0xDEADBEEF)
            .build();
        data.extend_from_slice(b"xyz");

        let structure = Structure::parse(&data).unwrap();
        assert_eq!(structure.trailing_size, 3);
        assert_eq!(structure.total_size, data.len() as u64 - 3);

        let corrupt: Vec<_> = structure.corrupt_chunks().collect();
        assert_eq!(corrupt.len(), 1);
        assert_eq!(corrupt[0].chunk_type, ChunkType(*b"tIME"));
    }
}
