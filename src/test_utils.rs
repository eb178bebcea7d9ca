//! Test utilities for building PNG fixtures in memory.
//!
//! Card tests need small, precisely shaped containers (extra text chunks,
//! odd keyword casing, bad CRCs, missing IEND) rather than real images, so
//! fixtures are assembled chunk by chunk.
//!
//! # Usage
//!
//! ```
//! use card_io::test_utils::PngBuilder;
//!
//! let png = PngBuilder::minimal()
//!     .text("Comment", b"hello")
//!     .idat(&[0x78, 0x9c, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01])
//!     .build();
//! assert!(png.starts_with(card_io::PNG_SIGNATURE));
//! ```

use crate::{
    chunk::{chunk_crc, ChunkType, TextChunk, PNG_SIGNATURE},
    scanner::ChunkScanner,
};

/// IHDR data for a 1x1 8-bit RGB image
pub const IHDR_1X1_RGB: [u8; 13] = [
    0x00, 0x00, 0x00, 0x01, // Width: 1
    0x00, 0x00, 0x00, 0x01, // Height: 1
    0x08, // Bit depth: 8
    0x02, // Color type: RGB
    0x00, // Compression: deflate
    0x00, // Filter: adaptive
    0x00, // Interlace: none
];

/// Builder for in-memory PNG containers
#[derive(Debug, Clone, Default)]
pub struct PngBuilder {
    chunks: Vec<Vec<u8>>,
}

impl PngBuilder {
    /// A builder with no chunks at all
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder that starts with a 1x1 RGB IHDR
    pub fn minimal() -> Self {
        Self::new().chunk(ChunkType::IHDR, &IHDR_1X1_RGB)
    }

    /// Append a chunk with a correct CRC
    pub fn chunk(self, chunk_type: ChunkType, data: &[u8]) -> Self {
        let crc = chunk_crc(chunk_type, data);
        self.chunk_with_crc(chunk_type, data, crc)
    }

    /// Append a chunk with an arbitrary stored CRC
    pub fn chunk_with_crc(mut self, chunk_type: ChunkType, data: &[u8], crc: u32) -> Self {
        let mut record = Vec::with_capacity(12 + data.len());
        record.extend_from_slice(&(data.len() as u32).to_be_bytes());
        record.extend_from_slice(chunk_type.as_bytes());
        record.extend_from_slice(data);
        record.extend_from_slice(&crc.to_be_bytes());
        self.chunks.push(record);
        self
    }

    /// Append a `tEXt` chunk
    pub fn text(self, keyword: &str, text: &[u8]) -> Self {
        self.chunk(ChunkType::TEXT, &TextChunk::encode(keyword, text))
    }

    /// Append an IDAT chunk
    pub fn idat(self, data: &[u8]) -> Self {
        self.chunk(ChunkType::IDAT, data)
    }

    /// Signature, chunks and a final IEND
    pub fn build(self) -> Vec<u8> {
        self.chunk(ChunkType::IEND, &[]).build_without_iend()
    }

    /// Signature and chunks only
    pub fn build_without_iend(self) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        for record in &self.chunks {
            data.extend_from_slice(record);
        }
        data
    }
}

/// Signature + IHDR + IEND
pub fn minimal_png() -> Vec<u8> {
    PngBuilder::minimal().build()
}

/// Raw spans of every chunk in a container, up to and including IEND
///
/// Panics on malformed input; intended for assertions only.
pub fn chunk_spans(container: &[u8]) -> Vec<Vec<u8>> {
    ChunkScanner::new(container)
        .expect("valid signature")
        .map(|chunk| chunk.expect("well-formed chunk").raw().to_vec())
        .collect()
}

/// `(type, data)` of every chunk in a container
///
/// Panics on malformed input; intended for assertions only.
pub fn chunk_summary(container: &[u8]) -> Vec<(ChunkType, Vec<u8>)> {
    ChunkScanner::new(container)
        .expect("valid signature")
        .map(|chunk| {
            let chunk = chunk.expect("well-formed chunk");
            (chunk.chunk_type(), chunk.data().to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_png_bytes() {
        let png = minimal_png();
        assert_eq!(png.len(), 8 + 25 + 12);
        assert_eq!(&png[..8], PNG_SIGNATURE);
        // IHDR CRC for a 1x1 RGB image
        assert_eq!(&png[29..33], &[0x90, 0x77, 0x53, 0xde]);
        // IEND record
        assert_eq!(
            &png[33..],
            &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_build_without_iend() {
        let png = PngBuilder::minimal().build_without_iend();
        assert_eq!(png.len(), 8 + 25);
    }

    #[test]
    fn test_chunk_summary() {
        let png = PngBuilder::minimal().text("a", b"b").build();
        let summary = chunk_summary(&png);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[1], (ChunkType::TEXT, b"a\0b".to_vec()));
        assert_eq!(chunk_spans(&png).concat(), png[8..]);
    }
}
