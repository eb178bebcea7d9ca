//! PNG chunk framing
//!
//! A chunk is `length (u32 BE) ‖ type (4 bytes) ‖ data ‖ crc (u32 BE)`, with the
//! CRC computed over `type ‖ data`. Decoded chunks borrow from the input buffer
//! and keep their raw span so callers can copy them without re-serializing.

use crate::{
    crc::Crc32,
    error::{Error, Result},
};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::fmt;
use std::io::Write;

/// PNG signature
pub const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Largest data length a chunk may declare (2^31 - 1)
pub const MAX_CHUNK_LENGTH: usize = 0x7FFF_FFFF;

/// Length field + type field
const CHUNK_HEADER_SIZE: usize = 8;

/// Trailing CRC field
const CHUNK_CRC_SIZE: usize = 4;

/// Four-byte chunk type tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    pub const IEND: ChunkType = ChunkType(*b"IEND");
    pub const TEXT: ChunkType = ChunkType(*b"tEXt");

    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Critical chunks have an uppercase first letter
    pub fn is_critical(&self) -> bool {
        self.0[0].is_ascii_uppercase()
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// A chunk decoded in place from a container buffer
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    offset: u64,
    chunk_type: ChunkType,
    data: &'a [u8],
    crc: u32,
    raw: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Offset of the length field in the container
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    /// Chunk data (without length, type or CRC)
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The full record exactly as it appears in the container
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Total byte span: length + type + data + CRC
    pub fn span_len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_terminal(&self) -> bool {
        self.chunk_type == ChunkType::IEND
    }

    /// Recompute the CRC over `type ‖ data` and compare it with the stored one
    pub fn crc_matches(&self) -> bool {
        chunk_crc(self.chunk_type, self.data) == self.crc
    }

    /// Interpret this chunk as a `tEXt` chunk
    pub fn text(&self) -> Option<TextChunk<'a>> {
        (self.chunk_type == ChunkType::TEXT).then(|| TextChunk::parse(self.data))
    }
}

/// Decode the chunk starting at `offset`
///
/// Returns the chunk and the offset just past it. Fails with
/// [`Error::Truncated`] when the header, data or CRC would run past the end of
/// `buffer`.
pub fn decode_chunk_at(buffer: &[u8], offset: usize) -> Result<(Chunk<'_>, usize)> {
    let truncated = || Error::Truncated {
        offset: offset as u64,
    };

    let remaining = buffer.get(offset..).ok_or_else(truncated)?;
    if remaining.len() < CHUNK_HEADER_SIZE {
        return Err(truncated());
    }

    let data_len = BigEndian::read_u32(&remaining[0..4]) as usize;
    let total = data_len
        .checked_add(CHUNK_HEADER_SIZE + CHUNK_CRC_SIZE)
        .ok_or_else(truncated)?;
    if remaining.len() < total {
        return Err(truncated());
    }

    let chunk_type = ChunkType([remaining[4], remaining[5], remaining[6], remaining[7]]);
    let data_end = CHUNK_HEADER_SIZE + data_len;
    let chunk = Chunk {
        offset: offset as u64,
        chunk_type,
        data: &remaining[CHUNK_HEADER_SIZE..data_end],
        crc: BigEndian::read_u32(&remaining[data_end..total]),
        raw: &remaining[..total],
    };

    Ok((chunk, offset + total))
}

/// CRC of a chunk: `type ‖ data`
pub fn chunk_crc(chunk_type: ChunkType, data: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(data);
    hasher.finalize()
}

/// Write a PNG chunk with proper CRC
pub fn write_chunk<W: Write>(writer: &mut W, chunk_type: ChunkType, data: &[u8]) -> Result<()> {
    if data.len() > MAX_CHUNK_LENGTH {
        return Err(Error::DataTooLarge {
            size: data.len(),
            max: MAX_CHUNK_LENGTH,
        });
    }

    writer.write_u32::<BigEndian>(data.len() as u32)?;
    writer.write_all(chunk_type.as_bytes())?;
    writer.write_all(data)?;
    writer.write_u32::<BigEndian>(chunk_crc(chunk_type, data))?;

    Ok(())
}

/// Build a complete chunk record in memory
pub fn encode_chunk(chunk_type: ChunkType, data: &[u8]) -> Result<Vec<u8>> {
    let mut record = Vec::with_capacity(CHUNK_HEADER_SIZE + data.len() + CHUNK_CRC_SIZE);
    write_chunk(&mut record, chunk_type, data)?;
    Ok(record)
}

/// `tEXt` chunk data: `keyword NUL text`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    pub keyword: &'a [u8],
    pub text: &'a [u8],
}

impl<'a> TextChunk<'a> {
    /// Split `tEXt` data at the first NUL
    ///
    /// Data without a NUL is all keyword and has empty text.
    pub fn parse(data: &'a [u8]) -> Self {
        match data.iter().position(|&b| b == 0) {
            Some(nul) => Self {
                keyword: &data[..nul],
                text: &data[nul + 1..],
            },
            None => Self {
                keyword: data,
                text: &[],
            },
        }
    }

    /// ASCII case-insensitive keyword comparison
    pub fn keyword_is(&self, keyword: &str) -> bool {
        self.keyword.eq_ignore_ascii_case(keyword.as_bytes())
    }

    /// Keyword as Latin-1 text, lowercased for comparisons
    pub fn keyword_lowercase(&self) -> String {
        self.keyword
            .iter()
            .map(|&b| b.to_ascii_lowercase() as char)
            .collect()
    }

    /// Build `tEXt` chunk data
    pub fn encode(keyword: &str, text: &[u8]) -> Vec<u8> {
        let mut data = Vec::with_capacity(keyword.len() + 1 + text.len());
        data.extend_from_slice(keyword.as_bytes());
        data.push(0);
        data.extend_from_slice(text);
        data
    }
}
