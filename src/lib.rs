//! Byte-exact PNG chunk rewriting for embedded character-card metadata.
//!
//! A character card is a PNG whose `tEXt` chunks carry a base64-encoded JSON
//! document. This crate replaces that document without touching any other
//! chunk: pixel data, ancillary chunks and their CRCs are copied verbatim.
//!
//! # Design Principles
//!
//! - **In-memory**: Operates on a byte slice, no I/O in the core
//! - **Zero-copy**: Pass-through chunks are borrowed spans of the input
//! - **Exact**: New chunks always get a freshly computed CRC
//!
//! # Quick Start
//!
//! ```no_run
//! use card_io::{read_card, write_card};
//! use serde_json::json;
//!
//! # fn main() -> card_io::Result<()> {
//! let original = std::fs::read("card.png")?;
//!
//! let card = json!({"spec": "chara_card_v3", "name": "Ada"});
//! let updated = write_card(&original, &card)?;
//!
//! assert_eq!(read_card(&updated)?, Some(card));
//! # Ok(())
//! # }
//! ```
//!
//! # Lower-Level API
//!
//! ```no_run
//! use card_io::{rewrite_text_chunks, ChunkScanner};
//!
//! # fn main() -> card_io::Result<()> {
//! let original = std::fs::read("image.png")?;
//!
//! for chunk in ChunkScanner::new(&original)? {
//!     let chunk = chunk?;
//!     println!("{} at {}", chunk.chunk_type(), chunk.offset());
//! }
//!
//! let strip = vec!["comment".to_string()];
//! let rewrite = rewrite_text_chunks(&original, &strip, &[("Comment", b"hello")])?;
//! let mut output = std::fs::File::create("output.png")?;
//! rewrite.write_to(&mut output)?;
//! # Ok(())
//! # }
//! ```

pub mod card;
mod chunk;
mod crc;
mod error;
mod rewrite;
mod scanner;
mod structure;

pub use chunk::{
    chunk_crc, decode_chunk_at, encode_chunk, write_chunk, Chunk, ChunkType, TextChunk,
    MAX_CHUNK_LENGTH, PNG_SIGNATURE,
};
pub use crc::{crc32, Crc32};
pub use error::{Error, Result};
pub use rewrite::{rewrite_text_chunks, Rewrite};
pub use scanner::{check_signature, ChunkScanner};
pub use structure::{ByteRange, ChunkInfo, Structure};

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use card::{CCV3_KEYWORD, CHARA_KEYWORD, LEGACY_SPEC};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Write;

/// When to write the legacy `chara` chunk next to `ccv3`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DualEmbed {
    /// Only when the card's `spec` equals the legacy spec identifier (default)
    #[default]
    Auto,
    /// Always write both chunks
    Always,
    /// Only write `ccv3`
    Never,
}

/// Options for rewriting card chunks
///
/// The default strips every `tEXt` chunk keyed `ccv3` or `chara` (any case)
/// and writes the legacy chunk only for `chara_card_v2` cards.
///
/// # Example
///
/// ```
/// use card_io::{DualEmbed, RewriteOptions};
///
/// let options = RewriteOptions::new()
///     .strip_keyword("TavernCard")
///     .dual_embed(DualEmbed::Never);
/// assert!(options.strip_keywords().contains(&"taverncard".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Lowercased keywords whose `tEXt` chunks are removed
    strip: Vec<String>,

    /// `spec` value that triggers the legacy chunk under [`DualEmbed::Auto`]
    legacy_spec: String,

    dual_embed: DualEmbed,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            strip: vec![CCV3_KEYWORD.to_string(), CHARA_KEYWORD.to_string()],
            legacy_spec: LEGACY_SPEC.to_string(),
            dual_embed: DualEmbed::Auto,
        }
    }
}

impl RewriteOptions {
    /// Create options with the standard keyword set
    pub fn new() -> Self {
        Self::default()
    }

    /// Also remove `tEXt` chunks with this keyword (matched case-insensitively)
    pub fn strip_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        let keyword = keyword.as_ref().to_ascii_lowercase();
        if !self.strip.contains(&keyword) {
            self.strip.push(keyword);
        }
        self
    }

    /// Change the `spec` value that triggers dual embedding
    pub fn legacy_spec(mut self, spec: impl Into<String>) -> Self {
        self.legacy_spec = spec.into();
        self
    }

    /// Override when the legacy chunk is written
    pub fn dual_embed(mut self, dual_embed: DualEmbed) -> Self {
        self.dual_embed = dual_embed;
        self
    }

    /// Keywords that will be stripped, lowercased
    pub fn strip_keywords(&self) -> &[String] {
        &self.strip
    }

    /// Keywords to write for `card`, in output order
    pub fn keywords_for(&self, card: &Value) -> Vec<&'static str> {
        let dual = match self.dual_embed {
            DualEmbed::Auto => card::has_spec(card, &self.legacy_spec),
            DualEmbed::Always => true,
            DualEmbed::Never => false,
        };
        if dual {
            vec![CCV3_KEYWORD, CHARA_KEYWORD]
        } else {
            vec![CCV3_KEYWORD]
        }
    }
}

/// Replace the card stored in a PNG
///
/// Removes every existing `ccv3`/`chara` text chunk and inserts the new card
/// immediately before IEND. All other chunks are copied byte-for-byte.
///
/// # Errors
/// - [`Error::InvalidSignature`]: the buffer is not a PNG
/// - [`Error::Truncated`]: a chunk runs past the end of the buffer
/// - [`Error::MissingTerminalChunk`]: the buffer ends without IEND
pub fn write_card(container: &[u8], card: &Value) -> Result<Vec<u8>> {
    write_card_with(container, card, &RewriteOptions::default())
}

/// [`write_card`] with explicit options
pub fn write_card_with(
    container: &[u8],
    card: &Value,
    options: &RewriteOptions,
) -> Result<Vec<u8>> {
    Ok(plan_card(container, card, options)?.to_vec())
}

/// [`write_card_with`] streaming the result into `writer`
///
/// Nothing is written if the container is rejected.
pub fn write_card_to<W: Write>(
    container: &[u8],
    card: &Value,
    options: &RewriteOptions,
    writer: &mut W,
) -> Result<()> {
    plan_card(container, card, options)?.write_to(writer)
}

fn plan_card<'a>(
    container: &'a [u8],
    card: &Value,
    options: &RewriteOptions,
) -> Result<Rewrite<'a>> {
    let payload = card::encode_payload(card)?;
    let inserts: Vec<(&str, &[u8])> = options
        .keywords_for(card)
        .into_iter()
        .map(|keyword| (keyword, payload.as_bytes()))
        .collect();
    rewrite_text_chunks(container, options.strip_keywords(), &inserts)
}

/// Remove the stored card without inserting a new one
pub fn remove_card(container: &[u8], options: &RewriteOptions) -> Result<Vec<u8>> {
    Ok(rewrite_text_chunks(container, options.strip_keywords(), &[])?.to_vec())
}

/// Read the card stored in a PNG
///
/// Prefers the `ccv3` chunk and falls back to `chara`; keywords are matched
/// case-insensitively. Returns `Ok(None)` when neither is present.
pub fn read_card(container: &[u8]) -> Result<Option<Value>> {
    read_card_as(container)
}

/// [`read_card`] deserializing into a caller-provided type
pub fn read_card_as<T: DeserializeOwned>(container: &[u8]) -> Result<Option<T>> {
    let mut ccv3 = None;
    let mut chara = None;

    for chunk in ChunkScanner::new(container)? {
        let chunk = chunk?;
        let Some(text) = chunk.text() else {
            continue;
        };
        if ccv3.is_none() && text.keyword_is(CCV3_KEYWORD) {
            ccv3 = Some(text.text);
        } else if chara.is_none() && text.keyword_is(CHARA_KEYWORD) {
            chara = Some(text.text);
        }
    }

    ccv3.or(chara)
        .map(card::decode_payload_as::<T>)
        .transpose()
}

/// Every `tEXt` keyword/text pair in the container, in order
pub fn text_chunks(container: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut pairs = Vec::new();
    for chunk in ChunkScanner::new(container)? {
        let chunk = chunk?;
        if let Some(text) = chunk.text() {
            let keyword: String = text.keyword.iter().map(|&b| b as char).collect();
            pairs.push((keyword, text.text.to_vec()));
        }
    }
    Ok(pairs)
}
