//! Safety tests - malformed containers must fail cleanly, never panic
//!
//! Comprehensive testing should be done with fuzzing (cargo-fuzz).

use card_io::{
    read_card, test_utils::*, write_card, ChunkScanner, ChunkType, Error, Structure,
    MAX_CHUNK_LENGTH, PNG_SIGNATURE,
};
use serde_json::json;

#[test]
fn test_max_chunk_length_constant() {
    assert_eq!(MAX_CHUNK_LENGTH, (1usize << 31) - 1);
}

#[test]
fn test_empty_input() {
    assert!(matches!(
        write_card(&[], &json!({})),
        Err(Error::InvalidSignature { .. })
    ));
    assert!(matches!(read_card(&[]), Err(Error::InvalidSignature { .. })));
}

#[test]
fn test_signature_only() {
    assert!(matches!(
        write_card(PNG_SIGNATURE, &json!({})),
        Err(Error::MissingTerminalChunk { offset: 8 })
    ));
}

#[test]
fn test_huge_declared_length() {
    // Claims 4 GiB of data in a tiny buffer
    let mut input = PNG_SIGNATURE.to_vec();
    input.extend_from_slice(&u32::MAX.to_be_bytes());
    input.extend_from_slice(b"IDAT");
    input.extend_from_slice(&[0u8; 16]);

    assert!(matches!(
        write_card(&input, &json!({})),
        Err(Error::Truncated { offset: 8 })
    ));
}

#[test]
fn test_partial_chunk_header() {
    let mut input = minimal_png();
    input.truncate(input.len() - 12);
    input.extend_from_slice(&[0, 0, 0]);

    assert!(matches!(
        write_card(&input, &json!({})),
        Err(Error::Truncated { offset: 33 })
    ));
}

#[test]
fn test_every_truncation_fails_cleanly() {
    let input = PngBuilder::minimal()
        .text("Comment", b"hello")
        .idat(&[1; 10])
        .build();

    for len in 0..input.len() {
        let result = write_card(&input[..len], &json!({"name": "x"}));
        assert!(result.is_err(), "truncated at {len} should fail");
        let err = result.unwrap_err();
        assert!(
            matches!(
                err,
                Error::InvalidSignature { .. }
                    | Error::Truncated { .. }
                    | Error::MissingTerminalChunk { .. }
            ),
            "unexpected error at {len}: {err}"
        );
    }
}

#[test]
fn test_text_chunk_without_nul() {
    // A tEXt chunk that is all keyword: matches on the whole data
    let input = PngBuilder::minimal()
        .chunk(ChunkType::TEXT, b"chara")
        .chunk(ChunkType::TEXT, b"charabanc")
        .build();

    let output = write_card(&input, &json!({})).unwrap();
    let keywords: Vec<_> = card_io::text_chunks(&output)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(keywords, vec!["charabanc", "ccv3"]);
}

#[test]
fn test_undecodable_card_text() {
    let input = PngBuilder::minimal().text("ccv3", b"%%%").build();
    assert!(matches!(read_card(&input), Err(Error::Base64(_))));

    // Writing a new card replaces it regardless
    let output = write_card(&input, &json!({"ok": true})).unwrap();
    assert_eq!(read_card(&output).unwrap(), Some(json!({"ok": true})));
}

#[test]
fn test_non_ascii_keyword() {
    let input = PngBuilder::minimal()
        .chunk(ChunkType::TEXT, b"\xC7CV3\0x")
        .build();
    let output = write_card(&input, &json!({})).unwrap();

    // Latin-1 keyword is not a case variant of ccv3, so it stays
    let structure = Structure::parse(&output).unwrap();
    assert_eq!(structure.indices_of(ChunkType::TEXT).len(), 2);
}

#[test]
fn test_scanner_is_fused_after_error() {
    let input = PngBuilder::minimal().build_without_iend();
    let mut scanner = ChunkScanner::new(&input).unwrap();
    assert!(scanner.next().unwrap().is_ok());
    assert!(scanner.next().unwrap().is_err());
    assert!(scanner.next().is_none());
    assert!(scanner.next().is_none());
}
