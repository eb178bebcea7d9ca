#![no_main]

use card_io::{read_card, text_chunks, ChunkScanner, Structure};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary input should NEVER panic, only return errors
    if let Ok(scanner) = ChunkScanner::new(data) {
        for chunk in scanner {
            match chunk {
                Ok(chunk) => {
                    let _ = chunk.crc_matches();
                    let _ = chunk.text();
                }
                Err(_) => break,
            }
        }
    }

    let _ = Structure::parse(data);
    let _ = text_chunks(data);
    let _ = read_card(data);
});
