#![no_main]

use card_io::{read_card, remove_card, write_card, write_card_with, DualEmbed, RewriteOptions};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let card = json!({"spec": "chara_card_v3", "name": "fuzz"});

    // Any input that rewrites must read back the card it was given
    if let Ok(output) = write_card(data, &card) {
        assert_eq!(read_card(&output).ok().flatten(), Some(card.clone()));

        // Rewriting again is stable
        let again = write_card(&output, &card).expect("rewritten output is valid");
        assert_eq!(again, output);
    }

    let options = RewriteOptions::new()
        .strip_keyword("Comment")
        .dual_embed(DualEmbed::Always);
    let _ = write_card_with(data, &card, &options);
    let _ = remove_card(data, &options);
});
