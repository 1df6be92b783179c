#![no_main]

use libfuzzer_sys::fuzz_target;
use saga_errors::{validate_input, validate_option};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // First line is the player's answer, the rest are the offered options.
    let mut lines = text.split('\n');
    let answer = lines.next().unwrap_or("");
    let options: Vec<&str> = lines.collect();

    for allow_empty in [false, true] {
        let accepted = validate_input(answer, &options, allow_empty);
        let expected = options.contains(&answer) || (answer.is_empty() && allow_empty);
        assert_eq!(accepted, expected);
        match validate_option(answer, &options, allow_empty) {
            Ok(Some(index)) => {
                assert!(accepted);
                assert_eq!(options[index], answer);
            }
            Ok(None) => assert!(accepted && answer.is_empty() && allow_empty && !options.contains(&"")),
            Err(_) => assert!(!accepted),
        }
    }
});
