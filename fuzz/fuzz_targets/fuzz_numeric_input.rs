#![no_main]

use libfuzzer_sys::fuzz_target;
use saga_errors::{validate_numeric_input, ValidationError};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (bounds, text) = data.split_at(2);
    let Ok(text) = std::str::from_utf8(text) else {
        return;
    };

    let min = i64::from(bounds[0] as i8);
    let max = i64::from(bounds[1] as i8);

    match validate_numeric_input(text, min, max) {
        Ok(value) => assert!(value >= min && value <= max),
        Err(ValidationError::Empty) => assert!(text.trim().is_empty()),
        Err(ValidationError::OutOfRange { value, .. }) => assert!(value < min || value > max),
        Err(ValidationError::EmptyRange { .. }) => assert!(min > max),
        Err(_) => {}
    }
});
