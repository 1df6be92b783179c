#![no_main]

use libfuzzer_sys::fuzz_target;
use saga_errors::{definitions, ErrorHandler, GameError, HandlerConfig};

fuzz_target!(|data: &[u8]| {
    let details = String::from_utf8_lossy(data).into_owned();
    let err = GameError::event(definitions::EVT_OUTCOME_INVALID, "apply_outcome", details)
        .with_metadata("raw_len", data.len().to_string());

    let mut line = String::new();
    err.internal_log().write_to(&mut line).unwrap();
    assert!(line.len() < 4096);

    let handler = ErrorHandler::new(HandlerConfig::default().with_history_capacity(4));
    let shown = handler.handle_error(&err, "fuzz", "");
    assert!(!shown.is_empty());

    for entry in handler.recent_errors(1) {
        assert!(!entry.description.contains('\n'));
    }
});
