// tests/admission/fixtures/logging.rs

// install a subscriber once so `debug!` output shows up with --nocapture
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
