// tests/admission/fixtures/mod.rs

pub mod logging;
