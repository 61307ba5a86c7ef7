// tests/filters/main.rs

mod parse_tests;
