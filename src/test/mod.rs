// Test utilities shared across unit tests (and integration tests via the `test-utils` feature)
pub mod utils;
