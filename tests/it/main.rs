//! Single test binary entry point.
//!
//! All integration tests compile into one binary, which keeps link time down.
//!
//! Structure:
//! - helpers: Page builders and drawing shortcuts shared by the tests
//! - integration: Multi-component workflow tests
//! - unit: Single-component unit tests

mod unit;
