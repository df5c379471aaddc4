//! Integration tests for the catalog pages.
//!
//! These drive a running server over HTTP. Start one (with a migrated
//! database) and run: `cargo test -- --ignored`

mod catalog_tests;
