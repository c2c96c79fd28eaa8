//! # Deed-Chain Test Suite
//!
//! Unified test crate exercising the full protocol stack in-process:
//! initiator and responder services over the in-memory transport, the
//! notary with real signature verification, and vault updates driven by
//! the finality broadcast.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs   # Issue/transfer lifecycle scenarios
//!     └── conflict.rs    # Double-spend races
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dc-tests
//! cargo test -p dc-tests integration::scenarios::
//! ```

#![allow(dead_code)]

pub mod integration;

/// Opt-in log capture for debugging a failing scenario:
/// `RUST_LOG=debug cargo test -p dc-tests -- --nocapture`
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
