//! Integration test crate for the Curio marketplace.
//!
//! This crate exists solely to run integration tests that span the ledger and
//! marketplace crates. It has no public API - all functionality is in the
//! test modules.

#![forbid(unsafe_code)]
