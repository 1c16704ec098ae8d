//! Integration test suite for depstage
//!
//! End-to-end tests that run the `depstage` binary against a temporary
//! project and an offline local Maven repository.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **stage**: copying, unpacking, mappings, entry patterns and skip
//! - **plan**: text and JSON plans, `-D` overrides, scope policies
//! - **check**: configuration validation
//! - **errors**: resolution and extraction failures

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod check;
mod errors;
mod plan;
mod stage;
