//! Tree Comprehensive Test Suite
//!
//! End-to-end tests for the nested-set document engine.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Scenarios**
//!   The canonical add / append / remove / update walkthroughs.
//!
//! - **Tier 2: Structural Invariants**
//!   Bounds, path uniqueness and array contiguity after every mutation.
//!
//! - **Tier 3: Update Semantics**
//!   In-place replacement keeps sibling order and array indices.
//!
//! - **Tier 4: Path Escaping**
//!   Keys containing `/` and `\` survive storage and lookup.
//!
//! - **Tier 5: Documents & Sessions**
//!   Registry lifecycle and current-document errors.
//!
//! - **Tier 6: Atomicity & Persistence**
//!   Failed calls leave no trace; committed data survives reopen; lock
//!   contention surfaces as `Busy`.
//!
//! - **Tier 7: Property-Based**
//!   Random operation sequences checked against an in-memory model.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test tree_comprehensive
//!
//! # Only the invariant tier
//! cargo test --test tree_comprehensive invariant
//!
//! # Slow tests
//! cargo test --test tree_comprehensive -- --ignored
//! ```



// Tier 2: Structural Invariants
mod array_tests;

// Tier 3: Update Semantics
mod update_tests;

// Tier 4: Path Escaping
mod escaping_tests;


mod persistence_tests;

// Tier 7: Property-Based
mod model_fuzzing;
