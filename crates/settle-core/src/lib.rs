//! # settle-core — Foundational Types for Settlement Chains
//!
//! Defines the state record every settlement chain carries and the errors
//! its operators can raise. Every other crate in the workspace depends on
//! `settle-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One closed settlement enum.** `Settlement<T, E>` has exactly three
//!    variants (`Unsettled`, `Fulfilled`, `Failed`). There is no transitional
//!    "settling" state, and every consumer matches exhaustively.
//!
//! 2. **The value lives inside the variant.** An unsettled record has no
//!    payload to observe, so "value while unsettled" cannot be read by mistake.
//!
//! 3. **Snapshot shape is the serde shape.** A settlement serializes as
//!    `{"status": "...", "value": ...}`, which is the record handed to a
//!    terminal observer.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `settle-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod settlement;

pub use error::{ChainError, Operation};
pub use settlement::{Settlement, SettlementStatus};
