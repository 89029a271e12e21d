//! # settle-cli — Pipeline Runner
//!
//! Drives a [`settle_chain::DynChain`] from a YAML or JSON pipeline
//! document and reports the terminal `{status, value}` snapshot.
//!
//! ## Modules
//!
//! - `ops` — the small vocabulary of value operations a step can apply.
//! - `pipeline` — the document model and its execution.
//! - `run` — the `settle run` subcommand: loading, rendering, exit codes.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; chain semantics live in
//!   `settle-chain`. Nothing here re-implements settlement rules.

pub mod ops;
pub mod pipeline;
pub mod run;
