//! # settle-chain — Synchronous Settlement Chains
//!
//! A settlement chain captures the outcome of a computation the way a
//! promise does, except that the computation runs to completion inside the
//! constructor and every continuation runs on the calling thread before the
//! call returns. There is no queue and no pending continuation.
//!
//! ## Surfaces
//!
//! - **Typed** (`chain.rs`): [`SettlementChain<T, E>`]. Arguments are
//!   closures checked by the compiler, so a missing or non-callable argument
//!   cannot be written. A transformation "throws" by returning `Err`.
//!
//! - **Dynamic** (`dynamic.rs`): [`DynChain`] over `serde_json::Value`
//!   payloads. Arguments arrive as [`Arg`], which may be missing or a plain
//!   value, so callability is checked at runtime and reported as
//!   [`ChainError::InvalidArgument`]. Used by the pipeline runner.
//!
//! ## Operators
//!
//! ```text
//!                   then(f)                    catch(g)
//! Fulfilled(v) ──▶ f(v): Ok(r) → Fulfilled(r)  ──▶ pass-through
//!                        Err(e) → Failed(e)
//! Failed(e)    ──▶ pass-through                ──▶ g(e): Ok(r) → Fulfilled(r)
//!                                                        Err(x) → Failed(x)
//! Unsettled    ──▶ IllegalState                ──▶ IllegalState
//! ```
//!
//! `finally(o)` is valid in every state. It hands `o` the current
//! [`Settlement`] and returns whatever `o` returns.

pub mod chain;
pub mod dynamic;

pub use chain::{Fail, Fulfill, SettlementChain};
pub use dynamic::{snapshot, Arg, Computation, DynChain, DynError, Observer, Transform};

pub use settle_core::{ChainError, Operation, Settlement, SettlementStatus};
