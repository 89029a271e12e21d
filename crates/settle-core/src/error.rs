//! # Error Types — Chain Misuse
//!
//! Defines the only two errors a settlement chain surfaces to its caller.
//! Both are programmer errors raised synchronously by the operation that
//! detected them, and neither is ever recovered internally.
//!
//! ## Design
//!
//! - Failures of a computation or transformation are NOT errors here. They
//!   are folded into `Settlement::Failed` and observed through the chain.
//! - Every variant names the operation that rejected the call so a misuse
//!   deep inside a pipeline can be located from the message alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settlement::SettlementStatus;

/// The chain operation that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Construction with a resolution computation.
    Construct,
    /// The fulfilled-step operator.
    Then,
    /// The failed-step operator.
    Catch,
    /// The terminal observer.
    Finally,
}

impl Operation {
    /// Returns the operation name as written in a pipeline.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Construct => "construct",
            Self::Then => "then",
            Self::Catch => "catch",
            Self::Finally => "finally",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised synchronously by chain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The operation was given no argument, or an argument that cannot be called.
    #[error("{operation}: expected a callable argument, found {found}")]
    InvalidArgument {
        /// Operation that rejected the argument.
        operation: Operation,
        /// Kind of the value that was supplied instead ("nothing" when omitted).
        found: &'static str,
    },

    /// A continuation was attached to a chain that has not settled.
    #[error("{operation}: chain is {status}; continuations require a settled chain")]
    IllegalState {
        /// Operation that was attempted.
        operation: Operation,
        /// Status of the chain at the time of the call.
        status: SettlementStatus,
    },
}

impl ChainError {
    /// The operation that raised this error.
    pub fn operation(&self) -> Operation {
        match self {
            Self::InvalidArgument { operation, .. } | Self::IllegalState { operation, .. } => {
                *operation
            }
        }
    }
}
