//! # Settlement State
//!
//! The three-state record carried by every chain link.
//!
//! ```text
//! Unsettled ──fulfill(v)──▶ Fulfilled(v)
//!     │
//!     └──────fail(e)──────▶ Failed(e)
//! ```
//!
//! A record moves out of `Unsettled` at most once. The chain types in
//! `settle-chain` never mutate a settled record; each operator builds a new
//! one.
//!
//! ## Snapshot shape
//!
//! A record renders as the snapshot handed to a terminal observer. Both
//! keys are always present; an unsettled record has a null `value`:
//!
//! ```text
//! {"status": "Fulfilled", "value": 240}
//! {"status": "Failed", "value": "!errerr6"}
//! {"status": "Unsettled", "value": null}
//! ```

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Status tag of a settlement, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementStatus {
    /// No settlement callback has been called yet.
    Unsettled,
    /// Settled with a success payload.
    Fulfilled,
    /// Settled with a failure payload.
    Failed,
}

impl SettlementStatus {
    /// Returns the canonical status name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unsettled => "Unsettled",
            Self::Fulfilled => "Fulfilled",
            Self::Failed => "Failed",
        }
    }

    /// Whether the status is one of the two settled variants.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unsettled)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The outcome of a computation: unsettled, or settled exactly once.
///
/// `T` is the success payload and `E` the failure payload. The failure
/// payload is whatever was passed to the fail callback or thrown, and need
/// not implement `std::error::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "status", content = "value")]
pub enum Settlement<T, E> {
    /// Not settled; carries no value.
    Unsettled,
    /// Settled successfully.
    Fulfilled(T),
    /// Settled with a failure.
    Failed(E),
}

impl<T, E> Default for Settlement<T, E> {
    fn default() -> Self {
        Self::Unsettled
    }
}

impl<T: Serialize, E: Serialize> Serialize for Settlement<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut snapshot = serializer.serialize_struct("Settlement", 2)?;
        snapshot.serialize_field("status", &self.status())?;
        match self {
            Self::Unsettled => snapshot.serialize_field("value", &None::<()>)?,
            Self::Fulfilled(value) => snapshot.serialize_field("value", value)?,
            Self::Failed(reason) => snapshot.serialize_field("value", reason)?,
        }
        snapshot.end()
    }
}

impl<T, E> Settlement<T, E> {
    /// Returns the status tag of this settlement.
    pub fn status(&self) -> SettlementStatus {
        match self {
            Self::Unsettled => SettlementStatus::Unsettled,
            Self::Fulfilled(_) => SettlementStatus::Fulfilled,
            Self::Failed(_) => SettlementStatus::Failed,
        }
    }

    /// Whether the record has left `Unsettled`.
    pub fn is_settled(&self) -> bool {
        self.status().is_settled()
    }

    /// The success payload, if fulfilled.
    pub fn fulfilled(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    /// The failure payload, if failed.
    pub fn failed(&self) -> Option<&E> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Borrow both payloads.
    pub fn as_ref(&self) -> Settlement<&T, &E> {
        match self {
            Self::Unsettled => Settlement::Unsettled,
            Self::Fulfilled(value) => Settlement::Fulfilled(value),
            Self::Failed(reason) => Settlement::Failed(reason),
        }
    }

    /// Converts a settled record into a `Result`; `None` while unsettled.
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Self::Unsettled => None,
            Self::Fulfilled(value) => Some(Ok(value)),
            Self::Failed(reason) => Some(Err(reason)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => Self::Fulfilled(value),
            Err(reason) => Self::Failed(reason),
        }
    }
}
