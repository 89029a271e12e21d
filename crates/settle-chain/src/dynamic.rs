//! # Dynamic Settlement Chain
//!
//! [`DynChain`] is the runtime-checked counterpart of
//! [`SettlementChain`](crate::SettlementChain), for callers whose
//! arguments are data rather than code (pipeline documents, scripting
//! hosts). Payloads are `serde_json::Value`, and every argument is an
//! [`Arg`] that may turn out to be missing or not callable.
//!
//! ## Validation order
//!
//! The argument is checked before the settlement is inspected, so
//! `then(Arg::Missing)` on an unsettled chain reports `InvalidArgument`, not
//! `IllegalState`.

use std::fmt;

use serde_json::{json, Value};
use settle_core::{ChainError, Operation, Settlement, SettlementStatus};
use thiserror::Error;

use crate::chain::{Fail, Fulfill, SettlementChain};

/// Boxed resolution computation for [`DynChain::new`].
pub type Computation<'f> =
    Box<dyn for<'a> FnOnce(Fulfill<'a, Value>, Fail<'a, Value>) -> Result<(), Value> + 'f>;

/// Boxed transformation for [`DynChain::then`] and [`DynChain::catch`].
pub type Transform<'f> = Box<dyn FnOnce(Value) -> Result<Value, Value> + 'f>;

/// Boxed terminal observer for [`DynChain::finally`]. `Err` is a throw.
pub type Observer<'f> = Box<dyn FnOnce(Settlement<Value, Value>) -> Result<Value, Value> + 'f>;

/// An argument whose callability is only known at runtime.
pub enum Arg<F> {
    /// No argument was supplied.
    Missing,
    /// A plain value was supplied where a callable was expected.
    Value(Value),
    /// A callable.
    Callable(F),
}

impl<F> Arg<F> {
    fn into_callable(self, operation: Operation) -> Result<F, ChainError> {
        match self {
            Self::Callable(f) => Ok(f),
            Self::Missing => Err(ChainError::InvalidArgument {
                operation,
                found: "nothing",
            }),
            Self::Value(value) => Err(ChainError::InvalidArgument {
                operation,
                found: kind_of(&value),
            }),
        }
    }
}

impl<'f> Arg<Computation<'f>> {
    /// Box a resolution computation.
    pub fn computation<F>(f: F) -> Self
    where
        F: for<'a> FnOnce(Fulfill<'a, Value>, Fail<'a, Value>) -> Result<(), Value> + 'f,
    {
        Self::Callable(Box::new(f))
    }
}

impl<'f> Arg<Transform<'f>> {
    /// Box a transformation.
    pub fn transform<F>(f: F) -> Self
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'f,
    {
        Self::Callable(Box::new(f))
    }
}

impl<'f> Arg<Observer<'f>> {
    /// Box a terminal observer.
    pub fn observer<F>(f: F) -> Self
    where
        F: FnOnce(Settlement<Value, Value>) -> Result<Value, Value> + 'f,
    {
        Self::Callable(Box::new(f))
    }
}

impl<F> From<Value> for Arg<F> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl<F> fmt::Debug for Arg<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Errors from [`DynChain::finally`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynError {
    /// The call itself was rejected.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// The observer threw; `finally` does not trap it.
    #[error("finally observer threw {0}")]
    Thrown(Value),
}

/// A settlement chain link over JSON payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct DynChain {
    inner: SettlementChain<Value, Value>,
}

impl DynChain {
    /// Construct a chain by running `computation` once.
    ///
    /// # Errors
    ///
    /// [`ChainError::InvalidArgument`] if `computation` is not callable.
    pub fn new(computation: Arg<Computation<'_>>) -> Result<Self, ChainError> {
        let computation = computation.into_callable(Operation::Construct)?;
        Ok(Self {
            inner: SettlementChain::new(computation),
        })
    }

    /// Fulfilled-step operator; see [`SettlementChain::then`].
    ///
    /// # Errors
    ///
    /// [`ChainError::InvalidArgument`] for a non-callable `transform`, then
    /// [`ChainError::IllegalState`] if this link is unsettled.
    pub fn then(self, transform: Arg<Transform<'_>>) -> Result<Self, ChainError> {
        let transform = transform.into_callable(Operation::Then)?;
        self.inner.then(transform).map(Self::from)
    }

    /// Failed-step operator; see [`SettlementChain::catch`].
    ///
    /// # Errors
    ///
    /// [`ChainError::InvalidArgument`] for a non-callable `transform`, then
    /// [`ChainError::IllegalState`] if this link is unsettled.
    pub fn catch(self, transform: Arg<Transform<'_>>) -> Result<Self, ChainError> {
        let transform = transform.into_callable(Operation::Catch)?;
        self.inner.catch(transform).map(Self::from)
    }

    /// Terminal observer; returns the observer's value verbatim.
    ///
    /// # Errors
    ///
    /// [`DynError::Chain`] for a non-callable `observer`, or
    /// [`DynError::Thrown`] carrying whatever the observer threw.
    pub fn finally(self, observer: Arg<Observer<'_>>) -> Result<Value, DynError> {
        let observer = observer.into_callable(Operation::Finally)?;
        self.inner.finally(observer).map_err(DynError::Thrown)
    }

    /// Status of this link.
    pub fn status(&self) -> SettlementStatus {
        self.inner.status()
    }

    /// Read access to the settlement record.
    pub fn settlement(&self) -> &Settlement<Value, Value> {
        self.inner.settlement()
    }

    /// This link's `{status, value}` snapshot.
    pub fn snapshot(&self) -> Value {
        snapshot(self.inner.settlement())
    }

    /// Unwrap into the typed chain.
    pub fn into_inner(self) -> SettlementChain<Value, Value> {
        self.inner
    }
}

impl From<SettlementChain<Value, Value>> for DynChain {
    fn from(inner: SettlementChain<Value, Value>) -> Self {
        Self { inner }
    }
}

/// Render a settlement as its `{status, value}` snapshot.
///
/// `value` is null while unsettled.
pub fn snapshot(settlement: &Settlement<Value, Value>) -> Value {
    let status = settlement.status().name();
    match settlement {
        Settlement::Unsettled => json!({ "status": status, "value": null }),
        Settlement::Fulfilled(value) | Settlement::Failed(value) => {
            json!({ "status": status, "value": value })
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
