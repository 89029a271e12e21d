//! # Typed Settlement Chain
//!
//! [`SettlementChain<T, E>`] settles during construction and is never
//! mutated afterwards. `then` and `catch` consume the link they are called
//! on and return a new one, so a parent cannot change underneath a child.
//!
//! ## Resolution protocol
//!
//! The computation receives two callbacks, [`Fulfill`] and [`Fail`], that
//! borrow a settlement cell local to [`SettlementChain::new`]. They cannot
//! outlive the constructor. The first callback call settles the chain; any
//! later call is ignored. Returning `Err(e)` from the computation is a
//! synchronous throw and settles `Failed(e)` unless a callback got there
//! first.
//!
//! ```
//! use settle_chain::{Settlement, SettlementChain};
//!
//! let out = SettlementChain::<i64, String>::new(|fulfill, _fail| {
//!     fulfill(80);
//!     Ok(())
//! })
//! .then(|v| Ok::<_, String>(v * 3))
//! .unwrap()
//! .finally(|s| s);
//!
//! assert_eq!(out, Settlement::Fulfilled(240));
//! ```

use std::cell::RefCell;

use settle_core::{ChainError, Operation, Settlement, SettlementStatus};
use tracing::{debug, trace};

/// Callback that settles a chain as fulfilled. Valid only during construction.
pub type Fulfill<'a, T> = &'a dyn Fn(T);

/// Callback that settles a chain as failed. Valid only during construction.
pub type Fail<'a, E> = &'a dyn Fn(E);

/// One immutable link of a settlement chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementChain<T, E> {
    settlement: Settlement<T, E>,
}

impl<T, E> SettlementChain<T, E> {
    /// Run `computation` once, synchronously, and capture its outcome.
    ///
    /// The chain stays `Unsettled` if the computation neither calls a
    /// callback nor returns `Err`.
    pub fn new<F>(computation: F) -> Self
    where
        F: for<'a> FnOnce(Fulfill<'a, T>, Fail<'a, E>) -> Result<(), E>,
    {
        let cell = RefCell::new(Settlement::Unsettled);
        let fulfill = |value: T| settle(&cell, Settlement::Fulfilled(value));
        let fail = |reason: E| settle(&cell, Settlement::Failed(reason));

        if let Err(thrown) = computation(&fulfill, &fail) {
            trace!("resolution computation threw");
            settle(&cell, Settlement::Failed(thrown));
        }

        let settlement = cell.into_inner();
        trace!(status = %settlement.status(), "chain constructed");
        Self { settlement }
    }

    /// Wrap an existing settlement as a chain link.
    pub fn settled(settlement: Settlement<T, E>) -> Self {
        Self { settlement }
    }

    /// Status of this link.
    pub fn status(&self) -> SettlementStatus {
        self.settlement.status()
    }

    /// Whether this link has settled.
    pub fn is_settled(&self) -> bool {
        self.settlement.is_settled()
    }

    /// Read access to the settlement record.
    pub fn settlement(&self) -> &Settlement<T, E> {
        &self.settlement
    }

    /// Consume the link and return its settlement record.
    pub fn into_settlement(self) -> Settlement<T, E> {
        self.settlement
    }

    /// Fulfilled-step operator.
    ///
    /// On `Fulfilled(v)` calls `transform(v)`: `Ok(r)` settles the new link
    /// `Fulfilled(r)` and `Err(e)` settles it `Failed(e)`. On `Failed` the
    /// failure passes through untouched and `transform` is not called.
    ///
    /// # Errors
    ///
    /// [`ChainError::IllegalState`] if this link is unsettled.
    pub fn then<U, F>(self, transform: F) -> Result<SettlementChain<U, E>, ChainError>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        let next = match self.settlement {
            Settlement::Unsettled => return Err(unsettled(Operation::Then)),
            Settlement::Fulfilled(value) => {
                let next = Settlement::from(transform(value));
                trace!(status = %next.status(), "then applied");
                next
            }
            Settlement::Failed(reason) => {
                trace!("then passed failure through");
                Settlement::Failed(reason)
            }
        };
        Ok(SettlementChain::settled(next))
    }

    /// Failed-step operator.
    ///
    /// On `Failed(e)` calls `transform(e)`: `Ok(r)` recovers the new link to
    /// `Fulfilled(r)` and `Err(x)` settles it `Failed(x)`. On `Fulfilled`
    /// the value passes through untouched and `transform` is not called.
    ///
    /// # Errors
    ///
    /// [`ChainError::IllegalState`] if this link is unsettled.
    pub fn catch<E2, F>(self, transform: F) -> Result<SettlementChain<T, E2>, ChainError>
    where
        F: FnOnce(E) -> Result<T, E2>,
    {
        let next = match self.settlement {
            Settlement::Unsettled => return Err(unsettled(Operation::Catch)),
            Settlement::Fulfilled(value) => {
                trace!("catch passed value through");
                Settlement::Fulfilled(value)
            }
            Settlement::Failed(reason) => {
                let next = Settlement::from(transform(reason));
                trace!(status = %next.status(), "catch applied");
                next
            }
        };
        Ok(SettlementChain::settled(next))
    }

    /// Terminal observer. Valid in every state, including `Unsettled`.
    ///
    /// Calls `observer` exactly once with the current settlement and returns
    /// its result verbatim. Nothing the observer does is trapped.
    pub fn finally<R, F>(self, observer: F) -> R
    where
        F: FnOnce(Settlement<T, E>) -> R,
    {
        trace!(status = %self.settlement.status(), "finally observing chain");
        observer(self.settlement)
    }
}

impl<T, E> From<Settlement<T, E>> for SettlementChain<T, E> {
    fn from(settlement: Settlement<T, E>) -> Self {
        Self::settled(settlement)
    }
}

/// First call wins; later calls are dropped.
fn settle<T, E>(cell: &RefCell<Settlement<T, E>>, next: Settlement<T, E>) {
    let mut current = cell.borrow_mut();
    if current.is_settled() {
        debug!(
            settled = %current.status(),
            ignored = %next.status(),
            "ignoring settlement of an already settled chain"
        );
        return;
    }
    *current = next;
}

fn unsettled(operation: Operation) -> ChainError {
    ChainError::IllegalState {
        operation,
        status: SettlementStatus::Unsettled,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
