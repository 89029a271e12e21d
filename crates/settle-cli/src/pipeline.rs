//! # Pipeline Documents
//!
//! A pipeline is a seed computation followed by `then`/`catch` steps:
//!
//! ```yaml
//! seed: { fulfill: 2 }
//! steps:
//!   - catch: { op: replace, value: 0 }
//!   - then:  { op: repeat, text: "err", throws: true }
//!   - catch: { op: add, operand: 6 }
//!   - then:  { op: prefix, text: "!", throws: true }
//! ```
//!
//! Seeds and handlers are data, so they may not describe anything callable.
//! A handler that is not an operation map (a bare number, a string, a map
//! without `op`) is passed to the chain as a plain value and rejected there
//! with `InvalidArgument`, exactly as a non-callable argument would be.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use settle_chain::{snapshot, Arg, Computation, DynChain, Operation, SettlementStatus, Transform};
use tracing::debug;

use crate::ops::Op;

/// A complete pipeline document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pipeline {
    /// The resolution computation.
    pub seed: Seed,
    /// Steps applied in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// The seed of a pipeline: a described computation or a plain literal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    /// A computation the chain can run.
    Computation(SeedComputation),
    /// Anything else; not callable.
    Literal(Value),
}

/// What the seed computation does with its callbacks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedComputation {
    /// Call the fulfill callback with the value.
    Fulfill(Value),
    /// Call the fail callback with the value.
    Fail(Value),
    /// Throw the value without calling either callback.
    Throw(Value),
    /// Call nothing; the chain stays unsettled.
    Pending,
}

/// One chain operator and its handler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Fulfilled-step.
    Then(Handler),
    /// Failed-step.
    Catch(Handler),
}

/// The argument of a step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Handler {
    /// An operation, optionally turned into a throw.
    Op(OpHandler),
    /// Anything else; not callable.
    Literal(Value),
}

/// An operation handler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpHandler {
    /// The operation to apply.
    #[serde(flatten)]
    pub op: Op,
    /// Throw the operation's result instead of returning it.
    #[serde(default)]
    pub throws: bool,
}

/// The result of running a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Snapshot of every link, seed first.
    pub links: Vec<Value>,
    /// Status of the last link.
    pub status: SettlementStatus,
    /// What the terminal observer returned.
    pub terminal: Value,
}

impl Pipeline {
    /// Parse a YAML or JSON pipeline document.
    ///
    /// The document is read into a JSON value first so that steps written as
    /// single-key maps (`- then: {...}`) resolve to their enum variants.
    pub fn parse(source: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(source).context("invalid pipeline document")?;
        serde_json::from_value(document).context("invalid pipeline document")
    }

    /// Build the chain link by link and observe the last one.
    ///
    /// # Errors
    ///
    /// Fails on the first `InvalidArgument` or `IllegalState`, naming the
    /// step. Failures inside operations are not errors; they settle the
    /// chain `Failed`.
    pub fn execute(&self) -> Result<Outcome> {
        let mut chain = DynChain::new(self.seed.to_arg()).context("seed")?;
        debug!(status = %chain.status(), "seed settled");
        let mut links = vec![chain.snapshot()];

        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            let operation = step.operation();
            chain = match step {
                Step::Then(handler) => chain.then(handler.to_arg()),
                Step::Catch(handler) => chain.catch(handler.to_arg()),
            }
            .with_context(|| format!("step {number} ({operation})"))?;
            debug!(step = number, %operation, status = %chain.status(), "link settled");
            links.push(chain.snapshot());
        }

        let status = chain.status();
        let terminal = chain
            .finally(Arg::observer(|s| Ok(snapshot(&s))))
            .context("finally")?;
        Ok(Outcome {
            links,
            status,
            terminal,
        })
    }
}

impl Seed {
    /// The chain argument this seed stands for.
    pub fn to_arg(&self) -> Arg<Computation<'static>> {
        match self {
            Self::Literal(value) => Arg::Value(value.clone()),
            Self::Computation(computation) => {
                let computation = computation.clone();
                Arg::computation(move |fulfill, fail| match computation {
                    SeedComputation::Fulfill(value) => {
                        fulfill(value);
                        Ok(())
                    }
                    SeedComputation::Fail(value) => {
                        fail(value);
                        Ok(())
                    }
                    SeedComputation::Throw(value) => Err(value),
                    SeedComputation::Pending => Ok(()),
                })
            }
        }
    }
}

impl Step {
    /// The chain operation this step invokes.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Then(_) => Operation::Then,
            Self::Catch(_) => Operation::Catch,
        }
    }
}

impl Handler {
    /// The chain argument this handler stands for.
    pub fn to_arg(&self) -> Arg<Transform<'static>> {
        match self {
            Self::Literal(value) => Arg::Value(value.clone()),
            Self::Op(handler) => {
                let OpHandler { op, throws } = handler.clone();
                Arg::transform(move |input| {
                    let output = op.apply(input)?;
                    if throws {
                        Err(output)
                    } else {
                        Ok(output)
                    }
                })
            }
        }
    }
}
