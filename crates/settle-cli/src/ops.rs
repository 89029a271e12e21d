//! # Step Operations
//!
//! The operations a pipeline step can apply to the payload it receives.
//! Payloads are JSON values and the arithmetic is loose in the way script
//! pipelines expect: `add` sums two numbers but concatenates as soon as
//! either side is not a number, and `lowercase` stringifies first.
//!
//! An operation that cannot apply to its input (multiplying a string, a
//! negative or oversized repeat count) throws an error message, which the chain folds
//! into its failure branch like any other throw.

use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};

/// Longest string `repeat` may produce, in bytes.
pub const MAX_REPEAT_LEN: usize = 1 << 24;

/// A single value operation, tagged by `op` in pipeline documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Numeric sum, or string concatenation if either side is not a number.
    Add {
        /// Right-hand side.
        operand: Value,
    },
    /// Numeric product.
    Multiply {
        /// Right-hand side.
        by: Value,
    },
    /// Prepend `text` to the stringified input.
    Prefix {
        /// Text placed before the input.
        text: String,
    },
    /// Repeat `text` as many times as the input says.
    Repeat {
        /// Text to repeat.
        text: String,
    },
    /// Stringify then lowercase.
    Lowercase,
    /// Ignore the input and produce `value`.
    Replace {
        /// Constant result.
        value: Value,
    },
}

impl Op {
    /// Apply the operation. `Err` carries the thrown message.
    pub fn apply(&self, input: Value) -> Result<Value, Value> {
        match self {
            Self::Add { operand } => add(&input, operand),
            Self::Multiply { by } => multiply(&input, by),
            Self::Prefix { text } => Ok(Value::String(format!("{text}{}", stringify(&input)))),
            Self::Repeat { text } => {
                let count = input
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| thrown(format!("invalid repeat count {input}")))?;
                text.len()
                    .checked_mul(count)
                    .filter(|len| *len <= MAX_REPEAT_LEN)
                    .ok_or_else(|| thrown(format!("repeat count {count} exceeds maximum string length")))?;
                Ok(Value::String(text.repeat(count)))
            }
            Self::Lowercase => Ok(Value::String(stringify(&input).to_lowercase())),
            Self::Replace { value } => Ok(value.clone()),
        }
    }

    /// Name of the operation as written in documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Multiply { .. } => "multiply",
            Self::Prefix { .. } => "prefix",
            Self::Repeat { .. } => "repeat",
            Self::Lowercase => "lowercase",
            Self::Replace { .. } => "replace",
        }
    }
}

/// Render a payload the way string concatenation sees it.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn add(lhs: &Value, rhs: &Value) -> Result<Value, Value> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => {
            if let Some(sum) = a.as_i64().zip(b.as_i64()).and_then(|(a, b)| a.checked_add(b)) {
                return Ok(json!(sum));
            }
            float(as_f64(a) + as_f64(b))
        }
        _ => Ok(Value::String(format!("{}{}", stringify(lhs), stringify(rhs)))),
    }
}

fn multiply(lhs: &Value, rhs: &Value) -> Result<Value, Value> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => {
            if let Some(product) = a.as_i64().zip(b.as_i64()).and_then(|(a, b)| a.checked_mul(b)) {
                return Ok(json!(product));
            }
            float(as_f64(a) * as_f64(b))
        }
        _ => Err(thrown(format!("cannot multiply {lhs} by {rhs}"))),
    }
}

fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn float(x: f64) -> Result<Value, Value> {
    Number::from_f64(x)
        .map(Value::Number)
        .ok_or_else(|| thrown(format!("result {x} is not a finite number")))
}

fn thrown(message: String) -> Value {
    Value::String(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sums_numbers() {
        let op = Op::Add { operand: json!(3) };
        assert_eq!(op.apply(json!(145)), Ok(json!(148)));
    }

    #[test]
    fn add_subtracts_with_negative_operand() {
        let op = Op::Add { operand: json!(-1) };
        assert_eq!(op.apply(json!(5)), Ok(json!(4)));
    }

    #[test]
    fn add_concatenates_when_either_side_is_text() {
        let op = Op::Add { operand: json!(6) };
        assert_eq!(op.apply(json!("errerr")), Ok(json!("errerr6")));
        let op = Op::Add { operand: json!("H") };
        assert_eq!(op.apply(json!(4)), Ok(json!("4H")));
    }

    #[test]
    fn add_mixes_integer_and_float() {
        let op = Op::Add { operand: json!(1.5) };
        assert_eq!(op.apply(json!(1)), Ok(json!(2.5)));
    }

    #[test]
    fn multiply_numbers() {
        let op = Op::Multiply { by: json!(3) };
        assert_eq!(op.apply(json!(80)), Ok(json!(240)));
    }

    #[test]
    fn multiply_text_throws() {
        let op = Op::Multiply { by: json!(3) };
        assert_eq!(op.apply(json!("doh")), Err(json!("cannot multiply \"doh\" by 3")));
    }

    #[test]
    fn repeat_uses_input_as_count() {
        let op = Op::Repeat { text: "err".into() };
        assert_eq!(op.apply(json!(2)), Ok(json!("errerr")));
        assert_eq!(op.apply(json!(0)), Ok(json!("")));
    }

    #[test]
    fn repeat_rejects_negative_count() {
        let op = Op::Repeat { text: "err".into() };
        assert!(op.apply(json!(-1)).is_err());
    }

    #[test]
    fn repeat_throws_when_result_too_long() {
        let op = Op::Repeat { text: "err".into() };
        let thrown = op.apply(json!(u64::MAX / 2)).unwrap_err();
        assert!(thrown.as_str().is_some_and(|m| m.contains("repeat count")));
        assert!(op.apply(json!(1_000_000_000u64)).is_err());
        assert!(op.apply(json!(MAX_REPEAT_LEN / 3)).is_ok());
    }

    #[test]
    fn repeat_allows_empty_text_at_any_count() {
        let op = Op::Repeat { text: String::new() };
        assert_eq!(op.apply(json!(u64::MAX / 2)), Ok(json!("")));
    }

    #[test]
    fn prefix_and_lowercase_stringify() {
        let prefix = Op::Prefix { text: "!".into() };
        assert_eq!(prefix.apply(json!("errerr6")), Ok(json!("!errerr6")));
        assert_eq!(Op::Lowercase.apply(json!("4H")), Ok(json!("4h")));
        assert_eq!(Op::Lowercase.apply(json!(true)), Ok(json!("true")));
    }

    #[test]
    fn replace_ignores_input() {
        let op = Op::Replace { value: json!("doh") };
        assert_eq!(op.apply(json!(80)), Ok(json!("doh")));
    }

    #[test]
    fn ops_deserialize_from_tagged_maps() {
        let op: Op = serde_json::from_value(json!({"op": "multiply", "by": 3})).unwrap();
        assert_eq!(op, Op::Multiply { by: json!(3) });
        let op: Op = serde_json::from_value(json!({"op": "lowercase"})).unwrap();
        assert_eq!(op.name(), "lowercase");
    }
}
