//! # Multi-Step Pipeline Scenarios
//!
//! End-to-end chains mixing `then`, `catch`, thrown values, and recovery.
//! Payloads are JSON values so a link can change payload shape the way a
//! loosely typed pipeline does (number to string and back).

use serde_json::{json, Value};
use settle_chain::{snapshot, Arg, DynChain, Settlement, SettlementChain};

type Chain = SettlementChain<Value, Value>;

fn resolve(value: Value) -> Chain {
    Chain::new(move |fulfill, _| {
        fulfill(value);
        Ok(())
    })
}

fn reject(value: Value) -> Chain {
    Chain::new(move |_, fail| {
        fail(value);
        Ok(())
    })
}

fn int(v: &Value) -> i64 {
    v.as_i64().expect("integer payload")
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[test]
fn resolve_then_finally() {
    let out = resolve(json!(80))
        .then(|v| Ok(json!(int(&v) * 3)))
        .unwrap()
        .finally(|s| s);
    assert_eq!(out, Settlement::Fulfilled(json!(240)));
}

#[test]
fn reject_then_catch_finally_skips_then_and_recovers() {
    let out = reject(json!(80))
        .then(|_| Ok(json!("doh")))
        .unwrap()
        .catch(|v| Ok::<_, Value>(json!(int(&v) * 3)))
        .unwrap()
        .finally(|s| s);
    assert_eq!(out, Settlement::Fulfilled(json!(240)));
}

#[test]
fn resolve_catch_then_finally_skips_catch() {
    let out = resolve(json!(145))
        .catch(|_| Ok::<_, Value>(json!("err")))
        .unwrap()
        .then(|v| Ok(json!(int(&v) + 3)))
        .unwrap()
        .finally(|s| s);
    assert_eq!(out, Settlement::Fulfilled(json!(148)));
}

#[test]
fn thrown_values_alternate_with_recovery() {
    let out = resolve(json!(2))
        .catch(|_| Ok::<_, Value>(json!(0)))
        .unwrap()
        .then(|v| Err::<Value, _>(json!("err".repeat(int(&v) as usize))))
        .unwrap()
        .catch(|v| Ok::<_, Value>(json!(format!("{}6", text(&v)))))
        .unwrap()
        .then(|v| Err::<Value, _>(json!(format!("!{}", text(&v)))))
        .unwrap()
        .finally(|s| s);
    assert_eq!(out, Settlement::Failed(json!("!errerr6")));
}

#[test]
fn reject_through_four_links_ends_lowercase() {
    let out = reject(json!(5))
        .then(|v| Ok(json!(format!("{}#", text(&v)))))
        .unwrap()
        .catch(|v| Ok::<_, Value>(json!(int(&v) - 1)))
        .unwrap()
        .then(|v| Err::<Value, _>(json!(format!("{}H", text(&v)))))
        .unwrap()
        .catch(|v| Ok::<_, Value>(json!(text(&v).to_lowercase())))
        .unwrap()
        .finally(|s| snapshot(&s));
    assert_eq!(out, json!({"status": "Fulfilled", "value": "4h"}));
}

#[test]
fn dynamic_chain_runs_same_pipeline() {
    let out = DynChain::new(Arg::computation(|_, fail| {
        fail(json!(5));
        Ok(())
    }))
    .and_then(|c| c.then(Arg::transform(|v| Ok(json!(format!("{}#", text(&v)))))))
    .and_then(|c| c.catch(Arg::transform(|v| Ok(json!(int(&v) - 1)))))
    .and_then(|c| c.then(Arg::transform(|v| Err(json!(format!("{}H", text(&v)))))))
    .and_then(|c| c.catch(Arg::transform(|v| Ok(json!(text(&v).to_lowercase())))))
    .unwrap()
    .finally(Arg::observer(|s| Ok(snapshot(&s))))
    .unwrap();
    assert_eq!(out, json!({"status": "Fulfilled", "value": "4h"}));
}

#[test]
fn error_from_computation_reaches_catch() {
    let err = json!({"message": "¯\\_(ツ)_/¯"});
    let expected = err.clone();
    let out = Chain::new(move |_, _| Err(err))
        .then(|_| Ok(json!("unreachable")))
        .unwrap()
        .catch(|e| Ok::<_, Value>(e["message"].clone()))
        .unwrap()
        .finally(|s| s);
    assert_eq!(out, Settlement::Fulfilled(expected["message"].clone()));
}
