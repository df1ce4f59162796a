//! Input boundary: JSON → typed snapshot / prior state
//!
//! Absent fields (and explicit nulls) become neutral defaults. A field that is
//! present with the wrong shape rejects the whole input, naming the deepest
//! offending path, e.g. `worldEvents[1].severity`. Nothing is evaluated on
//! rejected input.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::evaluate::ShockDetector;
use crate::error::ShockError;
use crate::types::{Evaluation, PriorCycleState, SignalSnapshot};

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

fn render(prefix: Option<&str>, path: &[Segment]) -> String {
    let mut out = prefix.unwrap_or_default().to_string();
    for seg in path {
        match seg {
            Segment::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            Segment::Index(i) => out.push_str(&format!("[{}]", i)),
        }
    }
    out
}

/// Wrap `leaf` so it sits alone at `path` inside an otherwise empty document
fn isolate(path: &[Segment], leaf: &Value) -> Value {
    path.iter().rev().fold(leaf.clone(), |inner, seg| match seg {
        Segment::Key(k) => {
            let mut map = serde_json::Map::new();
            map.insert(k.clone(), inner);
            Value::Object(map)
        }
        Segment::Index(_) => Value::Array(vec![inner]),
    })
}

/// Deepest path whose value alone still fails to deserialize as `T`
fn locate<T: DeserializeOwned>(path: &mut Vec<Segment>, value: &Value) -> Option<(Vec<Segment>, String)> {
    let err = serde_json::from_value::<T>(isolate(path, value)).err()?;

    let children: Vec<(Segment, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (Segment::Key(k.clone()), v)).collect(),
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (Segment::Index(i), v)).collect(),
        _ => Vec::new(),
    };
    for (seg, child) in children {
        path.push(seg);
        let found = locate::<T>(path, child);
        path.pop();
        if found.is_some() {
            return found;
        }
    }
    Some((path.clone(), err.to_string()))
}

/// Remove null-valued object entries, recursively
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn parse_object<T: DeserializeOwned>(value: &Value, root: &str, prefix: Option<&str>) -> Result<T, ShockError> {
    if !value.is_object() {
        return Err(ShockError::malformed(root, format!("expected an object, got {}", kind(value))));
    }
    let mut value = value.clone();
    strip_nulls(&mut value);

    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let (path, message) = locate::<T>(&mut Vec::new(), &value).unwrap_or((Vec::new(), err.to_string()));
            let field = if path.is_empty() {
                root.to_string()
            } else {
                render(prefix, &path)
            };
            tracing::warn!(%field, %message, "rejected malformed input");
            Err(ShockError::malformed(field, message))
        }
    }
}

/// Parse a signal snapshot
pub fn parse_snapshot(value: &Value) -> Result<SignalSnapshot, ShockError> {
    let snapshot: SignalSnapshot = parse_object(value, "snapshot", None)?;

    if let Some(month) = snapshot.calendar.month {
        if !(1..=12).contains(&month) {
            tracing::warn!(month, "rejected malformed input");
            return Err(ShockError::malformed("month", format!("expected 1..12, got {}", month)));
        }
    }
    Ok(snapshot)
}

/// Parse a prior cycle state; `null` is the same as no prior
pub fn parse_prior(value: &Value) -> Result<PriorCycleState, ShockError> {
    if value.is_null() {
        return Ok(PriorCycleState::default());
    }
    parse_object(value, "prior", Some("prior"))
}

/// Validate both inputs, then evaluate
pub fn evaluate_json(snapshot: &Value, prior: Option<&Value>) -> Result<Evaluation, ShockError> {
    let snapshot = parse_snapshot(snapshot)?;
    let prior = prior.map(parse_prior).transpose()?;
    Ok(ShockDetector::new().evaluate(&snapshot, prior.as_ref()))
}

// =============================================================================
// TESTS
// =============================================================================
