//! JSON rendition of host terms, used by the CLI to replay scripts stored on disk.
//!
//! | JSON                     | Term                      |
//! |--------------------------|---------------------------|
//! | `null` / `true` / `false`| atom `nil` / `true` / `false` |
//! | integer / float          | `Int` / `Float`           |
//! | string                   | `Binary` (UTF-8)          |
//! | array                    | `List`                    |
//! | `{"atom": "x"}`          | `Atom`                    |
//! | `{"tuple": [..]}`        | `Tuple`                   |
//! | any other object         | `Map` with atom keys      |

use serde_json::{Map, Value, json};

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::term::value::Term;

/// Convert a JSON value to a term.
pub fn term_from_json(value: &Value) -> BridgeResult<Term> {
    Ok(match value {
        Value::Null => Term::nil(),
        Value::Bool(b) => Term::bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Term::Int(i)
            } else if let Some(f) = n.as_f64() {
                Term::Float(f)
            } else {
                return Err(BridgeError::bad_argument(format!(
                    "number {n} does not fit a host integer"
                )));
            }
        }
        Value::String(s) => Term::string(s.as_str()),
        Value::Array(items) => Term::List(
            items
                .iter()
                .map(term_from_json)
                .collect::<BridgeResult<Vec<_>>>()?,
        ),
        Value::Object(obj) => object_to_term(obj)?,
    })
}

fn object_to_term(obj: &Map<String, Value>) -> BridgeResult<Term> {
    if obj.len() == 1 {
        if let Some(Value::String(name)) = obj.get("atom") {
            return Ok(Term::atom(name.as_str()));
        }
        if let Some(Value::Array(items)) = obj.get("tuple") {
            return Ok(Term::Tuple(
                items
                    .iter()
                    .map(term_from_json)
                    .collect::<BridgeResult<Vec<_>>>()?,
            ));
        }
    }
    let mut entries = Vec::with_capacity(obj.len());
    for (k, v) in obj {
        entries.push((Term::atom(k.as_str()), term_from_json(v)?));
    }
    Ok(Term::Map(entries))
}

/// Convert a term to JSON. Handles render as `{"handle": {...}}`.
pub fn term_to_json(term: &Term) -> Value {
    match term {
        Term::Int(i) => json!(i),
        Term::Float(f) => json!(f),
        Term::Atom(a) => match a.as_str() {
            "nil" => Value::Null,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => json!({ "atom": a }),
        },
        Term::Binary(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => Value::String(s.to_owned()),
            Err(_) => json!({ "binary_len": bytes.len() }),
        },
        Term::Tuple(items) => json!({ "tuple": items.iter().map(term_to_json).collect::<Vec<_>>() }),
        Term::List(items) => Value::Array(items.iter().map(term_to_json).collect()),
        Term::Map(entries) => {
            let mut obj = Map::new();
            for (k, v) in entries {
                let key = match k {
                    Term::Atom(a) => a.clone(),
                    other => term_to_json(other).to_string(),
                };
                obj.insert(key, term_to_json(v));
            }
            Value::Object(obj)
        }
        Term::Resource(h) => json!({ "handle": h }),
    }
}

/// Parse a script: a JSON array of `["name", arg, ...]` entries.
pub fn script_from_json(value: &Value) -> BridgeResult<Vec<Term>> {
    let Value::Array(entries) = value else {
        return Err(BridgeError::bad_argument("script must be a JSON array"));
    };
    let mut script = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let Value::Array(parts) = entry else {
            return Err(BridgeError::bad_argument(format!(
                "script entry {i} must be an array"
            )));
        };
        let Some(Value::String(name)) = parts.first() else {
            return Err(BridgeError::bad_argument(format!(
                "script entry {i} must start with a command name"
            )));
        };
        let mut items = Vec::with_capacity(parts.len());
        items.push(Term::atom(name.as_str()));
        for p in &parts[1..] {
            items.push(term_from_json(p)?);
        }
        script.push(Term::Tuple(items));
    }
    Ok(script)
}

#[cfg(test)]
#[path = "../../tests/unit/term/json.rs"]
mod tests;
