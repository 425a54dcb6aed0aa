//! Result Codec Module
//!
//! Converts result tuples to and from a JSON array, the text format stored by
//! remote backends.

use serde_json::{Number, Value};

use crate::cache::{CacheValue, Signature, ValueKind};
use crate::error::{CacheError, Result};

// == Serialize ==
/// Encodes an ordered result tuple as a JSON array.
///
/// Fails with [`CacheError::Encode`] if a float is NaN or infinite, since JSON
/// has no representation for those.
pub fn serialize(values: &[CacheValue]) -> Result<String> {
    let array = values.iter().map(to_json).collect::<Result<Vec<_>>>()?;
    serde_json::to_string(&Value::Array(array)).map_err(|e| CacheError::Encode(e.to_string()))
}

// == Deserialize ==
/// Decodes a JSON array back into typed values, one per signature position.
pub fn deserialize(text: &str, signature: &Signature) -> Result<Vec<CacheValue>> {
    let items: Vec<Value> = serde_json::from_str(text)?;

    if items.len() != signature.len() {
        return Err(CacheError::ArityMismatch {
            expected: signature.len(),
            actual: items.len(),
        });
    }

    items
        .into_iter()
        .zip(signature.kinds())
        .enumerate()
        .map(|(position, (item, kind))| {
            from_json(item, kind)
                .map_err(|e| CacheError::Decode(format!("position {}: {}", position, e)))
        })
        .collect()
}

fn to_json(value: &CacheValue) -> Result<Value> {
    Ok(match value {
        CacheValue::Null => Value::Null,
        CacheValue::Bool(v) => Value::Bool(*v),
        CacheValue::Int(v) => Value::from(*v),
        CacheValue::UInt(v) => Value::from(*v),
        CacheValue::Float(v) => Number::from_f64(*v)
            .map(Value::Number)
            .ok_or_else(|| CacheError::Encode(format!("float {} is not representable", v)))?,
        CacheValue::Str(v) => Value::String(v.clone()),
        CacheValue::Bytes(v) => Value::Array(v.iter().map(|b| Value::from(*b)).collect()),
        CacheValue::List(items) => Value::Array(items.iter().map(to_json).collect::<Result<_>>()?),
    })
}

// Errors here carry only the detail; `deserialize` prefixes the position.
fn from_json(value: Value, kind: &ValueKind) -> std::result::Result<CacheValue, String> {
    match (kind, value) {
        (ValueKind::Optional(_), Value::Null) => Ok(CacheValue::Null),
        (ValueKind::Optional(inner), other) => from_json(other, inner),
        (ValueKind::Any, other) => natural(other),
        (ValueKind::Bool, Value::Bool(v)) => Ok(CacheValue::Bool(v)),
        (ValueKind::Int, Value::Number(n)) => n
            .as_i64()
            .map(CacheValue::Int)
            .ok_or_else(|| format!("{} does not fit a signed integer", n)),
        (ValueKind::UInt, Value::Number(n)) => n
            .as_u64()
            .map(CacheValue::UInt)
            .ok_or_else(|| format!("{} does not fit an unsigned integer", n)),
        (ValueKind::Float, Value::Number(n)) => n
            .as_f64()
            .map(CacheValue::Float)
            .ok_or_else(|| format!("{} is not a float", n)),
        (ValueKind::Str, Value::String(v)) => Ok(CacheValue::Str(v)),
        (ValueKind::Bytes, Value::Array(items)) => items
            .into_iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| format!("{} is not a byte", item))
            })
            .collect::<std::result::Result<Vec<u8>, String>>()
            .map(CacheValue::Bytes),
        (ValueKind::Tuple(kinds), Value::Array(items)) => {
            if items.len() != kinds.len() {
                return Err(format!(
                    "expected {} list elements, found {}",
                    kinds.len(),
                    items.len()
                ));
            }
            items
                .into_iter()
                .zip(kinds)
                .map(|(item, kind)| from_json(item, kind))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(CacheValue::List)
        }
        (ValueKind::List(inner), Value::Array(items)) => items
            .into_iter()
            .map(|item| from_json(item, inner))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(CacheValue::List),
        (kind, other) => Err(format!("expected {:?}, found {}", kind, other)),
    }
}

fn natural(value: Value) -> std::result::Result<CacheValue, String> {
    match value {
        Value::Null => Ok(CacheValue::Null),
        Value::Bool(v) => Ok(CacheValue::Bool(v)),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(CacheValue::Int(v))
            } else if let Some(v) = n.as_u64() {
                Ok(CacheValue::UInt(v))
            } else {
                n.as_f64()
                    .map(CacheValue::Float)
                    .ok_or_else(|| format!("{} is not a number", n))
            }
        }
        Value::String(v) => Ok(CacheValue::Str(v)),
        Value::Array(items) => items
            .into_iter()
            .map(natural)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(CacheValue::List),
        Value::Object(_) => Err("objects are not supported".to_string()),
    }
}
