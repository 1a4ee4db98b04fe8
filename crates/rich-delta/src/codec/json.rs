//! JSON codec for deltas.
//!
//! A delta encodes as `{"ops": [...]}` where each record carries exactly one
//! of `insert` (string or embed object), `delete` or `retain` (positive
//! integers), plus `attributes` when the op has any. Decoding also accepts a
//! bare array of records.
//!
//! Decoded ops are taken as-is; they are not re-canonicalized.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::attributes::AttributeMap;
use crate::delta::Delta;
use crate::error::DeltaError;
use crate::op::{InsertValue, Op};

const OP_KEYS: [&str; 3] = ["insert", "delete", "retain"];

fn invalid(index: usize, reason: impl Into<String>) -> DeltaError {
    let reason = reason.into();
    debug!(index, %reason, "rejecting malformed delta op");
    DeltaError::InvalidOp { index, reason }
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Encode a single op as a record.
pub fn op_to_json(op: &Op) -> Value {
    let mut record = Map::new();
    match op {
        Op::Insert { value, .. } => {
            let value = match value {
                InsertValue::Text(text) => Value::String(text.clone()),
                InsertValue::Embed(embed) => embed.clone(),
            };
            record.insert("insert".into(), value);
        }
        Op::Delete(length) => {
            record.insert("delete".into(), json!(length));
        }
        Op::Retain { length, .. } => {
            record.insert("retain".into(), json!(length));
        }
    }
    if let Some(attributes) = op.attributes().filter(|a| !a.is_empty()) {
        record.insert("attributes".into(), Value::Object(attributes.clone()));
    }
    Value::Object(record)
}

pub fn to_json(delta: &Delta) -> Value {
    let ops: Vec<Value> = delta.ops().iter().map(op_to_json).collect();
    json!({ "ops": ops })
}

// ── Deserialization ───────────────────────────────────────────────────────

fn decode_length(index: usize, key: &str, value: &Value) -> Result<usize, DeltaError> {
    value
        .as_u64()
        .filter(|length| *length > 0)
        .and_then(|length| usize::try_from(length).ok())
        .ok_or_else(|| invalid(index, format!("{key} must be a positive integer")))
}

fn decode_attributes(index: usize, value: Option<&Value>) -> Result<Option<AttributeMap>, DeltaError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(attributes)) if attributes.is_empty() => Ok(None),
        Some(Value::Object(attributes)) => Ok(Some(attributes.clone())),
        Some(_) => Err(invalid(index, "attributes must be an object")),
    }
}

/// Decode the record at position `index` of an ops array.
pub fn op_from_json(index: usize, value: &Value) -> Result<Op, DeltaError> {
    let record = value
        .as_object()
        .ok_or_else(|| invalid(index, "op must be an object"))?;
    let present: Vec<&str> = OP_KEYS
        .into_iter()
        .filter(|key| record.contains_key(*key))
        .collect();
    let [key] = present.as_slice() else {
        return Err(invalid(
            index,
            "op must have exactly one of insert, delete, retain",
        ));
    };
    let attributes = decode_attributes(index, record.get("attributes"))?;
    let value = &record[*key];

    match *key {
        "insert" => match value {
            Value::String(text) if text.is_empty() => Err(invalid(index, "insert text is empty")),
            Value::String(text) => Ok(Op::insert(text.clone(), attributes)),
            Value::Object(_) => Ok(Op::insert_embed(value.clone(), attributes)),
            _ => Err(invalid(index, "insert must be a string or an embed object")),
        },
        "delete" => {
            if attributes.is_some() {
                return Err(invalid(index, "delete cannot carry attributes"));
            }
            Ok(Op::delete(decode_length(index, "delete", value)?))
        }
        _ => Ok(Op::retain(decode_length(index, "retain", value)?, attributes)),
    }
}

/// Decode a delta from `{"ops": [...]}` or a bare array of records.
pub fn from_json(value: &Value) -> Result<Delta, DeltaError> {
    let ops = match value {
        Value::Array(ops) => ops,
        Value::Object(object) => object
            .get("ops")
            .and_then(Value::as_array)
            .ok_or_else(|| DeltaError::InvalidOps("missing 'ops' array".into()))?,
        Value::Null => return Err(DeltaError::InvalidOps("ops cannot be null".into())),
        _ => return Err(DeltaError::InvalidOps("ops must be an array".into())),
    };
    let ops = ops
        .iter()
        .enumerate()
        .map(|(index, record)| op_from_json(index, record))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Delta::from_ops(ops))
}

// ── Trait glue ────────────────────────────────────────────────────────────

impl Serialize for Delta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Delta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Delta {
    type Err = DeltaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)?;
        from_json(&value)
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_json(self))
    }
}
