use anyhow::Result;
use serde_json::{Map, Value as Json};

use crate::value::types::{Record, Value};

/// Member naming the type of a constructor-style object.
pub const CLASS_KEY: &str = "__class__";
/// Sole member of an object that stands for a tuple.
pub const TUPLE_KEY: &str = "__tuple__";

/// Parses a JSON document into a renderable value.
pub fn parse_str(input: &str) -> Result<Value> {
    let json: Json = serde_json::from_str(input)
        .map_err(|e| anyhow::anyhow!("Failed to parse JSON document: {}", e))?;
    Ok(from_json(json))
}

pub fn from_json(json: Json) -> Value {
    match json {
        Json::Null => Value::None,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::Str(s),
        Json::Array(items) => Value::list(items.into_iter().map(from_json).collect()),
        Json::Object(map) => from_json_object(map),
    }
}

fn from_json_object(mut map: Map<String, Json>) -> Value {
    if map.len() == 1 {
        if let Some(Json::Array(_)) = map.get(TUPLE_KEY) {
            if let Some(Json::Array(items)) = map.remove(TUPLE_KEY) {
                return Value::tuple(items.into_iter().map(from_json).collect());
            }
        }
    }

    if let Some(Json::String(_)) = map.get(CLASS_KEY) {
        if let Some(Json::String(name)) = map.remove(CLASS_KEY) {
            let record = map
                .into_iter()
                .fold(Record::new(name), |record, (key, value)| {
                    record.with_param(key, from_json(value))
                });
            return Value::object(record);
        }
    }

    Value::dict(map.into_iter().map(|(key, value)| (key, from_json(value))))
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        from_json(json)
    }
}
