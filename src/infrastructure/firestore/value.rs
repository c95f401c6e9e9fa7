//! Conversion between plain JSON and Firestore's typed REST `Value` encoding.

use serde_json::{Map, Value as JsonValue, json};

use crate::application::ports::link_document_store::DocumentData;

pub fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                // int64 travels as a decimal string
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(data: &DocumentData) -> JsonValue {
    JsonValue::Object(
        data.iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

pub fn decode_value(value: &JsonValue) -> anyhow::Result<JsonValue> {
    let Some(obj) = value.as_object() else {
        anyhow::bail!("firestore value is not an object: {value}");
    };
    let Some((kind, inner)) = obj.iter().next() else {
        anyhow::bail!("firestore value has no type tag");
    };
    let out = match kind.as_str() {
        "nullValue" => JsonValue::Null,
        "booleanValue" => JsonValue::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => {
            let i = match inner {
                JsonValue::String(s) => s
                    .parse::<i64>()
                    .map_err(|e| anyhow::anyhow!("bad integerValue '{s}': {e}"))?,
                other => other
                    .as_i64()
                    .ok_or_else(|| anyhow::anyhow!("bad integerValue {other}"))?,
            };
            JsonValue::from(i)
        }
        // NaN and infinities arrive as strings and have no JSON form.
        "doubleValue" => inner
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "mapValue" => JsonValue::Object(decode_fields(inner.get("fields"))?),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(JsonValue::as_array)
                .map(|vs| vs.iter().map(decode_value).collect::<anyhow::Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            JsonValue::Array(values)
        }
        other => anyhow::bail!("unsupported firestore value type {other}"),
    };
    Ok(out)
}

/// Decodes a `fields` object; a missing object means an empty map.
pub fn decode_fields(fields: Option<&JsonValue>) -> anyhow::Result<DocumentData> {
    let mut out = Map::new();
    if let Some(JsonValue::Object(fields)) = fields {
        for (k, v) in fields {
            out.insert(k.clone(), decode_value(v)?);
        }
    }
    Ok(out)
}
