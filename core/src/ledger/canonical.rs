use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

// Canonical JSON for hashing:
// - UTF-8, no BOM
// - keys sorted lexicographically
// - no insignificant whitespace
// - strings JSON-escaped per RFC 8259 (serde_json handles)
// - numbers: integers only (no floats), base-10
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    let normalized = normalize_value(v)?;
    let s = serde_json::to_string(&normalized)?;
    Ok(s.into_bytes())
}

fn normalize_value(v: Value) -> CoreResult<Value> {
    match v {
        Value::Object(map) => {
            let mut btm: BTreeMap<String, Value> = BTreeMap::new();
            for (k, vv) in map {
                btm.insert(k, normalize_value(vv)?);
            }
            // serde_json::Map preserves insertion order; rebuild in sorted order.
            let mut out = serde_json::Map::new();
            for (k, vv) in btm {
                out.insert(k, vv);
            }
            Ok(Value::Object(out))
        }
        Value::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            for vv in arr {
                out.push(normalize_value(vv)?);
            }
            Ok(Value::Array(out))
        }
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Ok(Value::Number(n))
            } else {
                Err(CoreError::LedgerIntegrity(
                    "canonical JSON forbids non-integer numbers".to_string(),
                ))
            }
        }
        other => Ok(other),
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_and_whitespace_free() {
        let v = json!({"b": 1, "a": {"z": 2, "y": 3}});
        let bytes = to_canonical_bytes(&v).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"a":{"y":3,"z":2},"b":1}"#);
    }

    #[test]
    fn floats_are_rejected() {
        let v = json!({"p": 66.67});
        assert!(to_canonical_bytes(&v).is_err());
    }
}
