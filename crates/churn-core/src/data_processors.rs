use serde_json::{Map, Value};

// ── RecordFlattener ───────────────────────────────────────────────────────────

/// Flattens nested JSON records into single-level maps, the way a
/// "json normalize" step does before the records become table rows.
pub struct RecordFlattener;

impl RecordFlattener {
    /// Separator placed between a parent key and a child key.
    pub const SEPARATOR: &'static str = ".";

    /// Flatten a record: keys of nested objects are lifted to the top level as
    /// `parent.child`, recursively. An empty nested object contributes no key.
    /// Arrays and scalars are kept as values.
    ///
    /// For example `{"account": {"Charges": {"Monthly": 70.0}}}` becomes
    /// `{"account.Charges.Monthly": 70.0}`.
    pub fn flatten(record: &Map<String, Value>) -> Map<String, Value> {
        let mut result = Map::new();
        for (key, value) in record {
            Self::flatten_inner(value, key, &mut result);
        }
        result
    }

    fn flatten_inner(value: &Value, prefix: &str, output: &mut Map<String, Value>) {
        match value {
            Value::Object(map) => {
                for (key, val) in map {
                    let new_key = format!("{}{}{}", prefix, Self::SEPARATOR, key);
                    Self::flatten_inner(val, &new_key, output);
                }
            }
            _ => {
                output.insert(prefix.to_string(), value.clone());
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten(value: Value) -> Map<String, Value> {
        RecordFlattener::flatten(value.as_object().unwrap())
    }

    #[test]
    fn test_flatten_flat_record_unchanged() {
        let flat = flatten(json!({"a": 1, "b": "x"}));
        assert_eq!(flat["a"], json!(1));
        assert_eq!(flat["b"], json!("x"));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_flatten_nested_object() {
        let flat = flatten(json!({"customer": {"gender": "Female", "tenure": 9}}));
        assert_eq!(flat["customer.gender"], json!("Female"));
        assert_eq!(flat["customer.tenure"], json!(9));
        assert!(!flat.contains_key("customer"));
    }

    #[test]
    fn test_flatten_deeply_nested() {
        let flat = flatten(json!({"account": {"Charges": {"Monthly": 65.6}}}));
        assert_eq!(flat["account.Charges.Monthly"], json!(65.6));
    }

    #[test]
    fn test_flatten_keeps_arrays() {
        let flat = flatten(json!({"tags": [1, 2], "extra": [{"a": 1}]}));
        assert_eq!(flat["tags"], json!([1, 2]));
        assert_eq!(flat["extra"], json!([{"a": 1}]));
    }

    #[test]
    fn test_flatten_drops_empty_objects() {
        let flat = flatten(json!({"id": 1, "meta": {}, "account": {"notes": {}, "tier": "a"}}));
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "account.tier"]);
    }

    #[test]
    fn test_flatten_preserves_key_order() {
        let flat = flatten(json!({"z": 1, "nested": {"b": 2, "a": 3}, "c": 4}));
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "nested.b", "nested.a", "c"]);
    }
}
