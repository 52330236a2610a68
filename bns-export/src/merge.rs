//! Deep, right-biased JSON merge.

use serde_json::{Map, Value};

use bns_core::FactSet;

/// Merges `overlay` into `base`.
///
/// Objects on both sides merge key by key, recursively. Anything else
/// (scalars, arrays, or an object meeting a non-object) is replaced
/// wholesale by the overlay value.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_maps(base_map, overlay_map);
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

fn merge_maps(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                deep_merge(existing, value);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merges a fact set over an existing document and returns the result.
pub fn merge_facts(mut document: Map<String, Value>, facts: &FactSet) -> Map<String, Value> {
    merge_maps(&mut document, facts.as_map());
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn facts(value: Value) -> FactSet {
        FactSet::try_from(value).unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_nested_merge() {
        let doc = object(json!({"a": 1, "b": {"x": 1}}));
        let merged = merge_facts(doc, &facts(json!({"b": {"y": 2}, "c": 3})));
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
    }

    #[test]
    fn test_override() {
        let merged = merge_facts(object(json!({"a": 1})), &facts(json!({"a": 2})));
        assert_eq!(Value::Object(merged), json!({"a": 2}));
    }

    #[test]
    fn test_arrays_replaced_wholesale() {
        let merged = merge_facts(object(json!({"bnb": [56, 97]})), &facts(json!({"bnb": [1]})));
        assert_eq!(Value::Object(merged), json!({"bnb": [1]}));
    }

    #[test]
    fn test_object_replaces_scalar_and_back() {
        let mut base = json!({"a": 1, "b": {"x": 1}});
        deep_merge(&mut base, &json!({"a": {"y": 2}, "b": null}));
        assert_eq!(base, json!({"a": {"y": 2}, "b": null}));
    }

    #[test]
    fn test_deeply_nested_registries() {
        let doc = object(json!({
            "registrar": "0x01",
            "registries": {"bnb": "0xaa", "meta": {"deployedAt": 1}}
        }));
        let merged = merge_facts(
            doc,
            &facts(json!({"registries": {"bnb": "0xbb", "meta": {"block": 9}}})),
        );
        assert_eq!(
            Value::Object(merged),
            json!({
                "registrar": "0x01",
                "registries": {"bnb": "0xbb", "meta": {"deployedAt": 1, "block": 9}}
            })
        );
    }

    #[test]
    fn test_empty_facts_leave_document_unchanged() {
        let doc = object(json!({"a": 1, "b": [1, 2]}));
        let merged = merge_facts(doc.clone(), &FactSet::new());
        assert_eq!(merged, doc);
    }

    fn flat_object() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map("[a-f]{1,2}", any::<i64>(), 0..8).prop_map(|m| {
            m.into_iter().map(|(k, v)| (k, json!(v))).collect()
        })
    }

    fn nested_object() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map("[a-c]", flat_object(), 0..4).prop_map(|m| {
            m.into_iter().map(|(k, v)| (k, Value::Object(v))).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(doc in nested_object(), new in nested_object()) {
            let facts = FactSet::from(new);
            let once = merge_facts(doc, &facts);
            let twice = merge_facts(once.clone(), &facts);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_flat_merge_is_right_biased_union(doc in flat_object(), new in flat_object()) {
            let facts = FactSet::from(new.clone());
            let merged = merge_facts(doc.clone(), &facts);

            for (k, v) in &new {
                prop_assert_eq!(merged.get(k), Some(v));
            }
            for (k, v) in &doc {
                if !new.contains_key(k) {
                    prop_assert_eq!(merged.get(k), Some(v));
                }
            }
            for k in merged.keys() {
                prop_assert!(doc.contains_key(k) || new.contains_key(k));
            }
        }

        #[test]
        fn prop_nested_merge_preserves_unrelated_leaves(doc in nested_object(), new in nested_object()) {
            let facts = FactSet::from(new.clone());
            let merged = merge_facts(doc.clone(), &facts);

            for (outer, inner) in &doc {
                for (k, v) in inner.as_object().into_iter().flatten() {
                    let overridden = new
                        .get(outer)
                        .and_then(Value::as_object)
                        .map(|n| n.contains_key(k))
                        .unwrap_or(false);
                    if !overridden {
                        prop_assert_eq!(merged.get(outer).and_then(|o| o.get(k)), Some(v));
                    }
                }
            }
        }
    }
}
