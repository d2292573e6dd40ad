//! Depth-first traversal over parsed configuration values.

use serde_json::Value;

/// Visits every scalar leaf reachable from `value`, calling `visit` with
/// the leaf's own object key and value.
///
/// Array elements that are themselves objects or arrays are descended
/// into; bare scalars inside arrays carry no mapping key and are skipped.
/// Index keys are never passed to the visitor. `null` counts as a scalar
/// leaf. Input is freshly parsed text, so no cycle detection is needed.
pub fn walk<F>(value: &Value, visit: &mut F)
where
    F: FnMut(&str, &Value),
{
    match value {
        Value::Object(map) => {
            for (key, entry) in map {
                match entry {
                    Value::Object(_) | Value::Array(_) => walk(entry, visit),
                    scalar => visit(key, scalar),
                }
            }
        }
        Value::Array(elements) => {
            for element in elements {
                if element.is_object() || element.is_array() {
                    walk(element, visit);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect(value: &Value) -> Vec<(String, Value)> {
        let mut seen = Vec::new();
        walk(value, &mut |key, scalar| {
            seen.push((key.to_string(), scalar.clone()));
        });
        seen
    }

    #[test]
    fn visits_top_level_scalars_with_their_keys() {
        let config = json!({"name": "acme", "retries": 3});
        let seen = collect(&config);
        assert_eq!(
            seen,
            vec![
                ("name".to_string(), json!("acme")),
                ("retries".to_string(), json!(3)),
            ]
        );
    }

    #[test]
    fn descends_into_nested_objects() {
        let config = json!({"outer": {"inner": {"apiKey": "$KEY"}}});
        let seen = collect(&config);
        assert_eq!(seen, vec![("apiKey".to_string(), json!("$KEY"))]);
    }

    #[test]
    fn descends_into_objects_inside_arrays() {
        let config = json!({"actions": [{"apiKey": "abc"}, {"kind": "email"}]});
        let seen = collect(&config);
        assert_eq!(
            seen,
            vec![
                ("apiKey".to_string(), json!("abc")),
                ("kind".to_string(), json!("email")),
            ]
        );
    }

    #[test]
    fn skips_bare_scalars_inside_arrays() {
        let config = json!({"tags": ["a", "b"], "nested": [[1, 2], {"x": 1}]});
        let seen = collect(&config);
        assert_eq!(seen, vec![("x".to_string(), json!(1))]);
    }

    #[test]
    fn null_is_a_visited_leaf() {
        let config = json!({"apiKey": null});
        let seen = collect(&config);
        assert_eq!(seen, vec![("apiKey".to_string(), Value::Null)]);
    }

    #[test]
    fn root_scalar_visits_nothing() {
        assert!(collect(&json!("just a string")).is_empty());
    }
}
