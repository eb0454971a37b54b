pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects and arrays into dotted `(path, value)` pairs,
/// e.g. `assessment.parents.0.income_percentage`.
pub fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let key = |k: &str| {
        if prefix.is_empty() {
            k.to_string()
        } else {
            format!("{prefix}.{k}")
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten(&key(k), v, out);
            }
        }
        Value::Array(items) if items.iter().any(|v| v.is_object() || v.is_array()) => {
            for (i, v) in items.iter().enumerate() {
                flatten(&key(&i.to_string()), v, out);
            }
        }
        _ => out.push((prefix.to_string(), scalar(value))),
    }
}

/// Render a leaf value as plain text.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_paths() {
        let value = json!({
            "assessment": {
                "annual_liability": "8268.69",
                "children": [{ "age": 8 }],
                "warnings": []
            },
            "version": "0.1.0+builtin"
        });
        let mut out = Vec::new();
        flatten("", &value, &mut out);
        assert_eq!(
            out,
            vec![
                ("assessment.annual_liability".to_string(), "8268.69".to_string()),
                ("assessment.children.0.age".to_string(), "8".to_string()),
                ("assessment.warnings".to_string(), String::new()),
                ("version".to_string(), "0.1.0+builtin".to_string()),
            ]
        );
    }

    #[test]
    fn test_scalar_joins_simple_arrays() {
        assert_eq!(scalar(&json!(["0", "100"])), "0, 100");
        assert_eq!(scalar(&Value::Null), "");
    }
}
