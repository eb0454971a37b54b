use serde_json::Value;

use super::scalar;

/// Key answer fields, most important first. Searched breadth-first so the
/// net liability wins over per-parent figures of the same name.
const PRIORITY_KEYS: [&str; 6] = [
    "annual_liability",
    "reduction_amount",
    "score",
    "valid",
    "version",
    "financial_years",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    for key in PRIORITY_KEYS {
        if let Some(found) = find_key(value, key) {
            println!("{}", scalar(found));
            return;
        }
    }

    // Fall back to the first field
    if let Value::Object(map) = value {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }
    println!("{}", scalar(value));
}

fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut level: Vec<&Value> = vec![value];
    while !level.is_empty() {
        let mut next = Vec::new();
        for v in level {
            if let Value::Object(map) = v {
                if let Some(found) = map.get(key).filter(|f| !f.is_null()) {
                    return Some(found);
                }
                next.extend(map.values().filter(|c| c.is_object()));
            }
        }
        level = next;
    }
    None
}
