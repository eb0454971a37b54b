use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, scalar};

/// Format output as tables: one per section of an estimate, children as
/// rows, warnings listed underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) if map.values().any(Value::is_object) => print_sections(map),
        Value::Object(_) => print_field_table(value),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_sections(map: &Map<String, Value>) {
    let mut scalars = Map::new();
    for (name, section) in map {
        match section {
            Value::Object(fields) => {
                println!("\n{}", name);
                let mut rest = fields.clone();
                let children = rest.remove("children");
                let warnings = rest.remove("warnings");
                print_field_table(&Value::Object(rest));
                if let Some(Value::Array(children)) = children {
                    println!("\n{} children", name);
                    print_array_table(&children);
                }
                if let Some(Value::Array(warnings)) = warnings {
                    print_warnings(&warnings);
                }
            }
            other => {
                scalars.insert(name.clone(), other.clone());
            }
        }
    }
    if !scalars.is_empty() {
        println!();
        print_field_table(&Value::Object(scalars));
    }
}

fn print_field_table(value: &Value) {
    let mut rows = Vec::new();
    flatten("", value, &mut rows);
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (field, val) in rows {
        builder.push_record([field, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Headers from the flattened first row
    if arr[0].is_object() {
        let rows: Vec<Vec<(String, String)>> = arr
            .iter()
            .map(|item| {
                let mut row = Vec::new();
                flatten("", item, &mut row);
                row
            })
            .collect();
        let headers: Vec<String> = rows[0].iter().map(|(k, _)| k.clone()).collect();

        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for row in &rows {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| {
                    row.iter()
                        .find(|(k, _)| k == h)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(cells);
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar(item));
        }
    }
}

fn print_warnings(warnings: &[Value]) {
    if warnings.is_empty() {
        return;
    }
    println!("\nWarnings:");
    for w in warnings {
        if let Value::String(s) = w {
            println!("  - {}", s);
        }
    }
}
