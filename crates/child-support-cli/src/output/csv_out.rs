use serde_json::Value;
use std::io;

use super::flatten;

/// Write output as two-column CSV (`field,value`) with dotted field paths.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let mut rows = Vec::new();
    flatten("", value, &mut rows);

    let _ = wtr.write_record(["field", "value"]);
    for (field, val) in &rows {
        let _ = wtr.write_record([field.as_str(), val.as_str()]);
    }

    let _ = wtr.flush();
}
