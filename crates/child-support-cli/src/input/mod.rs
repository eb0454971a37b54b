pub mod file;
pub mod stdin;

use serde_json::Value;

use child_support_core::config::EngineConfig;

/// Enquiry document from `--input`, else piped stdin, else `None`.
pub fn read_enquiry(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(file::read_document(path)?)),
        None => stdin::read_stdin(),
    }
}

/// Engine configuration from `--config`, else the built-in one.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_config(path),
        None => Ok(EngineConfig::builtin()),
    }
}

/// YAML documents are converted to the JSON data model before use.
pub fn parse_document(text: &str, yaml: bool) -> Result<Value, Box<dyn std::error::Error>> {
    if yaml {
        Ok(serde_yaml::from_str::<Value>(text)?)
    } else {
        Ok(serde_json::from_str::<Value>(text)?)
    }
}
