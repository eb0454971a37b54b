use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use child_support_core::config::EngineConfig;

use super::parse_document;

/// Read a JSON or YAML file (by extension) as a generic serde_json::Value.
pub fn read_document(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value = parse_document(&contents, is_yaml(&canonical))
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read and validate an engine configuration file.
pub fn read_config(path: &str) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let value = read_document(path)?;
    let config: EngineConfig = serde_json::from_value(value)
        .map_err(|e| format!("Invalid configuration in '{}': {}", path, e))?;
    config.validate()?;
    tracing::debug!(path, version = %config.version, "configuration loaded");
    Ok(config)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve the path against the working directory and check it is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
