use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use child_support_core::assessment::calculate_assessment_with;
use child_support_core::config::{ConfigStore, EngineConfig};
use child_support_core::estimate::estimate as run_estimate;
use child_support_core::input::normalize_as_of;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Process-wide configuration, built-in until `loadConfig` replaces it.
fn store() -> &'static ConfigStore {
    static STORE: OnceLock<ConfigStore> = OnceLock::new();
    STORE.get_or_init(ConfigStore::default)
}

/// `computedAt` from the caller (RFC 3339), or now.
fn timestamp(computed_at: Option<String>) -> NapiResult<DateTime<Utc>> {
    match computed_at {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(to_napi_error),
        None => Ok(Utc::now()),
    }
}

fn to_json(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Estimates
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate(input_json: String, computed_at: Option<String>) -> NapiResult<String> {
    let raw: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = store().snapshot();
    let response = run_estimate(&raw, &config, timestamp(computed_at)?).map_err(to_napi_error)?;
    to_json(&response)
}

#[napi]
pub fn normalize_input(input_json: String, computed_at: Option<String>) -> NapiResult<String> {
    let raw: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = store().snapshot();
    let as_of = timestamp(computed_at)?.date_naive();
    let input = normalize_as_of(&raw, &config.rate_tables, as_of).map_err(to_napi_error)?;
    to_json(&input)
}

#[napi]
pub fn calculate_assessment(input_json: String, computed_at: Option<String>) -> NapiResult<String> {
    let raw: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = store().snapshot();
    let as_of = timestamp(computed_at)?.date_naive();
    let input = normalize_as_of(&raw, &config.rate_tables, as_of).map_err(to_napi_error)?;
    let result = calculate_assessment_with(&input, &config.rate_tables, &config.assessment)
        .map_err(to_napi_error)?;
    to_json(&result)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Validates and activates a new engine configuration. Returns the new
/// computation version tag.
#[napi]
pub fn load_config(config_json: String) -> NapiResult<String> {
    let config = EngineConfig::from_json_str(&config_json).map_err(to_napi_error)?;
    let version = config.computation_version();
    store().replace(config).map_err(to_napi_error)?;
    Ok(version)
}

#[napi]
pub fn supported_years() -> Vec<String> {
    store()
        .snapshot()
        .rate_tables
        .years()
        .map(|y| y.to_string())
        .collect()
}
