use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assessment::AssessmentOptions;
use crate::rates::RateTableRegistry;
use crate::scoring::ScoringConfig;
use crate::{ChildSupportError, ChildSupportResult};

pub const BUILTIN_CONFIG_VERSION: &str = "builtin";

fn builtin_version() -> String {
    BUILTIN_CONFIG_VERSION.to_string()
}

/// Everything the engine reads besides the request itself. Sections left
/// out of a configuration file fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "builtin_version")]
    pub version: String,
    #[serde(default)]
    pub rate_tables: RateTableRegistry,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub assessment: AssessmentOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::builtin()
    }
}

impl EngineConfig {
    pub fn builtin() -> Self {
        EngineConfig {
            version: builtin_version(),
            rate_tables: RateTableRegistry::builtin(),
            scoring: ScoringConfig::default(),
            assessment: AssessmentOptions::default(),
        }
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> ChildSupportResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ChildSupportResult<()> {
        if self.version.trim().is_empty() {
            return Err(ChildSupportError::invalid_config(
                "version",
                "must not be empty",
            ));
        }
        self.rate_tables.validate()?;
        self.scoring.validate()
    }

    /// Version tag stamped on every response: engine version plus
    /// configuration version.
    pub fn computation_version(&self) -> String {
        format!("{}+{}", env!("CARGO_PKG_VERSION"), self.version)
    }
}

/// Holds the active configuration. Readers take an `Arc` snapshot and keep
/// it for the whole computation; `replace` swaps in a new one atomically.
#[derive(Debug)]
pub struct ConfigStore {
    current: RwLock<Arc<EngineConfig>>,
}

impl ConfigStore {
    pub fn new(config: EngineConfig) -> ChildSupportResult<Self> {
        config.validate()?;
        Ok(ConfigStore {
            current: RwLock::new(Arc::new(config)),
        })
    }

    pub fn snapshot(&self) -> Arc<EngineConfig> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Validates `config` and makes it current. Returns the previous
    /// configuration. An invalid configuration leaves the store unchanged.
    pub fn replace(&self, config: EngineConfig) -> ChildSupportResult<Arc<EngineConfig>> {
        config.validate()?;
        let next = Arc::new(config);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, next);
        info!(
            from = %previous.version,
            to = %guard.version,
            "engine configuration replaced"
        );
        Ok(previous)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        ConfigStore {
            current: RwLock::new(Arc::new(EngineConfig::builtin())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinancialYear;

    #[test]
    fn test_builtin_config_is_valid() {
        EngineConfig::builtin().validate().unwrap();
    }

    #[test]
    fn test_partial_json_falls_back_to_builtin_sections() {
        let config = EngineConfig::from_json_str(r#"{ "version": "2025-11" }"#).unwrap();
        assert_eq!(config.version, "2025-11");
        assert!(config.rate_tables.contains(&FinancialYear::starting(2025)));
        assert_eq!(config.scoring, ScoringConfig::default());
        assert!(!config.assessment.apply_fixed_rates);
    }

    #[test]
    fn test_fixed_rates_switched_on_from_json() {
        let json = r#"{ "version": "mar", "assessment": { "apply_fixed_rates": true } }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert!(config.assessment.apply_fixed_rates);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let json = r#"{ "version": "x", "scoring": { "rules": [], "tiers": [] } }"#;
        assert!(EngineConfig::from_json_str(json).is_err());
        assert!(EngineConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_computation_version_includes_config() {
        let version = EngineConfig::builtin().computation_version();
        assert!(version.ends_with("+builtin"));
    }

    #[test]
    fn test_replace_swaps_snapshot_and_keeps_old_readers() {
        let store = ConfigStore::default();
        let before = store.snapshot();

        let mut next = EngineConfig::builtin();
        next.version = "v2".into();
        let previous = store.replace(next).unwrap();

        assert_eq!(previous.version, BUILTIN_CONFIG_VERSION);
        assert_eq!(before.version, BUILTIN_CONFIG_VERSION);
        assert_eq!(store.snapshot().version, "v2");
    }

    #[test]
    fn test_replace_with_invalid_config_keeps_current() {
        let store = ConfigStore::default();
        let mut bad = EngineConfig::builtin();
        bad.scoring.tiers.clear();
        assert!(store.replace(bad).is_err());
        assert_eq!(store.snapshot().version, BUILTIN_CONFIG_VERSION);
    }
}
