use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::catalog::Catalog;
use crate::config::config_model::EngineConfig;
use crate::error::EngineError;

/// Runtime knobs for the detection loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Starting language; the configuration's default language when absent.
    #[serde(default)]
    pub language: Option<String>,

    /// JSONL decision trace; disabled when absent.
    #[serde(default)]
    pub trace_path: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            language: None,
            trace_path: None,
        }
    }
}

fn default_poll_interval_ms() -> u64 { 1000 }

/// Parse configuration text. `.json` paths are read as JSON, everything else as YAML.
pub fn parse_config(content: &str, source: &str) -> Result<EngineConfig, EngineError> {
    if source.ends_with(".json") {
        serde_json::from_str(content).map_err(|e| EngineError::JsonParse {
            context: source.to_string(),
            source: e,
        })
    } else if source.ends_with(".yaml") || source.ends_with(".yml") {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParse {
            context: source.to_string(),
            source: e,
        })
    } else {
        Err(EngineError::UnsupportedConfigFormat(source.to_string()))
    }
}

pub fn load_engine_config(path: &Path) -> Result<EngineConfig, EngineError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigRead {
        path: display.clone(),
        source: e,
    })?;
    parse_config(&content, &display)
}

/// Load and validate in one step.
pub fn load_catalog(path: &Path) -> Result<Catalog, EngineError> {
    load_engine_config(path).map(Catalog::from_config)
}
