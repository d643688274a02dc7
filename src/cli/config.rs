use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::loader::EngineSettings;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "context-coach",
    version,
    about = "Context detection engine for in-app coaching overlays"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to app config file (default: context-coach.yaml in current dir)
    #[arg(long, global = true)]
    pub app_config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load an engine configuration and report configuration issues
    Check {
        /// Engine configuration (YAML or JSON)
        #[arg(long)]
        config: String,
    },

    /// Drive the engine through a scripted scenario and print presentation calls
    Replay {
        /// Engine configuration (YAML or JSON)
        #[arg(long)]
        config: String,

        /// Scenario YAML: a list of steps with view trees, web answers and user events
        #[arg(long)]
        scenario: String,

        /// Starting language (default: from app config, then the configuration)
        #[arg(long)]
        language: Option<String>,

        /// Append a JSONL decision trace to this file
        #[arg(long)]
        trace: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `context-coach.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSettings,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("context-coach.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// CLI values win over the app config.
pub fn build_engine_settings(config: &AppConfig, language: Option<&str>, trace: Option<&str>) -> EngineSettings {
    EngineSettings {
        poll_interval_ms: config.engine.poll_interval_ms,
        language: language
            .map(str::to_string)
            .or_else(|| config.engine.language.clone()),
        trace_path: trace
            .map(str::to_string)
            .or_else(|| config.engine.trace_path.clone()),
    }
}
