use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Configuration or scenario file could not be read
    ConfigRead { path: String, source: std::io::Error },

    /// YAML parsing failed (configuration, scenario or app config)
    ConfigParse { context: String, source: serde_yaml::Error },

    /// JSON parsing failed (configuration given as .json)
    JsonParse { context: String, source: serde_json::Error },

    /// File extension is neither YAML nor JSON
    UnsupportedConfigFormat(String),

    /// The host failed to evaluate a script inside a web surface
    ScriptEvaluation { surface: String, message: String },

    /// A discovery or branch refers to a flow id missing from the catalog
    UnknownFlow { flow_id: String, referenced_by: String },

    /// A stage typed as branch carries no branch metadata
    MissingBranchInfo { stage_id: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ConfigRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            EngineError::ConfigParse { context, source } => {
                write!(f, "YAML parse error ({}): {}", context, source)
            }
            EngineError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            EngineError::UnsupportedConfigFormat(path) => {
                write!(f, "Unsupported configuration format: {}", path)
            }
            EngineError::ScriptEvaluation { surface, message } => {
                write!(f, "Script evaluation failed in surface '{}': {}", surface, message)
            }
            EngineError::UnknownFlow { flow_id, referenced_by } => {
                write!(f, "Flow '{}' referenced by '{}' does not exist", flow_id, referenced_by)
            }
            EngineError::MissingBranchInfo { stage_id } => {
                write!(f, "Branch stage '{}' has no branch metadata", stage_id)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::ConfigRead { source, .. } => Some(source),
            EngineError::ConfigParse { source, .. } => Some(source),
            EngineError::JsonParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
