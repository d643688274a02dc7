use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::matcher::web::{ScriptEvaluator, ScriptRequest};
use crate::orchestrator::engine::HostEvent;
use crate::snapshot::snapshot_model::{Rect, ViewNode, ViewSource};

/// A scripted sequence of host states and user events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Offset from scenario start; defaults to one poll interval per step.
    #[serde(default)]
    pub at_ms: Option<u64>,

    /// Replaces the view trees when present; otherwise the previous ones stay.
    #[serde(default)]
    pub surfaces: Option<Vec<ViewNode>>,

    /// Web identifier ids present in each surface, keyed by surface id.
    #[serde(default)]
    pub web: Option<HashMap<String, Vec<String>>>,

    /// Bounds reported for web identifiers that are present.
    #[serde(default)]
    pub web_rects: HashMap<String, Rect>,

    /// Delivered after this step's tick.
    #[serde(default)]
    pub events: Vec<HostEvent>,
}

pub fn load_scenario(path: &str) -> Result<Scenario, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigRead {
        path: path.to_string(),
        source: e,
    })?;
    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParse {
        context: path.to_string(),
        source: e,
    })
}

/// Host double backed by scenario data.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    pub surfaces: Vec<ViewNode>,
    pub web: HashMap<String, Vec<String>>,
    pub web_rects: HashMap<String, Rect>,
}

impl ScriptedHost {
    pub fn apply(&mut self, step: &ScenarioStep) {
        if let Some(surfaces) = &step.surfaces {
            self.surfaces = surfaces.clone();
        }
        if let Some(web) = &step.web {
            self.web = web.clone();
        }
        self.web_rects.extend(step.web_rects.iter().map(|(k, v)| (k.clone(), *v)));
    }

    fn present(&self, request: &ScriptRequest<'_>) -> bool {
        self.web
            .get(&request.surface.surface_id)
            .is_some_and(|ids| ids.iter().any(|id| id == request.identifier_id))
    }
}

impl ViewSource for ScriptedHost {
    fn surfaces(&self) -> Vec<ViewNode> {
        self.surfaces.clone()
    }
}

impl ScriptEvaluator for ScriptedHost {
    fn evaluate(&mut self, request: &ScriptRequest<'_>) -> Result<bool, EngineError> {
        Ok(self.present(request))
    }

    fn locate(&mut self, request: &ScriptRequest<'_>) -> Result<Option<Rect>, EngineError> {
        if !self.present(request) {
            return Ok(None);
        }
        Ok(Some(
            self.web_rects
                .get(request.identifier_id)
                .copied()
                .unwrap_or_default(),
        ))
    }
}
