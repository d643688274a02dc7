use std::collections::HashMap;

use context_coach::error::EngineError;
use context_coach::matcher::web::{ScriptEvaluator, ScriptRequest};
use context_coach::snapshot::snapshot_model::Rect;

/// Script evaluator that answers from a table and records every query as
/// `(identifier_id, surface_id)`.
#[derive(Debug, Default)]
pub struct FakeWeb {
    pub present: HashMap<String, Vec<String>>,
    pub rects: HashMap<String, Rect>,
    pub queries: Vec<(String, String)>,
    /// Surface whose evaluations fail.
    pub broken_surface: Option<String>,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, surface_id: &str, identifier_ids: &[&str]) -> Self {
        self.present.insert(
            surface_id.to_string(),
            identifier_ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    fn has(&self, request: &ScriptRequest<'_>) -> bool {
        self.present
            .get(&request.surface.surface_id)
            .is_some_and(|ids| ids.iter().any(|id| id == request.identifier_id))
    }
}

impl ScriptEvaluator for FakeWeb {
    fn evaluate(&mut self, request: &ScriptRequest<'_>) -> Result<bool, EngineError> {
        self.queries.push((
            request.identifier_id.to_string(),
            request.surface.surface_id.clone(),
        ));
        if self.broken_surface.as_deref() == Some(request.surface.surface_id.as_str()) {
            return Err(EngineError::ScriptEvaluation {
                surface: request.surface.surface_id.clone(),
                message: "surface detached".to_string(),
            });
        }
        Ok(self.has(request))
    }

    fn locate(&mut self, request: &ScriptRequest<'_>) -> Result<Option<Rect>, EngineError> {
        if !self.has(request) {
            return Ok(None);
        }
        Ok(Some(
            self.rects
                .get(request.identifier_id)
                .copied()
                .unwrap_or_default(),
        ))
    }
}
