use std::collections::HashMap;

use crate::config::catalog::Stage;
use crate::snapshot::snapshot_model::{Rect, WebSurfaceHandle};

/// Where a stage's pointer currently sits.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget {
    Native { element: usize, rect: Rect },
    Web { rect: Rect, surface: WebSurfaceHandle },
}

impl PointerTarget {
    pub fn rect(&self) -> Rect {
        match self {
            PointerTarget::Native { rect, .. } | PointerTarget::Web { rect, .. } => *rect,
        }
    }

    pub fn surface(&self) -> Option<&WebSurfaceHandle> {
        match self {
            PointerTarget::Native { .. } => None,
            PointerTarget::Web { surface, .. } => Some(surface),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    NoChange,
    NewStage { stage: Stage, pointer: Option<PointerTarget> },
    SameStage { stage: Stage, pointer: Option<PointerTarget> },
    /// The current stage ended and nothing was adopted in its place this tick.
    Transitioned { previous: Stage },
}

/// Bookkeeping for a stage that has just been shown to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performed {
    pub stage_id: String,
    /// Stage name, or the id when unnamed; counts and caps are shared per key.
    pub key: String,
    pub count: u32,
    /// The frequency cap was reached: drop the stage from future pools.
    pub exhausted: bool,
    /// The stage was a success stage: the current flow is finished.
    pub terminal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageUpdate {
    pub outcome: StageOutcome,
    pub performed: Option<Performed>,
}

#[derive(Debug, Clone)]
struct ActiveStage {
    stage: Stage,
    pointer: Option<PointerTarget>,
}

/// Tracks the stage currently shown on one page and how often each stage of
/// that page has been performed. A fresh manager is created per loaded page.
#[derive(Debug, Clone, Default)]
pub struct StageManager {
    current: Option<ActiveStage>,
    performed: HashMap<String, u32>,
}

impl StageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Stage> {
        self.current.as_ref().map(|a| &a.stage)
    }

    pub fn current_pointer(&self) -> Option<&PointerTarget> {
        self.current.as_ref().and_then(|a| a.pointer.as_ref())
    }

    /// Times performed, looked up by stage name (or id for unnamed stages).
    pub fn performed_count(&self, key: &str) -> u32 {
        self.performed.get(key).copied().unwrap_or(0)
    }

    /// Classify this tick's match against the retained current stage.
    pub fn update(&mut self, matched: Option<(Stage, Option<PointerTarget>)>) -> StageUpdate {
        match (self.current.take(), matched) {
            (None, None) => StageUpdate {
                outcome: StageOutcome::NoChange,
                performed: None,
            },

            (Some(previous), None) => {
                let performed = self.record(&previous.stage);
                StageUpdate {
                    outcome: StageOutcome::Transitioned {
                        previous: previous.stage,
                    },
                    performed: Some(performed),
                }
            }

            (None, Some((stage, pointer))) => self.adopt(stage, pointer, None),

            (Some(previous), Some((stage, pointer))) if previous.stage.id == stage.id => {
                self.current = Some(ActiveStage {
                    stage: stage.clone(),
                    pointer: pointer.clone(),
                });
                StageUpdate {
                    outcome: StageOutcome::SameStage { stage, pointer },
                    performed: None,
                }
            }

            (Some(previous), Some((stage, pointer))) => {
                let performed = self.record(&previous.stage);
                if performed.terminal {
                    // Let the flow pop settle before adopting anything new
                    return StageUpdate {
                        outcome: StageOutcome::Transitioned {
                            previous: previous.stage,
                        },
                        performed: Some(performed),
                    };
                }
                self.adopt(stage, pointer, Some(performed))
            }
        }
    }

    /// Finish the current stage outside the tick (e.g. a branch was chosen).
    pub fn complete_current(&mut self) -> Option<Performed> {
        let previous = self.current.take()?;
        Some(self.record(&previous.stage))
    }

    /// Forget the current stage without counting it.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    fn adopt(&mut self, stage: Stage, pointer: Option<PointerTarget>, performed: Option<Performed>) -> StageUpdate {
        self.current = Some(ActiveStage {
            stage: stage.clone(),
            pointer: pointer.clone(),
        });
        StageUpdate {
            outcome: StageOutcome::NewStage { stage, pointer },
            performed,
        }
    }

    fn record(&mut self, stage: &Stage) -> Performed {
        let key = stage.counter_key();
        let count = self.performed.entry(key.to_string()).or_insert(0);
        *count += 1;

        Performed {
            stage_id: stage.id.clone(),
            key: key.to_string(),
            count: *count,
            exhausted: stage.frequency.is_some_and(|cap| *count >= cap),
            terminal: stage.is_terminal(),
        }
    }
}
