use std::sync::Arc;

use crate::config::catalog::Flow;

/// Reported by `FlowStack::pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    Active,
    NoActiveFlows,
}

/// Stack of active flows: the main flow at the bottom, branch flows above it.
///
/// `peek(true)` walks toward the parent without changing the stack; the walk
/// is only made permanent by `commit_cursor`.
#[derive(Debug, Clone, Default)]
pub struct FlowStack {
    entries: Vec<Arc<Flow>>,
    distance_from_top: usize,
}

impl FlowStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A main flow replaces the whole stack; a branch flow goes on top.
    pub fn push(&mut self, flow: Arc<Flow>, is_branch: bool) {
        if !is_branch {
            self.entries.clear();
        }
        self.entries.push(flow);
        self.distance_from_top = 0;
    }

    pub fn peek(&mut self, look_toward_parent: bool) -> Option<Arc<Flow>> {
        if !look_toward_parent {
            self.distance_from_top = 0;
            return self.entries.last().cloned();
        }

        self.distance_from_top += 1;
        if self.distance_from_top >= self.entries.len() {
            self.distance_from_top = 0;
            return None;
        }
        self.entries
            .get(self.entries.len() - 1 - self.distance_from_top)
            .cloned()
    }

    /// Drop every flow above the cursor so its target becomes the top.
    pub fn commit_cursor(&mut self) {
        let keep = self.entries.len().saturating_sub(self.distance_from_top);
        self.entries.truncate(keep);
        self.distance_from_top = 0;
    }

    pub fn pop(&mut self) -> FlowSignal {
        self.entries.pop();
        self.distance_from_top = 0;
        if self.entries.is_empty() {
            FlowSignal::NoActiveFlows
        } else {
            FlowSignal::Active
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.distance_from_top = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.distance_from_top
    }

    /// Flow ids from bottom to top.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|f| f.id.as_str()).collect()
    }
}
