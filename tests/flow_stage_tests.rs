use std::sync::Arc;

use context_coach::{
    config::{
        catalog::{Flow, Stage, StageKind},
        config_model::Requirements,
    },
    flow::stack::{FlowSignal, FlowStack},
    snapshot::snapshot_model::Rect,
    stage::lifecycle::{PointerTarget, StageManager, StageOutcome},
};

fn flow(id: &str) -> Arc<Flow> {
    Arc::new(Flow {
        id: id.to_string(),
        name: id.to_string(),
        pages: vec![],
    })
}

fn stage(id: &str) -> Stage {
    Stage {
        id: id.to_string(),
        name: id.to_string(),
        requirements: Requirements::default(),
        kind: StageKind::Normal,
        frequency: None,
        pointer: None,
    }
}

fn capped(id: &str, frequency: u32) -> Stage {
    Stage {
        frequency: Some(frequency),
        ..stage(id)
    }
}

fn success(id: &str) -> Stage {
    Stage {
        kind: StageKind::Success,
        ..stage(id)
    }
}

fn at(x: f64) -> Option<PointerTarget> {
    Some(PointerTarget::Native {
        element: 1,
        rect: Rect::new(x, 0.0, 10.0, 10.0),
    })
}

// ============================================================================
// Flow stack
// ============================================================================

#[test]
fn main_flow_replaces_the_stack() {
    let mut stack = FlowStack::new();
    stack.push(flow("F1"), false);
    stack.push(flow("F2"), true);
    assert_eq!(stack.ids(), vec!["F1", "F2"]);

    stack.push(flow("F3"), false);
    assert_eq!(stack.ids(), vec!["F3"]);
}

#[test]
fn peek_walks_toward_parent_and_wraps() {
    let mut stack = FlowStack::new();
    stack.push(flow("F1"), false);
    stack.push(flow("F2"), true);

    assert_eq!(stack.peek(false).map(|f| f.id.clone()), Some("F2".into()));
    assert_eq!(stack.peek(true).map(|f| f.id.clone()), Some("F1".into()));
    assert_eq!(stack.cursor(), 1);

    assert!(stack.peek(true).is_none(), "Past the root");
    assert_eq!(stack.cursor(), 0);
    assert_eq!(stack.peek(true).map(|f| f.id.clone()), Some("F1".into()));

    // Probing never changes the stack itself
    assert_eq!(stack.len(), 2);
}

#[test]
fn peek_without_parent_resets_cursor() {
    let mut stack = FlowStack::new();
    stack.push(flow("F1"), false);
    stack.push(flow("F2"), true);
    stack.peek(true);

    assert_eq!(stack.peek(false).map(|f| f.id.clone()), Some("F2".into()));
    assert_eq!(stack.cursor(), 0);
}

#[test]
fn commit_cursor_drops_flows_above_it() {
    let mut stack = FlowStack::new();
    stack.push(flow("F1"), false);
    stack.push(flow("F2"), true);
    stack.push(flow("F3"), true);

    stack.peek(true);
    stack.peek(true);
    stack.commit_cursor();

    assert_eq!(stack.ids(), vec!["F1"]);
    assert_eq!(stack.cursor(), 0);
}

#[test]
fn pop_signals_when_the_last_flow_ends() {
    let mut stack = FlowStack::new();
    stack.push(flow("F1"), false);
    stack.push(flow("F2"), true);

    assert_eq!(stack.pop(), FlowSignal::Active);
    assert_eq!(stack.ids(), vec!["F1"]);
    assert_eq!(stack.pop(), FlowSignal::NoActiveFlows);
    assert!(stack.is_empty());
    assert!(stack.peek(false).is_none());
}

// ============================================================================
// Stage lifecycle
// ============================================================================

#[test]
fn no_match_without_current_is_no_change() {
    let mut manager = StageManager::new();
    let update = manager.update(None);
    assert_eq!(update.outcome, StageOutcome::NoChange);
    assert!(update.performed.is_none());
}

#[test]
fn new_then_same_then_next_stage() {
    let mut manager = StageManager::new();

    let update = manager.update(Some((stage("S1"), at(0.0))));
    assert!(matches!(update.outcome, StageOutcome::NewStage { ref stage, .. } if stage.id == "S1"));

    let update = manager.update(Some((stage("S1"), at(0.0))));
    assert!(matches!(update.outcome, StageOutcome::SameStage { .. }));
    assert!(update.performed.is_none(), "Staying on a stage is not a perform");

    let update = manager.update(Some((stage("S2"), None)));
    assert!(matches!(update.outcome, StageOutcome::NewStage { ref stage, .. } if stage.id == "S2"));
    let performed = update.performed.expect("S1 performed");
    assert_eq!(performed.stage_id, "S1");
    assert_eq!(performed.count, 1);
    assert_eq!(manager.performed_count("S1"), 1);
    assert_eq!(manager.current().map(|s| s.id.as_str()), Some("S2"));
}

#[test]
fn same_stage_reports_moved_pointer() {
    let mut manager = StageManager::new();
    manager.update(Some((stage("S1"), at(0.0))));

    let update = manager.update(Some((stage("S1"), at(30.0))));
    match update.outcome {
        StageOutcome::SameStage { pointer, .. } => assert_eq!(pointer, at(30.0)),
        other => panic!("Expected SameStage, got {:?}", other),
    }
    assert_eq!(manager.current_pointer(), at(30.0).as_ref());
}

#[test]
fn stage_disappearing_counts_as_performed() {
    let mut manager = StageManager::new();
    manager.update(Some((stage("S1"), None)));

    let update = manager.update(None);
    assert!(matches!(update.outcome, StageOutcome::Transitioned { ref previous } if previous.id == "S1"));
    assert_eq!(update.performed.map(|p| p.count), Some(1));
    assert!(manager.current().is_none());
}

#[test]
fn frequency_cap_marks_stage_exhausted() {
    let mut manager = StageManager::new();

    manager.update(Some((capped("S1", 2), None)));
    let first = manager.update(None).performed.expect("first perform");
    assert!(!first.exhausted);

    manager.update(Some((capped("S1", 2), None)));
    let second = manager.update(None).performed.expect("second perform");
    assert_eq!(second.count, 2);
    assert!(second.exhausted);
}

#[test]
fn success_stage_replaced_reports_terminal_transition() {
    let mut manager = StageManager::new();
    manager.update(Some((success("Done"), None)));

    let update = manager.update(Some((stage("S2"), None)));
    assert!(matches!(update.outcome, StageOutcome::Transitioned { ref previous } if previous.id == "Done"));
    assert!(update.performed.expect("performed").terminal);
    assert!(manager.current().is_none(), "Nothing adopted after a terminal stage");
}

#[test]
fn counters_are_shared_by_stage_name() {
    let mut manager = StageManager::new();
    let twin = Stage {
        name: "S1".into(),
        ..stage("S1_copy")
    };

    manager.update(Some((stage("S1"), None)));
    manager.update(Some((twin, None)));
    let performed = manager.update(None).performed.expect("twin performed");

    assert_eq!(performed.stage_id, "S1_copy");
    assert_eq!(performed.key, "S1");
    assert_eq!(manager.performed_count("S1"), 2);
}

#[test]
fn complete_and_clear_current() {
    let mut manager = StageManager::new();
    manager.update(Some((stage("S1"), None)));
    let performed = manager.complete_current().expect("current stage");
    assert_eq!(performed.count, 1);
    assert!(manager.current().is_none());

    manager.update(Some((stage("S1"), None)));
    manager.clear_current();
    assert!(manager.current().is_none());
    assert_eq!(manager.performed_count("S1"), 1, "Clearing does not count");
    assert!(manager.complete_current().is_none());
}
