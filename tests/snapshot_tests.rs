use context_coach::snapshot::{
    collector::collect,
    snapshot_model::{Rect, ViewKind, ViewNode},
};

mod common;
use crate::common::builders::{button, label, view, web_surface, window};

fn visible_ids(surfaces: &[ViewNode]) -> Vec<String> {
    collect(surfaces)
        .visible()
        .filter_map(|e| e.element_id.clone())
        .collect()
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn collects_visible_elements_in_traversal_order() {
    let tree = window(vec![button("pay", 0), button("cancel", 1)]);
    let snapshot = collect(&[tree]);

    assert_eq!(snapshot.elements.len(), 3);
    assert_eq!(snapshot.order, vec![0, 1, 2]);
    assert_eq!(snapshot.elements[1].parent, Some(0));
    assert_eq!(snapshot.elements[0].children, vec![1, 2]);
    assert_eq!(visible_ids(&[window(vec![button("pay", 0), button("cancel", 1)])]), vec!["pay", "cancel"]);
}

#[test]
fn hidden_and_transparent_nodes_are_not_visible() {
    let mut hidden = button("hidden", 0);
    hidden.hidden = true;
    hidden.children = vec![button("hidden_child", 0)];

    let mut faded = button("faded", 1);
    faded.alpha = 0.0;

    let tree = window(vec![hidden, faded, button("shown", 2)]);
    let snapshot = collect(&[tree.clone()]);

    assert_eq!(visible_ids(&[tree]), vec!["shown"]);
    // Still in the arena for path remapping
    assert!(snapshot.elements.iter().any(|e| e.element_id.as_deref() == Some("hidden_child")));
    assert!(snapshot.elements.iter().all(|e| e.element_id.as_deref() != Some("hidden_child") || !e.visible));
}

#[test]
fn later_sibling_covering_earlier_one_occludes_it() {
    let covered = view("covered", Rect::new(10.0, 10.0, 20.0, 20.0));
    let sheet = view("sheet", Rect::new(0.0, 0.0, 100.0, 100.0));
    let beside = view("beside", Rect::new(150.0, 0.0, 20.0, 20.0));

    let ids = visible_ids(&[window(vec![covered, sheet, beside])]);
    assert_eq!(ids, vec!["sheet", "beside"]);
}

#[test]
fn hidden_sibling_does_not_occlude() {
    let covered = view("covered", Rect::new(10.0, 10.0, 20.0, 20.0));
    let mut sheet = view("sheet", Rect::new(0.0, 0.0, 100.0, 100.0));
    sheet.hidden = true;

    assert_eq!(visible_ids(&[window(vec![covered, sheet])]), vec!["covered"]);
}

#[test]
fn occlusion_hides_the_whole_subtree() {
    let mut covered = view("covered", Rect::new(10.0, 10.0, 20.0, 20.0));
    covered.children = vec![view("inner", Rect::new(12.0, 12.0, 5.0, 5.0))];
    let sheet = view("sheet", Rect::new(0.0, 0.0, 100.0, 100.0));

    let ids = visible_ids(&[window(vec![covered, sheet])]);
    assert!(!ids.contains(&"inner".to_string()));
}

#[test]
fn top_level_surfaces_never_occlude_each_other() {
    let first = window(vec![button("below", 0)]);
    let second = window(vec![button("above", 1)]);

    assert_eq!(visible_ids(&[first, second]), vec!["below", "above"]);
}

// ============================================================================
// Overlay exclusion
// ============================================================================

#[test]
fn overlay_nodes_and_subtrees_are_excluded() {
    let mut overlay = view("coach_mark", Rect::new(0.0, 0.0, 400.0, 800.0));
    overlay.kind = ViewKind::Overlay;
    overlay.children = vec![button("coach_button", 0)];

    let snapshot = collect(&[window(vec![button("pay", 0), overlay])]);

    assert!(snapshot.elements.iter().all(|e| e.element_id.as_deref() != Some("coach_mark")));
    assert!(snapshot.elements.iter().all(|e| e.element_id.as_deref() != Some("coach_button")));
    // The overlay covers "pay" but does not occlude it
    assert!(snapshot.visible().any(|e| e.element_id.as_deref() == Some("pay")));
}

#[test]
fn top_level_overlay_surface_is_skipped() {
    let mut overlay_window = window(vec![button("coach", 0)]);
    overlay_window.kind = ViewKind::Overlay;

    let snapshot = collect(&[window(vec![button("pay", 0)]), overlay_window]);
    assert_eq!(snapshot.elements.len(), 2);
}

// ============================================================================
// Web surfaces and fingerprint
// ============================================================================

#[test]
fn web_surfaces_listed_in_order() {
    let mut anonymous = web_surface("ignored", 2);
    anonymous.surface_id = None;

    let snapshot = collect(&[window(vec![web_surface("checkout", 0), web_surface("offers", 1), anonymous])]);
    let surfaces = snapshot.web_surfaces();

    let ids: Vec<&str> = surfaces.iter().map(|s| s.surface_id.as_str()).collect();
    assert_eq!(ids, vec!["checkout", "offers", "surface-3"]);
    assert_eq!(surfaces[0].element, 1);
}

#[test]
fn hidden_web_surface_is_not_listed() {
    let mut surface = web_surface("checkout", 0);
    surface.hidden = true;

    let snapshot = collect(&[window(vec![surface])]);
    assert!(snapshot.web_surfaces().is_empty());
}

#[test]
fn fingerprint_tracks_visible_content() {
    let a = collect(&[window(vec![button("pay", 0), label("Pay now", 1)])]);
    let same = collect(&[window(vec![button("pay", 0), label("Pay now", 1)])]);
    let changed = collect(&[window(vec![button("pay", 0), label("Paid", 1)])]);

    assert_eq!(a.fingerprint(), same.fingerprint());
    assert_ne!(a.fingerprint(), changed.fingerprint());
    assert_eq!(a.fingerprint().len(), 40);
}

#[test]
fn empty_host_gives_empty_snapshot() {
    let snapshot = collect(&[]);
    assert!(snapshot.is_empty());
    assert!(snapshot.web_surfaces().is_empty());
}
