use crate::snapshot::snapshot_model::{Element, Snapshot, ViewKind, ViewNode};

const MIN_VISIBLE_ALPHA: f64 = 0.01;

/// Collect a snapshot from every top-level surface, in the order given
/// (later surfaces are drawn above earlier ones).
///
/// Overlay nodes are skipped together with their subtree. Hidden, transparent
/// and occluded nodes stay in `elements` so child/sibling paths can still walk
/// through them, but never appear in `order`.
pub fn collect(surfaces: &[ViewNode]) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for root in surfaces {
        if root.kind == ViewKind::Overlay {
            continue;
        }
        visit(root, None, true, &mut snapshot);
    }

    snapshot
}

fn visit(node: &ViewNode, parent: Option<usize>, parent_visible: bool, snapshot: &mut Snapshot) -> usize {
    let index = snapshot.elements.len();
    let visible = parent_visible && is_self_visible(node);

    snapshot.elements.push(Element {
        index,
        parent,
        children: Vec::new(),
        element_id: node.element_id.clone(),
        accessibility_label: node.accessibility_label.clone(),
        tag: node.tag,
        text: node.text.clone(),
        placeholder: node.placeholder.clone(),
        bounds: node.bounds,
        kind: node.kind,
        surface_id: node.surface_id.clone(),
        visible,
    });

    if visible {
        snapshot.order.push(index);
    }

    let children: Vec<&ViewNode> = node
        .children
        .iter()
        .filter(|c| c.kind != ViewKind::Overlay)
        .collect();
    let occluded = occluded_siblings(&children);

    let mut child_indices = Vec::with_capacity(children.len());
    for (pos, child) in children.iter().enumerate() {
        let child_visible = visible && !occluded[pos];
        child_indices.push(visit(child, Some(index), child_visible, snapshot));
    }
    snapshot.elements[index].children = child_indices;

    index
}

fn is_self_visible(node: &ViewNode) -> bool {
    !node.hidden && node.alpha > MIN_VISIBLE_ALPHA
}

/// A sibling is occluded when a later visible sibling's bounds fully contain it.
pub fn occluded_siblings(siblings: &[&ViewNode]) -> Vec<bool> {
    siblings
        .iter()
        .enumerate()
        .map(|(i, earlier)| {
            siblings[i + 1..]
                .iter()
                .any(|later| is_self_visible(later) && later.bounds.contains(&earlier.bounds))
        })
        .collect()
}
