use std::collections::HashSet;

use crate::config::config_model::{ElementPath, LocalizedText, NativeSelector};
use crate::snapshot::snapshot_model::{Element, Snapshot};

/// Elements matching `selector` in the visible part of `snapshot`, remapped
/// through the selector's path when one is configured.
///
/// Never fails: a selector without criteria, text missing for `language`, or
/// a path that runs out of range all just yield fewer (or no) elements.
pub fn matches<'s>(selector: &NativeSelector, snapshot: &'s Snapshot, language: &str) -> Vec<&'s Element> {
    if !selector.has_criteria() {
        return vec![];
    }

    let text = match localized(&selector.text, language) {
        Ok(t) => t,
        Err(()) => return vec![],
    };
    let placeholder = match localized(&selector.placeholder, language) {
        Ok(p) => p,
        Err(()) => return vec![],
    };

    let base = snapshot.visible().filter(|el| {
        eq_opt(&selector.element_id, &el.element_id)
            && eq_opt(&selector.accessibility_label, &el.accessibility_label)
            && selector.tag.is_none_or(|t| el.tag == Some(t))
            && text.is_none_or(|t| el.text.as_deref().map(str::trim) == Some(t.trim()))
            && placeholder.is_none_or(|p| el.placeholder.as_deref().map(str::trim) == Some(p.trim()))
    });

    let Some(path) = &selector.path else {
        return base.collect();
    };

    let mut seen = HashSet::new();
    base.filter_map(|el| remap(el, path, snapshot))
        .filter(|el| seen.insert(el.index))
        .collect()
}

/// True when at least one element matches.
pub fn is_present(selector: &NativeSelector, snapshot: &Snapshot, language: &str) -> bool {
    !matches(selector, snapshot, language).is_empty()
}

fn remap<'s>(el: &Element, path: &ElementPath, snapshot: &'s Snapshot) -> Option<&'s Element> {
    match path {
        ElementPath::Children(indices) => {
            let mut current = snapshot.element(el.index)?;
            for &i in indices {
                let next = *current.children.get(i)?;
                current = snapshot.element(next)?;
            }
            Some(current)
        }
        ElementPath::Sibling(i) => {
            let parent = snapshot.element(el.parent?)?;
            snapshot.element(*parent.children.get(*i)?)
        }
    }
}

/// `Ok(None)` when the criterion is unset, `Err` when it is set but has no
/// entry for the active language.
fn localized<'a>(text: &'a Option<LocalizedText>, language: &str) -> Result<Option<&'a str>, ()> {
    match text {
        None => Ok(None),
        Some(map) => map.get(language).map(|s| Some(s.as_str())).ok_or(()),
    }
}

fn eq_opt(expected: &Option<String>, actual: &Option<String>) -> bool {
    match expected {
        None => true,
        Some(e) => actual.as_deref() == Some(e.as_str()),
    }
}
