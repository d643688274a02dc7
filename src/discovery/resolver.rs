use std::collections::HashMap;

use crate::config::catalog::{Catalog, Discovery, Page};
use crate::config::config_model::IdentifierMap;
use crate::matcher::entity::{Evaluation, best_match, distinct_web_ids};
use crate::matcher::web::{ScriptEvaluator, check_all};
use crate::snapshot::snapshot_model::Snapshot;

/// Pick at most one discovery from `candidates` (given in catalog order).
///
/// Without web surfaces only native-only candidates are considered, so a
/// candidate with any web identifier is dropped even if its native part
/// would match. With web surfaces every distinct web identifier of the pool
/// is checked once, then each candidate is judged on both halves.
pub fn resolve<'d>(
    candidates: &[&'d Discovery],
    snapshot: &Snapshot,
    identifiers: &IdentifierMap,
    language: &str,
    evaluator: &mut dyn ScriptEvaluator,
) -> Option<&'d Discovery> {
    let surfaces = snapshot.web_surfaces();

    if surfaces.is_empty() {
        let no_web = HashMap::new();
        let eval = Evaluation {
            identifiers,
            snapshot,
            language,
            web_results: &no_web,
        };
        let native_only = candidates
            .iter()
            .copied()
            .filter(|d| !d.requirements.has_web());
        return best_match(native_only, &eval);
    }

    let web_pool = candidates.iter().copied().filter(|d| d.requirements.has_web());
    let web_results = check_all(distinct_web_ids(web_pool), &surfaces, identifiers, language, evaluator);

    let eval = Evaluation {
        identifiers,
        snapshot,
        language,
        web_results: &web_results,
    };
    best_match(candidates.iter().copied(), &eval)
}

/// First candidate (catalog order) one of whose flows has a page matching
/// right now. Used when no discovery matched on its own identifiers.
pub fn resolve_contextual<'d>(
    candidates: &[&'d Discovery],
    catalog: &Catalog,
    snapshot: &Snapshot,
    language: &str,
    evaluator: &mut dyn ScriptEvaluator,
) -> Option<&'d Discovery> {
    let flows_of = |d: &Discovery| {
        d.flow_ids
            .iter()
            .filter_map(|id| catalog.flow(id))
            .collect::<Vec<_>>()
    };

    let per_candidate: Vec<_> = candidates.iter().map(|d| (*d, flows_of(d))).collect();
    let pages: Vec<&Page> = per_candidate
        .iter()
        .flat_map(|(_, flows)| flows.iter().flat_map(|f| f.pages.iter()))
        .collect();

    let surfaces = snapshot.web_surfaces();
    let web_results = if surfaces.is_empty() {
        HashMap::new()
    } else {
        check_all(
            distinct_web_ids(pages.iter().copied()),
            &surfaces,
            catalog.identifiers(),
            language,
            evaluator,
        )
    };

    let eval = Evaluation {
        identifiers: catalog.identifiers(),
        snapshot,
        language,
        web_results: &web_results,
    };

    per_candidate
        .iter()
        .find(|(_, flows)| flows.iter().any(|f| best_match(f.pages.iter(), &eval).is_some()))
        .map(|(d, _)| *d)
}
