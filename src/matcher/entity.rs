use std::collections::{HashMap, HashSet};

use crate::config::catalog::Identifiable;
use crate::config::config_model::{IdentifierMap, Requirements};
use crate::matcher::native;
use crate::snapshot::snapshot_model::Snapshot;

/// Everything needed to decide whether an entity is satisfied at one tick.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    pub identifiers: &'a IdentifierMap,
    pub snapshot: &'a Snapshot,
    pub language: &'a str,
    /// Batched web results; ids absent from the map count as `false`.
    pub web_results: &'a HashMap<String, bool>,
}

impl<'a> Evaluation<'a> {
    /// Every native identifier matches at least one element.
    pub fn native_satisfied(&self, requirements: &Requirements) -> bool {
        requirements.native_ids.iter().all(|id| {
            self.identifiers
                .get(id)
                .and_then(|i| i.as_native())
                .is_some_and(|s| native::is_present(s, self.snapshot, self.language))
        })
    }

    /// Every web identifier resolved `true`.
    pub fn web_satisfied(&self, requirements: &Requirements) -> bool {
        requirements
            .web_ids
            .iter()
            .all(|id| self.web_results.get(id).copied().unwrap_or(false))
    }

    pub fn satisfied(&self, requirements: &Requirements) -> bool {
        self.native_satisfied(requirements)
            && (!requirements.has_web() || self.web_satisfied(requirements))
    }

    /// Entity weight: the override when configured, otherwise the summed
    /// weights of its identifiers (all of which match once satisfied).
    pub fn score(&self, requirements: &Requirements) -> u32 {
        requirements.weight.unwrap_or_else(|| {
            requirements
                .native_ids
                .iter()
                .chain(requirements.web_ids.iter())
                .filter_map(|id| self.identifiers.get(id))
                .map(|i| i.weight())
                .sum()
        })
    }
}

/// Highest-scoring satisfied candidate. Ties keep the earliest candidate:
/// the running best is only replaced on a strictly greater score.
pub fn best_match<'e, T, I>(candidates: I, eval: &Evaluation<'_>) -> Option<&'e T>
where
    T: Identifiable + 'e,
    I: IntoIterator<Item = &'e T>,
{
    let mut best: Option<(&'e T, u32)> = None;

    for candidate in candidates {
        let requirements = candidate.requirements();
        if !eval.satisfied(requirements) {
            continue;
        }
        let score = eval.score(requirements);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(c, _)| c)
}

/// Distinct web identifier ids referenced by `candidates`, in first-seen order.
pub fn distinct_web_ids<'e, T, I>(candidates: I) -> Vec<&'e String>
where
    T: Identifiable + 'e,
    I: IntoIterator<Item = &'e T>,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .flat_map(|c| c.requirements().web_ids.iter())
        .filter(|id| seen.insert(*id))
        .collect()
}
