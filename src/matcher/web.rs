use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::config::config_model::{IdentifierMap, WebLocator};
use crate::error::EngineError;
use crate::snapshot::snapshot_model::{Rect, WebSurfaceHandle};

// ============================================================================
// Host seam
// ============================================================================

/// One script round-trip against one web surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest<'a> {
    pub identifier_id: &'a str,
    pub surface: &'a WebSurfaceHandle,
    pub script: String,
}

/// Evaluates scripts inside the host's web surfaces.
///
/// Callers never have more than one request outstanding: concurrent
/// evaluation against the same surface is not ordered by the host.
pub trait ScriptEvaluator {
    /// Run a presence script; it resolves to a boolean.
    fn evaluate(&mut self, request: &ScriptRequest<'_>) -> Result<bool, EngineError>;

    /// Run a bounds script; `None` when the node is absent.
    fn locate(&mut self, request: &ScriptRequest<'_>) -> Result<Option<Rect>, EngineError>;
}

// ============================================================================
// Locator → script
// ============================================================================

/// Script resolving to `true` when the locator's node exists (and carries the
/// expected text for `language`, when configured).
pub fn presence_script(locator: &WebLocator, language: &str) -> String {
    let selector = js_string(&locator.selector);
    match locator.text.as_ref().and_then(|t| t.get(language)) {
        Some(text) => format!(
            "(function(){{var n=document.querySelector({});return !!n&&n.innerText.trim()==={};}})()",
            selector,
            js_string(text.trim())
        ),
        None => format!("(function(){{return !!document.querySelector({});}})()", selector),
    }
}

/// Script resolving to the node's client rect as `{x,y,width,height}`, or null.
pub fn bounds_script(locator: &WebLocator) -> String {
    format!(
        "(function(){{var n=document.querySelector({});if(!n)return null;var r=n.getBoundingClientRect();return {{x:r.x,y:r.y,width:r.width,height:r.height}};}})()",
        js_string(&locator.selector)
    )
}

fn js_string(raw: &str) -> String {
    // A JSON string literal is a valid JS string literal
    serde_json::to_string(raw).unwrap_or_else(|_| "\"\"".to_string())
}

// ============================================================================
// Serialized batch check
// ============================================================================

/// A query handed out by `WebCheck::next_query`.
#[derive(Debug, Clone, PartialEq)]
pub struct WebQuery {
    pub ticket: u64,
    pub identifier_id: String,
    pub surface: WebSurfaceHandle,
}

/// Resolves a set of web identifiers against a list of surfaces, one
/// identifier at a time and one surface at a time, with a single query in
/// flight.
///
/// An identifier resolves `true` on the first surface reporting a match (the
/// remaining surfaces are never queried) and `false` once every surface has
/// answered `false`. Completions carrying any ticket other than the in-flight
/// one are ignored.
#[derive(Debug, Clone)]
pub struct WebCheck {
    pending: VecDeque<String>,
    surfaces: Vec<WebSurfaceHandle>,
    surface_pos: usize,
    /// Ticket of the outstanding query.
    in_flight: Option<u64>,
    next_ticket: u64,
    results: HashMap<String, bool>,
}

impl WebCheck {
    /// Duplicate ids are checked once; first occurrence decides the order.
    pub fn new<I, S>(identifier_ids: I, surfaces: Vec<WebSurfaceHandle>) -> WebCheck
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let pending = identifier_ids
            .into_iter()
            .map(|s| -> String { s.into() })
            .filter(|id| seen.insert(id.clone()))
            .collect();

        WebCheck {
            pending,
            surfaces,
            surface_pos: 0,
            in_flight: None,
            next_ticket: 0,
            results: HashMap::new(),
        }
    }

    /// The next query to run, or `None` while one is outstanding or when done.
    pub fn next_query(&mut self) -> Option<WebQuery> {
        if self.in_flight.is_some() {
            return None;
        }

        if self.surfaces.is_empty() {
            // Nothing can ever match
            while let Some(id) = self.pending.pop_front() {
                self.results.insert(id, false);
            }
            return None;
        }

        let identifier_id = self.pending.front()?.clone();
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(ticket);

        Some(WebQuery {
            ticket,
            identifier_id,
            surface: self.surfaces[self.surface_pos].clone(),
        })
    }

    /// Record the answer to the in-flight query. Returns `false` (and changes
    /// nothing) for stale or unknown tickets.
    pub fn complete(&mut self, ticket: u64, matched: bool) -> bool {
        if self.in_flight != Some(ticket) {
            debug!(ticket, "discarding stale web query result");
            return false;
        }
        self.in_flight = None;

        let Some(id) = self.pending.front().cloned() else {
            return false;
        };

        if matched {
            self.resolve_current(id, true);
        } else {
            self.surface_pos += 1;
            if self.surface_pos >= self.surfaces.len() {
                self.resolve_current(id, false);
            }
        }
        true
    }

    fn resolve_current(&mut self, id: String, value: bool) {
        self.pending.pop_front();
        self.surface_pos = 0;
        self.results.insert(id, value);
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() || self.surfaces.is_empty()
    }

    pub fn results(&self) -> &HashMap<String, bool> {
        &self.results
    }

    pub fn into_results(mut self) -> HashMap<String, bool> {
        for id in self.pending.drain(..) {
            self.results.insert(id, false);
        }
        self.results
    }
}

/// Drive a `WebCheck` to completion with a blocking evaluator.
///
/// Ids that do not name a web identifier resolve `false` without a query.
/// Evaluation errors are logged and count as "not on this surface".
pub fn check_all<'a, I>(
    identifier_ids: I,
    surfaces: &[WebSurfaceHandle],
    identifiers: &IdentifierMap,
    language: &str,
    evaluator: &mut dyn ScriptEvaluator,
) -> HashMap<String, bool>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut unqueryable = Vec::new();
    let queryable: Vec<&String> = identifier_ids
        .into_iter()
        .filter(|id| {
            let ok = identifiers.get(*id).and_then(|i| i.as_web()).is_some();
            if !ok {
                unqueryable.push((*id).clone());
            }
            ok
        })
        .collect();

    let mut check = WebCheck::new(queryable.iter().map(|s| s.as_str()), surfaces.to_vec());

    while let Some(query) = check.next_query() {
        let Some(locator) = identifiers.get(&query.identifier_id).and_then(|i| i.as_web()) else {
            check.complete(query.ticket, false);
            continue;
        };

        let request = ScriptRequest {
            identifier_id: &query.identifier_id,
            surface: &query.surface,
            script: presence_script(locator, language),
        };

        let matched = match evaluator.evaluate(&request) {
            Ok(m) => m,
            Err(e) => {
                warn!(identifier = %query.identifier_id, error = %e, "web identifier check failed");
                false
            }
        };
        check.complete(query.ticket, matched);
    }

    let mut results = check.into_results();
    for id in unqueryable {
        results.insert(id, false);
    }
    results
}

/// Bounds of a web identifier's node in the first surface that has it.
pub fn locate(
    identifier_id: &str,
    surfaces: &[WebSurfaceHandle],
    identifiers: &IdentifierMap,
    evaluator: &mut dyn ScriptEvaluator,
) -> Option<(Rect, WebSurfaceHandle)> {
    let locator = identifiers.get(identifier_id)?.as_web()?;

    for surface in surfaces {
        let request = ScriptRequest {
            identifier_id,
            surface,
            script: bounds_script(locator),
        };
        match evaluator.locate(&request) {
            Ok(Some(rect)) => return Some((rect, surface.clone())),
            Ok(None) => {}
            Err(e) => warn!(identifier = %identifier_id, error = %e, "web pointer lookup failed"),
        }
    }
    None
}
