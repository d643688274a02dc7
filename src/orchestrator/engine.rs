use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::{
        catalog::{Catalog, Discovery, Flow, Identifiable, Page, Stage, StageKind},
        config_model::{PointerConfig, Trigger, TriggerMode, localize},
        loader::EngineSettings,
    },
    discovery::resolver::{resolve, resolve_contextual},
    error::EngineError,
    flow::stack::{FlowSignal, FlowStack},
    matcher::{
        entity::{Evaluation, best_match, distinct_web_ids},
        native,
        web::{self, ScriptEvaluator, check_all},
    },
    orchestrator::{presenter::Presenter, timer::DetectionTimer},
    snapshot::{
        collector::collect,
        snapshot_model::{Snapshot, ViewSource, WebSurfaceHandle},
    },
    stage::lifecycle::{PointerTarget, StageManager, StageOutcome, StageUpdate},
    trace::{logger::TraceLogger, trace::TraceEvent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    Discovery,
    Stage,
}

/// What the engine currently has on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Showing {
    Nothing,
    DiscoveryPrompt,
    MainButton,
    Pointer,
    FlowSelector,
}

/// Inbound calls from the host / presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    OptedIn { flow_index: usize },
    Dismissed,
    Muted,
    BranchSelected { flow_index: usize },
    LanguageChanged { code: String },
    MainButtonTapped,
    AnchorClicked { anchor: String },
}

/// The detection loop: alternates between looking for a discovery and
/// tracking stages of the active flow, and turns what it finds into calls on
/// the presenter.
///
/// Everything runs on the caller's thread. The host calls `poll` on its UI
/// loop; modal presentations (discovery prompt, flow selector) stop the timer
/// until the user answers.
pub struct ContextOrchestrator<P: Presenter> {
    catalog: Catalog,
    presenter: P,
    tracer: TraceLogger,
    language: String,

    mode: DetectionMode,
    timer: DetectionTimer,
    enabled: bool,
    started_at: Option<Instant>,
    tick: u64,
    showing: Showing,

    // ---- Stage mode ----
    flows: FlowStack,
    stages: StageManager,
    current_page: Option<String>,
    presented_pointer: Option<PointerTarget>,
    exhausted: HashSet<String>,
    active_discovery: Option<String>,

    // ---- Discovery mode ----
    muted: HashSet<String>,
    identified: HashSet<String>,
    current_discovery: Option<String>,
    /// Multi-flow discovery whose flow selector is on screen.
    selecting_flow: Option<String>,
    contextual_discovery: Option<String>,
    clicked_anchors: HashSet<String>,
}

impl<P: Presenter> ContextOrchestrator<P> {
    pub fn new(catalog: Catalog, presenter: P, settings: &EngineSettings) -> Self {
        let language = settings
            .language
            .clone()
            .unwrap_or_else(|| catalog.default_language().to_string());
        let tracer = match &settings.trace_path {
            Some(path) => TraceLogger::new(path),
            None => TraceLogger::disabled(),
        };

        Self {
            catalog,
            presenter,
            tracer,
            language,
            mode: DetectionMode::Discovery,
            timer: DetectionTimer::new(Duration::from_millis(settings.poll_interval_ms)),
            enabled: false,
            started_at: None,
            tick: 0,
            showing: Showing::Nothing,
            flows: FlowStack::new(),
            stages: StageManager::new(),
            current_page: None,
            presented_pointer: None,
            exhausted: HashSet::new(),
            active_discovery: None,
            muted: HashSet::new(),
            identified: HashSet::new(),
            current_discovery: None,
            selecting_flow: None,
            contextual_discovery: None,
            clicked_anchors: HashSet::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn showing(&self) -> Showing {
        self.showing
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn flow_stack(&self) -> &FlowStack {
        &self.flows
    }

    pub fn stage_manager(&self) -> &StageManager {
        &self.stages
    }

    pub fn current_page(&self) -> Option<&str> {
        self.current_page.as_deref()
    }

    pub fn current_discovery(&self) -> Option<&str> {
        self.current_discovery.as_deref()
    }

    pub fn is_muted(&self, discovery_id: &str) -> bool {
        self.muted.contains(discovery_id)
    }

    /// `key` is the stage name, or its id when unnamed.
    pub fn is_exhausted(&self, key: &str) -> bool {
        self.exhausted.contains(key)
    }

    pub fn poll_interval(&self) -> Duration {
        self.timer.interval()
    }

    pub fn is_detecting(&self) -> bool {
        self.enabled && self.timer.is_running()
    }

    // ========================================================================
    // Loop control
    // ========================================================================

    /// Start detection. Delay triggers count from the first start.
    pub fn start(&mut self, now: Instant) {
        self.enabled = true;
        self.started_at.get_or_insert(now);
        self.timer.start();
        info!(
            mode = ?self.mode,
            language = %self.language,
            interval_ms = self.timer.interval().as_millis() as u64,
            "detection started"
        );
    }

    /// Stop detection for good and clear everything on screen.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.timer.stop();
        self.clear_screen();
        self.flows.reset();
        self.reset_flow_session();
        self.mode = DetectionMode::Discovery;
        self.current_discovery = None;
        self.selecting_flow = None;
        self.contextual_discovery = None;
        info!("detection disabled");
    }

    pub fn switch_state(&mut self) {
        self.mode = match self.mode {
            DetectionMode::Discovery => DetectionMode::Stage,
            DetectionMode::Stage => DetectionMode::Discovery,
        };
        debug!(mode = ?self.mode, "switched detection mode");
    }

    /// Run a tick if the timer is due. Returns whether a tick ran.
    pub fn poll(&mut self, now: Instant, views: &dyn ViewSource, scripts: &mut dyn ScriptEvaluator) -> bool {
        if !self.enabled || !self.timer.fire(now) {
            return false;
        }
        self.tick(now, views, scripts);
        true
    }

    /// One evaluation. Does nothing while detection is paused or disabled.
    pub fn tick(&mut self, now: Instant, views: &dyn ViewSource, scripts: &mut dyn ScriptEvaluator) {
        if !self.is_detecting() {
            return;
        }
        self.tick += 1;

        let snapshot = collect(&views.surfaces());
        let mut trace = TraceEvent::now(self.tick, self.mode);
        if self.tracer.is_enabled() {
            trace = trace.with_snapshot(snapshot.fingerprint());
        }

        let trace = match self.mode {
            DetectionMode::Discovery => self.discovery_tick(now, &snapshot, scripts, trace),
            DetectionMode::Stage => self.stage_tick(&snapshot, scripts, trace),
        };
        self.tracer.log(&trace);
    }

    // ========================================================================
    // Discovery mode
    // ========================================================================

    fn discovery_tick(
        &mut self,
        now: Instant,
        snapshot: &Snapshot,
        scripts: &mut dyn ScriptEvaluator,
        trace: TraceEvent,
    ) -> TraceEvent {
        let mut suppressed = Vec::new();
        let mut candidates: Vec<&Discovery> = Vec::new();
        for discovery in self.catalog.discoveries() {
            if self.muted.contains(&discovery.id) {
                suppressed.push(format!("muted:{}", discovery.id));
            } else if !self.trigger_ready(discovery, now) {
                suppressed.push(format!("trigger_pending:{}", discovery.id));
            } else {
                candidates.push(discovery);
            }
        }

        // Identified discoveries only come back through the main button
        let mut fresh: Vec<&Discovery> = Vec::new();
        for &discovery in &candidates {
            if self.identified.contains(&discovery.id) {
                suppressed.push(format!("identified:{}", discovery.id));
            } else {
                fresh.push(discovery);
            }
        }
        let trace = trace.with_suppressed(&suppressed);

        let hit = resolve(&fresh, snapshot, self.catalog.identifiers(), &self.language, scripts)
            .map(|d| d.id.clone());

        if let Some(id) = hit {
            self.timer.stop();
            self.clear_screen();
            self.identified.insert(id.clone());
            self.present_prompt(&id);
            self.current_discovery = Some(id.clone());
            return trace.with_decision("discovery_identified").with_discovery(id);
        }

        let contextual = resolve_contextual(&candidates, &self.catalog, snapshot, &self.language, scripts)
            .map(|d| d.id.clone());

        match contextual {
            Some(id) => {
                if self.showing != Showing::MainButton {
                    self.clear_screen();
                    self.presenter.present_main_button();
                    self.showing = Showing::MainButton;
                }
                self.contextual_discovery = Some(id.clone());
                trace.with_decision("contextual_match").with_discovery(id)
            }
            None => {
                if self.showing == Showing::MainButton {
                    self.clear_screen();
                }
                self.contextual_discovery = None;
                trace.with_decision("no_discovery")
            }
        }
    }

    fn trigger_ready(&self, discovery: &Discovery, now: Instant) -> bool {
        match &discovery.trigger {
            Trigger::Immediate => true,
            Trigger::Delay { seconds } => self
                .started_at
                .is_some_and(|s| now.saturating_duration_since(s) >= Duration::from_secs(*seconds)),
            Trigger::Click { anchor } => self.clicked_anchors.contains(anchor),
        }
    }

    fn present_prompt(&mut self, discovery_id: &str) {
        let Some(discovery) = self.catalog.discovery(discovery_id) else {
            return;
        };
        let fallback = self.catalog.default_language();
        let prompt = &discovery.prompt;

        self.presenter.present_discovery_prompt(
            &localize(&prompt.header, &self.language, fallback),
            &localize(&prompt.opt_in, &self.language, fallback),
            &localize(&prompt.opt_out, &self.language, fallback),
            self.catalog.languages(),
            discovery.presentation,
        );
        self.showing = Showing::DiscoveryPrompt;
    }

    /// Let the user pick one of a multi-flow discovery's flows. The timer
    /// stays stopped until the choice arrives.
    fn present_flow_choice(&mut self, discovery_id: String) {
        let Some(discovery) = self.catalog.discovery(&discovery_id) else {
            return;
        };
        let title = localize(
            &discovery.prompt.header,
            &self.language,
            self.catalog.default_language(),
        );
        let options: Vec<String> = discovery
            .flow_ids
            .iter()
            .map(|id| match self.catalog.flow(id) {
                Some(flow) if !flow.name.is_empty() => flow.name.clone(),
                _ => id.clone(),
            })
            .collect();

        self.clear_screen();
        self.presenter.present_flow_selector(&title, &options);
        self.showing = Showing::FlowSelector;
        self.selecting_flow = Some(discovery_id);
    }

    // ========================================================================
    // Stage mode
    // ========================================================================

    fn stage_tick(&mut self, snapshot: &Snapshot, scripts: &mut dyn ScriptEvaluator, trace: TraceEvent) -> TraceEvent {
        let Some(mut flow) = self.flows.peek(false) else {
            self.end_flows();
            return trace.with_decision("no_active_flows");
        };
        let surfaces = snapshot.web_surfaces();

        let mut page_index = self.match_page(&flow, snapshot, &surfaces, scripts);
        let mut returned_to_parent = false;
        if page_index.is_none() {
            // Probe parents; the stack only changes when one of them matches
            while let Some(parent) = self.flows.peek(true) {
                if let Some(i) = self.match_page(&parent, snapshot, &surfaces, scripts) {
                    self.flows.commit_cursor();
                    flow = parent;
                    page_index = Some(i);
                    returned_to_parent = true;
                    break;
                }
            }
        }

        let trace = trace.with_flow(&flow.id);
        let page = page_index.and_then(|i| flow.pages.get(i));

        if let Some(page) = page {
            if self.current_page.as_deref() != Some(page.id.as_str()) {
                // Close out the previous page before loading this one
                if self.stages.current().is_some() {
                    let update = self.stages.update(None);
                    // A finished branch was already dropped when its parent matched
                    if self.apply_stage_update(update) && !returned_to_parent {
                        self.pop_flow();
                        return trace.with_decision("flow_completed").with_page(&page.id);
                    }
                }
                self.stages = StageManager::new();
                self.current_page = Some(page.id.clone());
            }
        }

        let mut suppressed = Vec::new();
        let matched = page.and_then(|p| self.match_stage(p, snapshot, &surfaces, scripts, &mut suppressed));
        let stage_id = matched.as_ref().map(|(s, _)| s.id.clone());
        let update = self.stages.update(matched);
        let decision = match &update.outcome {
            StageOutcome::NoChange => "no_stage",
            StageOutcome::NewStage { .. } => "new_stage",
            StageOutcome::SameStage { .. } => "same_stage",
            StageOutcome::Transitioned { .. } => "transitioned",
        };

        let flow_done = self.apply_stage_update(update);
        if flow_done {
            self.pop_flow();
        }

        let mut trace = trace
            .with_decision(if flow_done { "flow_completed" } else { decision })
            .with_suppressed(&suppressed);
        if let Some(page) = page {
            trace = trace.with_page(&page.id);
        }
        if let Some(id) = stage_id {
            trace = trace.with_stage(id);
        }
        trace
    }

    fn web_results<'e, T, I>(
        &self,
        candidates: I,
        surfaces: &[WebSurfaceHandle],
        scripts: &mut dyn ScriptEvaluator,
    ) -> HashMap<String, bool>
    where
        T: Identifiable + 'e,
        I: IntoIterator<Item = &'e T>,
    {
        if surfaces.is_empty() {
            return HashMap::new();
        }
        check_all(
            distinct_web_ids(candidates),
            surfaces,
            self.catalog.identifiers(),
            &self.language,
            scripts,
        )
    }

    fn match_page(
        &self,
        flow: &Flow,
        snapshot: &Snapshot,
        surfaces: &[WebSurfaceHandle],
        scripts: &mut dyn ScriptEvaluator,
    ) -> Option<usize> {
        let web_results = self.web_results(flow.pages.iter(), surfaces, scripts);
        let eval = Evaluation {
            identifiers: self.catalog.identifiers(),
            snapshot,
            language: &self.language,
            web_results: &web_results,
        };
        let best: &Page = best_match(flow.pages.iter(), &eval)?;
        flow.pages.iter().position(|p| std::ptr::eq(p, best))
    }

    fn match_stage(
        &self,
        page: &Page,
        snapshot: &Snapshot,
        surfaces: &[WebSurfaceHandle],
        scripts: &mut dyn ScriptEvaluator,
        suppressed: &mut Vec<String>,
    ) -> Option<(Stage, Option<PointerTarget>)> {
        let mut pool: Vec<&Stage> = Vec::new();
        for stage in &page.stages {
            if self.exhausted.contains(stage.counter_key()) {
                suppressed.push(format!("exhausted:{}", stage.id));
            } else {
                pool.push(stage);
            }
        }

        let web_results = self.web_results(pool.iter().copied(), surfaces, scripts);
        let eval = Evaluation {
            identifiers: self.catalog.identifiers(),
            snapshot,
            language: &self.language,
            web_results: &web_results,
        };
        let stage = best_match(pool.iter().copied(), &eval)?;

        let pointer = match (&stage.kind, &stage.pointer) {
            (StageKind::Branch(_), _) | (_, None) => None,
            (_, Some(config)) => match self.locate_pointer(config, snapshot, surfaces, scripts) {
                Some(target) => Some(target),
                None => {
                    // Nothing to point at: the stage is not shown this tick
                    suppressed.push(format!("pointer_missing:{}", stage.id));
                    return None;
                }
            },
        };

        Some((stage.clone(), pointer))
    }

    fn locate_pointer(
        &self,
        config: &PointerConfig,
        snapshot: &Snapshot,
        surfaces: &[WebSurfaceHandle],
        scripts: &mut dyn ScriptEvaluator,
    ) -> Option<PointerTarget> {
        match config {
            PointerConfig::Native { identifier } => {
                let selector = self.catalog.identifiers().get(identifier)?.as_native()?;
                let element = native::matches(selector, snapshot, &self.language).into_iter().next()?;
                Some(PointerTarget::Native {
                    element: element.index,
                    rect: element.bounds,
                })
            }
            PointerConfig::Web { identifier } => {
                let (rect, surface) = web::locate(identifier, surfaces, self.catalog.identifiers(), scripts)?;
                Some(PointerTarget::Web { rect, surface })
            }
        }
    }

    /// Drive presentation from a stage update. Returns true when the update
    /// finished the current flow; popping it is left to the caller.
    fn apply_stage_update(&mut self, update: StageUpdate) -> bool {
        if let Some(performed) = &update.performed {
            if performed.exhausted {
                debug!(stage = %performed.stage_id, key = %performed.key, count = performed.count, "stage reached its frequency cap");
                self.exhausted.insert(performed.key.clone());
            }
        }

        match update.outcome {
            StageOutcome::NoChange => {}

            StageOutcome::NewStage { stage, pointer } => {
                self.clear_screen();
                match &stage.kind {
                    StageKind::Branch(info) => {
                        let fallback = self.catalog.default_language();
                        let title = localize(&info.title, &self.language, fallback);
                        let options: Vec<String> = info
                            .options
                            .iter()
                            .map(|o| localize(&o.title, &self.language, fallback))
                            .collect();
                        self.presenter.present_flow_selector(&title, &options);
                        self.showing = Showing::FlowSelector;
                        self.timer.stop();
                    }
                    StageKind::Normal | StageKind::Success => {
                        self.presenter.present_pointer(&stage, pointer.as_ref());
                        self.presented_pointer = pointer;
                        self.showing = Showing::Pointer;
                    }
                }
            }

            StageOutcome::SameStage { pointer, .. } => {
                if self.showing == Showing::Pointer && pointer != self.presented_pointer {
                    if let Some(target) = &pointer {
                        self.presenter.update_pointer(target.rect(), target.surface());
                    }
                    self.presented_pointer = pointer;
                }
            }

            StageOutcome::Transitioned { previous } => {
                debug!(stage = %previous.id, "stage ended");
                self.clear_screen();
            }
        }

        update.performed.as_ref().is_some_and(|p| p.terminal)
    }

    fn pop_flow(&mut self) {
        self.stages = StageManager::new();
        self.current_page = None;
        self.presented_pointer = None;

        if self.flows.pop() == FlowSignal::NoActiveFlows {
            self.end_flows();
        }
    }

    /// No flows left: go back to looking for discoveries.
    fn end_flows(&mut self) {
        info!(discovery = ?self.active_discovery, "flow session finished");
        self.reset_flow_session();
        if self.mode == DetectionMode::Stage {
            self.switch_state();
        }
    }

    fn reset_flow_session(&mut self) {
        self.stages = StageManager::new();
        self.current_page = None;
        self.presented_pointer = None;
        self.exhausted.clear();
        self.active_discovery = None;
    }

    fn clear_screen(&mut self) {
        if self.showing != Showing::Nothing {
            self.presenter.remove_all();
            self.showing = Showing::Nothing;
        }
    }

    // ========================================================================
    // Inbound calls
    // ========================================================================

    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::OptedIn { flow_index } => self.user_opted_in(flow_index),
            HostEvent::Dismissed => self.user_dismissed(),
            HostEvent::Muted => self.user_muted(),
            HostEvent::BranchSelected { flow_index } => self.branch_selected(flow_index),
            HostEvent::LanguageChanged { code } => self.language_changed(&code),
            HostEvent::MainButtonTapped => self.main_button_tapped(),
            HostEvent::AnchorClicked { anchor } => self.anchor_clicked(&anchor),
        }
    }

    /// Accept the shown discovery. A single-flow discovery starts its first
    /// flow; a multi-flow one first presents its flows, and the next call
    /// starts the `flow_index`-th of them.
    pub fn user_opted_in(&mut self, flow_index: usize) {
        if let Some(discovery_id) = self.selecting_flow.take() {
            self.clear_screen();
            self.start_discovery_flow(discovery_id, flow_index);
            return;
        }

        let Some(discovery_id) = self.current_discovery.take() else {
            warn!(flow_index, "opt-in without a discovery on screen");
            return;
        };
        let choose = self
            .catalog
            .discovery(&discovery_id)
            .is_some_and(|d| d.trigger_mode == TriggerMode::Multi && d.flow_ids.len() > 1);

        if choose {
            self.present_flow_choice(discovery_id);
        } else {
            self.clear_screen();
            self.start_discovery_flow(discovery_id, 0);
        }
    }

    fn start_discovery_flow(&mut self, discovery_id: String, flow_index: usize) {
        let flow_id = self
            .catalog
            .discovery(&discovery_id)
            .and_then(|d| d.flow_ids.get(flow_index).cloned());

        match flow_id.as_deref().and_then(|id| self.catalog.flow(id)) {
            Some(flow) => {
                info!(discovery = %discovery_id, flow = %flow.id, "flow started");
                self.flows.push(flow, false);
                self.reset_flow_session();
                self.active_discovery = Some(discovery_id);
                self.contextual_discovery = None;
                if self.mode == DetectionMode::Discovery {
                    self.switch_state();
                }
            }
            None => {
                let err = EngineError::UnknownFlow {
                    flow_id: flow_id.unwrap_or_else(|| format!("#{}", flow_index)),
                    referenced_by: discovery_id,
                };
                warn!(error = %err, "opt-in ignored");
            }
        }

        self.timer.start();
    }

    pub fn user_dismissed(&mut self) {
        self.clear_screen();
        self.current_discovery = None;
        self.selecting_flow = None;
        self.timer.start();
    }

    /// Mute the discovery in play and end any running flow.
    pub fn user_muted(&mut self) {
        let target = match self.mode {
            DetectionMode::Discovery => self
                .selecting_flow
                .take()
                .or_else(|| self.current_discovery.take())
                .or_else(|| self.contextual_discovery.take()),
            DetectionMode::Stage => self.active_discovery.clone(),
        };
        if let Some(id) = target {
            info!(discovery = %id, "discovery muted");
            self.muted.insert(id);
        }

        self.clear_screen();
        if self.mode == DetectionMode::Stage {
            self.flows.reset();
            self.end_flows();
        }
        self.timer.start();
    }

    /// Start the chosen branch flow on top of the current one. While a
    /// multi-flow discovery's selector is up, start that discovery's flow.
    pub fn branch_selected(&mut self, flow_index: usize) {
        if self.selecting_flow.is_some() {
            self.user_opted_in(flow_index);
            return;
        }
        let Some(stage) = self.stages.current().cloned() else {
            warn!(flow_index, "branch selected without a current stage");
            return;
        };
        let Some(info) = stage.branch() else {
            warn!(stage = %stage.id, "branch selected on a non-branch stage");
            return;
        };
        self.clear_screen();

        let option = info.options.get(flow_index);
        match option.and_then(|o| self.catalog.flow(&o.flow_id)) {
            Some(flow) => {
                if let Some(performed) = self.stages.complete_current() {
                    if performed.exhausted {
                        self.exhausted.insert(performed.key);
                    }
                }
                info!(stage = %stage.id, flow = %flow.id, "branch flow started");
                self.flows.push(flow, true);
                self.stages = StageManager::new();
                self.current_page = None;
                self.presented_pointer = None;
            }
            None => {
                let err = EngineError::UnknownFlow {
                    flow_id: option
                        .map(|o| o.flow_id.clone())
                        .unwrap_or_else(|| format!("#{}", flow_index)),
                    referenced_by: stage.id.clone(),
                };
                warn!(error = %err, "branch selection ignored");
            }
        }

        self.timer.start();
    }

    pub fn language_changed(&mut self, code: &str) {
        let languages = self.catalog.languages();
        if !languages.is_empty() && !languages.iter().any(|l| l == code) {
            warn!(code, "unknown language ignored");
            return;
        }
        self.language = code.to_string();
        self.clear_screen();

        self.stages.clear_current();
        self.presented_pointer = None;
        // Let the discovery come back in the new language
        if let Some(id) = self.current_discovery.take().or_else(|| self.selecting_flow.take()) {
            self.identified.remove(&id);
        }
        self.timer.start();
    }

    pub fn main_button_tapped(&mut self) {
        let Some(id) = self.contextual_discovery.clone() else {
            return;
        };
        self.timer.stop();
        self.clear_screen();
        self.identified.insert(id.clone());
        self.present_prompt(&id);
        self.current_discovery = Some(id);
    }

    pub fn anchor_clicked(&mut self, anchor: &str) {
        self.clicked_anchors.insert(anchor.to_string());
    }
}
