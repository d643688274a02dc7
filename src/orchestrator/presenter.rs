use crate::config::catalog::Stage;
use crate::config::config_model::PresentationKind;
use crate::snapshot::snapshot_model::{Rect, WebSurfaceHandle};
use crate::stage::lifecycle::PointerTarget;

/// Outbound calls to the (external) presentation layer.
pub trait Presenter {
    /// `target` is `None` for stages shown without an anchor (popups).
    fn present_pointer(&mut self, stage: &Stage, target: Option<&PointerTarget>);
    fn update_pointer(&mut self, rect: Rect, surface: Option<&WebSurfaceHandle>);
    fn present_flow_selector(&mut self, title: &str, options: &[String]);
    /// `presentation` is the discovery's configured surface (popup, banner, ...).
    fn present_discovery_prompt(
        &mut self,
        header: &str,
        opt_in: &str,
        opt_out: &str,
        languages: &[String],
        presentation: PresentationKind,
    );
    fn present_main_button(&mut self);
    fn remove_all(&mut self);
}

/// A presentation call, as recorded by `RecordingPresenter`.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Pointer { stage_id: String, target: Option<PointerTarget> },
    UpdatePointer { rect: Rect, surface: Option<WebSurfaceHandle> },
    FlowSelector { title: String, options: Vec<String> },
    DiscoveryPrompt {
        header: String,
        opt_in: String,
        opt_out: String,
        languages: Vec<String>,
        presentation: PresentationKind,
    },
    MainButton,
    RemoveAll,
}

/// Keeps every call in order; used by the replay command and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the calls recorded so far.
    pub fn drain(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Presenter for RecordingPresenter {
    fn present_pointer(&mut self, stage: &Stage, target: Option<&PointerTarget>) {
        self.calls.push(PresenterCall::Pointer {
            stage_id: stage.id.clone(),
            target: target.cloned(),
        });
    }

    fn update_pointer(&mut self, rect: Rect, surface: Option<&WebSurfaceHandle>) {
        self.calls.push(PresenterCall::UpdatePointer {
            rect,
            surface: surface.cloned(),
        });
    }

    fn present_flow_selector(&mut self, title: &str, options: &[String]) {
        self.calls.push(PresenterCall::FlowSelector {
            title: title.to_string(),
            options: options.to_vec(),
        });
    }

    fn present_discovery_prompt(
        &mut self,
        header: &str,
        opt_in: &str,
        opt_out: &str,
        languages: &[String],
        presentation: PresentationKind,
    ) {
        self.calls.push(PresenterCall::DiscoveryPrompt {
            header: header.to_string(),
            opt_in: opt_in.to_string(),
            opt_out: opt_out.to_string(),
            languages: languages.to_vec(),
            presentation,
        });
    }

    fn present_main_button(&mut self) {
        self.calls.push(PresenterCall::MainButton);
    }

    fn remove_all(&mut self) {
        self.calls.push(PresenterCall::RemoveAll);
    }
}
