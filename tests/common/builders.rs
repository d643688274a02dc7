use context_coach::config::config_model::{
    BranchInfo, BranchOption, DiscoveryConfig, EngineConfig, FlowConfig, Identifier, LocalizedText,
    NativeSelector, PageConfig, PointerConfig, PresentationKind, PromptConfig, Requirements,
    StageConfig, StageType, Trigger, TriggerMode, WebLocator,
};
use context_coach::snapshot::snapshot_model::{Rect, ViewKind, ViewNode};

// ============================================================================
// View trees
// ============================================================================

pub fn window(children: Vec<ViewNode>) -> ViewNode {
    ViewNode {
        bounds: Rect::new(0.0, 0.0, 400.0, 800.0),
        children,
        ..Default::default()
    }
}

pub fn view(element_id: &str, bounds: Rect) -> ViewNode {
    ViewNode {
        element_id: Some(element_id.to_string()),
        bounds,
        ..Default::default()
    }
}

/// A small view laid out in a row, so siblings never contain each other.
pub fn button(element_id: &str, slot: usize) -> ViewNode {
    view(element_id, Rect::new(slot as f64 * 50.0, 0.0, 40.0, 40.0))
}

pub fn label(text: &str, slot: usize) -> ViewNode {
    ViewNode {
        text: Some(text.to_string()),
        bounds: Rect::new(slot as f64 * 50.0, 100.0, 40.0, 20.0),
        ..Default::default()
    }
}

pub fn web_surface(surface_id: &str, slot: usize) -> ViewNode {
    ViewNode {
        kind: ViewKind::WebSurface,
        surface_id: Some(surface_id.to_string()),
        bounds: Rect::new(slot as f64 * 50.0, 200.0, 40.0, 40.0),
        ..Default::default()
    }
}

// ============================================================================
// Identifiers
// ============================================================================

pub fn lt(entries: &[(&str, &str)]) -> LocalizedText {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn by_id(element_id: &str) -> NativeSelector {
    NativeSelector {
        element_id: Some(element_id.to_string()),
        ..Default::default()
    }
}

pub fn native(element_id: &str) -> Identifier {
    Identifier::Native(by_id(element_id))
}

pub fn weighted_native(element_id: &str, weight: u32) -> Identifier {
    Identifier::Native(NativeSelector {
        weight,
        ..by_id(element_id)
    })
}

pub fn web(selector: &str) -> Identifier {
    Identifier::Web(WebLocator::new(selector))
}

pub fn requires(native_ids: &[&str], web_ids: &[&str]) -> Requirements {
    Requirements {
        native_ids: native_ids.iter().map(|s| s.to_string()).collect(),
        web_ids: web_ids.iter().map(|s| s.to_string()).collect(),
        weight: None,
    }
}

// ============================================================================
// Entities
// ============================================================================

pub fn discovery(id: &str, requirements: Requirements, flow_ids: &[&str]) -> DiscoveryConfig {
    DiscoveryConfig {
        id: id.to_string(),
        name: id.to_string(),
        requirements,
        flow_ids: flow_ids.iter().map(|s| s.to_string()).collect(),
        presentation: PresentationKind::Popup,
        trigger_mode: TriggerMode::Single,
        trigger: Trigger::Immediate,
        prompt: PromptConfig {
            header: lt(&[("en", "Need help?"), ("hi", "मदद चाहिए?")]),
            opt_in: lt(&[("en", "Show me")]),
            opt_out: lt(&[("en", "No thanks")]),
        },
    }
}

pub fn stage(id: &str, requirements: Requirements) -> StageConfig {
    StageConfig {
        id: id.to_string(),
        name: id.to_string(),
        requirements,
        stage_type: StageType::Normal,
        frequency: None,
        branch: None,
        pointer: None,
    }
}

pub fn success_stage(id: &str, requirements: Requirements) -> StageConfig {
    StageConfig {
        stage_type: StageType::Success,
        ..stage(id, requirements)
    }
}

pub fn branch_stage(id: &str, requirements: Requirements, flow_ids: &[&str]) -> StageConfig {
    StageConfig {
        stage_type: StageType::Branch,
        branch: Some(BranchInfo {
            title: lt(&[("en", "What do you want to do?")]),
            options: flow_ids
                .iter()
                .map(|f| BranchOption {
                    flow_id: f.to_string(),
                    title: lt(&[("en", *f)]),
                })
                .collect(),
        }),
        ..stage(id, requirements)
    }
}

pub fn pointing_at(stage: StageConfig, identifier: &str) -> StageConfig {
    StageConfig {
        pointer: Some(PointerConfig::Native {
            identifier: identifier.to_string(),
        }),
        ..stage
    }
}

pub fn page(id: &str, requirements: Requirements, stages: Vec<StageConfig>) -> PageConfig {
    PageConfig {
        id: id.to_string(),
        name: id.to_string(),
        requirements,
        stages,
    }
}

pub fn flow(id: &str, pages: Vec<PageConfig>) -> FlowConfig {
    FlowConfig {
        id: id.to_string(),
        name: id.to_string(),
        pages,
    }
}

pub fn config(
    identifiers: Vec<(&str, Identifier)>,
    discoveries: Vec<DiscoveryConfig>,
    flows: Vec<FlowConfig>,
) -> EngineConfig {
    EngineConfig {
        identifiers: identifiers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        discoveries,
        flows,
        languages: vec!["en".to_string(), "hi".to_string()],
        default_language: "en".to_string(),
    }
}
