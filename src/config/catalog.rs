use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::config::config_model::{
    BranchInfo, DiscoveryConfig, EngineConfig, FlowConfig, IdentifierMap, PageConfig,
    PointerConfig, PresentationKind, PromptConfig, Requirements, StageConfig, StageType,
    Trigger, TriggerMode,
};
use crate::error::EngineError;

// ============================================================================
// Validated, id-indexed view of an EngineConfig
// ============================================================================

/// Anything matched through a `Requirements` block.
pub trait Identifiable {
    fn id(&self) -> &str;
    fn requirements(&self) -> &Requirements;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub id: String,
    pub name: String,
    pub requirements: Requirements,
    pub flow_ids: Vec<String>,
    pub presentation: PresentationKind,
    pub trigger_mode: TriggerMode,
    pub trigger: Trigger,
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub id: String,
    pub name: String,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: String,
    pub name: String,
    pub requirements: Requirements,
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub requirements: Requirements,
    pub kind: StageKind,
    pub frequency: Option<u32>,
    pub pointer: Option<PointerConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageKind {
    Normal,
    Branch(BranchInfo),
    Success,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, StageKind::Success)
    }

    /// Key for repeat counts and frequency caps: the name, or the id when unnamed.
    pub fn counter_key(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }

    pub fn branch(&self) -> Option<&BranchInfo> {
        match &self.kind {
            StageKind::Branch(info) => Some(info),
            _ => None,
        }
    }
}

impl Identifiable for Discovery {
    fn id(&self) -> &str { &self.id }
    fn requirements(&self) -> &Requirements { &self.requirements }
}

impl Identifiable for Page {
    fn id(&self) -> &str { &self.id }
    fn requirements(&self) -> &Requirements { &self.requirements }
}

impl Identifiable for Stage {
    fn id(&self) -> &str { &self.id }
    fn requirements(&self) -> &Requirements { &self.requirements }
}

/// Configuration problems found while building the catalog. None of them is
/// fatal: the affected entity simply never matches.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    UnknownFlow { flow_id: String, referenced_by: String },
    MissingBranchInfo { stage_id: String },
    UnknownIdentifier { identifier_id: String, referenced_by: String },
    WrongIdentifierKind { identifier_id: String, referenced_by: String },
}

impl ConfigIssue {
    pub fn describe(&self) -> String {
        match self {
            ConfigIssue::UnknownFlow { flow_id, referenced_by } => EngineError::UnknownFlow {
                flow_id: flow_id.clone(),
                referenced_by: referenced_by.clone(),
            }
            .to_string(),
            ConfigIssue::MissingBranchInfo { stage_id } => EngineError::MissingBranchInfo {
                stage_id: stage_id.clone(),
            }
            .to_string(),
            ConfigIssue::UnknownIdentifier { identifier_id, referenced_by } => {
                format!("Identifier '{}' referenced by '{}' does not exist", identifier_id, referenced_by)
            }
            ConfigIssue::WrongIdentifierKind { identifier_id, referenced_by } => {
                format!("Identifier '{}' referenced by '{}' has the wrong kind", identifier_id, referenced_by)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    identifiers: IdentifierMap,
    discoveries: Vec<Discovery>,
    flows: Vec<Arc<Flow>>,
    flow_index: HashMap<String, usize>,
    languages: Vec<String>,
    default_language: String,
    issues: Vec<ConfigIssue>,
}

impl Catalog {
    /// Build the catalog, logging every configuration issue found.
    pub fn from_config(config: EngineConfig) -> Catalog {
        let mut issues = Vec::new();
        let identifiers = config.identifiers;

        let flows: Vec<Arc<Flow>> = config
            .flows
            .into_iter()
            .map(|f| Arc::new(build_flow(f, &identifiers, &mut issues)))
            .collect();

        let flow_index: HashMap<String, usize> = flows
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();

        let discoveries = config
            .discoveries
            .into_iter()
            .map(|d| build_discovery(d, &identifiers, &flow_index, &mut issues))
            .collect();

        // Branch options must point at real flows too
        for flow in &flows {
            for stage in flow.pages.iter().flat_map(|p| p.stages.iter()) {
                if let Some(info) = stage.branch() {
                    for option in &info.options {
                        if !flow_index.contains_key(&option.flow_id) {
                            issues.push(ConfigIssue::UnknownFlow {
                                flow_id: option.flow_id.clone(),
                                referenced_by: stage.id.clone(),
                            });
                        }
                    }
                }
            }
        }

        for issue in &issues {
            warn!(issue = %issue.describe(), "configuration issue");
        }

        Catalog {
            identifiers,
            discoveries,
            flows,
            flow_index,
            languages: config.languages,
            default_language: config.default_language,
            issues,
        }
    }

    pub fn identifiers(&self) -> &IdentifierMap {
        &self.identifiers
    }

    pub fn discoveries(&self) -> &[Discovery] {
        &self.discoveries
    }

    pub fn discovery(&self, id: &str) -> Option<&Discovery> {
        self.discoveries.iter().find(|d| d.id == id)
    }

    pub fn flows(&self) -> &[Arc<Flow>] {
        &self.flows
    }

    pub fn flow(&self, id: &str) -> Option<Arc<Flow>> {
        self.flow_index.get(id).map(|&i| Arc::clone(&self.flows[i]))
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }
}

fn build_discovery(
    config: DiscoveryConfig,
    identifiers: &IdentifierMap,
    flow_index: &HashMap<String, usize>,
    issues: &mut Vec<ConfigIssue>,
) -> Discovery {
    check_requirements(&config.id, &config.requirements, identifiers, issues);

    for flow_id in &config.flow_ids {
        if !flow_index.contains_key(flow_id) {
            issues.push(ConfigIssue::UnknownFlow {
                flow_id: flow_id.clone(),
                referenced_by: config.id.clone(),
            });
        }
    }

    Discovery {
        id: config.id,
        name: config.name,
        requirements: config.requirements,
        flow_ids: config.flow_ids,
        presentation: config.presentation,
        trigger_mode: config.trigger_mode,
        trigger: config.trigger,
        prompt: config.prompt,
    }
}

fn build_flow(config: FlowConfig, identifiers: &IdentifierMap, issues: &mut Vec<ConfigIssue>) -> Flow {
    let pages = config
        .pages
        .into_iter()
        .map(|p| build_page(p, identifiers, issues))
        .collect();

    Flow {
        id: config.id,
        name: config.name,
        pages,
    }
}

fn build_page(config: PageConfig, identifiers: &IdentifierMap, issues: &mut Vec<ConfigIssue>) -> Page {
    check_requirements(&config.id, &config.requirements, identifiers, issues);

    // Invalid stages are dropped from the pool so they can never match
    let stages = config
        .stages
        .into_iter()
        .filter_map(|s| build_stage(s, identifiers, issues))
        .collect();

    Page {
        id: config.id,
        name: config.name,
        requirements: config.requirements,
        stages,
    }
}

fn build_stage(
    config: StageConfig,
    identifiers: &IdentifierMap,
    issues: &mut Vec<ConfigIssue>,
) -> Option<Stage> {
    check_requirements(&config.id, &config.requirements, identifiers, issues);

    if let Some(pointer) = &config.pointer {
        let (identifier_id, wants_web) = match pointer {
            PointerConfig::Native { identifier } => (identifier, false),
            PointerConfig::Web { identifier } => (identifier, true),
        };
        check_identifier(&config.id, identifier_id, wants_web, identifiers, issues);
    }

    let kind = match (config.stage_type, config.branch) {
        (StageType::Normal, _) => StageKind::Normal,
        (StageType::Success, _) => StageKind::Success,
        (StageType::Branch, Some(info)) => StageKind::Branch(info),
        (StageType::Branch, None) => {
            issues.push(ConfigIssue::MissingBranchInfo {
                stage_id: config.id.clone(),
            });
            return None;
        }
    };

    Some(Stage {
        id: config.id,
        name: config.name,
        requirements: config.requirements,
        kind,
        frequency: config.frequency,
        pointer: config.pointer,
    })
}

fn check_requirements(
    owner: &str,
    requirements: &Requirements,
    identifiers: &IdentifierMap,
    issues: &mut Vec<ConfigIssue>,
) {
    for id in &requirements.native_ids {
        check_identifier(owner, id, false, identifiers, issues);
    }
    for id in &requirements.web_ids {
        check_identifier(owner, id, true, identifiers, issues);
    }
}

fn check_identifier(
    owner: &str,
    identifier_id: &str,
    wants_web: bool,
    identifiers: &IdentifierMap,
    issues: &mut Vec<ConfigIssue>,
) {
    match identifiers.get(identifier_id) {
        None => issues.push(ConfigIssue::UnknownIdentifier {
            identifier_id: identifier_id.to_string(),
            referenced_by: owner.to_string(),
        }),
        Some(identifier) if identifier.as_web().is_some() != wants_web => {
            issues.push(ConfigIssue::WrongIdentifierKind {
                identifier_id: identifier_id.to_string(),
                referenced_by: owner.to_string(),
            })
        }
        Some(_) => {}
    }
}
