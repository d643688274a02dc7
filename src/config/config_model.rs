use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Parsed engine configuration (the shapes the matcher needs)
// ============================================================================

/// Text keyed by language code, e.g. `{ en: "Pay", hi: "भुगतान" }`.
pub type LocalizedText = BTreeMap<String, String>;

/// Identifier definitions keyed by identifier id.
pub type IdentifierMap = BTreeMap<String, Identifier>;

/// Pick the entry for `language`, falling back to `fallback`, then to any entry.
pub fn localize(text: &LocalizedText, language: &str, fallback: &str) -> String {
    text.get(language)
        .or_else(|| text.get(fallback))
        .or_else(|| text.values().next())
        .cloned()
        .unwrap_or_default()
}

/// Top-level configuration as delivered by the (external) config layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub identifiers: IdentifierMap,

    #[serde(default)]
    pub discoveries: Vec<DiscoveryConfig>,

    #[serde(default)]
    pub flows: Vec<FlowConfig>,

    /// Languages offered in the discovery prompt.
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default = "default_language")]
    pub default_language: String,
}

// ============================================================================
// Identifiers
// ============================================================================

/// A rule that locates UI elements, either natively or inside a web surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identifier {
    Native(NativeSelector),
    Web(WebLocator),
}

impl Identifier {
    pub fn weight(&self) -> u32 {
        match self {
            Identifier::Native(s) => s.weight,
            Identifier::Web(l) => l.weight,
        }
    }

    pub fn as_native(&self) -> Option<&NativeSelector> {
        match self {
            Identifier::Native(s) => Some(s),
            Identifier::Web(_) => None,
        }
    }

    pub fn as_web(&self) -> Option<&WebLocator> {
        match self {
            Identifier::Web(l) => Some(l),
            Identifier::Native(_) => None,
        }
    }
}

/// Equality criteria over native element attributes. Every configured
/// criterion must hold; a selector with no criteria matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeSelector {
    #[serde(default = "default_weight")]
    pub weight: u32,

    #[serde(default)]
    pub element_id: Option<String>,

    #[serde(default)]
    pub accessibility_label: Option<String>,

    #[serde(default)]
    pub tag: Option<i64>,

    /// Literal text per language; only the active language is compared.
    #[serde(default)]
    pub text: Option<LocalizedText>,

    #[serde(default)]
    pub placeholder: Option<LocalizedText>,

    /// Remap applied to each base match.
    #[serde(default)]
    pub path: Option<ElementPath>,
}

impl Default for NativeSelector {
    fn default() -> Self {
        Self {
            weight: default_weight(),
            element_id: None,
            accessibility_label: None,
            tag: None,
            text: None,
            placeholder: None,
            path: None,
        }
    }
}

impl NativeSelector {
    pub fn has_criteria(&self) -> bool {
        self.element_id.is_some()
            || self.accessibility_label.is_some()
            || self.tag.is_some()
            || self.text.is_some()
            || self.placeholder.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementPath {
    /// Child indices descended one level at a time.
    Children(Vec<usize>),
    /// Index into the matched element's parent's children.
    Sibling(usize),
}

/// Opaque locator evaluated inside a web surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebLocator {
    #[serde(default = "default_weight")]
    pub weight: u32,

    /// CSS selector of the target node.
    pub selector: String,

    /// Optional inner text the node must carry, per language.
    #[serde(default)]
    pub text: Option<LocalizedText>,
}

impl WebLocator {
    pub fn new(selector: &str) -> Self {
        Self {
            weight: default_weight(),
            selector: selector.to_string(),
            text: None,
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Identifier references shared by discoveries, pages and stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub native_ids: Vec<String>,

    #[serde(default)]
    pub web_ids: Vec<String>,

    /// Overrides the summed identifier weights when set.
    #[serde(default)]
    pub weight: Option<u32>,
}

impl Requirements {
    pub fn has_web(&self) -> bool {
        !self.web_ids.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.native_ids.is_empty() && self.web_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub requirements: Requirements,

    pub flow_ids: Vec<String>,

    #[serde(default)]
    pub presentation: PresentationKind,

    #[serde(default)]
    pub trigger_mode: TriggerMode,

    #[serde(default)]
    pub trigger: Trigger,

    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationKind {
    #[default]
    Popup,
    Banner,
    Ping,
    Drawer,
}

/// Whether opting in starts one flow or lets the user pick among several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    #[default]
    Single,
    Multi,
}

/// Activation precondition checked before a discovery is considered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    #[default]
    Immediate,
    Delay { seconds: u64 },
    Click { anchor: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub header: LocalizedText,

    #[serde(default)]
    pub opt_in: LocalizedText,

    #[serde(default)]
    pub opt_out: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub requirements: Requirements,

    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub requirements: Requirements,

    #[serde(rename = "type", default)]
    pub stage_type: StageType,

    /// Max times the stage is shown per flow lifetime; unlimited when absent.
    #[serde(default)]
    pub frequency: Option<u32>,

    #[serde(default)]
    pub branch: Option<BranchInfo>,

    #[serde(default)]
    pub pointer: Option<PointerConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    #[default]
    Normal,
    Branch,
    Success,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchInfo {
    #[serde(default)]
    pub title: LocalizedText,

    pub options: Vec<BranchOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchOption {
    pub flow_id: String,

    #[serde(default)]
    pub title: LocalizedText,
}

/// Where a stage's pointer is anchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum PointerConfig {
    Native { identifier: String },
    Web { identifier: String },
}

// Serde default helpers
fn default_weight() -> u32 { 1 }
fn default_language() -> String { "en".to_string() }
