use serde::{Deserialize, Serialize};

/// Axis-aligned bounds in window coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// True when `other` lies entirely within `self` (edges may touch).
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    Native,
    /// Embedded web-rendering element.
    WebSurface,
    /// Part of the engine's own presentation layer.
    Overlay,
}

/// One node of the host's view hierarchy, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    #[serde(default)]
    pub element_id: Option<String>,

    #[serde(default)]
    pub accessibility_label: Option<String>,

    #[serde(default)]
    pub tag: Option<i64>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub placeholder: Option<String>,

    #[serde(default)]
    pub bounds: Rect,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default = "default_alpha")]
    pub alpha: f64,

    #[serde(default)]
    pub kind: ViewKind,

    /// Stable handle for web surfaces.
    #[serde(default)]
    pub surface_id: Option<String>,

    #[serde(default)]
    pub children: Vec<ViewNode>,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            element_id: None,
            accessibility_label: None,
            tag: None,
            text: None,
            placeholder: None,
            bounds: Rect::default(),
            hidden: false,
            alpha: default_alpha(),
            kind: ViewKind::Native,
            surface_id: None,
            children: Vec::new(),
        }
    }
}

fn default_alpha() -> f64 { 1.0 }

/// Host-side source of the current view hierarchy, one tree per top-level surface.
pub trait ViewSource {
    fn surfaces(&self) -> Vec<ViewNode>;
}

impl ViewSource for Vec<ViewNode> {
    fn surfaces(&self) -> Vec<ViewNode> {
        self.clone()
    }
}

/// A collected element. `parent` and `children` index into `Snapshot::elements`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub index: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,

    pub element_id: Option<String>,
    pub accessibility_label: Option<String>,
    pub tag: Option<i64>,
    pub text: Option<String>,
    pub placeholder: Option<String>,
    pub bounds: Rect,
    pub kind: ViewKind,
    pub surface_id: Option<String>,

    /// False when hidden, transparent or occluded (or under such an ancestor).
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebSurfaceHandle {
    pub element: usize,
    pub surface_id: String,
}

/// The UI state at one detection tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Every non-overlay node, in traversal order.
    pub elements: Vec<Element>,
    /// Indices of visible elements, in traversal order.
    pub order: Vec<usize>,
}

impl Snapshot {
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|&i| self.elements.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Visible web surfaces, in traversal order.
    pub fn web_surfaces(&self) -> Vec<WebSurfaceHandle> {
        self.visible()
            .filter(|e| e.kind == ViewKind::WebSurface)
            .map(|e| WebSurfaceHandle {
                element: e.index,
                surface_id: e
                    .surface_id
                    .clone()
                    .unwrap_or_else(|| format!("surface-{}", e.index)),
            })
            .collect()
    }

    /// SHA-1 over the identifying attributes of the visible elements.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let mut hasher = Sha1::new();
        for el in self.visible() {
            hasher.update(el.element_id.as_deref().unwrap_or("").as_bytes());
            hasher.update(b"|");
            hasher.update(el.accessibility_label.as_deref().unwrap_or("").as_bytes());
            hasher.update(b"|");
            hasher.update(el.tag.map(|t| t.to_string()).unwrap_or_default().as_bytes());
            hasher.update(b"|");
            hasher.update(el.text.as_deref().unwrap_or("").as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}
