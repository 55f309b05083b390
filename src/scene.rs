//! Declarative vector scene graph.
//!
//! A [`Scene`] is what the components hand to a host renderer. It mirrors the small
//! subset of SVG the components need: groups with a translation, rectangles, paths,
//! images, text, clip paths and linear gradients.

use crate::color::Color;
use crate::geometry::{PathData, Rect};
use std::fmt;
use std::str::FromStr;

/// A coordinate that is either absolute user units or a percentage.
///
/// Gradient percentages are relative to the bounding box of the painted element.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Length {
    Absolute(f64),
    Percent(f64),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Absolute(v) => write!(f, "{v}"),
            Length::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl FromStr for Length {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_suffix('%') {
            Some(p) => Ok(Length::Percent(p.trim().parse()?)),
            None => Ok(Length::Absolute(s.parse()?)),
        }
    }
}

/// How a shape is painted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Paint {
    Color(Color),
    /// Reference to a paint server in [`Scene::defs`] by id.
    Ref(String),
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::Color(c) => write!(f, "{c}"),
            Paint::Ref(id) => write!(f, "url(#{id})"),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Color(c)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
    pub line_cap: LineCap,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
    pub opacity: f64,
}

/// Reusable definitions referenced by id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Def {
    /// A rounded rectangle clip, in the user space of the element that references it.
    ClipPath { id: String, rect: Rect, radius: f64 },
    LinearGradient {
        id: String,
        x1: Length,
        y1: Length,
        x2: Length,
        y2: Length,
        stops: Vec<GradientStop>,
    },
}

impl Def {
    pub fn id(&self) -> &str {
        match self {
            Def::ClipPath { id, .. } | Def::LinearGradient { id, .. } => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectNode {
    pub rect: Rect,
    pub radius: f64,
    pub fill: Option<Paint>,
    pub clip_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub data: PathData,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageNode {
    pub width: f64,
    pub height: f64,
    pub href: String,
    pub preserve_aspect_ratio: String,
    pub clip_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub centered: bool,
}

/// A node of the scene tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Children drawn in order after translating by `(x, y)`.
    Group { x: f64, y: f64, children: Vec<Node> },
    Rect(RectNode),
    Path(PathNode),
    Image(ImageNode),
    Text(TextNode),
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Node::Group { x: 0.0, y: 0.0, children }
    }

    pub fn translated(x: f64, y: f64, children: Vec<Node>) -> Self {
        Node::Group { x, y, children }
    }
}

/// Receives each freshly composed scene, the way a host grabs a handle to its surface.
pub type RenderCallback = Box<dyn FnMut(&Scene)>;

/// A complete drawing: its output size, the user-space window shown in it, and content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// User-space window mapped onto `width x height`. `None` means `(0, 0, width, height)`.
    pub view_box: Option<Rect>,
    pub defs: Vec<Def>,
    pub nodes: Vec<Node>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Scene { width, height, view_box: None, defs: Vec::new(), nodes: Vec::new() }
    }

    pub fn with_view_box(mut self, view_box: Rect) -> Self {
        self.view_box = Some(view_box);
        self
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn push_def(&mut self, def: Def) {
        self.defs.push(def);
    }

    pub fn view_box(&self) -> Rect {
        self.view_box.unwrap_or(Rect::new(0.0, 0.0, self.width, self.height))
    }

    pub fn def(&self, id: &str) -> Option<&Def> {
        self.defs.iter().find(|d| d.id() == id)
    }

    /// True when the scene draws nothing.
    pub fn is_empty(&self) -> bool {
        fn empty(nodes: &[Node]) -> bool {
            nodes.iter().all(|n| match n {
                Node::Group { children, .. } => empty(children),
                Node::Path(p) => p.data.is_empty(),
                _ => false,
            })
        }
        empty(&self.nodes)
    }
}
