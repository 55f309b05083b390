//! Vector primitives produced by the geometry converters.
//!
//! Points and rectangles are [`kurbo`] types. [`PathData`] wraps a [`BezPath`] and
//! prints it as SVG path data.

use std::fmt;

pub use kurbo::{BezPath, PathEl, Point, Rect};
use kurbo::Shape;

/// A compound path: any number of subpaths, each starting with a move.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PathData(BezPath);

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.0.move_to((x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.0.line_to((x, y));
    }

    pub fn close_path(&mut self) {
        self.0.close_path();
    }

    /// Appends a closed rectangle subpath, traced clockwise from its top-left corner.
    pub fn push_rect(&mut self, rect: &Rect) {
        self.move_to(rect.x0, rect.y0);
        self.line_to(rect.x1, rect.y0);
        self.line_to(rect.x1, rect.y1);
        self.line_to(rect.x0, rect.y1);
        self.close_path();
    }

    pub fn elements(&self) -> &[PathEl] {
        self.0.elements()
    }

    pub fn is_empty(&self) -> bool {
        self.0.elements().is_empty()
    }

    /// Nonzero-winding containment of the filled path.
    pub fn contains(&self, point: Point) -> bool {
        self.0.contains(point)
    }

    pub fn as_bez_path(&self) -> &BezPath {
        &self.0
    }
}

impl From<BezPath> for PathData {
    fn from(path: BezPath) -> Self {
        PathData(path)
    }
}

impl From<PathData> for BezPath {
    fn from(path: PathData) -> Self {
        path.0
    }
}

impl FromIterator<PathEl> for PathData {
    fn from_iter<I: IntoIterator<Item = PathEl>>(iter: I) -> Self {
        PathData(iter.into_iter().collect())
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, el) in self.elements().iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            match el {
                PathEl::MoveTo(p) => write!(f, "M{} {}", p.x, p.y)?,
                PathEl::LineTo(p) => write!(f, "L{} {}", p.x, p.y)?,
                PathEl::QuadTo(p1, p2) => write!(f, "Q{} {} {} {}", p1.x, p1.y, p2.x, p2.y)?,
                PathEl::CurveTo(p1, p2, p3) => {
                    write!(f, "C{} {} {} {} {} {}", p1.x, p1.y, p2.x, p2.y, p3.x, p3.y)?
                }
                PathEl::ClosePath => f.write_str("z")?,
            }
        }
        Ok(())
    }
}
