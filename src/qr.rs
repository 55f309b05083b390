//! QR code component.
//!
//! The module matrix comes from [`qrcodegen`]. Each row is scanned for runs of dark
//! modules and every run becomes one horizontal segment of a compound path; stroking that
//! path with a line as thick as one cell reproduces the matrix.

use crate::color::Color;
use crate::error::{ErrorCallback, RenderError};
use crate::geometry::{PathData, Point, Rect};
use crate::memo::Memo;
use crate::scene::{
    Def, GradientStop, ImageNode, Length, LineCap, Node, Paint, PathNode, RectNode,
    RenderCallback, Scene, Stroke,
};
use kurbo::{Cap, Shape, Stroke as StrokeStyle, StrokeOpts};
use qrcodegen::{QrCodeEcc, QrSegment, Version};
use std::fmt;
use std::str::FromStr;

/// QR error-correction level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum ErrorCorrection {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl ErrorCorrection {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCorrection::Low => "L",
            ErrorCorrection::Medium => "M",
            ErrorCorrection::Quartile => "Q",
            ErrorCorrection::High => "H",
        }
    }
}

impl From<ErrorCorrection> for QrCodeEcc {
    fn from(ecl: ErrorCorrection) -> Self {
        match ecl {
            ErrorCorrection::Low => QrCodeEcc::Low,
            ErrorCorrection::Medium => QrCodeEcc::Medium,
            ErrorCorrection::Quartile => QrCodeEcc::Quartile,
            ErrorCorrection::High => QrCodeEcc::High,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrection {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(ErrorCorrection::Low),
            "M" => Ok(ErrorCorrection::Medium),
            "Q" => Ok(ErrorCorrection::Quartile),
            "H" => Ok(ErrorCorrection::High),
            other => Err(RenderError::UnsupportedErrorCorrection(other.to_string())),
        }
    }
}

impl TryFrom<String> for ErrorCorrection {
    type Error = RenderError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ErrorCorrection> for String {
    fn from(ecl: ErrorCorrection) -> Self {
        ecl.as_str().to_string()
    }
}

/// A square grid of modules, stored row-major; `true` is dark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleMatrix {
    side: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Encodes `value` as text at exactly error-correction level `ecl`.
    ///
    /// The level is never raised, even when a higher one would fit in the same version.
    ///
    /// # Errors
    ///
    /// [`RenderError::DataTooLong`] when no QR version can hold the value.
    pub fn encode(value: &str, ecl: ErrorCorrection) -> Result<Self, RenderError> {
        let segments = QrSegment::make_segments(value);
        let qr = qrcodegen::QrCode::encode_segments_advanced(
            &segments,
            ecl.into(),
            Version::MIN,
            Version::MAX,
            None,
            false,
        )
        .map_err(|_| RenderError::DataTooLong { ecl: ecl.to_string() })?;
        let side = qr.size();
        let modules = (0..side)
            .flat_map(|y| (0..side).map(move |x| (x, y)))
            .map(|(x, y)| qr.get_module(x, y))
            .collect();
        Ok(ModuleMatrix { side: side as usize, modules })
    }

    /// Builds a matrix from a row-major buffer whose length is a perfect square.
    pub fn from_linear(modules: Vec<bool>) -> Result<Self, RenderError> {
        let len = modules.len();
        let side = (len as f64).sqrt().round() as usize;
        if len == 0 || side * side != len {
            return Err(RenderError::NotSquare { len });
        }
        Ok(ModuleMatrix { side, modules })
    }

    /// Builds a matrix from rows that must all be as long as there are rows.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, RenderError> {
        let side = rows.len();
        let modules: Vec<bool> = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        if side == 0 || rows.iter().any(|r| r.as_ref().len() != side) {
            return Err(RenderError::NotSquare { len: modules.len() });
        }
        Ok(ModuleMatrix { side, modules })
    }

    /// Number of modules along one edge.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Module at `row`, `col`. Anything outside the grid is light.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.side && col < self.side && self.modules[row * self.side + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.side)
    }
}

/// Stroke geometry for a module matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct QrPath {
    pub path: PathData,
    /// Edge length of one module, also the stroke width.
    pub cell_size: f64,
}

/// Converts `matrix` into one horizontal segment per run of dark modules.
///
/// Segments run along the vertical center of their row, from the left edge of the first
/// dark module to the right edge of the last, so a butt-capped stroke of `cell_size`
/// covers exactly the run.
///
/// # Example
///
/// ```rust
/// use barqr::qr::{matrix_to_path, ModuleMatrix};
///
/// let matrix = ModuleMatrix::from_rows(&[[true, false], [false, true]]).unwrap();
/// let qr = matrix_to_path(&matrix, 20.0);
/// assert_eq!(qr.cell_size, 10.0);
/// assert_eq!(qr.path.to_string(), "M0 5 L10 5 M10 15 L20 15");
/// ```
pub fn matrix_to_path(matrix: &ModuleMatrix, size: f64) -> QrPath {
    let cell_size = size / matrix.side() as f64;
    let mut path = PathData::new();
    for (i, row) in matrix.rows().enumerate() {
        let y = cell_size / 2.0 + cell_size * i as f64;
        let mut drawing = false;
        for (j, &dark) in row.iter().enumerate() {
            if dark {
                if !drawing {
                    path.move_to(cell_size * j as f64, y);
                    drawing = true;
                }
                if j == row.len() - 1 {
                    path.line_to(cell_size * (j + 1) as f64, y);
                }
            } else if drawing {
                path.line_to(cell_size * j as f64, y);
                drawing = false;
            }
        }
    }
    QrPath { path, cell_size }
}

/// Image drawn over the center of the code.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Logo {
    /// Image reference handed to the host renderer.
    pub href: String,
    /// Edge length of the image. Defaults to a fifth of the code size.
    pub size: Option<f64>,
    pub background_color: Color,
    pub margin: f64,
    pub border_radius: f64,
}

impl Logo {
    pub fn new(href: impl Into<String>) -> Self {
        Logo {
            href: href.into(),
            size: None,
            background_color: Color::from("transparent"),
            margin: 2.0,
            border_radius: 0.0,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_background_color(mut self, color: impl Into<Color>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_border_radius(mut self, radius: f64) -> Self {
        self.border_radius = radius;
        self
    }
}

/// Options of a [`QrCode`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QrOptions {
    pub value: String,
    pub size: f64,
    pub color: Color,
    pub background_color: Color,
    pub logo: Option<Logo>,
    /// Padding added on every side, in the same units as `size`.
    pub quiet_zone: f64,
    pub enable_linear_gradient: bool,
    /// `x1 y1 x2 y2` of the gradient vector.
    pub gradient_direction: [Length; 4],
    /// Start and end colors of the gradient.
    pub linear_gradient: [Color; 2],
    pub ecl: ErrorCorrection,
}

impl Default for QrOptions {
    fn default() -> Self {
        QrOptions {
            value: "this is a QR code".to_string(),
            size: 100.0,
            color: Color::from("black"),
            background_color: Color::from("white"),
            logo: None,
            quiet_zone: 0.0,
            enable_linear_gradient: false,
            gradient_direction: [
                Length::Percent(0.0),
                Length::Percent(0.0),
                Length::Percent(100.0),
                Length::Percent(100.0),
            ],
            linear_gradient: [Color::from("rgb(255,0,0)"), Color::from("rgb(0,255,255)")],
            ecl: ErrorCorrection::default(),
        }
    }
}

impl QrOptions {
    pub fn new(value: impl Into<String>) -> Self {
        QrOptions { value: value.into(), ..Default::default() }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_colors(mut self, color: impl Into<Color>, background: impl Into<Color>) -> Self {
        self.color = color.into();
        self.background_color = background.into();
        self
    }

    pub fn with_logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_quiet_zone(mut self, quiet_zone: f64) -> Self {
        self.quiet_zone = quiet_zone;
        self
    }

    pub fn with_linear_gradient(mut self, direction: [Length; 4], colors: [Color; 2]) -> Self {
        self.enable_linear_gradient = true;
        self.gradient_direction = direction;
        self.linear_gradient = colors;
        self
    }

    pub fn with_ecl(mut self, ecl: ErrorCorrection) -> Self {
        self.ecl = ecl;
        self
    }
}

/// Inputs that determine the module path.
#[derive(Clone, Debug, PartialEq)]
struct PathKey {
    value: String,
    size: f64,
    ecl: ErrorCorrection,
}

fn compute_path(key: &PathKey) -> Result<QrPath, RenderError> {
    let matrix = ModuleMatrix::encode(&key.value, key.ecl)?;
    log::debug!("QR code: {0}x{0} modules at level {1}", matrix.side(), key.ecl);
    Ok(matrix_to_path(&matrix, key.size))
}

/// A QR code component.
///
/// # Example
///
/// ```rust
/// use barqr::qr::{QrCode, QrOptions};
///
/// let mut qr = QrCode::new(QrOptions::new("https://example.com").with_quiet_zone(10.0));
/// let scene = qr.render().unwrap().unwrap();
/// assert_eq!(scene.view_box.unwrap().width(), 120.0);
/// ```
pub struct QrCode {
    options: QrOptions,
    on_error: Option<ErrorCallback>,
    get_ref: Option<RenderCallback>,
    memo: Memo<PathKey, Result<QrPath, RenderError>>,
}

impl QrCode {
    pub fn new(options: QrOptions) -> Self {
        QrCode { options, on_error: None, get_ref: None, memo: Memo::new() }
    }

    /// Routes encoding errors to `callback` instead of returning them from [`QrCode::render`].
    pub fn on_error(mut self, callback: impl FnMut(&RenderError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Hands every composed scene to `callback`.
    pub fn get_ref(mut self, callback: impl FnMut(&Scene) + 'static) -> Self {
        self.get_ref = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut QrOptions {
        &mut self.options
    }

    pub fn set_options(&mut self, options: QrOptions) {
        self.options = options;
    }

    /// Produces the scene for the current options.
    ///
    /// The module path is recomputed only when the value, size or level changed since the
    /// previous call. Returns `Ok(None)` when an encoding error went to the error callback.
    ///
    /// # Errors
    ///
    /// Returns the encoding error when no error callback is installed.
    pub fn render(&mut self) -> Result<Option<Scene>, RenderError> {
        let key = PathKey {
            value: self.options.value.clone(),
            size: self.options.size,
            ecl: self.options.ecl,
        };
        let (outcome, computed) = self.memo.get_or_compute(key, compute_path);
        let qr_path = match outcome {
            Ok(qr_path) => qr_path,
            Err(err) => {
                if computed {
                    log::warn!("{err}");
                }
                return match self.on_error.as_mut() {
                    Some(callback) => {
                        if computed {
                            callback(err);
                        }
                        Ok(None)
                    }
                    None => Err(err.clone()),
                };
            }
        };

        let scene = compose(qr_path, &self.options);
        if let Some(get_ref) = self.get_ref.as_mut() {
            get_ref(&scene);
        }
        Ok(Some(scene))
    }
}

const GRADIENT_ID: &str = "grad";

fn compose(qr_path: &QrPath, options: &QrOptions) -> Scene {
    let size = options.size;
    let qz = options.quiet_zone;
    let outer = Rect::new(-qz, -qz, size + qz, size + qz);
    let mut scene = Scene::new(size, size).with_view_box(outer);

    let paint = if options.enable_linear_gradient {
        let [x1, y1, x2, y2] = options.gradient_direction;
        let [start, end] = &options.linear_gradient;
        scene.push_def(Def::LinearGradient {
            id: GRADIENT_ID.to_string(),
            x1,
            y1,
            x2,
            y2,
            stops: vec![
                GradientStop { offset: 0.0, color: start.clone(), opacity: 1.0 },
                GradientStop { offset: 1.0, color: end.clone(), opacity: 1.0 },
            ],
        });
        Paint::Ref(GRADIENT_ID.to_string())
    } else {
        Paint::Color(options.color.clone())
    };

    scene.push(Node::group(vec![Node::Rect(RectNode {
        rect: outer,
        radius: 0.0,
        fill: Some(Paint::Color(options.background_color.clone())),
        clip_path: None,
    })]));
    scene.push(Node::group(vec![Node::Path(PathNode {
        data: qr_path.path.clone(),
        fill: None,
        stroke: Some(Stroke { paint, width: qr_path.cell_size, line_cap: LineCap::Butt }),
    })]));

    if let Some(logo) = &options.logo {
        compose_logo(&mut scene, size, logo);
    }
    scene
}

fn compose_logo(scene: &mut Scene, size: f64, logo: &Logo) {
    let logo_size = logo.size.unwrap_or(size * 0.2);
    let margin = logo.margin;
    let radius = logo.border_radius;
    let position = (size - logo_size - margin * 2.0) / 2.0;
    let background_size = logo_size + margin * 2.0;
    // The background corner grows with the margin so both curves stay concentric.
    let background_radius =
        if logo_size > 0.0 { radius + (margin / logo_size) * radius } else { radius };

    scene.push_def(Def::ClipPath {
        id: "clip-logo-background".to_string(),
        rect: Rect::new(0.0, 0.0, background_size, background_size),
        radius: background_radius,
    });
    scene.push_def(Def::ClipPath {
        id: "clip-logo".to_string(),
        rect: Rect::new(0.0, 0.0, logo_size, logo_size),
        radius,
    });
    scene.push(Node::translated(
        position,
        position,
        vec![
            Node::group(vec![Node::Rect(RectNode {
                rect: Rect::new(0.0, 0.0, background_size, background_size),
                radius: 0.0,
                fill: Some(Paint::Color(logo.background_color.clone())),
                clip_path: Some("clip-logo-background".to_string()),
            })]),
            Node::translated(
                margin,
                margin,
                vec![Node::Image(ImageNode {
                    width: logo_size,
                    height: logo_size,
                    href: logo.href.clone(),
                    preserve_aspect_ratio: "xMidYMid slice".to_string(),
                    clip_path: Some("clip-logo".to_string()),
                })],
            ),
        ],
    ));
}

/// Rasterizes a path from [`matrix_to_path`] back into its module grid.
///
/// The path is stroked with butt caps `cell_size` wide, and a module is dark when the
/// stroke outline covers its center.
pub fn path_to_matrix(path: &PathData, side: usize, cell_size: f64) -> Vec<Vec<bool>> {
    let style = StrokeStyle::new(cell_size).with_caps(Cap::Butt);
    let outline = kurbo::stroke(path.elements().iter().copied(), &style, &StrokeOpts::default(), 1e-3);
    (0..side)
        .map(|row| {
            (0..side)
                .map(|col| {
                    let center = Point::new((col as f64 + 0.5) * cell_size, (row as f64 + 0.5) * cell_size);
                    outline.contains(center)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_three_by_three_example() {
        let matrix = ModuleMatrix::from_rows(&[
            [true, false, true],
            [false, true, false],
            [true, false, true],
        ])
        .unwrap();
        let qr = matrix_to_path(&matrix, 90.0);
        assert_eq!(qr.cell_size, 30.0);
        assert_eq!(
            qr.path.to_string(),
            "M0 15 L30 15 M60 15 L90 15 M30 45 L60 45 M0 75 L30 75 M60 75 L90 75"
        );
    }

    #[test]
    fn test_run_closed_at_right_edge_does_not_leak() {
        let matrix = ModuleMatrix::from_rows(&[[false, true], [true, false]]).unwrap();
        let qr = matrix_to_path(&matrix, 2.0);
        assert_eq!(qr.path.to_string(), "M1 0.5 L2 0.5 M0 1.5 L1 1.5");
    }

    #[test]
    fn test_full_row_is_one_segment() {
        let matrix = ModuleMatrix::from_rows(&[[true, true], [false, false]]).unwrap();
        let qr = matrix_to_path(&matrix, 4.0);
        assert_eq!(qr.path.to_string(), "M0 1 L4 1");
    }

    #[test]
    fn test_from_linear_requires_square() {
        assert_eq!(
            ModuleMatrix::from_linear(vec![true; 8]),
            Err(RenderError::NotSquare { len: 8 })
        );
        assert_eq!(ModuleMatrix::from_linear(vec![]), Err(RenderError::NotSquare { len: 0 }));
        let m = ModuleMatrix::from_linear(vec![true, false, false, true]).unwrap();
        assert_eq!(m.side(), 2);
        assert!(m.get(1, 1));
        assert!(!m.get(0, 1));
        assert!(!m.get(5, 5));
        assert!(ModuleMatrix::from_rows(&[vec![true], vec![false, true]]).is_err());
    }

    #[test]
    fn test_encode_matrix() {
        let m = ModuleMatrix::encode("HELLO WORLD", ErrorCorrection::Quartile).unwrap();
        assert_eq!(m.side(), 21);
        // Finder pattern corners are dark.
        assert!(m.get(0, 0));
        assert!(m.get(0, 20));
        assert!(m.get(20, 0));
    }

    #[test]
    fn test_requested_level_is_kept() {
        let low = ModuleMatrix::encode("HELLO WORLD", ErrorCorrection::Low).unwrap();
        let quartile = ModuleMatrix::encode("HELLO WORLD", ErrorCorrection::Quartile).unwrap();
        assert_eq!(low.side(), quartile.side());
        assert_ne!(low, quartile);
    }

    #[test]
    fn test_ecl_tags() {
        for (tag, ecl) in [
            ("L", ErrorCorrection::Low),
            ("M", ErrorCorrection::Medium),
            ("Q", ErrorCorrection::Quartile),
            ("H", ErrorCorrection::High),
        ] {
            assert_eq!(tag.parse::<ErrorCorrection>(), Ok(ecl));
            assert_eq!(ecl.to_string(), tag);
        }
        assert_eq!(
            "X".parse::<ErrorCorrection>(),
            Err(RenderError::UnsupportedErrorCorrection("X".to_string()))
        );
        assert!(ErrorCorrection::try_from("q".to_string()).is_err());
    }

    #[test]
    fn test_default_scene_layers() {
        let mut qr = QrCode::new(QrOptions::default().with_quiet_zone(5.0));
        let scene = qr.render().unwrap().unwrap();
        assert_eq!((scene.width, scene.height), (100.0, 100.0));
        assert_eq!(scene.view_box, Some(Rect::new(-5.0, -5.0, 105.0, 105.0)));
        assert!(scene.defs.is_empty());
        assert_eq!(scene.nodes.len(), 2);
        match &scene.nodes[1] {
            Node::Group { children, .. } => match &children[0] {
                Node::Path(p) => {
                    let stroke = p.stroke.as_ref().unwrap();
                    assert_eq!(stroke.paint, Paint::Color(Color::from("black")));
                    assert_eq!(stroke.line_cap, LineCap::Butt);
                    assert!(stroke.width > 0.0);
                }
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_gradient_paint() {
        let mut qr = QrCode::new(QrOptions::new("gradient").with_linear_gradient(
            [Length::Percent(0.0), Length::Percent(0.0), Length::Percent(100.0), Length::Percent(0.0)],
            [Color::from("#ff0000"), Color::from("#0000ff")],
        ));
        let scene = qr.render().unwrap().unwrap();
        match scene.def("grad") {
            Some(Def::LinearGradient { x2, stops, .. }) => {
                assert_eq!(*x2, Length::Percent(100.0));
                assert_eq!(stops.len(), 2);
                assert_eq!(stops[1].offset, 1.0);
                assert_eq!(stops[1].color, Color::from("#0000ff"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_logo_layout() {
        let mut scene = Scene::new(100.0, 100.0);
        compose_logo(
            &mut scene,
            100.0,
            &Logo::new("logo.png").with_margin(5.0).with_border_radius(10.0).with_background_color("#fff"),
        );
        // Default logo size is a fifth of the code.
        match &scene.nodes[0] {
            Node::Group { x, y, children } => {
                assert_eq!((*x, *y), (35.0, 35.0));
                assert_eq!(children.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
        match scene.def("clip-logo-background") {
            Some(Def::ClipPath { rect, radius, .. }) => {
                assert_eq!(rect.width(), 30.0);
                assert_eq!(*radius, 12.5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_with_and_without_callback() {
        let long = "a".repeat(3000);
        let mut qr = QrCode::new(QrOptions::new(long.clone()).with_ecl(ErrorCorrection::High));
        assert_eq!(
            qr.render().unwrap_err(),
            RenderError::DataTooLong { ecl: "H".to_string() }
        );

        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut qr = QrCode::new(QrOptions::new(long).with_ecl(ErrorCorrection::High))
            .on_error(move |_| seen.set(seen.get() + 1));
        assert_eq!(qr.render(), Ok(None));
        assert_eq!(qr.render(), Ok(None));
        assert_eq!(calls.get(), 1);

        qr.options_mut().value = "short".to_string();
        assert!(qr.render().unwrap().is_some());
    }

    #[test]
    fn test_color_change_recomposes_without_reencoding() {
        let mut qr = QrCode::new(QrOptions::new("memo"));
        let first = qr.render().unwrap().unwrap();
        qr.options_mut().color = Color::from("#123456");
        let second = qr.render().unwrap().unwrap();
        assert_ne!(first, second);
        let key = PathKey { value: "memo".into(), size: 100.0, ecl: ErrorCorrection::Medium };
        assert!(qr.memo.peek(&key).is_some());
        let path_of = |scene: &Scene| match &scene.nodes[1] {
            Node::Group { children, .. } => children[0].clone(),
            other => panic!("unexpected {other:?}"),
        };
        match (path_of(&first), path_of(&second)) {
            (Node::Path(a), Node::Path(b)) => assert_eq!(a.data, b.data),
            other => panic!("unexpected {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_path_round_trips(side in 1usize..12, seed in proptest::collection::vec(any::<bool>(), 144)) {
            let modules: Vec<bool> = seed.into_iter().take(side * side).collect();
            let matrix = ModuleMatrix::from_linear(modules).unwrap();
            let qr = matrix_to_path(&matrix, side as f64 * 8.0);
            let rebuilt = path_to_matrix(&qr.path, side, qr.cell_size);
            let expected: Vec<Vec<bool>> = matrix.rows().map(<[bool]>::to_vec).collect();
            prop_assert_eq!(rebuilt, expected);
        }
    }
}
