use crate::barcode::{Barcode, BarcodeFormat, BarcodeOptions, BarcodeView, Caption};
use crate::error::{RasterError, RenderError};
use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::qr::{ErrorCorrection, ModuleMatrix, QrCode, QrOptions};
use crate::scene::{Def, Node, Paint, PathNode, Scene, TextNode};

use image::{ImageBuffer, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Height reserved under the bars for a text caption.
const CAPTION_HEIGHT: f64 = 20.0;

/*---- SVG ----*/

// Returns a string of SVG code for the given scene.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(scene: &Scene) -> String {
    let vb = scene.view_box();
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" version=\"1.1\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">\n",
        scene.width, scene.height, vb.x0, vb.y0, vb.width(), vb.height());
    write_defs(&mut result, &scene.defs);
    write_nodes(&mut result, &scene.nodes, 1);
    result += "</svg>\n";
    result
}

/// Returns SVG code for a barcode view: the container background, the bars, and the
/// caption laid out under the bars.
///
/// # Example
///
/// ```
/// use barqr::barcode::{Barcode, BarcodeOptions, Caption};
/// use barqr::helper::barcode_to_svg_string;
///
/// let mut barcode = Barcode::new(
///     BarcodeOptions::new("HELLO", 400.0).with_text(Caption::Text("HELLO".into())),
/// );
/// let svg = barcode_to_svg_string(&barcode.render().unwrap());
/// assert!(svg.contains(">HELLO</text>"));
/// ```
pub fn barcode_to_svg_string(view: &BarcodeView) -> String {
    let bars = &view.scene;
    let caption_height = if view.caption.is_some() { CAPTION_HEIGHT } else { 0.0 };
    let mut outer = Scene::new(bars.width, bars.height + caption_height);
    if let Some(background) = view.container.get("backgroundColor") {
        outer.push(Node::Rect(crate::scene::RectNode {
            rect: Rect::new(0.0, 0.0, outer.width, outer.height),
            radius: 0.0,
            fill: Some(Paint::Color(background.as_str().into())),
            clip_path: None,
        }));
    }
    outer.defs.extend(bars.defs.iter().cloned());
    outer.push(Node::group(bars.nodes.clone()));
    match &view.caption {
        Some(Caption::Text(text)) => outer.push(Node::Text(TextNode {
            content: text.clone(),
            x: bars.width / 2.0,
            y: bars.height + CAPTION_HEIGHT * 0.75,
            centered: true,
        })),
        Some(Caption::Custom(nodes)) => outer.push(Node::translated(0.0, bars.height, nodes.clone())),
        None => {}
    }
    to_svg_string(&outer)
}

fn write_defs(result: &mut String, defs: &[Def]) {
    if defs.is_empty() {
        return;
    }
    *result += "\t<defs>\n";
    for def in defs {
        match def {
            Def::ClipPath { id, rect, radius } => {
                *result += &format!(
                    "\t\t<clipPath id=\"{}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\" ry=\"{radius}\"/></clipPath>\n",
                    escape(id), rect.x0, rect.y0, rect.width(), rect.height());
            }
            Def::LinearGradient { id, x1, y1, x2, y2, stops } => {
                *result += &format!(
                    "\t\t<linearGradient id=\"{}\" x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\">\n",
                    escape(id));
                for stop in stops {
                    *result += &format!(
                        "\t\t\t<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>\n",
                        stop.offset, escape(stop.color.as_str()), stop.opacity);
                }
                *result += "\t\t</linearGradient>\n";
            }
        }
    }
    *result += "\t</defs>\n";
}

fn write_nodes(result: &mut String, nodes: &[Node], depth: usize) {
    let indent = "\t".repeat(depth);
    for node in nodes {
        match node {
            Node::Group { x, y, children } => {
                if *x == 0.0 && *y == 0.0 {
                    *result += &format!("{indent}<g>\n");
                } else {
                    *result += &format!("{indent}<g transform=\"translate({x} {y})\">\n");
                }
                write_nodes(result, children, depth + 1);
                *result += &format!("{indent}</g>\n");
            }
            Node::Rect(r) => {
                *result += &format!(
                    "{indent}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    r.rect.x0, r.rect.y0, r.rect.width(), r.rect.height());
                if r.radius > 0.0 {
                    *result += &format!(" rx=\"{0}\" ry=\"{0}\"", r.radius);
                }
                *result += &format!(" fill=\"{}\"", paint_attr(r.fill.as_ref()));
                if let Some(clip) = &r.clip_path {
                    *result += &format!(" clip-path=\"url(#{})\"", escape(clip));
                }
                *result += "/>\n";
            }
            Node::Path(p) => {
                *result += &format!(
                    "{indent}<path d=\"{}\" fill=\"{}\"",
                    p.data, paint_attr(p.fill.as_ref()));
                if let Some(stroke) = &p.stroke {
                    *result += &format!(
                        " stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"{}\"",
                        escape(&stroke.paint.to_string()), stroke.width, stroke.line_cap.as_str());
                }
                *result += "/>\n";
            }
            Node::Image(img) => {
                *result += &format!(
                    "{indent}<image width=\"{}\" height=\"{}\" preserveAspectRatio=\"{}\" xlink:href=\"{}\"",
                    img.width, img.height, escape(&img.preserve_aspect_ratio), escape(&img.href));
                if let Some(clip) = &img.clip_path {
                    *result += &format!(" clip-path=\"url(#{})\"", escape(clip));
                }
                *result += "/>\n";
            }
            Node::Text(t) => {
                let anchor = if t.centered { " text-anchor=\"middle\"" } else { "" };
                *result += &format!(
                    "{indent}<text x=\"{}\" y=\"{}\"{anchor}>{}</text>\n",
                    t.x, t.y, escape(&t.content));
            }
        }
    }
}

fn paint_attr(paint: Option<&Paint>) -> String {
    match paint {
        Some(p) => escape(&p.to_string()),
        None => "none".to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out += "&amp;",
            '<' => out += "&lt;",
            '>' => out += "&gt;",
            '"' => out += "&quot;",
            _ => out.push(c),
        }
    }
    out
}

/*---- Console ----*/

/// Prints the given module matrix to the console.
pub fn print_matrix(matrix: &ModuleMatrix) {
    let border: usize = 4;
    let side = matrix.side();
    for y in 0..side + 2 * border {
        for x in 0..side + 2 * border {
            let dark = y >= border && x >= border && matrix.get(y - border, x - border);
            let c: char = if dark { '█' } else { ' ' };
            print!("{0}{0}", c);
        }
        println!();
    }
    println!();
}

/*---- Raster ----*/

fn rgba(color: &Color) -> Result<Rgba<u8>, RasterError> {
    color.to_rgba().ok_or_else(|| RasterError::Color(color.to_string()))
}

/// Paints a module matrix into an image buffer.
///
/// # Arguments
///
/// * `matrix` - The modules to paint.
/// * `border` - Width of the light border around the matrix, in modules.
/// * `scale` - Edge length of one module in pixels. Zero is treated as one.
/// * `dark` - Color of dark modules.
/// * `light` - Color of light modules and the border.
///
/// # Example
///
/// ```
/// use barqr::helper::matrix_to_image;
/// use barqr::qr::ModuleMatrix;
/// use image::Rgba;
///
/// let matrix = ModuleMatrix::from_rows(&[[true, false], [false, true]]).unwrap();
/// let img = matrix_to_image(&matrix, 1, 3, Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255]));
/// assert_eq!(img.dimensions(), (12, 12));
/// ```
pub fn matrix_to_image(matrix: &ModuleMatrix, border: u32, scale: u32, dark: Rgba<u8>, light: Rgba<u8>) -> RgbaImage {
    let scale = scale.max(1);
    let size = (matrix.side() as u32 + 2 * border) * scale;
    let mut img = ImageBuffer::new(size, size);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let col = (x / scale).checked_sub(border);
        let row = (y / scale).checked_sub(border);
        *pixel = match (row, col) {
            (Some(row), Some(col)) if matrix.get(row as usize, col as usize) => dark,
            _ => light,
        };
    }

    img
}

/// Paints the QR code described by `options` with flat colors.
///
/// A module is `size / side` pixels, rounded down and at least one, and the quiet zone
/// is rounded to whole modules. The gradient and the logo only exist in vector output.
///
/// # Errors
///
/// [`RasterError::Render`] when the value cannot be encoded and [`RasterError::Color`]
/// when a color does not parse.
pub fn qr_to_image(options: &QrOptions) -> Result<RgbaImage, RasterError> {
    let matrix = ModuleMatrix::encode(&options.value, options.ecl)?;
    let scale = ((options.size / matrix.side() as f64).floor() as u32).max(1);
    let border = (options.quiet_zone.max(0.0) / f64::from(scale)).round() as u32;
    if options.enable_linear_gradient || options.logo.is_some() {
        log::debug!("Gradient and logo are not painted into raster output");
    }
    let dark = rgba(&options.color)?;
    let light = rgba(&options.background_color)?;
    Ok(matrix_to_image(&matrix, border, scale, dark, light))
}

/// Paints a barcode view at one pixel per unit: the container background, then every
/// filled path of the bar scene, sampled at pixel centers.
///
/// # Errors
///
/// [`RasterError::EmptyImage`] when the view has no bars area and
/// [`RasterError::Color`] when a color does not parse.
pub fn barcode_to_image(view: &BarcodeView) -> Result<RgbaImage, RasterError> {
    let width = view.scene.width.ceil().max(0.0) as u32;
    let height = view.scene.height.ceil().max(0.0) as u32;
    if width == 0 || height == 0 {
        return Err(RasterError::EmptyImage { width, height });
    }
    let background = match view.container.get("backgroundColor") {
        Some(color) => rgba(&Color::from(color.as_str()))?,
        None => Rgba([0, 0, 0, 0]),
    };
    let mut img = ImageBuffer::from_pixel(width, height, background);

    for node in &view.scene.nodes {
        let Node::Path(PathNode { data, fill: Some(Paint::Color(color)), .. }) = node else {
            continue;
        };
        let color = rgba(color)?;
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            if data.contains(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)) {
                *pixel = color;
            }
        }
    }

    Ok(img)
}

/// Saves an image as a PNG.
///
/// # Arguments
///
/// * `img` - The image to save.
/// * `directory_path` - Optional. The directory path where the image will be saved. If not provided, the default directory is "generated".
/// * `filename` - Optional. The name of the image file without extension. If not provided, a timestamp-based filename will be used.
///
/// # Returns
///
/// The path of the written file.
///
/// # Example
///
/// ```no_run
/// use barqr::helper::{qr_to_image, save_png};
/// use barqr::qr::QrOptions;
///
/// let img = qr_to_image(&QrOptions::new("Hello, World!")).unwrap();
/// save_png(&img, Some("images"), Some("qr_code")).unwrap();
/// ```
pub fn save_png(img: &RgbaImage, directory_path: Option<&str>, filename: Option<&str>) -> Result<PathBuf, RasterError> {
    let directory_path = directory_path.unwrap_or("generated");
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let since_the_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            since_the_epoch.as_millis().to_string()
        }
    };

    // Check if the directory exists, create it if it doesn't
    if !Path::new(directory_path).exists() {
        fs::create_dir_all(directory_path)?;
    }

    let file_path = Path::new(directory_path).join(format!("{filename}.png"));
    img.save(&file_path)?;
    log::debug!("Saved {}x{} image to {}", img.width(), img.height(), file_path.display());
    Ok(file_path)
}

/*---- One-shot generators ----*/

/// Generates a QR code SVG from the provided content with default options.
///
/// # Example
///
/// ```
/// use barqr::helper::generate_qr_svg_string;
///
/// let svg_string = generate_qr_svg_string("Hello, World!").unwrap();
/// assert!(svg_string.contains("stroke-linecap=\"butt\""));
/// ```
pub fn generate_qr_svg_string(content: &str) -> Result<String, RenderError> {
    let mut qr = QrCode::new(QrOptions::new(content));
    match qr.render()? {
        Some(scene) => Ok(to_svg_string(&scene)),
        None => Ok(String::new()),
    }
}

/// Generates a barcode SVG from the provided content.
///
/// # Arguments
///
/// * `content` - The value to encode.
/// * `format` - The symbology.
/// * `max_width` - Widest the bars may span.
///
/// # Example
///
/// ```
/// use barqr::barcode::BarcodeFormat;
/// use barqr::helper::generate_barcode_svg_string;
///
/// let svg = generate_barcode_svg_string("5901234123457", BarcodeFormat::Ean13, 300.0).unwrap();
/// assert!(svg.starts_with("<?xml"));
/// ```
pub fn generate_barcode_svg_string(content: &str, format: BarcodeFormat, max_width: f64) -> Result<String, RenderError> {
    let mut barcode = Barcode::new(BarcodeOptions::new(content, max_width).with_format(format));
    let view = barcode.render()?;
    Ok(barcode_to_svg_string(&view))
}

/// Generates a QR code image buffer from the provided content: black on white, error
/// correction level Low, a four-module border and `scale` pixels per module.
///
/// # Example
///
/// ```
/// use barqr::helper::generate_image_buffer;
///
/// let img_buffer = generate_image_buffer("Hello, World!", 2).unwrap();
/// assert_eq!(img_buffer.dimensions(), (58, 58));
/// ```
pub fn generate_image_buffer(content: &str, scale: u32) -> Result<RgbaImage, RasterError> {
    let matrix = ModuleMatrix::encode(content, ErrorCorrection::Low)?;
    let border: u32 = 4;
    Ok(matrix_to_image(&matrix, border, scale, Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255])))
}
