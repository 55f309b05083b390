//! Linear barcode component.
//!
//! A [`Barcode`] turns its value into a bit string with the encoder for the chosen
//! [`BarcodeFormat`], converts every run of dark modules into one rectangle, and
//! composes the rectangles into a single filled path.

use crate::color::Color;
use crate::error::{ErrorCallback, RenderError};
use crate::geometry::{PathData, Rect};
use crate::memo::Memo;
use crate::scene::{Node, Paint, PathNode, RenderCallback, Scene};
use barcoders::sym;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Supported linear symbologies.
///
/// The set is closed: tags outside it are rejected when parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum BarcodeFormat {
    Code39,
    Code93,
    /// Code 128, picking set C for even-length digit strings and set B otherwise.
    #[default]
    Code128,
    Code128A,
    Code128B,
    Code128C,
    Ean13,
    Ean8,
    /// Five digit EAN add-on.
    Ean5,
    /// Two digit EAN add-on.
    Ean2,
    /// UPC-A.
    Upc,
    /// Zero-suppressed UPC.
    Upce,
    /// Interleaved 2 of 5.
    Itf,
    /// Interleaved 2 of 5 on 13 digits plus a check digit.
    Itf14,
    /// Standard (industrial) 2 of 5.
    Stf,
    Msi,
    Msi10,
    Msi11,
    Msi1010,
    Msi1110,
    Pharmacode,
    Codabar,
    /// A fixed alternating pattern that encodes nothing.
    GenericBarcode,
}

impl BarcodeFormat {
    pub const ALL: [BarcodeFormat; 23] = [
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Code128,
        BarcodeFormat::Code128A,
        BarcodeFormat::Code128B,
        BarcodeFormat::Code128C,
        BarcodeFormat::Ean13,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean5,
        BarcodeFormat::Ean2,
        BarcodeFormat::Upc,
        BarcodeFormat::Upce,
        BarcodeFormat::Itf,
        BarcodeFormat::Itf14,
        BarcodeFormat::Stf,
        BarcodeFormat::Msi,
        BarcodeFormat::Msi10,
        BarcodeFormat::Msi11,
        BarcodeFormat::Msi1010,
        BarcodeFormat::Msi1110,
        BarcodeFormat::Pharmacode,
        BarcodeFormat::Codabar,
        BarcodeFormat::GenericBarcode,
    ];

    /// The tag this format is known by.
    pub fn as_str(self) -> &'static str {
        use BarcodeFormat::*;
        match self {
            Code39 => "CODE39",
            Code93 => "CODE93",
            Code128 => "CODE128",
            Code128A => "CODE128A",
            Code128B => "CODE128B",
            Code128C => "CODE128C",
            Ean13 => "EAN13",
            Ean8 => "EAN8",
            Ean5 => "EAN5",
            Ean2 => "EAN2",
            Upc => "UPC",
            Upce => "UPCE",
            Itf => "ITF",
            Itf14 => "ITF14",
            Stf => "STF",
            Msi => "MSI",
            Msi10 => "MSI10",
            Msi11 => "MSI11",
            Msi1010 => "MSI1010",
            Msi1110 => "MSI1110",
            Pharmacode => "pharmacode",
            Codabar => "codabar",
            GenericBarcode => "GenericBarcode",
        }
    }

    /// Encodes `value` into its module pattern.
    ///
    /// # Errors
    ///
    /// [`RenderError::EmptyValue`] for an empty value and [`RenderError::InvalidValue`]
    /// when the value cannot be represented in this symbology.
    pub fn encode(self, value: &str) -> Result<BitString, RenderError> {
        use BarcodeFormat::*;
        if value.is_empty() {
            return Err(RenderError::EmptyValue);
        }
        let invalid = |reason: &dyn fmt::Display| RenderError::InvalidValue {
            format: self.as_str().to_string(),
            reason: reason.to_string(),
        };
        let modules = match self {
            Code39 => sym::code39::Code39::new(value.to_owned()).map(|b| b.encode()),
            Code93 => sym::code93::Code93::new(value.to_owned()).map(|b| b.encode()),
            Code128 => {
                let set = if value.len() % 2 == 0 && is_digits(value) { 'Ć' } else { 'Ɓ' };
                sym::code128::Code128::new(format!("{set}{value}")).map(|b| b.encode())
            }
            Code128A => sym::code128::Code128::new(format!("À{value}")).map(|b| b.encode()),
            Code128B => sym::code128::Code128::new(format!("Ɓ{value}")).map(|b| b.encode()),
            Code128C => sym::code128::Code128::new(format!("Ć{value}")).map(|b| b.encode()),
            Ean13 => {
                let digits = strip_check_digit(value, 12, ean_check_digit).map_err(|r| invalid(&r))?;
                sym::ean13::EAN13::new(digits).map(|b| b.encode())
            }
            Ean8 => {
                let digits = strip_check_digit(value, 7, ean_check_digit).map_err(|r| invalid(&r))?;
                sym::ean8::EAN8::new(digits).map(|b| b.encode())
            }
            Upc => {
                let digits = strip_check_digit(value, 11, |d| ean_check_digit(&format!("0{d}")))
                    .map_err(|r| invalid(&r))?;
                sym::ean13::EAN13::new(format!("0{digits}")).map(|b| b.encode())
            }
            Ean5 | Ean2 => {
                let len = if self == Ean5 { 5 } else { 2 };
                if value.len() != len || !is_digits(value) {
                    return Err(invalid(&format_args!("expected {len} digits")));
                }
                sym::ean_supp::EANSUPP::new(value.to_owned()).map(|b| b.encode())
            }
            Upce => return encode_upce(value).map_err(|r| invalid(&r)),
            Itf => {
                if !is_digits(value) || value.len() % 2 != 0 {
                    return Err(invalid(&"expected an even number of digits"));
                }
                sym::tf::TF::interleaved(value.to_owned()).map(|b| b.encode())
            }
            Itf14 => {
                let digits = strip_check_digit(value, 13, ean_check_digit).map_err(|r| invalid(&r))?;
                let check = ean_check_digit(&digits);
                sym::tf::TF::interleaved(format!("{digits}{check}")).map(|b| b.encode())
            }
            Stf => sym::tf::TF::standard(value.to_owned()).map(|b| b.encode()),
            Codabar => {
                let mut data = value.to_ascii_uppercase();
                // Bare data gets the A start and stop characters.
                if data.chars().all(is_codabar_data) {
                    data = format!("A{data}A");
                }
                sym::codabar::Codabar::new(data).map(|b| b.encode())
            }
            GenericBarcode => return Ok(BitString((0..41).map(|i| i % 2 == 0).collect())),
            Msi | Msi10 | Msi11 | Msi1010 | Msi1110 => {
                return encode_msi(self, value).map_err(|r| invalid(&r));
            }
            Pharmacode => return encode_pharmacode(value).map_err(|r| invalid(&r)),
        };
        let modules = modules.map_err(|e| invalid(&e))?;
        Ok(BitString::from_modules(&modules))
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarcodeFormat {
    type Err = RenderError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        BarcodeFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == tag)
            .ok_or_else(|| RenderError::UnsupportedFormat(tag.to_string()))
    }
}

impl TryFrom<String> for BarcodeFormat {
    type Error = RenderError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<BarcodeFormat> for String {
    fn from(format: BarcodeFormat) -> Self {
        format.as_str().to_string()
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// EAN/UPC check digit for a digit string without its check digit.
fn ean_check_digit(digits: &str) -> u32 {
    // Weight 3 falls on the digit adjacent to the check digit, then alternates.
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    (10 - sum % 10) % 10
}

/// Accepts `payload` digits, or `payload + 1` digits whose last one is a correct check digit.
/// Returns the payload.
fn strip_check_digit(
    value: &str,
    payload: usize,
    check: impl Fn(&str) -> u32,
) -> Result<String, String> {
    if !is_digits(value) {
        return Err("value must contain only digits".to_string());
    }
    if value.len() == payload {
        return Ok(value.to_string());
    }
    if value.len() == payload + 1 {
        let (body, last) = value.split_at(payload);
        let expected = check(body);
        return if last.parse::<u32>() == Ok(expected) {
            Ok(body.to_string())
        } else {
            Err(format!("check digit {last} does not match {expected}"))
        };
    }
    Err(format!("expected {payload} or {} digits", payload + 1))
}

fn is_codabar_data(c: char) -> bool {
    c.is_ascii_digit() || "-$:./+".contains(c)
}

const EAN_L: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011",
    "0110001", "0101111", "0111011", "0110111", "0001011",
];
const EAN_G: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101",
    "0111001", "0000101", "0010001", "0001001", "0010111",
];

/// UPC-A body digits for a zero-suppressed number, keyed by its last digit.
const UPCE_EXPANSIONS: [&str; 10] = [
    "XX00000XXX", "XX10000XXX", "XX20000XXX", "XXX00000XX", "XXXX00000X",
    "XXXXX00005", "XXXXX00006", "XXXXX00007", "XXXXX00008", "XXXXX00009",
];

/// Parity of the six digits, indexed by check digit then number system. `E` is even.
const UPCE_PARITIES: [[&str; 2]; 10] = [
    ["EEEOOO", "OOOEEE"],
    ["EEOEOO", "OOEOEE"],
    ["EEOOEO", "OOEEOE"],
    ["EEOOOE", "OOEEEO"],
    ["EOEEOO", "OEOOEE"],
    ["EOOEEO", "OEEOOE"],
    ["EOOOEE", "OEEEOO"],
    ["EOEOEO", "OEOEOE"],
    ["EOEOOE", "OEOEEO"],
    ["EOOEOE", "OEEOEO"],
];

/// Expands six UPC-E digits into the full UPC-A number, check digit included.
fn expand_upce(middle: &str, number_system: u8) -> String {
    let last = usize::from(middle.as_bytes()[5] - b'0');
    let mut digits = middle.chars();
    let body: String = UPCE_EXPANSIONS[last]
        .chars()
        .map(|c| if c == 'X' { digits.next().unwrap_or('0') } else { c })
        .collect();
    let upc_a = format!("{number_system}{body}");
    let check = ean_check_digit(&upc_a);
    format!("{upc_a}{check}")
}

/// Accepts six digits (number system 0), or eight digits with a number system of 0 or 1
/// and a matching check digit.
fn encode_upce(value: &str) -> Result<BitString, String> {
    if !is_digits(value) {
        return Err("value must contain only digits".to_string());
    }
    let (middle, number_system) = match value.len() {
        6 => (value, 0),
        8 => {
            let number_system = value.as_bytes()[0] - b'0';
            if number_system > 1 {
                return Err(format!("number system {number_system} is not 0 or 1"));
            }
            let middle = &value[1..7];
            let upc_a = expand_upce(middle, number_system);
            if !upc_a.ends_with(&value[7..]) {
                return Err(format!("check digit {} does not match {}", &value[7..], &upc_a[11..]));
            }
            (middle, number_system)
        }
        _ => return Err("expected 6 or 8 digits".to_string()),
    };
    let upc_a = expand_upce(middle, number_system);
    let check = usize::from(upc_a.as_bytes()[11] - b'0');
    let parity = UPCE_PARITIES[check][usize::from(number_system)];

    let mut bits = String::from("101");
    for (digit, side) in middle.bytes().zip(parity.chars()) {
        let table = if side == 'E' { &EAN_G } else { &EAN_L };
        bits += table[usize::from(digit - b'0')];
    }
    bits += "010101";
    BitString::parse(&bits).ok_or_else(|| "internal UPC-E pattern error".to_string())
}

fn msi_mod10(digits: &str) -> u32 {
    let len = digits.len();
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let n = u32::from(b - b'0');
            if (i + len) % 2 == 0 {
                n
            } else {
                (n * 2) % 10 + (n * 2) / 10
            }
        })
        .sum();
    (10 - sum % 10) % 10
}

fn msi_mod11(digits: &str) -> u32 {
    const WEIGHTS: [u32; 6] = [2, 3, 4, 5, 6, 7];
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| WEIGHTS[i % WEIGHTS.len()] * u32::from(b - b'0'))
        .sum();
    (11 - sum % 11) % 11
}

fn encode_msi(format: BarcodeFormat, value: &str) -> Result<BitString, String> {
    if !is_digits(value) {
        return Err("value must contain only digits".to_string());
    }
    let mut data = value.to_string();
    match format {
        BarcodeFormat::Msi10 => data += &msi_mod10(&data).to_string(),
        BarcodeFormat::Msi11 => data += &msi_mod11(&data).to_string(),
        BarcodeFormat::Msi1010 => {
            data += &msi_mod10(&data).to_string();
            data += &msi_mod10(&data).to_string();
        }
        BarcodeFormat::Msi1110 => {
            data += &msi_mod11(&data).to_string();
            data += &msi_mod10(&data).to_string();
        }
        _ => {}
    }
    let mut bits = String::from("110");
    for b in data.bytes() {
        let digit = b - b'0';
        for shift in (0..4).rev() {
            bits += if (digit >> shift) & 1 == 1 { "110" } else { "100" };
        }
    }
    bits += "1001";
    BitString::parse(&bits).ok_or_else(|| "internal MSI pattern error".to_string())
}

fn encode_pharmacode(value: &str) -> Result<BitString, String> {
    let number: u32 = value.parse().map_err(|_| "value must be a number".to_string())?;
    if !(3..=131_070).contains(&number) {
        return Err(format!("{number} is outside 3..=131070"));
    }
    let mut z = number;
    let mut bits = String::new();
    while z != 0 {
        if z % 2 == 0 {
            bits.insert_str(0, "11100");
            z = (z - 2) / 2;
        } else {
            bits.insert_str(0, "100");
            z = (z - 1) / 2;
        }
    }
    // Every symbol ends in two spaces; the trailing ones are not part of the pattern.
    bits.truncate(bits.len() - 2);
    BitString::parse(&bits).ok_or_else(|| "internal pharmacode pattern error".to_string())
}

/// An encoded barcode: one entry per module, `true` for a bar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitString(Vec<bool>);

impl BitString {
    /// Parses a string of `'0'` and `'1'` characters.
    pub fn parse(bits: &str) -> Option<Self> {
        bits.chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(BitString)
    }

    /// Builds from encoder output where any non-zero byte is a bar.
    pub fn from_modules(modules: &[u8]) -> Self {
        BitString(modules.iter().map(|&m| m != 0).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Bar rectangles for a bit string, plus the width they span.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BarLayout {
    pub rects: Vec<Rect>,
    /// Total pattern width after clamping to the maximum.
    pub width: f64,
    /// Width of a single module.
    pub module_width: f64,
}

/// Converts a bit string into one rectangle per run of bars.
///
/// Each module is `bar_width` wide unless the whole pattern would exceed `max_width`, in
/// which case every module shrinks uniformly so the pattern spans exactly `max_width`.
/// Rectangles start at `y = 0` and are `height` tall.
///
/// # Example
///
/// ```rust
/// use barqr::barcode::{layout_bars, BitString};
///
/// let bits = BitString::parse("1101").unwrap();
/// let layout = layout_bars(&bits, 2.0, None, 100.0);
/// assert_eq!(layout.rects.len(), 2);
/// assert_eq!((layout.rects[1].x0, layout.rects[1].width()), (6.0, 2.0));
/// ```
pub fn layout_bars(bits: &BitString, bar_width: f64, max_width: Option<f64>, height: f64) -> BarLayout {
    let natural = bits.len() as f64 * bar_width;
    let (module_width, width) = match max_width {
        Some(max) if natural > max && !bits.is_empty() => (max / bits.len() as f64, max),
        _ => (bar_width, natural),
    };

    let mut rects = Vec::new();
    let mut run = 0usize;
    let emit = |rects: &mut Vec<Rect>, end: usize, run: usize| {
        let start = end - run;
        rects.push(Rect::new(start as f64 * module_width, 0.0, end as f64 * module_width, height));
    };
    for (i, &bit) in bits.bits().iter().enumerate() {
        if bit {
            run += 1;
        } else if run > 0 {
            emit(&mut rects, i, run);
            run = 0;
        }
    }
    if run > 0 {
        emit(&mut rects, bits.len(), run);
    }

    BarLayout { rects, width, module_width }
}

/// Caption drawn under the bars.
#[derive(Clone, Debug, PartialEq)]
pub enum Caption {
    /// Centered text.
    Text(String),
    /// Arbitrary decoration supplied by the caller.
    Custom(Vec<Node>),
}

/// Options of a [`Barcode`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarcodeOptions {
    pub value: String,
    /// Width of one module before clamping.
    pub width: f64,
    pub max_width: f64,
    pub height: f64,
    pub format: BarcodeFormat,
    pub line_color: Color,
    pub background: Color,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub text: Option<Caption>,
    /// Container style properties, applied over the defaults.
    pub container_style: BTreeMap<String, String>,
}

impl BarcodeOptions {
    pub fn new(value: impl Into<String>, max_width: f64) -> Self {
        BarcodeOptions {
            value: value.into(),
            width: 2.0,
            max_width,
            height: 100.0,
            format: BarcodeFormat::default(),
            line_color: Color::from("#000000"),
            background: Color::from("#ffffff"),
            text: None,
            container_style: BTreeMap::new(),
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_format(mut self, format: BarcodeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_line_color(mut self, color: impl Into<Color>) -> Self {
        self.line_color = color.into();
        self
    }

    pub fn with_background(mut self, color: impl Into<Color>) -> Self {
        self.background = color.into();
        self
    }

    pub fn with_text(mut self, caption: Caption) -> Self {
        self.text = Some(caption);
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.container_style.insert(property.into(), value.into());
        self
    }
}

/// What the host renders for a barcode: a styled container, the bar scene, and a caption.
#[derive(Clone, Debug, PartialEq)]
pub struct BarcodeView {
    pub container: BTreeMap<String, String>,
    pub scene: Scene,
    pub caption: Option<Caption>,
}

/// Inputs that determine the bar geometry.
#[derive(Clone, Debug, PartialEq)]
struct LayoutKey {
    value: String,
    width: f64,
    height: f64,
    format: BarcodeFormat,
    line_color: Color,
    background: Color,
    max_width: f64,
}

impl From<&BarcodeOptions> for LayoutKey {
    fn from(o: &BarcodeOptions) -> Self {
        LayoutKey {
            value: o.value.clone(),
            width: o.width,
            height: o.height,
            format: o.format,
            line_color: o.line_color.clone(),
            background: o.background.clone(),
            max_width: o.max_width,
        }
    }
}

fn compute_layout(key: &LayoutKey) -> Result<BarLayout, RenderError> {
    let bits = key.format.encode(&key.value)?;
    let layout = layout_bars(&bits, key.width, Some(key.max_width), key.height);
    log::debug!(
        "{} barcode: {} modules, {} bars, width {}",
        key.format,
        bits.len(),
        layout.rects.len(),
        layout.width
    );
    Ok(layout)
}

/// A linear barcode component.
///
/// # Example
///
/// ```rust
/// use barqr::barcode::{Barcode, BarcodeFormat, BarcodeOptions};
///
/// let mut barcode = Barcode::new(
///     BarcodeOptions::new("1234567890", 300.0).with_format(BarcodeFormat::Code128),
/// );
/// let view = barcode.render().unwrap();
/// assert!(view.scene.width <= 300.0);
/// ```
pub struct Barcode {
    options: BarcodeOptions,
    on_error: Option<ErrorCallback>,
    get_ref: Option<RenderCallback>,
    memo: Memo<LayoutKey, Result<BarLayout, RenderError>>,
}

impl Barcode {
    pub fn new(options: BarcodeOptions) -> Self {
        Barcode { options, on_error: None, get_ref: None, memo: Memo::new() }
    }

    /// Routes encoding errors to `callback` instead of returning them from [`Barcode::render`].
    pub fn on_error(mut self, callback: impl FnMut(&RenderError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Hands every composed scene to `callback`.
    pub fn get_ref(mut self, callback: impl FnMut(&Scene) + 'static) -> Self {
        self.get_ref = Some(Box::new(callback));
        self
    }

    pub fn options(&self) -> &BarcodeOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut BarcodeOptions {
        &mut self.options
    }

    pub fn set_options(&mut self, options: BarcodeOptions) {
        self.options = options;
    }

    /// Produces the view for the current options.
    ///
    /// Bar geometry is recomputed only when an input that shapes it changed since the
    /// previous call.
    ///
    /// # Errors
    ///
    /// Returns the encoding error when no error callback is installed. With a callback the
    /// callback receives the error and the view carries no bars.
    pub fn render(&mut self) -> Result<BarcodeView, RenderError> {
        let key = LayoutKey::from(&self.options);
        let (outcome, computed) = self.memo.get_or_compute(key, compute_layout);
        let layout = match outcome {
            Ok(layout) => layout.clone(),
            Err(err) => {
                if computed {
                    log::warn!("{err}");
                }
                match self.on_error.as_mut() {
                    Some(callback) => {
                        if computed {
                            callback(err);
                        }
                        BarLayout::default()
                    }
                    None => return Err(err.clone()),
                }
            }
        };

        let scene = compose(&layout, &self.options);
        if let Some(get_ref) = self.get_ref.as_mut() {
            get_ref(&scene);
        }
        Ok(BarcodeView {
            container: container_style(&self.options),
            scene,
            caption: self.options.text.clone(),
        })
    }
}

fn compose(layout: &BarLayout, options: &BarcodeOptions) -> Scene {
    let mut data = PathData::new();
    for rect in &layout.rects {
        data.push_rect(rect);
    }
    let mut scene = Scene::new(layout.width, options.height);
    scene.push(Node::Path(PathNode {
        data,
        fill: Some(Paint::Color(options.line_color.clone())),
        stroke: None,
    }));
    scene
}

fn container_style(options: &BarcodeOptions) -> BTreeMap<String, String> {
    let mut style = BTreeMap::from([
        ("backgroundColor".to_string(), options.background.to_string()),
        ("alignItems".to_string(), "center".to_string()),
    ]);
    style.extend(options.container_style.iter().map(|(k, v)| (k.clone(), v.clone())));
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_layout_example() {
        let layout = layout_bars(&bits("1101"), 2.0, None, 100.0);
        assert_eq!(
            layout.rects,
            vec![Rect::new(0.0, 0.0, 4.0, 100.0), Rect::new(6.0, 0.0, 8.0, 100.0)]
        );
        assert_eq!(layout.width, 8.0);
    }

    #[test]
    fn test_layout_flushes_trailing_run() {
        let layout = layout_bars(&bits("0111"), 1.0, None, 10.0);
        assert_eq!(layout.rects, vec![Rect::new(1.0, 0.0, 4.0, 10.0)]);
        let layout = layout_bars(&bits("1"), 3.0, None, 10.0);
        assert_eq!(layout.rects, vec![Rect::new(0.0, 0.0, 3.0, 10.0)]);
    }

    #[test]
    fn test_layout_all_spaces() {
        let layout = layout_bars(&bits("0000"), 2.0, Some(100.0), 10.0);
        assert!(layout.rects.is_empty());
        assert_eq!(layout.width, 8.0);
    }

    #[test]
    fn test_layout_clamps_to_max_width() {
        let layout = layout_bars(&bits("10110001"), 4.0, Some(16.0), 50.0);
        assert_eq!(layout.module_width, 2.0);
        assert_eq!(layout.width, 16.0);
        assert_eq!(layout.rects.last().unwrap().x1, 16.0);
        // No scaling when the pattern already fits.
        let layout = layout_bars(&bits("10110001"), 1.0, Some(16.0), 50.0);
        assert_eq!(layout.module_width, 1.0);
        assert_eq!(layout.width, 8.0);
    }

    #[test]
    fn test_format_tags() {
        for format in BarcodeFormat::ALL {
            assert_eq!(format.as_str().parse::<BarcodeFormat>(), Ok(format));
        }
        assert_eq!(
            "QR".parse::<BarcodeFormat>(),
            Err(RenderError::UnsupportedFormat("QR".into()))
        );
        assert_eq!(
            "code128".parse::<BarcodeFormat>(),
            Err(RenderError::UnsupportedFormat("code128".into()))
        );
    }

    #[test]
    fn test_empty_value_rejected_before_encoding() {
        for format in BarcodeFormat::ALL {
            assert_eq!(format.encode(""), Err(RenderError::EmptyValue), "{format}");
        }
    }

    #[test]
    fn test_code128_start_codes() {
        // Start B, start C and start A patterns.
        let b = BarcodeFormat::Code128.encode("Hello").unwrap().to_string();
        assert!(b.starts_with("11010010000"), "{b}");
        let c = BarcodeFormat::Code128.encode("1234").unwrap().to_string();
        assert!(c.starts_with("11010011100"), "{c}");
        let a = BarcodeFormat::Code128A.encode("HELLO").unwrap().to_string();
        assert!(a.starts_with("11010000100"), "{a}");
    }

    #[test]
    fn test_ean13_check_digit() {
        assert_eq!(ean_check_digit("590123412345"), 7);
        assert_eq!(ean_check_digit("9638507"), 4);
        assert!(BarcodeFormat::Ean13.encode("5901234123457").is_ok());
        assert!(matches!(
            BarcodeFormat::Ean13.encode("5901234123450"),
            Err(RenderError::InvalidValue { .. })
        ));
        assert_eq!(BarcodeFormat::Ean13.encode("590123412345").unwrap().len(), 95);
    }

    #[test]
    fn test_invalid_value_reports_format() {
        match BarcodeFormat::Ean8.encode("abc") {
            Err(RenderError::InvalidValue { format, .. }) => assert_eq!(format, "EAN8"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(BarcodeFormat::Ean5.encode("123").is_err());
        assert!(BarcodeFormat::Pharmacode.encode("2").is_err());
        assert!(BarcodeFormat::Msi.encode("12a").is_err());
    }

    #[test]
    fn test_msi_patterns() {
        let one = BarcodeFormat::Msi.encode("1").unwrap();
        assert_eq!(one.to_string(), "110100100100110 1001".replace(' ', ""));
        assert_eq!(msi_mod10("1234"), 4);
        assert_eq!(msi_mod11("1234"), 3);
        let with_check = BarcodeFormat::Msi10.encode("1234").unwrap();
        // Start + 5 digits * 12 modules + stop.
        assert_eq!(with_check.len(), 3 + 5 * 12 + 4);
    }

    #[test]
    fn test_pharmacode_patterns() {
        assert_eq!(BarcodeFormat::Pharmacode.encode("3").unwrap().to_string(), "1001");
        assert_eq!(BarcodeFormat::Pharmacode.encode("4").unwrap().to_string(), "100111");
    }

    #[test]
    fn test_render_composes_single_path() {
        let mut barcode = Barcode::new(
            BarcodeOptions::new("4", 1000.0)
                .with_format(BarcodeFormat::Pharmacode)
                .with_width(2.0)
                .with_height(40.0)
                .with_line_color("#112233")
                .with_text(Caption::Text("4".into()))
                .with_style("padding", "8"),
        );
        let view = barcode.render().unwrap();
        assert_eq!(view.scene.width, 12.0);
        assert_eq!(view.scene.height, 40.0);
        assert_eq!(view.scene.nodes.len(), 1);
        match &view.scene.nodes[0] {
            Node::Path(p) => {
                assert_eq!(p.data.to_string(), "M0 0 L2 0 L2 40 L0 40 z M6 0 L12 0 L12 40 L6 40 z");
                assert_eq!(p.fill, Some(Paint::Color(Color::from("#112233"))));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(view.container["backgroundColor"], "#ffffff");
        assert_eq!(view.container["alignItems"], "center");
        assert_eq!(view.container["padding"], "8");
        assert_eq!(view.caption, Some(Caption::Text("4".into())));
    }

    #[test]
    fn test_container_style_passthrough_wins() {
        let barcode = BarcodeOptions::new("1", 10.0).with_style("alignItems", "flex-start");
        assert_eq!(container_style(&barcode)["alignItems"], "flex-start");
    }

    #[test]
    fn test_empty_value_with_callback() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut barcode = Barcode::new(BarcodeOptions::new("", 100.0)).on_error(move |err| {
            assert_eq!(*err, RenderError::EmptyValue);
            seen.set(seen.get() + 1);
        });
        let view = barcode.render().unwrap();
        assert!(view.scene.is_empty());
        assert_eq!(view.scene.width, 0.0);
        // Unchanged options reuse the memoized outcome.
        barcode.render().unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_empty_value_without_callback() {
        let mut barcode = Barcode::new(BarcodeOptions::new("", 100.0));
        assert_eq!(barcode.render().unwrap_err(), RenderError::EmptyValue);
    }

    #[test]
    fn test_memo_recomputes_on_change() {
        let scenes = Rc::new(Cell::new(0));
        let seen = scenes.clone();
        let mut barcode = Barcode::new(
            BarcodeOptions::new("3", 100.0).with_format(BarcodeFormat::Pharmacode),
        )
        .get_ref(move |_| seen.set(seen.get() + 1));
        let first = barcode.render().unwrap();
        barcode.options_mut().width = 4.0;
        let second = barcode.render().unwrap();
        assert_eq!(first.scene.width * 2.0, second.scene.width);
        assert_eq!(scenes.get(), 2);
    }

    #[test]
    fn test_itf_requires_even_digit_count() {
        assert!(BarcodeFormat::Itf.encode("1234").is_ok());
        match BarcodeFormat::Itf.encode("123") {
            Err(RenderError::InvalidValue { format, .. }) => assert_eq!(format, "ITF"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(BarcodeFormat::Itf.encode("12a4").is_err());
    }

    #[test]
    fn test_itf14_check_digit() {
        assert_eq!(ean_check_digit("1234567890123"), 1);
        let short = BarcodeFormat::Itf14.encode("1234567890123").unwrap();
        let full = BarcodeFormat::Itf14.encode("12345678901231").unwrap();
        assert_eq!(short, full);
        assert_eq!(full, BarcodeFormat::Itf.encode("12345678901231").unwrap());
        assert!(BarcodeFormat::Itf14.encode("12345678901230").is_err());
        assert!(BarcodeFormat::Itf14.encode("123456").is_err());
    }

    #[test]
    fn test_codabar_start_stop() {
        let bare = BarcodeFormat::Codabar.encode("1234").unwrap();
        assert_eq!(bare, BarcodeFormat::Codabar.encode("A1234A").unwrap());
        assert_eq!(
            BarcodeFormat::Codabar.encode("b40156c").unwrap(),
            BarcodeFormat::Codabar.encode("B40156C").unwrap()
        );
        assert!(BarcodeFormat::Codabar.encode("12!4").is_err());
    }

    #[test]
    fn test_upce_expansion_and_pattern() {
        assert_eq!(expand_upce("123456", 0), "012345000065");
        // Last digit 1 inserts "10000" after the first two digits.
        assert_eq!(expand_upce("654321", 1), format!("16510000432{}", ean_check_digit("16510000432")));
        let bits = BarcodeFormat::Upce.encode("01234565").unwrap();
        assert_eq!(bits, BarcodeFormat::Upce.encode("123456").unwrap());
        let pattern = bits.to_string();
        assert_eq!(pattern.len(), 3 + 6 * 7 + 6);
        // Check digit 5 with number system 0 gives parity EOOEEO.
        assert!(pattern.starts_with("1010110011"), "{pattern}");
        assert!(pattern.ends_with("0101111010101"), "{pattern}");
        assert!(BarcodeFormat::Upce.encode("01234564").is_err());
        assert!(BarcodeFormat::Upce.encode("21234565").is_err());
        assert!(BarcodeFormat::Upce.encode("12345").is_err());
    }

    #[test]
    fn test_generic_barcode_pattern() {
        let bits = BarcodeFormat::GenericBarcode.encode("anything").unwrap();
        assert_eq!(bits.len(), 41);
        assert_eq!(bits.to_string(), format!("{}1", "10".repeat(20)));
        let layout = layout_bars(&bits, 1.0, None, 10.0);
        assert_eq!(layout.rects.len(), 21);
    }

    proptest! {
        #[test]
        fn prop_runs_cover_bars_without_overlap(pattern in "[01]{1,64}", width in 1u32..5) {
            let bits = bits(&pattern);
            let width = f64::from(width);
            let layout = layout_bars(&bits, width, None, 10.0);
            let ones = pattern.bytes().filter(|&b| b == b'1').count() as f64;
            let covered: f64 = layout.rects.iter().map(|r| r.width()).sum();
            prop_assert_eq!(covered, ones * width);
            for pair in layout.rects.windows(2) {
                prop_assert!(pair[0].x1 < pair[1].x0);
            }
        }

        #[test]
        fn prop_clamped_pattern_ends_at_max(pattern in "[01]{0,63}1", max in 1u32..64) {
            let bits = bits(&pattern);
            // Powers of two keep the scaled coordinates exact.
            let max = f64::from(max.next_power_of_two());
            let natural = bits.len() as f64 * 4.0;
            let layout = layout_bars(&bits, 4.0, Some(max), 10.0);
            if natural > max {
                prop_assert_eq!(layout.width, max);
                let right = layout.rects.last().map(|r| r.x1).unwrap_or(0.0);
                prop_assert!((right - max).abs() < 1e-9);
            } else {
                prop_assert_eq!(layout.width, natural);
            }
        }
    }
}
