//! Error types shared by the barcode and QR components.

use thiserror::Error;

/// Reasons a component cannot produce geometry for its current options.
///
/// Encoding is deterministic, so none of these are transient. The type is `Clone` so a
/// failed outcome can sit in the memo next to a successful one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RenderError {
    /// The barcode value was the empty string.
    #[error("Barcode value must be a non-empty string")]
    EmptyValue,

    /// The symbology tag does not name a supported linear format.
    #[error("Invalid barcode format: {0}")]
    UnsupportedFormat(String),

    /// The tag does not name one of the four QR error-correction levels.
    #[error("Invalid error correction level: {0}")]
    UnsupportedErrorCorrection(String),

    /// The encoder rejected the value for the chosen symbology.
    #[error("Invalid barcode for selected format {format}: {reason}")]
    InvalidValue { format: String, reason: String },

    /// The value does not fit in any QR version at the chosen error-correction level.
    #[error("Value too long for a QR code at error correction level {ecl}")]
    DataTooLong { ecl: String },

    /// A module buffer whose length is not a perfect square.
    #[error("Module buffer of length {len} is not a square matrix")]
    NotSquare { len: usize },
}

/// Receives encoding errors in place of the caller.
pub type ErrorCallback = Box<dyn FnMut(&RenderError)>;

/// Failures while painting into a pixel buffer or saving it.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Image has no area to paint ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Cannot parse color {0:?}")]
    Color(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
