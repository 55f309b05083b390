//! # barqr
//!
//! Barcode and QR code components that produce vector drawings.
//!
//! `barqr` takes a value and visual options, obtains the encoded bit pattern from an
//! encoder (`barcoders` for linear symbologies, `qrcodegen` for QR codes), and converts
//! that pattern into vector geometry: one rectangle per run of bars for barcodes, one
//! horizontal stroke segment per run of dark modules for QR codes. The geometry is
//! composed with the decorations (caption, background, quiet zone, gradient, logo) into a
//! declarative [`scene::Scene`] that a host renderer paints.
//!
//! ## Features
//!
//! - Twenty linear symbologies behind a closed [`barcode::BarcodeFormat`] enum.
//! - QR codes at four error-correction levels, with quiet zone, linear gradient and a
//!   centered logo with rounded corners.
//! - Single-entry memoization: geometry is recomputed only when an input that shapes it
//!   changes.
//! - Errors go to an error callback when one is installed and are returned otherwise.
//! - SVG output, PNG output and in-memory image buffers through [`helper`].
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! barqr = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a QR code with a gradient and a logo:
//!
//! ```rust
//! use barqr::color::Color;
//! use barqr::qr::{ErrorCorrection, Logo, QrCode, QrOptions};
//! use barqr::scene::Length;
//!
//! let options = QrOptions::new("https://example.com")
//!     .with_size(200.0)
//!     .with_quiet_zone(8.0)
//!     .with_ecl(ErrorCorrection::High)
//!     .with_logo(Logo::new("src/logo.png").with_border_radius(6.0))
//!     .with_linear_gradient(
//!         [Length::Percent(0.0), Length::Percent(0.0), Length::Percent(100.0), Length::Percent(100.0)],
//!         [Color::from("#ff8800"), Color::from("#0055ff")],
//!     );
//! let scene = QrCode::new(options).render().unwrap().unwrap();
//! let svg = barqr::helper::to_svg_string(&scene);
//! assert!(svg.contains("url(#grad)"));
//! ```
//!
//! Render a barcode, reporting errors through a callback:
//!
//! ```rust
//! use barqr::barcode::{Barcode, BarcodeFormat, BarcodeOptions, Caption};
//!
//! let mut barcode = Barcode::new(
//!     BarcodeOptions::new("5901234123457", 300.0)
//!         .with_format(BarcodeFormat::Ean13)
//!         .with_text(Caption::Text("5901234123457".into())),
//! )
//! .on_error(|err| eprintln!("{err}"));
//! let view = barcode.render().unwrap();
//! assert!(!view.scene.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`barcode`]: Linear barcode component and bar geometry.
//! - [`qr`]: QR code component and module path geometry.
//! - [`scene`]: The vector scene graph both components produce.
//! - [`helper`]: SVG, console and raster output.

pub mod barcode;
pub mod color;
pub mod error;
pub mod geometry;
pub mod helper;
pub mod memo;
pub mod qr;
pub mod scene;

pub use barcode::{Barcode, BarcodeFormat, BarcodeOptions};
pub use error::{RasterError, RenderError};
pub use qr::{ErrorCorrection, QrCode, QrOptions};
pub use scene::Scene;
