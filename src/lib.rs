//! # Popstudio - POP Label Designer Library
//!
//! Popstudio is a Rust library for designing and exporting in-store POP
//! (point of purchase) price labels. It provides:
//!
//! - **Document model**: elements, colors and z-order with serde round-trips
//! - **Template engine**: reusable skeletons resolved against product data
//! - **Editor session**: single-selection pointer state machine
//! - **Export pipeline**: raster rendering, PNG/PDF artifacts, CODE128 barcodes
//!
//! ## Quick Start
//!
//! ```
//! use popstudio::editor::EditorSession;
//! use popstudio::export::Renderer;
//! use popstudio::template::{ProductRecord, TemplateCatalog, apply_template};
//!
//! let catalog = TemplateCatalog::default();
//! let standard = catalog.get("standard").unwrap();
//!
//! let product = ProductRecord {
//!     display_name: "Widget A".into(),
//!     price: 2200,
//!     barcode_code: Some("4900000000000".into()),
//!     image_ref: None,
//! };
//!
//! // Resolve the template at a promotional price.
//! let mut session = EditorSession::new(Default::default());
//! let doc = apply_template(standard, Some(&product), 1980, &session.document)?;
//! session.replace_document(doc);
//!
//! // Nudge the price text, then export.
//! session.pointer_down(270.0, 130.0);
//! session.pointer_move(280.0, 130.0);
//! session.pointer_up();
//!
//! let artifact = Renderer::new().render_png(&session.document)?;
//! assert_eq!((artifact.width, artifact.height), (600, 400));
//! # Ok::<(), popstudio::StudioError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Element and document model |
//! | [`template`] | Templates, product binding, price formatting |
//! | [`editor`] | Selection and drag state machine |
//! | [`export`] | Rasterization, PNG/PDF artifacts, barcodes |
//! | [`store`] | External collaborator traits and in-memory backends |
//! | [`error`] | Error types |

pub mod document;
pub mod editor;
pub mod error;
pub mod export;
pub mod store;
pub mod template;

// Re-exports for convenience
pub use document::Document;
pub use editor::EditorSession;
pub use error::StudioError;
pub use export::Renderer;
