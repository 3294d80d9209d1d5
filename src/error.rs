//! # Error Types
//!
//! This module defines error types used throughout the popstudio library.

use thiserror::Error;

/// Main error type for popstudio operations
#[derive(Debug, Error)]
pub enum StudioError {
    /// Template application was requested without a selected product
    #[error("no product selected")]
    NoProductSelected,

    /// A barcode could not be encoded for the given code string
    #[error("barcode generation failed: {0}")]
    BarcodeGenerationFailed(String),

    /// The scene could not be rasterized; no partial artifact is returned
    #[error("rasterization failed: {0}")]
    RasterizationFailed(String),

    /// PDF assembly failed; callers degrade to a print view of the raster
    #[error("PDF encoding unavailable: {0}")]
    PdfEncodingUnavailable(String),

    /// Built-in templates cannot be deleted
    #[error("template deletion refused: {0}")]
    TemplateDeletionRefused(String),

    /// Image decoding or encoding error
    #[error("image error: {0}")]
    Image(String),
}
