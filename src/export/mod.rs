//! # Export Pipeline
//!
//! Renders a [`Document`] to raster output and packages it for distribution.
//!
//! ```text
//! Document → Renderer → RgbaImage → PNG bytes ─┬→ ExportArtifact (png)
//!                ↓                             └→ data URL → AssetStore
//!          element painters                     → PDF page  → ExportArtifact (pdf)
//!          (rect/ellipse/text/image/barcode)
//! ```
//!
//! Rendering never mutates the document and allocates a fresh surface per
//! call, so independent renders can run back to back without
//! cross-contamination. Output dimensions are exactly the document's
//! declared width and height; off-canvas element parts are clipped, never
//! resized around.

mod barcode;
mod pdf;
mod raster;
mod text;

pub use barcode::render_barcode;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Local;
use image::{ExtendedColorType, ImageEncoder, RgbaImage, codecs::png::PngEncoder};
use log::warn;

use crate::document::{Color, Document, ElementKind};
use crate::error::StudioError;
use crate::store::{AssetStore, Branch, ImageStore};

use raster::Surface;

/// Border color for image elements whose source cannot be resolved.
const PLACEHOLDER_GREY: Color = Color::rgb(0x9c, 0x9c, 0x9c);

/// Encoded artifact flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Png,
    Pdf,
}

impl ArtifactKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactKind::Png => "image/png",
            ArtifactKind::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Png => "png",
            ArtifactKind::Pdf => "pdf",
        }
    }
}

/// A finished, downloadable export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Document renderer, optionally wired to an image store for opaque refs.
///
/// Data-URL image refs are decoded inline and need no store.
#[derive(Default)]
pub struct Renderer<'a> {
    image_store: Option<&'a dyn ImageStore>,
}

impl<'a> Renderer<'a> {
    pub fn new() -> Self {
        Self { image_store: None }
    }

    pub fn with_image_store(store: &'a dyn ImageStore) -> Self {
        Self {
            image_store: Some(store),
        }
    }

    /// Rasterize the document at exactly its declared dimensions.
    pub fn render(&self, document: &Document) -> Result<RgbaImage, StudioError> {
        if document.width == 0 || document.height == 0 {
            return Err(StudioError::RasterizationFailed(format!(
                "canvas is {}x{}",
                document.width, document.height
            )));
        }

        let mut surface = Surface::new(
            document.width,
            document.height,
            document.background_color,
        );

        // List order is z-order; later elements paint on top.
        for element in &document.elements {
            match element.kind {
                ElementKind::Rect => {
                    surface.fill_rect(
                        element.x,
                        element.y,
                        element.width,
                        element.height,
                        element.fill,
                    );
                }
                ElementKind::Ellipse => {
                    surface.fill_ellipse(
                        element.x,
                        element.y,
                        element.width,
                        element.height,
                        element.fill,
                    );
                }
                ElementKind::Text => {
                    text::draw_text(&mut surface, element);
                }
                ElementKind::Image => match self.resolve_image(element.image_ref.as_deref()) {
                    Some(source) => {
                        surface.blit_stretched(
                            &source,
                            element.x,
                            element.y,
                            element.width,
                            element.height,
                        );
                    }
                    None => {
                        surface.draw_placeholder(
                            element.x,
                            element.y,
                            element.width,
                            element.height,
                            PLACEHOLDER_GREY,
                        );
                    }
                },
            }
        }

        Ok(surface.into_image())
    }

    /// Render and encode as a PNG artifact.
    pub fn render_png(&self, document: &Document) -> Result<ExportArtifact, StudioError> {
        let image = self.render(document)?;
        let (width, height) = image.dimensions();
        Ok(ExportArtifact {
            kind: ArtifactKind::Png,
            bytes: encode_png(&image)?,
            width,
            height,
        })
    }

    /// Render and wrap the raster in a one-page PDF.
    ///
    /// If PDF assembly fails, degrades to the PNG print view instead of
    /// failing the export; check the artifact's `kind`.
    pub fn render_pdf(&self, document: &Document) -> Result<ExportArtifact, StudioError> {
        let image = self.render(document)?;
        let encoded = pdf::encode_pdf(&image);
        package_pdf(&image, encoded)
    }

    /// Render the document and save the PNG data URL to the asset store.
    ///
    /// This is the pipeline's single write side effect, performed once per
    /// call. Returns the saved data URL.
    pub fn publish(
        &self,
        document: &Document,
        product_id: &str,
        artifact_name: &str,
        assets: &mut dyn AssetStore,
    ) -> Result<String, StudioError> {
        let image = self.render(document)?;
        let data_url = png_data_url(&image)?;
        assets.save(product_id, artifact_name, &data_url)?;
        Ok(data_url)
    }

    /// Decode an element's image source to pixels.
    ///
    /// Data URLs decode inline; anything else goes through the image store.
    /// Any failure resolves to `None` and the element renders a placeholder.
    fn resolve_image(&self, image_ref: Option<&str>) -> Option<RgbaImage> {
        let image_ref = image_ref?;
        let bytes = if let Some(rest) = image_ref.strip_prefix("data:") {
            let payload = rest.split_once(',')?.1;
            match BASE64.decode(payload) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("undecodable image data URL: {e}");
                    return None;
                }
            }
        } else {
            match self.image_store.and_then(|s| s.load(image_ref)) {
                Some(bytes) => bytes,
                None => {
                    warn!("image ref {image_ref:?} not found in store");
                    return None;
                }
            }
        };

        match image::load_from_memory(&bytes) {
            Ok(image) => Some(image.to_rgba8()),
            Err(e) => {
                warn!("image ref decoded to invalid image data: {e}");
                None
            }
        }
    }
}

/// Package the PDF encoder's outcome as an artifact.
///
/// Encoder failure is a degraded success, not an error: the caller gets the
/// PNG print view of the same raster and can tell from the artifact's
/// `kind` which flavor it received.
fn package_pdf(
    image: &RgbaImage,
    encoded: Result<Vec<u8>, StudioError>,
) -> Result<ExportArtifact, StudioError> {
    let (width, height) = image.dimensions();
    match encoded {
        Ok(bytes) => Ok(ExportArtifact {
            kind: ArtifactKind::Pdf,
            bytes,
            width,
            height,
        }),
        Err(e) => {
            warn!("PDF encoding unavailable ({e}), falling back to PNG print view");
            Ok(ExportArtifact {
                kind: ArtifactKind::Png,
                bytes: encode_png(image)?,
                width,
                height,
            })
        }
    }
}

/// Encode pixels as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, StudioError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| StudioError::Image(e.to_string()))?;
    Ok(bytes)
}

/// Encode pixels as a `data:image/png;base64,` URL.
pub fn png_data_url(image: &RgbaImage) -> Result<String, StudioError> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

/// Display name for a saved artifact: branch prefix, product slug, date.
pub fn default_artifact_name(branch: Option<&Branch>, product_name: &str) -> String {
    let date = Local::now().format("%Y%m%d");
    match branch {
        Some(branch) => format!("{}-{}-{date}", slug(&branch.name), slug(product_name)),
        None => format!("{}-{date}", slug(product_name)),
    }
}

/// Lowercase, alphanumerics kept, runs of anything else collapsed to `-`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() { "artifact".into() } else { out }
}
