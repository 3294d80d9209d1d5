//! # Template Engine
//!
//! Named, reusable document skeletons with binding markers, resolved against
//! a product record into a concrete [`Document`].
//!
//! Resolution always builds a fresh element list from the skeleton and never
//! merges into the current document, so applying the same template to the
//! same product twice yields structurally identical output (modulo the fresh
//! element ids).

mod builtin;

use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{BindingKind, Color, DesignElement, Document, ElementKind, FontWeight};
use crate::error::StudioError;
use crate::export;

/// Barcode code used when a product record carries no code of its own.
///
/// A present-but-unencodable code (such as an empty string) is a different
/// case: it fails encoding and the element keeps no image at all.
pub const FALLBACK_BARCODE: &str = "4900000000000";

/// Read-only product record from the external catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub display_name: String,
    /// Catalog price in whole yen. Template resolution never reads this for
    /// the Price binding; the caller supplies the display price explicitly.
    pub price: i64,
    #[serde(default)]
    pub barcode_code: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// A [`DesignElement`] skeleton without an id, as stored in a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElement {
    pub kind: ElementKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
    #[serde(default)]
    pub text: String,
    #[serde(default = "TemplateElement::default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default = "TemplateElement::default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub binding: BindingKind,
}

impl TemplateElement {
    fn default_font_size() -> f32 {
        24.0
    }

    fn default_font_family() -> String {
        "sans-serif".into()
    }

    /// Deep-copy into a concrete element with a fresh id.
    fn instantiate(&self) -> DesignElement {
        DesignElement {
            id: Uuid::new_v4(),
            kind: self.kind,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            fill: self.fill,
            text: self.text.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight,
            font_family: self.font_family.clone(),
            image_ref: self.image_ref.clone(),
            binding: self.binding,
        }
    }
}

impl From<&DesignElement> for TemplateElement {
    /// Strip the id from a concrete element (for "save as template").
    fn from(element: &DesignElement) -> Self {
        Self {
            kind: element.kind,
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
            fill: element.fill,
            text: element.text.clone(),
            font_size: element.font_size,
            font_weight: element.font_weight,
            font_family: element.font_family.clone(),
            image_ref: element.image_ref.clone(),
            binding: element.binding,
        }
    }
}

/// A named, reusable document skeleton. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub background_color: Color,
    /// Canvas size; `None` keeps the current document's size on apply.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub elements: Vec<TemplateElement>,
    /// Built-ins ship with the library and refuse deletion.
    #[serde(default)]
    pub builtin: bool,
}

/// Resolve a template against a product record into a concrete document.
///
/// `price_override` is the display price; pass `product.price` to show the
/// catalog price unchanged. `current` supplies the canvas size when the
/// template omits one and is never mutated.
///
/// Skeleton order is preserved, so the resolved document keeps the
/// template's z-order. A barcode that fails to encode is recovered locally:
/// the element stays, with no image, and resolution still succeeds.
pub fn apply_template(
    template: &Template,
    product: Option<&ProductRecord>,
    price_override: i64,
    current: &Document,
) -> Result<Document, StudioError> {
    let product = product.ok_or(StudioError::NoProductSelected)?;

    let mut doc = Document::new(
        template.width.unwrap_or(current.width),
        template.height.unwrap_or(current.height),
    );
    doc.background_color = template.background_color;

    for skeleton in &template.elements {
        let mut element = skeleton.instantiate();
        match element.binding {
            BindingKind::None => {}
            BindingKind::Name => {
                element.text = product.display_name.clone();
            }
            BindingKind::Price => {
                element.text = format_yen(price_override);
            }
            BindingKind::Barcode => {
                element.kind = ElementKind::Image;
                element.text.clear();
                element.image_ref = barcode_image_ref(product);
            }
            BindingKind::Image => {
                if let Some(image_ref) = &product.image_ref {
                    element.image_ref = Some(image_ref.clone());
                }
            }
        }
        doc.elements.push(element);
    }

    Ok(doc)
}

/// Render the product's barcode to a PNG data URL for an image element.
///
/// Returns `None` (element keeps no image) when the code cannot be encoded;
/// the caller proceeds without the barcode per the recovery contract.
fn barcode_image_ref(product: &ProductRecord) -> Option<String> {
    let code = product.barcode_code.as_deref().unwrap_or(FALLBACK_BARCODE);
    let bitmap = match export::render_barcode(code) {
        Some(bitmap) => bitmap,
        None => {
            let e = StudioError::BarcodeGenerationFailed(code.into());
            warn!("{e}; continuing without image");
            return None;
        }
    };
    match export::png_data_url(&bitmap) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("barcode PNG encoding failed: {e}; continuing without image");
            None
        }
    }
}

/// Format whole yen with thousands grouping: `format_yen(1980)` is `"¥1,980"`.
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}

/// Session template catalog: the built-in set plus user-saved customs.
///
/// Custom templates live only for the session unless the host persists the
/// serialized catalog elsewhere.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TemplateCatalog {
    /// Catalog pre-populated with the built-in templates.
    pub fn with_builtins() -> Self {
        Self {
            templates: builtin::builtin_templates(),
        }
    }

    /// Catalog with no templates at all (mainly for tests).
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Capture the current document as a custom template.
    ///
    /// Element ids are stripped; size and background are recorded so the
    /// template reproduces the canvas exactly.
    pub fn save_as_template(
        &mut self,
        document: &Document,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> &Template {
        let template = Template {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            background_color: document.background_color,
            width: Some(document.width),
            height: Some(document.height),
            elements: document.elements.iter().map(TemplateElement::from).collect(),
            builtin: false,
        };
        let idx = self.templates.len();
        self.templates.push(template);
        &self.templates[idx]
    }

    /// Delete a custom template. Built-ins refuse; unknown ids are a no-op.
    pub fn delete_template(&mut self, id: &str) -> Result<(), StudioError> {
        if let Some(template) = self.get(id)
            && template.builtin
        {
            return Err(StudioError::TemplateDeletionRefused(template.name.clone()));
        }
        self.templates.retain(|t| t.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AMBER, BLACK, WHITE};

    fn widget() -> ProductRecord {
        ProductRecord {
            display_name: "Widget A".into(),
            price: 2200,
            barcode_code: Some("4900000000000".into()),
            image_ref: Some("assets/widget-a".into()),
        }
    }

    fn test_template() -> Template {
        Template {
            id: "test".into(),
            name: "Test".into(),
            description: String::new(),
            background_color: WHITE,
            width: Some(600),
            height: Some(400),
            elements: vec![
                TemplateElement {
                    kind: ElementKind::Rect,
                    x: 0.0,
                    y: 0.0,
                    width: 600.0,
                    height: 60.0,
                    fill: AMBER,
                    text: String::new(),
                    font_size: 24.0,
                    font_weight: FontWeight::Normal,
                    font_family: "sans-serif".into(),
                    image_ref: None,
                    binding: BindingKind::None,
                },
                TemplateElement {
                    kind: ElementKind::Text,
                    x: 40.0,
                    y: 80.0,
                    width: 300.0,
                    height: 40.0,
                    fill: BLACK,
                    text: "placeholder".into(),
                    font_size: 32.0,
                    font_weight: FontWeight::Bold,
                    font_family: "sans-serif".into(),
                    image_ref: None,
                    binding: BindingKind::Name,
                },
                TemplateElement {
                    kind: ElementKind::Text,
                    x: 260.0,
                    y: 120.0,
                    width: 300.0,
                    height: 60.0,
                    fill: BLACK,
                    text: String::new(),
                    font_size: 40.0,
                    font_weight: FontWeight::Bold,
                    font_family: "sans-serif".into(),
                    image_ref: None,
                    binding: BindingKind::Price,
                },
                TemplateElement {
                    kind: ElementKind::Rect,
                    x: 40.0,
                    y: 280.0,
                    width: 200.0,
                    height: 80.0,
                    fill: WHITE,
                    text: String::new(),
                    font_size: 24.0,
                    font_weight: FontWeight::Normal,
                    font_family: "sans-serif".into(),
                    image_ref: None,
                    binding: BindingKind::Barcode,
                },
            ],
            builtin: false,
        }
    }

    #[test]
    fn format_yen_groups_thousands() {
        assert_eq!(format_yen(0), "¥0");
        assert_eq!(format_yen(980), "¥980");
        assert_eq!(format_yen(1980), "¥1,980");
        assert_eq!(format_yen(1234567), "¥1,234,567");
        assert_eq!(format_yen(-1980), "-¥1,980");
    }

    #[test]
    fn apply_requires_product() {
        let current = Document::new(600, 400);
        let err = apply_template(&test_template(), None, 1980, &current).unwrap_err();
        assert!(matches!(err, StudioError::NoProductSelected));
    }

    #[test]
    fn apply_resolves_bindings() {
        let current = Document::new(600, 400);
        let product = widget();
        let doc = apply_template(&test_template(), Some(&product), 1980, &current).unwrap();

        assert_eq!(doc.elements.len(), 4);
        assert_eq!(doc.elements[1].text, "Widget A");
        assert_eq!(doc.elements[2].text, "¥1,980");
        // Barcode binding re-kinds to Image with a rendered data URL.
        assert_eq!(doc.elements[3].kind, ElementKind::Image);
        assert!(doc.elements[3].text.is_empty());
        let barcode_ref = doc.elements[3].image_ref.as_deref().unwrap();
        assert!(barcode_ref.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn apply_uses_override_not_catalog_price() {
        let current = Document::new(600, 400);
        let product = widget(); // catalog price 2200
        let doc = apply_template(&test_template(), Some(&product), 1980, &current).unwrap();
        assert_eq!(doc.elements[2].text, "¥1,980");
    }

    #[test]
    fn apply_preserves_skeleton_order() {
        let current = Document::new(600, 400);
        let product = widget();
        let template = test_template();
        let doc = apply_template(&template, Some(&product), 1980, &current).unwrap();
        let kinds: Vec<_> = doc.elements.iter().map(|e| e.binding).collect();
        assert_eq!(
            kinds,
            vec![
                BindingKind::None,
                BindingKind::Name,
                BindingKind::Price,
                BindingKind::Barcode
            ]
        );
    }

    #[test]
    fn apply_is_idempotent_modulo_ids() {
        let current = Document::new(600, 400);
        let product = widget();
        let template = test_template();
        let a = apply_template(&template, Some(&product), 1980, &current).unwrap();
        let b = apply_template(&template, Some(&product), 1980, &current).unwrap();

        assert_eq!(a.elements.len(), b.elements.len());
        for (ea, eb) in a.elements.iter().zip(&b.elements) {
            assert_ne!(ea.id, eb.id);
            let mut eb_with_ea_id = eb.clone();
            eb_with_ea_id.id = ea.id;
            assert_eq!(*ea, eb_with_ea_id);
        }
    }

    #[test]
    fn empty_barcode_code_recovers_without_image() {
        let current = Document::new(600, 400);
        let mut product = widget();
        product.barcode_code = Some(String::new());
        let doc = apply_template(&test_template(), Some(&product), 1980, &current).unwrap();
        assert_eq!(doc.elements[3].kind, ElementKind::Image);
        assert!(doc.elements[3].image_ref.is_none());
    }

    #[test]
    fn missing_barcode_code_uses_fallback() {
        let current = Document::new(600, 400);
        let mut product = widget();
        product.barcode_code = None;
        let doc = apply_template(&test_template(), Some(&product), 1980, &current).unwrap();
        assert!(doc.elements[3].image_ref.is_some());
    }

    #[test]
    fn apply_keeps_current_size_when_template_omits_one() {
        let current = Document::new(800, 500);
        let mut template = test_template();
        template.width = None;
        template.height = None;
        let product = widget();
        let doc = apply_template(&template, Some(&product), 1980, &current).unwrap();
        assert_eq!((doc.width, doc.height), (800, 500));
    }

    #[test]
    fn apply_replaces_rather_than_merges() {
        let mut current = Document::new(600, 400);
        current.add_element(ElementKind::Ellipse);
        current.add_element(ElementKind::Ellipse);
        let product = widget();
        let doc = apply_template(&test_template(), Some(&product), 1980, &current).unwrap();
        // Only the template's elements survive; the ellipses are gone.
        assert_eq!(doc.elements.len(), 4);
        assert!(doc.elements.iter().all(|e| e.kind != ElementKind::Ellipse));
        // The input document is untouched.
        assert_eq!(current.elements.len(), 2);
    }

    #[test]
    fn save_as_template_strips_ids() {
        let mut catalog = TemplateCatalog::empty();
        let mut doc = Document::new(600, 400);
        doc.add_element(ElementKind::Rect);
        doc.add_element(ElementKind::Text);

        let template = catalog.save_as_template(&doc, "Mine", "custom layout");
        assert_eq!(template.elements.len(), 2);
        assert_eq!(template.width, Some(600));
        assert!(!template.builtin);
        let id = template.id.clone();
        assert!(catalog.get(&id).is_some());
    }

    #[test]
    fn builtin_deletion_is_refused() {
        let mut catalog = TemplateCatalog::with_builtins();
        let builtin_id = catalog
            .iter()
            .find(|t| t.builtin)
            .map(|t| t.id.clone())
            .expect("at least one builtin");
        let count = catalog.iter().count();

        let err = catalog.delete_template(&builtin_id).unwrap_err();
        assert!(matches!(err, StudioError::TemplateDeletionRefused(_)));
        assert_eq!(catalog.iter().count(), count);
    }

    #[test]
    fn custom_deletion_removes_template() {
        let mut catalog = TemplateCatalog::with_builtins();
        let doc = Document::new(600, 400);
        let id = catalog.save_as_template(&doc, "Mine", "").id.clone();
        catalog.delete_template(&id).unwrap();
        assert!(catalog.get(&id).is_none());
        // Unknown id deletion stays a quiet no-op.
        catalog.delete_template("no-such-template").unwrap();
    }

    #[test]
    fn builtin_catalog_has_standard() {
        let catalog = TemplateCatalog::with_builtins();
        let standard = catalog.get("standard").expect("standard builtin");
        assert!(standard.builtin);
        assert!(
            standard
                .elements
                .iter()
                .any(|e| e.binding == BindingKind::Name)
        );
        assert!(
            standard
                .elements
                .iter()
                .any(|e| e.binding == BindingKind::Price)
        );
        assert!(
            standard
                .elements
                .iter()
                .any(|e| e.binding == BindingKind::Barcode)
        );
    }
}
