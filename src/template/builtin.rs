//! Built-in templates shipped with the library.
//!
//! These carry stable string ids so hosts can reference them directly, and
//! they refuse deletion through [`TemplateCatalog`](super::TemplateCatalog).

use crate::document::{AMBER, BLACK, BindingKind, ElementKind, FontWeight, RED, WHITE};

use super::{Template, TemplateElement};

fn element(kind: ElementKind, x: f32, y: f32, width: f32, height: f32) -> TemplateElement {
    TemplateElement {
        kind,
        x,
        y,
        width,
        height,
        fill: BLACK,
        text: String::new(),
        font_size: 24.0,
        font_weight: FontWeight::Normal,
        font_family: "sans-serif".into(),
        image_ref: None,
        binding: BindingKind::None,
    }
}

fn bound_text(
    binding: BindingKind,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    font_size: f32,
) -> TemplateElement {
    TemplateElement {
        font_size,
        font_weight: FontWeight::Bold,
        binding,
        ..element(ElementKind::Text, x, y, width, height)
    }
}

/// The default catalog contents, in display order.
pub(super) fn builtin_templates() -> Vec<Template> {
    vec![standard(), sale(), plain()]
}

/// White-background label with name, price, product photo and barcode.
fn standard() -> Template {
    Template {
        id: "standard".into(),
        name: "Standard".into(),
        description: "Name, price, photo and barcode on a white card".into(),
        background_color: WHITE,
        width: Some(600),
        height: Some(400),
        elements: vec![
            bound_text(BindingKind::Name, 40.0, 40.0, 400.0, 48.0, 36.0),
            bound_text(BindingKind::Price, 260.0, 120.0, 300.0, 72.0, 56.0),
            TemplateElement {
                binding: BindingKind::Image,
                ..element(ElementKind::Image, 40.0, 120.0, 180.0, 180.0)
            },
            TemplateElement {
                binding: BindingKind::Barcode,
                fill: WHITE,
                ..element(ElementKind::Image, 300.0, 280.0, 240.0, 90.0)
            },
        ],
        builtin: true,
    }
}

/// Loud promotional layout with an amber banner and oversized price.
fn sale() -> Template {
    Template {
        id: "sale".into(),
        name: "Sale".into(),
        description: "Amber banner with an oversized promotional price".into(),
        background_color: WHITE,
        width: Some(600),
        height: Some(400),
        elements: vec![
            TemplateElement {
                fill: AMBER,
                ..element(ElementKind::Rect, 0.0, 0.0, 600.0, 90.0)
            },
            TemplateElement {
                fill: WHITE,
                text: "SALE".into(),
                font_size: 48.0,
                font_weight: FontWeight::Bold,
                ..element(ElementKind::Text, 40.0, 20.0, 200.0, 56.0)
            },
            bound_text(BindingKind::Name, 40.0, 120.0, 520.0, 44.0, 32.0),
            TemplateElement {
                fill: RED,
                ..bound_text(BindingKind::Price, 180.0, 190.0, 360.0, 90.0, 64.0)
            },
            TemplateElement {
                binding: BindingKind::Barcode,
                fill: WHITE,
                ..element(ElementKind::Image, 40.0, 300.0, 220.0, 80.0)
            },
        ],
        builtin: true,
    }
}

/// Minimal layout: name and price only, for shelf-edge strips.
fn plain() -> Template {
    Template {
        id: "plain".into(),
        name: "Plain".into(),
        description: "Name and price only".into(),
        background_color: WHITE,
        width: Some(600),
        height: Some(200),
        elements: vec![
            bound_text(BindingKind::Name, 30.0, 30.0, 400.0, 40.0, 28.0),
            bound_text(BindingKind::Price, 340.0, 100.0, 230.0, 70.0, 52.0),
        ],
        builtin: true,
    }
}
