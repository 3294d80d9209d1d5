//! Element types for the design document model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and JSON persistence.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// COLOR
// ============================================================================

/// RGBA color, serialized as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Default fill for new rectangles.
pub const AMBER: Color = Color::rgb(0xf5, 0x9e, 0x0b);

/// Default fill for new ellipses.
pub const RED: Color = Color::rgb(0xef, 0x44, 0x44);

/// Default fill for text and default canvas foreground.
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

/// Default canvas background.
pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        // Byte-index slicing below is only safe on ASCII input.
        if !hex.is_ascii() {
            return Err(format!("invalid color '{s}': expected #rrggbb or #rrggbbaa"));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color '{s}': {e}"))
        };
        match hex.len() {
            6 => Ok(Color::rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?)),
            8 => Ok(Color::rgba(
                parse(0..2)?,
                parse(2..4)?,
                parse(4..6)?,
                parse(6..8)?,
            )),
            _ => Err(format!("invalid color '{s}': expected #rrggbb or #rrggbbaa")),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

/// Visual primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Rect,
    Ellipse,
    Text,
    Image,
}

/// Font weight for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Live-data placeholder marker.
///
/// An element carries at most one marker; the tagged enum makes that
/// invariant structural instead of a convention over boolean flags.
/// Bound content is overwritten on every template resolution; manual edits
/// persist until the next resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    #[default]
    None,
    Name,
    Price,
    Barcode,
    Image,
}

fn default_font_size() -> f32 {
    24.0
}

fn default_font_family() -> String {
    "sans-serif".into()
}

/// One visual primitive on the document canvas.
///
/// Geometry is in canvas-space pixels. `text`/`font_*` only matter for
/// [`ElementKind::Text`], `image_ref` only for [`ElementKind::Image`];
/// the unused fields ride along so a patch or rebinding never loses state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    pub id: Uuid,
    pub kind: ElementKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub binding: BindingKind,
}

impl DesignElement {
    /// Create an element with the kind's editor defaults and a fresh id.
    ///
    /// Rect: 100x100 amber. Ellipse: 80x80 red. Text: 200x40, 24px normal
    /// default copy. Image: 120x120 with no image reference yet.
    pub fn new(kind: ElementKind) -> Self {
        let base = Self {
            id: Uuid::new_v4(),
            kind,
            x: 60.0,
            y: 60.0,
            width: 100.0,
            height: 100.0,
            fill: AMBER,
            text: String::new(),
            font_size: default_font_size(),
            font_weight: FontWeight::Normal,
            font_family: default_font_family(),
            image_ref: None,
            binding: BindingKind::None,
        };
        match kind {
            ElementKind::Rect => base,
            ElementKind::Ellipse => Self {
                width: 80.0,
                height: 80.0,
                fill: RED,
                ..base
            },
            ElementKind::Text => Self {
                width: 200.0,
                height: 40.0,
                fill: BLACK,
                text: "Text".into(),
                ..base
            },
            ElementKind::Image => Self {
                width: 120.0,
                height: 120.0,
                fill: WHITE,
                ..base
            },
        }
    }

    /// Hit-test a canvas-space point against this element.
    ///
    /// Rect/Text/Image use the axis-aligned bounds; Ellipse uses the true
    /// inscribed ellipse. Elements dragged off-canvas remain hittable.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let in_bounds = px >= self.x
            && px < self.x + self.width
            && py >= self.y
            && py < self.y + self.height;
        match self.kind {
            ElementKind::Ellipse => {
                if !in_bounds || self.width <= 0.0 || self.height <= 0.0 {
                    return false;
                }
                let rx = self.width / 2.0;
                let ry = self.height / 2.0;
                let dx = (px - (self.x + rx)) / rx;
                let dy = (py - (self.y + ry)) / ry;
                dx * dx + dy * dy <= 1.0
            }
            _ => in_bounds,
        }
    }

    /// Merge a partial update into this element.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
        if let Some(ref text) = patch.text {
            self.text = text.clone();
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(font_weight) = patch.font_weight {
            self.font_weight = font_weight;
        }
        if let Some(ref font_family) = patch.font_family {
            self.font_family = font_family.clone();
        }
        if let Some(ref image_ref) = patch.image_ref {
            self.image_ref = Some(image_ref.clone());
        }
        if let Some(binding) = patch.binding {
            self.binding = binding;
        }
    }
}

/// Partial update for [`DesignElement`]: every field optional, applied by
/// merge. Unset fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub font_weight: Option<FontWeight>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub binding: Option<BindingKind>,
}

impl ElementPatch {
    /// Patch that only moves an element.
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Patch that only replaces the text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c: Color = "#f59e0b".parse().unwrap();
        assert_eq!(c, AMBER);
        assert_eq!(c.to_string(), "#f59e0b");

        let translucent: Color = "#11223380".parse().unwrap();
        assert_eq!(translucent.a, 0x80);
        assert_eq!(translucent.to_string(), "#11223380");
    }

    #[test]
    fn color_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("notacolor".parse::<Color>().is_err());
    }

    #[test]
    fn color_rejects_non_ascii_without_panicking() {
        // Multi-byte characters land mid-pair at byte offsets; parsing must
        // return Err, not slice at a non-char boundary.
        assert!("aézzz".parse::<Color>().is_err());
        assert!("#ヶ倒no".parse::<Color>().is_err());
        assert!(serde_json::from_str::<Color>("\"aézzz\"").is_err());
    }

    #[test]
    fn color_serde_as_string() {
        let json = serde_json::to_string(&RED).unwrap();
        assert_eq!(json, "\"#ef4444\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RED);
    }

    #[test]
    fn kind_defaults() {
        let rect = DesignElement::new(ElementKind::Rect);
        assert_eq!((rect.width, rect.height), (100.0, 100.0));
        assert_eq!(rect.fill, AMBER);

        let ellipse = DesignElement::new(ElementKind::Ellipse);
        assert_eq!((ellipse.width, ellipse.height), (80.0, 80.0));
        assert_eq!(ellipse.fill, RED);

        let text = DesignElement::new(ElementKind::Text);
        assert_eq!((text.width, text.height), (200.0, 40.0));
        assert_eq!(text.font_size, 24.0);
        assert_eq!(text.font_weight, FontWeight::Normal);
        assert!(!text.text.is_empty());
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = DesignElement::new(ElementKind::Rect);
        let b = DesignElement::new(ElementKind::Rect);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn rect_hit_test_uses_bounds() {
        let mut rect = DesignElement::new(ElementKind::Rect);
        rect.x = 10.0;
        rect.y = 10.0;
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(109.0, 109.0));
        assert!(!rect.contains(110.0, 110.0));
        assert!(!rect.contains(9.0, 50.0));
    }

    #[test]
    fn ellipse_hit_test_excludes_corners() {
        let mut ellipse = DesignElement::new(ElementKind::Ellipse);
        ellipse.x = 0.0;
        ellipse.y = 0.0;
        // Center is inside, bounding-box corner is outside the ellipse.
        assert!(ellipse.contains(40.0, 40.0));
        assert!(!ellipse.contains(1.0, 1.0));
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut el = DesignElement::new(ElementKind::Text);
        let before_fill = el.fill;
        el.apply_patch(&ElementPatch {
            x: Some(5.0),
            text: Some("hello".into()),
            ..Default::default()
        });
        assert_eq!(el.x, 5.0);
        assert_eq!(el.text, "hello");
        assert_eq!(el.fill, before_fill);
        assert_eq!(el.y, 60.0);
    }

    #[test]
    fn element_serde_roundtrip() {
        let el = DesignElement::new(ElementKind::Ellipse);
        let json = serde_json::to_string(&el).unwrap();
        let back: DesignElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
    }
}
