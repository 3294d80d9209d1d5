//! PDF assembly with lopdf.
//!
//! The rendered raster is embedded as a single full-page Image XObject on a
//! page whose MediaBox matches the document's pixel dimensions at one point
//! per pixel, so a 600x400 label yields a landscape page and a portrait
//! document a portrait page.

use chrono::Utc;
use image::RgbaImage;
use lopdf::{
    Document as PdfDocument, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::error::StudioError;

/// Wrap a rendered raster into a one-page PDF.
pub(super) fn encode_pdf(image: &RgbaImage) -> Result<Vec<u8>, StudioError> {
    let (width, height) = image.dimensions();

    let mut doc = PdfDocument::with_version("1.5");
    let id_pages = doc.new_object_id();

    // Strip the alpha channel; the canvas is always opaque.
    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();
    let id_image = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb,
    ));

    let ops = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                (width as f32).into(),
                0.into(),
                0.into(),
                (height as f32).into(),
                0.into(),
                0.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
        Operation::new("Q", vec![]),
    ];
    let content = Content { operations: ops };
    let encoded = content
        .encode()
        .map_err(|e| StudioError::PdfEncodingUnavailable(e.to_string()))?;
    let id_content = doc.add_object(Stream::new(dictionary! {}, encoded));

    let id_resources = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            "Im0" => id_image,
        },
    });

    let id_page = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => id_pages,
        "Contents" => id_content,
        "Resources" => id_resources,
    });

    let pdf_pages = dictionary! {
        "Type" => "Pages",
        "Count" => 1,
        "Kids" => vec![id_page.into()],
        "MediaBox" => vec![
            0.into(), 0.into(),
            (width as f32).into(), (height as f32).into(),
        ],
    };
    doc.set_object(id_pages, pdf_pages);

    let id_catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => id_pages,
    });
    doc.trailer.set("Root", id_catalog);

    let s_date = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let id_info = doc.add_object(dictionary! {
        "Producer" => Object::string_literal("popstudio"),
        "CreationDate" => Object::string_literal(s_date.clone()),
        "ModDate" => Object::string_literal(s_date),
    });
    doc.trailer.set("Info", id_info);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| StudioError::PdfEncodingUnavailable(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn pdf_has_header_and_embedded_image() {
        let image = RgbaImage::from_pixel(60, 40, Rgba([0xff, 0xff, 0xff, 0xff]));
        let bytes = encode_pdf(&image).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.len() > 100);
    }

    #[test]
    fn pdf_roundtrips_through_lopdf() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0xff]));
        let bytes = encode_pdf(&image).unwrap();
        let parsed = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }
}
