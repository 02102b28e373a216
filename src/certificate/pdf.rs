// src/certificate/pdf.rs

use image::ImageFormat;
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::{
    certificate::layout::{CERTIFICATE_HEIGHT, CERTIFICATE_WIDTH},
    error::ExportError,
};

/// Wraps an encoded image into a printable document.
pub trait DocumentWriter: Send + Sync {
    fn write_document(&self, png: &[u8]) -> Result<Vec<u8>, ExportError>;
}

/// Single-page landscape PDF with the PNG stretched over the whole page.
///
/// Any PNG the decoder accepts is converted to 8-bit RGB before embedding.
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    pub page_width: u32,
    pub page_height: u32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self {
            page_width: CERTIFICATE_WIDTH,
            page_height: CERTIFICATE_HEIGHT,
        }
    }
}

impl DocumentWriter for PdfWriter {
    fn write_document(&self, png: &[u8]) -> Result<Vec<u8>, ExportError> {
        let image = image::load_from_memory_with_format(png, ImageFormat::Png)
            .map_err(|e| ExportError::Png(e.to_string()))?
            .to_rgb8();
        let (width, height) = image.dimensions();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.into_raw(),
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        i64::from(self.page_width).into(),
                        0.into(),
                        0.into(),
                        i64::from(self.page_height).into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! {
                "Im1" => image_id,
            },
        });

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                i64::from(self.page_width).into(),
                i64::from(self.page_height).into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        // Flate-encodes the raw pixel and content streams.
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        Ok(bytes)
    }
}
