//! Multi-page PDF assembly: one JPEG image XObject per page, drawn over the full
//! MediaBox.

use crate::ExportError;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

const PAGE_IMAGE: &[u8] = b"Im0";

pub struct PdfAssembler {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfAssembler {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Appends a page of `width_pt × height_pt` showing a `pixel_width × pixel_height`
    /// JPEG stretched over the whole page.
    pub fn add_jpeg_page(
        &mut self,
        jpeg: Vec<u8>,
        pixel_width: u32,
        pixel_height: u32,
        width_pt: f32,
        height_pt: f32,
    ) -> Result<ObjectId, ExportError> {
        let mut image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixel_width as i64,
                "Height" => pixel_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        );
        image.allows_compression = false;
        let image_id = self.doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width_pt.into(),
                        0.0.into(),
                        0.0.into(),
                        height_pt.into(),
                        0.0.into(),
                        0.0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(PAGE_IMAGE.to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut xobjects = lopdf::Dictionary::new();
        xobjects.set(PAGE_IMAGE, image_id);
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), width_pt.into(), height_pt.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "XObject" => xobjects },
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    pub fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
