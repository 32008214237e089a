//! PDF serialization of paginated exports.
//!
//! Vector pages use the standard Helvetica faces with WinAnsi encoding;
//! raster pages share a single image XObject and show different windows
//! of it through the page boundary.

use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LoDocument, Object, ObjectId, Stream};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

use super::geometry::mm_to_pt;
use super::metrics::{text_width_pt, win_ansi_code, FontFace, REPLACEMENT_CODE};
use super::page::{ExportPage, PageContent, PaginatedDocument, RasterPlacement, TextAlign, TextOp};

/// Resource name of the shared raster bitmap.
const IMAGE_RESOURCE: &str = "Im1";

/// Script run by the viewer when a print artifact is opened.
const AUTO_PRINT_SCRIPT: &str = "this.print({bUI: true, bSilent: false, bShrinkToFit: true});";

/// Document information written to the PDF trailer.
#[derive(Debug, Clone, Default)]
pub struct PdfMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
}

/// Serialize a paginated document to PDF bytes.
pub fn write_pdf(doc: &PaginatedDocument, metadata: &PdfMetadata) -> Result<Vec<u8>> {
    if doc.pages.is_empty() {
        return Err(Error::Render("cannot write a PDF with no pages".to_string()));
    }

    let mut pdf = LoDocument::with_version("1.7");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font_dictionary(FontFace::Regular));
    let bold_id = pdf.add_object(font_dictionary(FontFace::Bold));

    let image_id = match doc.bitmap {
        Some(ref bitmap) => {
            let (width, height) = bitmap.dimensions();
            Some(pdf.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                bitmap.as_raw().clone(),
            )))
        }
        None => None,
    };

    let resources_id = pdf.add_object(match image_id {
        Some(id) => dictionary! {
            "Font" => dictionary! {
                FontFace::Regular.resource_name() => regular_id,
                FontFace::Bold.resource_name() => bold_id,
            },
            "XObject" => dictionary! { IMAGE_RESOURCE => id },
        },
        None => dictionary! {
            "Font" => dictionary! {
                FontFace::Regular.resource_name() => regular_id,
                FontFace::Bold.resource_name() => bold_id,
            },
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let operations = match page.content {
            PageContent::Vector { ref ops } => text_operations(page, ops),
            PageContent::Raster(ref placement) => {
                if image_id.is_none() {
                    return Err(Error::Render(format!(
                        "raster page {} has no bitmap to show",
                        page.number
                    )));
                }
                image_operations(page, placement)
            }
        };
        let content = Content { operations }.encode()?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));

        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                mm_to_pt(page.width_mm).into(),
                mm_to_pt(page.height_mm).into(),
            ],
        });
        kids.push(page_id.into());
    }

    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => doc.pages.len() as i64,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let info_id = pdf.add_object(info_dictionary(metadata));
    pdf.trailer.set("Info", info_id);

    pdf.compress();
    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Add an open action that shows the viewer's print dialog.
pub fn with_auto_print(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut pdf = LoDocument::load_mem(bytes)?;

    let action_id: ObjectId = pdf.add_object(dictionary! {
        "Type" => "Action",
        "S" => "JavaScript",
        "JS" => Object::string_literal(AUTO_PRINT_SCRIPT),
    });
    let root_id = pdf.trailer.get(b"Root").and_then(Object::as_reference)?;
    pdf.get_object_mut(root_id)
        .and_then(Object::as_dict_mut)?
        .set("OpenAction", action_id);

    let mut out = Vec::new();
    pdf.save_to(&mut out)?;
    Ok(out)
}

fn font_dictionary(face: FontFace) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn info_dictionary(metadata: &PdfMetadata) -> lopdf::Dictionary {
    let mut info = dictionary! {
        "Producer" => Object::string_literal(concat!("sheetflow ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(Local::now().format("D:%Y%m%d%H%M%S").to_string()),
    };
    if let Some(ref title) = metadata.title {
        info.set("Title", Object::String(encode_win_ansi(title), lopdf::StringFormat::Literal));
    }
    if let Some(ref author) = metadata.author {
        info.set("Author", Object::String(encode_win_ansi(author), lopdf::StringFormat::Literal));
    }
    info
}

fn text_operations(page: &ExportPage, ops: &[TextOp]) -> Vec<Operation> {
    let page_height = mm_to_pt(page.height_mm);
    let mut operations = Vec::with_capacity(ops.len() * 5);

    for op in ops {
        let width = text_width_pt(&op.text, op.face, op.size_pt);
        let left = mm_to_pt(op.x_mm);
        let x = match op.align {
            TextAlign::Left => left,
            TextAlign::Center => left - width / 2.0,
            TextAlign::Right => left - width,
        };
        let y = page_height - mm_to_pt(op.y_mm);

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(op.face.resource_name().as_bytes().to_vec()), op.size_pt.into()],
        ));
        operations.push(Operation::new("Td", vec![x.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&op.text), lopdf::StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

fn image_operations(page: &ExportPage, placement: &RasterPlacement) -> Vec<Operation> {
    let width = mm_to_pt(placement.width_mm as f32);
    let height = mm_to_pt(placement.height_mm as f32);
    // The image's top edge sits `offset` above the page's top edge.
    let bottom = mm_to_pt((page.height_mm as f64 + placement.offset_mm - placement.height_mm) as f32);

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                0.into(),
                bottom.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// Encode text for a WinAnsi font.
///
/// Text is NFC-normalized first so composed Latin-1 letters survive.
/// Characters without a WinAnsi code become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = 0usize;

    for ch in text.nfc() {
        match win_ansi_code(ch) {
            Some(code) => bytes.push(code),
            None => {
                bytes.push(REPLACEMENT_CODE);
                replaced += 1;
            }
        }
    }

    if replaced > 0 {
        log::warn!(
            "{} character(s) not representable in WinAnsi replaced with '?' in {:?}",
            replaced,
            text
        );
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::geometry::PageGeometry;
    use image::{Rgb, RgbImage};

    fn sample_page() -> ExportPage {
        ExportPage::vector(
            1,
            &PageGeometry::A4,
            vec![
                TextOp::left("Name: Ravi (accused)", 15.0, 35.0, FontFace::Regular, 11.0),
                TextOp::left("Signature", 195.0, 50.0, FontFace::Bold, 11.0).aligned(TextAlign::Right),
            ],
        )
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("• item"), vec![0x95, b' ', b'i', b't', b'e', b'm']);
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xe9]);
        // Decomposed e + combining acute composes to é.
        assert_eq!(encode_win_ansi("e\u{301}"), vec![0xe9]);
        assert_eq!(encode_win_ansi("धारा"), b"????".to_vec());
    }

    #[test]
    fn test_write_vector_pdf() {
        let doc = PaginatedDocument::from_pages(vec![sample_page(), sample_page()]);
        let bytes = write_pdf(&doc, &PdfMetadata::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let loaded = LoDocument::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn test_write_empty_rejected() {
        let err = write_pdf(&PaginatedDocument::default(), &PdfMetadata::default()).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_raster_page_without_bitmap_rejected() {
        let page = ExportPage::raster(
            1,
            &PageGeometry::A4,
            RasterPlacement {
                offset_mm: 0.0,
                width_mm: 210.0,
                height_mm: 100.0,
            },
        );
        let doc = PaginatedDocument::from_pages(vec![page]);
        assert!(write_pdf(&doc, &PdfMetadata::default()).is_err());
    }

    #[test]
    fn test_write_raster_pdf() {
        let placement = |offset_mm| RasterPlacement {
            offset_mm,
            width_mm: 210.0,
            height_mm: 400.0,
        };
        let doc = PaginatedDocument {
            pages: vec![
                ExportPage::raster(1, &PageGeometry::A4, placement(0.0)),
                ExportPage::raster(2, &PageGeometry::A4, placement(297.0)),
            ],
            bitmap: Some(RgbImage::from_pixel(4, 8, Rgb([255, 255, 255]))),
        };
        let bytes = write_pdf(&doc, &PdfMetadata::default()).unwrap();
        let loaded = LoDocument::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn test_auto_print_sets_open_action() {
        let doc = PaginatedDocument::from_pages(vec![sample_page()]);
        let bytes = write_pdf(
            &doc,
            &PdfMetadata {
                title: Some("Charge Sheet".to_string()),
                author: None,
            },
        )
        .unwrap();
        let printed = with_auto_print(&bytes).unwrap();

        let loaded = LoDocument::load_mem(&printed).unwrap();
        let catalog = loaded.catalog().unwrap();
        assert!(catalog.get(b"OpenAction").is_ok());

        let plain = LoDocument::load_mem(&bytes).unwrap();
        assert!(plain.catalog().unwrap().get(b"OpenAction").is_err());
    }
}
