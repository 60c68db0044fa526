//! PDF backend over the paginated document.
//!
//! Every page-break decision was already made by the flow pass; this module
//! only maps placed blocks onto printpdf pages. Coordinates arrive measured
//! from the top of the content area and are converted to the PDF's
//! bottom-left origin here.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};

use super::sections::{Block, Document, PlacedBlock};
use super::{layout::PageMetrics, RenderError};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_LEFT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const FOOTER_NOTICE_Y: f64 = 14.0;
const FOOTER_TEXT_Y: f64 = 10.0;
/// printpdf places raster images at 300 dpi when no override is given.
const IMAGE_DPI: f64 = 300.0;
const IMAGE_CAPTION_BAND: f64 = 8.0;

struct Fonts {
    bold: IndirectFontRef,
    regular: IndirectFontRef,
}

/// Render the laid-out document to PDF bytes.
pub fn render_pdf(
    document: &Document,
    metrics: &PageMetrics,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let fonts = Fonts {
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    };

    for (index, page) in document.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if index == 0 {
            (page1, layer1)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        layer.set_fill_color(Color::Rgb(Rgb::new(0.10, 0.10, 0.10, None)));

        for placed in &page.blocks {
            draw_block(&layer, placed, metrics, &fonts)?;
        }

        layer.use_text(page.footer.notice, 7.0, Mm(MARGIN_LEFT), Mm(FOOTER_NOTICE_Y), &fonts.regular);
        layer.use_text(&page.footer.text, 8.0, Mm(MARGIN_LEFT), Mm(FOOTER_TEXT_Y), &fonts.regular);
    }

    let mut buffer = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buffer);
        doc.save(&mut writer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
    }
    log::info!("rendered {} page PDF, {} bytes", document.page_count(), buffer.len());
    Ok(buffer)
}

/// Top-of-content offset to PDF baseline height.
fn baseline(y_top: f64, drop: f64) -> Mm {
    Mm(PAGE_HEIGHT - MARGIN_TOP - y_top - drop)
}

fn column_x(metrics: &PageMetrics, column_count: usize, index: usize) -> Mm {
    let step = metrics.content_width / column_count as f64;
    Mm(MARGIN_LEFT + step * index as f64)
}

/// Keep cell text inside its column by character budget.
fn clip_cell(text: &str, metrics: &PageMetrics, column_count: usize) -> String {
    let budget = ((metrics.content_width / column_count as f64) / 1.9) as usize;
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let clipped: String = text.chars().take(budget.saturating_sub(1)).collect();
    format!("{}\u{2026}", clipped)
}

fn draw_rule(layer: &PdfLayerReference, metrics: &PageMetrics, y: Mm) {
    let line = Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT), y), false),
            (Point::new(Mm(MARGIN_LEFT + metrics.content_width), y), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

fn draw_block(
    layer: &PdfLayerReference,
    placed: &PlacedBlock,
    metrics: &PageMetrics,
    fonts: &Fonts,
) -> Result<(), RenderError> {
    let y = placed.y;
    match &placed.block {
        Block::Title(title) => {
            layer.use_text(&title.heading, 18.0, Mm(MARGIN_LEFT), baseline(y, 7.0), &fonts.bold);
            layer.use_text(
                &title.period_label,
                11.0,
                Mm(MARGIN_LEFT),
                baseline(y, 14.0),
                &fonts.regular,
            );
            if !title.description.is_empty() {
                layer.use_text(
                    &title.description,
                    9.0,
                    Mm(MARGIN_LEFT),
                    baseline(y, 20.0),
                    &fonts.regular,
                );
            }
            layer.use_text(
                &format!("Generated {} by {}", title.generated_at, title.generated_by),
                8.0,
                Mm(MARGIN_LEFT),
                baseline(y, 25.0),
                &fonts.regular,
            );
            draw_rule(layer, metrics, baseline(y, placed.height - 1.0));
        }
        Block::TableHeader { title, columns } => {
            layer.use_text(title, 11.0, Mm(MARGIN_LEFT), baseline(y, 4.5), &fonts.bold);
            for (index, column) in columns.iter().enumerate() {
                layer.use_text(
                    *column,
                    9.0,
                    column_x(metrics, columns.len(), index),
                    baseline(y, 10.0),
                    &fonts.bold,
                );
            }
            draw_rule(layer, metrics, baseline(y, placed.height - 0.5));
        }
        Block::TableRow { cells } => {
            for (index, cell) in cells.iter().enumerate() {
                layer.use_text(
                    clip_cell(cell, metrics, cells.len()),
                    9.0,
                    column_x(metrics, cells.len(), index),
                    baseline(y, 5.0),
                    &fonts.regular,
                );
            }
        }
        Block::Heading(text) => {
            layer.use_text(text, 13.0, Mm(MARGIN_LEFT), baseline(y, 6.0), &fonts.bold);
        }
        Block::Image(image) => {
            let bytes = image
                .decode_data()
                .map_err(|e| RenderError::Image(e.to_string()))?;
            let decoded = printpdf::image_crate::load_from_memory(&bytes)
                .map_err(|e| RenderError::Image(e.to_string()))?;

            let natural_w = image.width_px as f64 * 25.4 / IMAGE_DPI;
            let natural_h = image.height_px as f64 * 25.4 / IMAGE_DPI;
            let box_h = placed.height - IMAGE_CAPTION_BAND;
            let scale = (metrics.content_width / natural_w)
                .min(box_h / natural_h)
                .min(4.0);

            let pdf_image = Image::from_dynamic_image(&decoded);
            pdf_image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(MARGIN_LEFT)),
                    translate_y: Some(Mm(PAGE_HEIGHT - MARGIN_TOP - y - box_h)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    ..ImageTransform::default()
                },
            );
            layer.use_text(
                &image.reference,
                7.0,
                Mm(MARGIN_LEFT),
                baseline(y, placed.height - 2.0),
                &fonts.regular,
            );
        }
        Block::Placeholder { text } => {
            layer.set_fill_color(Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None)));
            layer.use_text(text, 9.0, Mm(MARGIN_LEFT), baseline(y, 5.0), &fonts.regular);
            layer.set_fill_color(Color::Rgb(Rgb::new(0.10, 0.10, 0.10, None)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sections::{Footer, Page, TitleSection};

    fn one_page_document() -> Document {
        let title = TitleSection {
            heading: "Bulletin Report".to_string(),
            description: "Content activity".to_string(),
            period_label: "March 2025".to_string(),
            generated_at: "2025-08-05 10:00".to_string(),
            generated_by: "aggregator".to_string(),
        };
        Document {
            pages: vec![Page {
                number: 1,
                blocks: vec![
                    PlacedBlock {
                        y: 0.0,
                        height: 30.0,
                        block: Block::Title(title),
                    },
                    PlacedBlock {
                        y: 36.0,
                        height: 12.0,
                        block: Block::TableHeader {
                            title: "Summary".to_string(),
                            columns: vec!["Content", "Category", "Count"],
                        },
                    },
                    PlacedBlock {
                        y: 48.0,
                        height: 7.0,
                        block: Block::TableRow {
                            cells: vec![
                                "Announcements".to_string(),
                                "Regular".to_string(),
                                "3".to_string(),
                            ],
                        },
                    },
                    PlacedBlock {
                        y: 55.0,
                        height: 8.0,
                        block: Block::Placeholder {
                            text: "image unavailable: a.png".to_string(),
                        },
                    },
                ],
                footer: Footer {
                    text: "page 1 of 1".to_string(),
                    notice: crate::render::sections::CONFIDENTIALITY_NOTICE,
                },
            }],
        }
    }

    #[test]
    fn renders_pdf_magic_bytes() {
        let bytes = render_pdf(&one_page_document(), &PageMetrics::default(), "Bulletin Report")
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn renders_embedded_images() {
        use printpdf::image_crate;
        use std::io::Cursor;

        let mut png = Vec::new();
        image_crate::DynamicImage::new_rgb8(2, 2)
            .write_to(&mut Cursor::new(&mut png), image_crate::ImageOutputFormat::Png)
            .unwrap();
        let embedded = crate::render::images::EmbeddedImage::from_bytes("pic.png", &png).unwrap();

        let mut document = one_page_document();
        document.pages[0].blocks.push(PlacedBlock {
            y: 70.0,
            height: 70.0,
            block: Block::Image(embedded),
        });

        let bytes = render_pdf(&document, &PageMetrics::default(), "Bulletin Report").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn clip_cell_shortens_long_text() {
        let metrics = PageMetrics::default();
        let long = "An extremely verbose announcement title that cannot possibly fit";
        let clipped = clip_cell(long, &metrics, 5);
        assert!(clipped.chars().count() < long.chars().count());
        assert!(clipped.ends_with('\u{2026}'));

        assert_eq!(clip_cell("Short", &metrics, 5), "Short");
    }
}
