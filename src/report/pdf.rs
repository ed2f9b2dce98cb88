//! PDF emission for the allergen matrix, on top of printpdf's op-based page
//! model. Pages are assembled as op lists, footers are stamped once the
//! total page count is known, and the document is serialized in a single
//! pass at the end.

use std::fs;
use std::ops::Range;
use std::path::Path;

use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::image::RawImage;
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, XObjectId};

use crate::catalog::{ReportStrings, ResolvedColumn};
use crate::report::layout::{self, PageGeometry};
use crate::report::{PRESENCE_MARK, ProductAllergenView, ReportError};

const MM_PER_PT: f32 = 25.4 / 72.0;

const TITLE_FONT: BuiltinFont = BuiltinFont::HelveticaBold;
const HEADER_FONT: BuiltinFont = BuiltinFont::HelveticaBold;
const BODY_FONT: BuiltinFont = BuiltinFont::Helvetica;

const TITLE_SIZE: f32 = 12.0;
const LABEL_SIZE: f32 = 6.0;
const BODY_SIZE: f32 = 8.0;
const FOOTER_SIZE: f32 = 8.0;

const BORDER_THICKNESS: Pt = Pt(0.2);

fn black() -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn band_gray() -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(0.92, 0.92, 0.92, None))
}

struct LoadedIcon {
    xobject: XObjectId,
    width_px: u32,
    height_px: u32,
}

pub(crate) fn render(
    data: &[ProductAllergenView],
    columns: &[ResolvedColumn],
    strings: &ReportStrings,
    geometry: &PageGeometry,
    assets_dir: &Path,
) -> Result<Vec<u8>, ReportError> {
    let mut doc = PdfDocument::new(strings.title);

    // All assets load before any page is built; a missing icon aborts the
    // whole render with nothing emitted.
    let icons = load_icons(columns, assets_dir, &mut doc)?;

    let plan = layout::plan_pages(data.len(), geometry);
    let total_pages = plan.len();
    log::debug!(
        "rendering allergen matrix: {} rows over {} page(s)",
        data.len(),
        total_pages
    );

    let mut pages: Vec<PdfPage> = plan
        .into_iter()
        .map(|rows| {
            let ops = build_page(data, rows, columns, &icons, strings, geometry);
            PdfPage::new(Mm(geometry.page_width), Mm(geometry.page_height), ops)
        })
        .collect();

    // Deferred footers: ordinal and total exist only now that every page has
    // been laid out.
    for (index, page) in pages.iter_mut().enumerate() {
        page.ops
            .extend(footer_ops(index + 1, total_pages, strings, geometry));
    }

    doc.pages = pages;

    let mut bytes = Vec::new();
    let mut warnings = Vec::new();
    doc.save_writer(&mut bytes, &PdfSaveOptions::default(), &mut warnings);
    Ok(bytes)
}

fn load_icons(
    columns: &[ResolvedColumn],
    assets_dir: &Path,
    doc: &mut PdfDocument,
) -> Result<Vec<LoadedIcon>, ReportError> {
    columns
        .iter()
        .map(|column| {
            let path = assets_dir.join(column.icon);
            let missing = || ReportError::MissingAsset {
                code: column.code.to_string(),
                path: path.clone(),
            };

            let data = fs::read(&path).map_err(|_| missing())?;
            let mut warnings = Vec::new();
            let image = RawImage::decode_from_bytes(&data, &mut warnings).map_err(|_| missing())?;

            let (width_px, height_px) = (image.width as u32, image.height as u32);
            let xobject = XObjectId::new();
            doc.resources
                .xobjects
                .map
                .insert(xobject.clone(), XObject::Image(image));

            Ok(LoadedIcon {
                xobject,
                width_px,
                height_px,
            })
        })
        .collect()
}

fn build_page(
    data: &[ProductAllergenView],
    rows: Range<usize>,
    columns: &[ResolvedColumn],
    icons: &[LoadedIcon],
    strings: &ReportStrings,
    geometry: &PageGeometry,
) -> Vec<Op> {
    let mut ops = Vec::new();

    let icon_row_y = geometry.margin_top + geometry.title_height + geometry.title_gap;
    let label_row_y = icon_row_y + geometry.icon_row_height;
    let table_width =
        geometry.product_col_width + columns.len() as f32 * geometry.allergen_col_width;

    // Shapes first, text last, so marks and names sit on top of the fills.
    let mut y = geometry.body_start_y();
    for index in rows.clone() {
        if layout::row_shaded(index) {
            fill_rect(
                &mut ops,
                geometry,
                geometry.margin_left,
                y,
                table_width,
                geometry.row_height,
                band_gray(),
            );
        }
        y += geometry.row_height;
    }

    // Cell borders: both header rows plus every body row.
    for (row_y, row_h) in [
        (icon_row_y, geometry.icon_row_height),
        (label_row_y, geometry.label_row_height),
    ] {
        stroke_row_cells(&mut ops, geometry, columns.len(), row_y, row_h);
    }
    let mut y = geometry.body_start_y();
    for _ in rows.clone() {
        stroke_row_cells(&mut ops, geometry, columns.len(), y, geometry.row_height);
        y += geometry.row_height;
    }

    // Icon header row: fixed-size squares centered in their cells.
    for (index, icon) in icons.iter().enumerate() {
        let cell_x = geometry.allergen_col_x(index);
        let x = cell_x + (geometry.allergen_col_width - geometry.icon_size) / 2.0;
        let y_top = icon_row_y + (geometry.icon_row_height - geometry.icon_size) / 2.0;

        let size_pt = Mm(geometry.icon_size).into_pt().0;
        let transform = XObjectTransform {
            translate_x: Some(Mm(x).into_pt()),
            translate_y: Some(Mm(geometry.page_height - (y_top + geometry.icon_size)).into_pt()),
            scale_x: Some(size_pt / icon.width_px as f32),
            scale_y: Some(size_pt / icon.height_px as f32),
            rotate: None,
            dpi: Some(72.0),
        };
        ops.push(Op::UseXobject {
            id: icon.xobject.clone(),
            transform,
        });
    }

    // Text pass.
    ops.push(Op::StartTextSection);
    ops.push(Op::SetFillColor { col: black() });

    let title_baseline = geometry.margin_top + 0.7 * geometry.title_height;
    write_text(
        &mut ops,
        geometry,
        TITLE_FONT,
        TITLE_SIZE,
        geometry.margin_left,
        title_baseline,
        strings.title,
    );

    write_text(
        &mut ops,
        geometry,
        HEADER_FONT,
        BODY_SIZE,
        geometry.margin_left + 1.5,
        cell_baseline(label_row_y, geometry.label_row_height, BODY_SIZE),
        "Product",
    );
    for (index, column) in columns.iter().enumerate() {
        let cell_x = geometry.allergen_col_x(index);
        write_text(
            &mut ops,
            geometry,
            HEADER_FONT,
            LABEL_SIZE,
            centered_x(cell_x, geometry.allergen_col_width, column.label, LABEL_SIZE),
            cell_baseline(label_row_y, geometry.label_row_height, LABEL_SIZE),
            column.label,
        );
    }

    let mut y = geometry.body_start_y();
    for index in rows {
        let view = &data[index];
        let baseline = cell_baseline(y, geometry.row_height, BODY_SIZE);
        write_text(
            &mut ops,
            geometry,
            BODY_FONT,
            BODY_SIZE,
            geometry.margin_left + 1.5,
            baseline,
            &view.name,
        );

        let marks = layout::presence_row(view, columns);
        for (column_index, present) in marks.into_iter().enumerate() {
            if present {
                let cell_x = geometry.allergen_col_x(column_index);
                write_text(
                    &mut ops,
                    geometry,
                    BODY_FONT,
                    BODY_SIZE,
                    centered_x(cell_x, geometry.allergen_col_width, PRESENCE_MARK, BODY_SIZE),
                    baseline,
                    PRESENCE_MARK,
                );
            }
        }
        y += geometry.row_height;
    }

    ops.push(Op::EndTextSection);
    ops
}

fn footer_ops(
    ordinal: usize,
    total: usize,
    strings: &ReportStrings,
    geometry: &PageGeometry,
) -> Vec<Op> {
    let text = format!("{} {} / {}", strings.page_word, ordinal, total);
    let baseline = geometry.page_height - geometry.margin_bottom + 5.0;

    let mut ops = Vec::new();
    ops.push(Op::StartTextSection);
    ops.push(Op::SetFillColor { col: black() });
    write_text(
        &mut ops,
        geometry,
        BODY_FONT,
        FOOTER_SIZE,
        geometry.margin_left,
        baseline,
        &text,
    );
    ops.push(Op::EndTextSection);
    ops
}

/// Emits one run of text at a top-down baseline position given in mm.
fn write_text(
    ops: &mut Vec<Op>,
    geometry: &PageGeometry,
    font: BuiltinFont,
    size: f32,
    x: f32,
    baseline_y: f32,
    text: &str,
) {
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font,
    });
    ops.push(Op::SetTextMatrix {
        matrix: TextMatrix::Translate(
            Mm(x).into_pt(),
            Mm(geometry.page_height - baseline_y).into_pt(),
        ),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font,
    });
}

/// Baseline for text vertically centered in a cell starting at `cell_y`.
fn cell_baseline(cell_y: f32, cell_height: f32, font_size: f32) -> f32 {
    cell_y + (cell_height + font_size * 0.7 * MM_PER_PT) / 2.0
}

/// Approximate horizontal centering for short Helvetica runs; long labels
/// are clamped to the left cell edge rather than spilling into the previous
/// column.
fn centered_x(cell_x: f32, cell_width: f32, text: &str, font_size: f32) -> f32 {
    let text_width = text.chars().count() as f32 * font_size * 0.5 * MM_PER_PT;
    (cell_x + (cell_width - text_width) / 2.0).max(cell_x + 0.6)
}

fn stroke_row_cells(
    ops: &mut Vec<Op>,
    geometry: &PageGeometry,
    column_count: usize,
    y: f32,
    height: f32,
) {
    stroke_rect(
        ops,
        geometry,
        geometry.margin_left,
        y,
        geometry.product_col_width,
        height,
    );
    for index in 0..column_count {
        stroke_rect(
            ops,
            geometry,
            geometry.allergen_col_x(index),
            y,
            geometry.allergen_col_width,
            height,
        );
    }
}

fn rect_polygon(geometry: &PageGeometry, x: f32, y: f32, w: f32, h: f32, mode: PaintMode) -> Polygon {
    // Top-down mm coordinates to the PDF's bottom-left pt origin.
    let bottom = Mm(geometry.page_height - (y + h)).into_pt();
    let top = Mm(geometry.page_height - y).into_pt();
    let left = Mm(x).into_pt();
    let right = Mm(x + w).into_pt();

    Polygon {
        rings: vec![PolygonRing {
            points: vec![
                LinePoint {
                    p: Point { x: left, y: bottom },
                    bezier: false,
                },
                LinePoint {
                    p: Point { x: right, y: bottom },
                    bezier: false,
                },
                LinePoint {
                    p: Point { x: right, y: top },
                    bezier: false,
                },
                LinePoint {
                    p: Point { x: left, y: top },
                    bezier: false,
                },
            ],
        }],
        mode,
        winding_order: WindingOrder::EvenOdd,
    }
}

fn fill_rect(
    ops: &mut Vec<Op>,
    geometry: &PageGeometry,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    color: printpdf::color::Color,
) {
    ops.push(Op::SetFillColor { col: color });
    ops.push(Op::DrawPolygon {
        polygon: rect_polygon(geometry, x, y, w, h, PaintMode::Fill),
    });
}

fn stroke_rect(ops: &mut Vec<Op>, geometry: &PageGeometry, x: f32, y: f32, w: f32, h: f32) {
    ops.push(Op::SetOutlineColor { col: black() });
    ops.push(Op::SetOutlineThickness {
        pt: BORDER_THICKNESS,
    });
    ops.push(Op::DrawPolygon {
        polygon: rect_polygon(geometry, x, y, w, h, PaintMode::Stroke),
    });
}
