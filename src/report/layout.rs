//! Pure page geometry for the allergen matrix. Everything here is plain
//! arithmetic so pagination can be tested without a rendering surface.

use std::ops::Range;

use crate::catalog::ResolvedColumn;
use crate::report::ProductAllergenView;

/// Row banding behavior across page breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBanding {
    /// Alternation is a function of the absolute row index; a page break
    /// never restarts the pattern.
    ContinuousAcrossPages,
}

pub const ROW_BANDING: RowBanding = RowBanding::ContinuousAcrossPages;

/// Whether the body row at `index` (absolute, zero-based) gets the shaded
/// band. The first row is shaded.
pub fn row_shaded(index: usize) -> bool {
    match ROW_BANDING {
        RowBanding::ContinuousAcrossPages => index % 2 == 0,
    }
}

/// Fixed layout constants in millimetres, A4 landscape.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub title_height: f32,
    pub title_gap: f32,
    pub icon_row_height: f32,
    pub label_row_height: f32,
    pub product_col_width: f32,
    pub allergen_col_width: f32,
    pub row_height: f32,
    /// Icons are square and this size regardless of column width.
    pub icon_size: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            page_width: 297.0,
            page_height: 210.0,
            margin_left: 7.0,
            margin_top: 10.0,
            margin_bottom: 12.0,
            title_height: 10.0,
            title_gap: 3.0,
            icon_row_height: 8.0,
            label_row_height: 8.0,
            product_col_width: 30.0,
            allergen_col_width: 18.0,
            row_height: 8.0,
            icon_size: 6.0,
        }
    }
}

impl PageGeometry {
    /// Top edge of the first body row, below title and both header rows.
    pub fn body_start_y(&self) -> f32 {
        self.margin_top
            + self.title_height
            + self.title_gap
            + self.icon_row_height
            + self.label_row_height
    }

    /// No body row may extend past this y coordinate.
    pub fn body_limit_y(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    /// Left edge of the allergen column at `index` (zero-based).
    pub fn allergen_col_x(&self, index: usize) -> f32 {
        self.margin_left + self.product_col_width + index as f32 * self.allergen_col_width
    }
}

/// Whether drawing a row of `row_height` starting at `cursor_y` would cross
/// `bottom_limit`, i.e. the row must go on a fresh page.
pub fn needs_new_page(cursor_y: f32, row_height: f32, bottom_limit: f32) -> bool {
    cursor_y + row_height > bottom_limit
}

/// Splits `row_count` body rows into per-page index ranges by walking a
/// cursor down each page and applying [`needs_new_page`] before every row.
/// Always yields at least one page, so an empty input still produces a page
/// with headers and no rows.
pub fn plan_pages(row_count: usize, geometry: &PageGeometry) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;

    loop {
        let mut cursor_y = geometry.body_start_y();
        let mut end = start;

        while end < row_count && !needs_new_page(cursor_y, geometry.row_height, geometry.body_limit_y())
        {
            cursor_y += geometry.row_height;
            end += 1;
        }

        // A geometry that cannot fit a single row would loop forever; place
        // one row per page and let the caller's constants stay sane.
        if end == start && end < row_count {
            end += 1;
        }

        pages.push(start..end);

        if end >= row_count {
            break;
        }
        start = end;
    }

    pages
}

/// Presence marks for one body row: `true` at position `i` iff the view's
/// allergen set contains the code of column `i`. Exact membership, nothing
/// else.
pub fn presence_row(view: &ProductAllergenView, columns: &[ResolvedColumn]) -> Vec<bool> {
    columns
        .iter()
        .map(|column| view.allergens.contains(column.code))
        .collect()
}
