//! The allergen matrix report: a paginated landscape PDF with one row per
//! product and one column per cataloged allergen.
//!
//! Rendering is deterministic and request-scoped. Pagination is planned by
//! pure functions in [`layout`]; PDF emission lives in [`pdf`]. Footers carry
//! the total page count, so pages are built first and footers are stamped at
//! finalization, just before the single serialization pass.

pub mod layout;
pub mod pdf;

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::{Language, columns_for, report_strings};
use crate::report::layout::PageGeometry;

/// Glyph drawn in a cell when the row's product contains the column's
/// allergen.
pub const PRESENCE_MARK: &str = "x";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unsupported report language: {0:?}")]
    InvalidLanguage(String),
    #[error("missing or unreadable icon asset for allergen {code:?} at {path}")]
    MissingAsset { code: String, path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat projection of a product for reporting: its display name and the set
/// of allergen codes that apply. Deliberately independent of the storage
/// models.
#[derive(Debug, Clone)]
pub struct ProductAllergenView {
    pub name: String,
    pub allergens: HashSet<String>,
}

/// Renders the allergen matrix over `data` (row order preserved) into `sink`.
///
/// The language tag is validated against the closed set before anything else
/// happens; icon assets are preloaded next. Only after every fallible step
/// has succeeded are any bytes written, so a failed render leaves the sink
/// untouched.
pub fn render_allergen_matrix<W: Write>(
    data: &[ProductAllergenView],
    language: &str,
    assets_dir: &Path,
    mut sink: W,
) -> Result<(), ReportError> {
    let bytes = render_allergen_matrix_to_vec(data, language, assets_dir)?;
    sink.write_all(&bytes)?;
    Ok(())
}

/// Renders the allergen matrix to an in-memory document.
pub fn render_allergen_matrix_to_vec(
    data: &[ProductAllergenView],
    language: &str,
    assets_dir: &Path,
) -> Result<Vec<u8>, ReportError> {
    let language = Language::parse(language)
        .ok_or_else(|| ReportError::InvalidLanguage(language.to_string()))?;

    let columns = columns_for(language);
    let strings = report_strings(language);
    let geometry = PageGeometry::default();

    pdf::render(data, &columns, &strings, &geometry, assets_dir)
}
