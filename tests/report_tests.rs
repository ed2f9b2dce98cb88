use std::collections::HashSet;
use std::path::PathBuf;

use snackbar_catalog::report::layout::{PageGeometry, plan_pages};
use snackbar_catalog::report::{
    ProductAllergenView, ReportError, render_allergen_matrix, render_allergen_matrix_to_vec,
};

fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/allergens")
}

fn view(name: &str, codes: &[&str]) -> ProductAllergenView {
    ProductAllergenView {
        name: name.to_string(),
        allergens: codes.iter().map(|c| c.to_string()).collect::<HashSet<_>>(),
    }
}

fn sample_views() -> Vec<ProductAllergenView> {
    vec![
        view("Frikandel", &["gluten", "soy", "mustard"]),
        view("Kroket", &["gluten", "milk"]),
        view("Bread", &["gluten"]),
    ]
}

fn page_count(bytes: &[u8]) -> usize {
    let doc = lopdf::Document::load_mem(bytes).expect("rendered output should parse as a PDF");
    doc.get_pages().len()
}

#[test]
fn sample_scenario_renders_one_page_in_dutch() {
    let bytes = render_allergen_matrix_to_vec(&sample_views(), "nl", &assets_dir()).unwrap();

    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn empty_input_is_a_single_page_document() {
    let bytes = render_allergen_matrix_to_vec(&[], "en", &assets_dir()).unwrap();
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn long_input_paginates_and_matches_the_planner() {
    let views: Vec<ProductAllergenView> = (0..45)
        .map(|i| view(&format!("Product {i}"), &["gluten", "milk"]))
        .collect();

    let expected_pages = plan_pages(views.len(), &PageGeometry::default()).len();
    assert!(expected_pages >= 2, "45 rows should not fit on one page");

    let bytes = render_allergen_matrix_to_vec(&views, "en", &assets_dir()).unwrap();
    assert_eq!(page_count(&bytes), expected_pages);
}

#[test]
fn rendering_is_deterministic() {
    let a = render_allergen_matrix_to_vec(&sample_views(), "nl", &assets_dir()).unwrap();
    let b = render_allergen_matrix_to_vec(&sample_views(), "nl", &assets_dir()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_language_fails_before_any_output() {
    let mut sink = Vec::new();
    let err = render_allergen_matrix(&sample_views(), "de", &assets_dir(), &mut sink).unwrap_err();

    assert!(matches!(err, ReportError::InvalidLanguage(ref tag) if tag.as_str() == "de"));
    assert!(sink.is_empty());
}

#[test]
fn missing_icon_asset_aborts_the_whole_render() {
    let empty = tempfile::tempdir().unwrap();
    let err = render_allergen_matrix_to_vec(&sample_views(), "en", empty.path()).unwrap_err();

    match err {
        // Columns load in catalog order, so the first entry is reported.
        ReportError::MissingAsset { code, .. } => assert_eq!(code, "gluten"),
        other => panic!("expected MissingAsset, got {other:?}"),
    }
}

#[test]
fn renders_to_a_writer_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.pdf");

    let file = std::fs::File::create(&path).unwrap();
    render_allergen_matrix(&sample_views(), "en", &assets_dir(), file).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(page_count(&bytes), 1);
}
