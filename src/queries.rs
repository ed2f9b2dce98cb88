//! Read-only catalog queries. Absent rows surface as empty collections,
//! never as errors.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::catalog::GLUTEN;
use crate::models::{Allergen, Product, ProductAllergen, ProductResponse};
use crate::report::ProductAllergenView;
use crate::schema::{allergens, product_allergens, products};

/// All products in id order, each with its allergen set attached.
pub fn products_with_allergens(conn: &mut SqliteConnection) -> QueryResult<Vec<ProductResponse>> {
    let rows = products::table
        .order(products::id.asc())
        .load::<Product>(conn)?;
    attach_allergens(conn, rows)
}

/// Products whose allergen set excludes the fixed "gluten" code.
pub fn gluten_free_products(conn: &mut SqliteConnection) -> QueryResult<Vec<ProductResponse>> {
    let gluten_ids = product_allergens::table
        .inner_join(allergens::table)
        .filter(allergens::code.eq(GLUTEN))
        .select(product_allergens::product_id);

    let rows = products::table
        .filter(diesel::dsl::not(products::id.eq_any(gluten_ids)))
        .order(products::id.asc())
        .load::<Product>(conn)?;
    attach_allergens(conn, rows)
}

/// All allergens, sorted by their English description.
pub fn allergens_by_description(conn: &mut SqliteConnection) -> QueryResult<Vec<Allergen>> {
    allergens::table
        .order(allergens::description_en.asc())
        .load(conn)
}

/// Flattens every product to the renderer's input shape.
pub fn product_allergen_views(
    conn: &mut SqliteConnection,
) -> QueryResult<Vec<ProductAllergenView>> {
    Ok(products_with_allergens(conn)?
        .into_iter()
        .map(|product| ProductAllergenView {
            name: product.name,
            allergens: product.allergens.into_iter().map(|a| a.code).collect(),
        })
        .collect())
}

fn attach_allergens(
    conn: &mut SqliteConnection,
    rows: Vec<Product>,
) -> QueryResult<Vec<ProductResponse>> {
    let pairs = ProductAllergen::belonging_to(&rows)
        .inner_join(allergens::table)
        .order(allergens::id.asc())
        .select((ProductAllergen::as_select(), Allergen::as_select()))
        .load::<(ProductAllergen, Allergen)>(conn)?;

    let grouped = pairs.grouped_by(&rows);

    Ok(rows
        .into_iter()
        .zip(grouped)
        .map(|(product, pairs)| {
            let allergens = pairs.into_iter().map(|(_, allergen)| allergen).collect();
            ProductResponse::new(product, allergens)
        })
        .collect())
}
