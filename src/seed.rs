//! Startup seeding of the allergen taxonomy and the product catalog.
//!
//! Seeding is idempotent: every insert is keyed on a unique business key
//! (`code` for allergens, `name` for products, the composite primary key for
//! the association) and duplicate attempts are suppressed, never overwritten.
//! Racing startups are therefore safe.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::catalog::{ALLERGEN_CATALOG, SEED_PRODUCTS};
use crate::models::{NewAllergen, NewProduct, ProductAllergen};
use crate::schema::{allergens, product_allergens, products};

pub fn seed(conn: &mut SqliteConnection) -> QueryResult<()> {
    seed_allergens(conn)?;
    seed_products(conn)?;

    let allergen_count: i64 = allergens::table.count().get_result(conn)?;
    let product_count: i64 = products::table.count().get_result(conn)?;
    log::info!("catalog seeded: {allergen_count} allergens, {product_count} products");

    Ok(())
}

fn seed_allergens(conn: &mut SqliteConnection) -> QueryResult<()> {
    for entry in &ALLERGEN_CATALOG {
        diesel::insert_or_ignore_into(allergens::table)
            .values(NewAllergen {
                code: entry.code,
                description_en: entry.label_en,
                description_nl: entry.label_nl,
            })
            .execute(conn)?;
    }
    Ok(())
}

fn seed_products(conn: &mut SqliteConnection) -> QueryResult<()> {
    for (name, codes) in SEED_PRODUCTS {
        diesel::insert_or_ignore_into(products::table)
            .values(NewProduct { name })
            .execute(conn)?;

        let product_id = products::table
            .filter(products::name.eq(name))
            .select(products::id)
            .first::<i32>(conn)?;

        for &code in codes {
            let allergen_id = allergens::table
                .filter(allergens::code.eq(code))
                .select(allergens::id)
                .first::<i32>(conn)?;

            diesel::insert_or_ignore_into(product_allergens::table)
                .values(ProductAllergen {
                    product_id,
                    allergen_id,
                })
                .execute(conn)?;
        }
    }
    Ok(())
}
