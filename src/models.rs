use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::allergens)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Allergen {
    pub id: i32,
    pub code: String,
    pub description_en: String,
    pub description_nl: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::allergens)]
pub struct NewAllergen<'a> {
    pub code: &'a str,
    pub description_en: &'a str,
    pub description_nl: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Insertable)]
#[diesel(table_name = crate::schema::product_allergens)]
#[diesel(primary_key(product_id, allergen_id))]
#[diesel(belongs_to(Product))]
#[diesel(belongs_to(Allergen))]
pub struct ProductAllergen {
    pub product_id: i32,
    pub allergen_id: i32,
}

/// Wire shape for a single allergen, as returned by the listing endpoints.
#[derive(Debug, Serialize)]
pub struct AllergenResponse {
    pub id: i32,
    pub code: String,
    pub description_en: String,
    pub description_nl: String,
}

impl From<Allergen> for AllergenResponse {
    fn from(a: Allergen) -> Self {
        AllergenResponse {
            id: a.id,
            code: a.code,
            description_en: a.description_en,
            description_nl: a.description_nl,
        }
    }
}

/// Wire shape for a product with its allergen set attached.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub allergens: Vec<AllergenResponse>,
}

impl ProductResponse {
    pub fn new(product: Product, allergens: Vec<Allergen>) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            allergens: allergens.into_iter().map(AllergenResponse::from).collect(),
        }
    }
}
