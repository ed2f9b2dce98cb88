use std::fs;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::report::ReportError;
use crate::{queries, report};

pub const PDF_FILENAME: &str = "products_allergens.pdf";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "Snackbar catalog API is running".to_string(),
    })
}

#[get("/products")]
pub async fn list_products(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let products = web::block(move || -> Result<_, ApiError> {
        let mut conn = pool.get().map_err(|e| ApiError::Pool(e.to_string()))?;
        Ok(queries::products_with_allergens(&mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(products))
}

#[get("/gluten-free")]
pub async fn gluten_free(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let products = web::block(move || -> Result<_, ApiError> {
        let mut conn = pool.get().map_err(|e| ApiError::Pool(e.to_string()))?;
        Ok(queries::gluten_free_products(&mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(products))
}

#[get("/allergens")]
pub async fn list_allergens(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let allergens = web::block(move || -> Result<_, ApiError> {
        let mut conn = pool.get().map_err(|e| ApiError::Pool(e.to_string()))?;
        let rows = queries::allergens_by_description(&mut conn)?;
        Ok(rows
            .into_iter()
            .map(crate::models::AllergenResponse::from)
            .collect::<Vec<_>>())
    })
    .await??;

    Ok(HttpResponse::Ok().json(allergens))
}

#[derive(Deserialize)]
pub struct PdfQuery {
    pub lang: Option<String>,
}

#[get("/products/pdf")]
pub async fn products_pdf(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    query: web::Query<PdfQuery>,
) -> Result<HttpResponse, ApiError> {
    let language = query
        .into_inner()
        .lang
        .unwrap_or_else(|| config.report_language.clone());

    let config = config.clone();
    let bytes = web::block(move || -> Result<Vec<u8>, ApiError> {
        let mut conn = pool.get().map_err(|e| ApiError::Pool(e.to_string()))?;
        let views = queries::product_allergen_views(&mut conn)?;
        let bytes = report::render_allergen_matrix_to_vec(&views, &language, &config.assets_dir)?;

        // Keep a server-local copy of the finished document; written only
        // after the render fully succeeded, so no partial file can appear.
        fs::create_dir_all(&config.output_dir).map_err(ReportError::from)?;
        fs::write(config.output_dir.join(PDF_FILENAME), &bytes).map_err(ReportError::from)?;

        Ok(bytes)
    })
    .await??;

    log::info!("rendered allergen matrix ({} bytes)", bytes.len());

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(PDF_FILENAME.to_string())],
        })
        .body(bytes))
}
