use std::path::PathBuf;

use actix_web::{App, test, web};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use serde_json::Value;

use snackbar_catalog::config::Config;
use snackbar_catalog::db::{self, DbPool};
use snackbar_catalog::schema::{allergens, product_allergens, products};
use snackbar_catalog::{handlers, seed};

fn test_pool() -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("failed to build test pool");

    let mut conn = pool.get().unwrap();
    db::run_migrations(&mut conn).unwrap();
    seed::seed(&mut conn).unwrap();

    pool
}

fn test_config(output_dir: PathBuf) -> Config {
    Config {
        port: 0,
        database_url: ":memory:".to_string(),
        assets_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/allergens"),
        output_dir,
        report_language: "en".to_string(),
    }
}

#[actix_rt::test]
async fn test_health_endpoint() {
    let app = test::init_service(App::new().service(handlers::health)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).unwrap();
    assert!(body_str.contains("ok"));
}

#[actix_rt::test]
async fn test_products_endpoint_lists_seeded_products() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_pool()))
            .service(handlers::list_products),
    )
    .await;

    let req = test::TestRequest::get().uri("/products").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);

    let names: Vec<&str> = items.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Frikandel", "Kroket", "Bread"]);

    let bread = &items[2];
    let bread_allergens = bread["allergens"].as_array().unwrap();
    assert_eq!(bread_allergens.len(), 1);
    assert_eq!(bread_allergens[0]["code"], "gluten");
    assert_eq!(
        bread_allergens[0]["description_en"],
        "Cereals containing gluten"
    );
    assert_eq!(
        bread_allergens[0]["description_nl"],
        "Glutenbevattende granen"
    );
    assert!(bread_allergens[0]["id"].is_i64());
}

#[actix_rt::test]
async fn test_gluten_free_endpoint_is_empty_for_seed_data() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_pool()))
            .service(handlers::gluten_free),
    )
    .await;

    // Every seeded product contains gluten.
    let req = test::TestRequest::get().uri("/gluten-free").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn test_gluten_free_endpoint_includes_products_without_gluten() {
    let pool = test_pool();
    {
        let mut conn = pool.get().unwrap();
        diesel::insert_into(products::table)
            .values(products::name.eq("Apple"))
            .execute(&mut conn)
            .unwrap();
    }

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .service(handlers::gluten_free),
    )
    .await;

    let req = test::TestRequest::get().uri("/gluten-free").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Apple");
    assert_eq!(items[0]["allergens"].as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn test_allergens_endpoint_sorts_by_english_description() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_pool()))
            .service(handlers::list_allergens),
    )
    .await;

    let req = test::TestRequest::get().uri("/allergens").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 14);

    let descriptions: Vec<&str> = items
        .iter()
        .map(|a| a["description_en"].as_str().unwrap())
        .collect();
    let mut sorted = descriptions.clone();
    sorted.sort();
    assert_eq!(descriptions, sorted);
    assert_eq!(descriptions[0], "Celery");
}

#[actix_rt::test]
async fn test_seeding_twice_leaves_counts_unchanged() {
    let pool = test_pool();
    let mut conn = pool.get().unwrap();

    // test_pool already seeded once; run it again.
    seed::seed(&mut conn).unwrap();

    let allergen_count: i64 = allergens::table.count().get_result(&mut conn).unwrap();
    let product_count: i64 = products::table.count().get_result(&mut conn).unwrap();
    let association_count: i64 = product_allergens::table
        .count()
        .get_result(&mut conn)
        .unwrap();

    assert_eq!(allergen_count, 14);
    assert_eq!(product_count, 3);
    assert_eq!(association_count, 6);
}

#[actix_rt::test]
async fn test_pdf_endpoint_streams_a_document_and_keeps_a_copy() {
    let output = tempfile::tempdir().unwrap();
    let config = test_config(output.path().to_path_buf());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_pool()))
            .app_data(web::Data::new(config))
            .service(handlers::products_pdf),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/products/pdf?lang=nl")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/pdf"
    );

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));

    let copy = output.path().join(handlers::PDF_FILENAME);
    assert_eq!(std::fs::read(copy).unwrap(), body.to_vec());
}

#[actix_rt::test]
async fn test_pdf_endpoint_rejects_unsupported_language() {
    let output = tempfile::tempdir().unwrap();
    let config = test_config(output.path().to_path_buf());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_pool()))
            .app_data(web::Data::new(config))
            .service(handlers::products_pdf),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/products/pdf?lang=de")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    // A rejected render never leaves a file behind.
    assert!(!output.path().join(handlers::PDF_FILENAME).exists());
}
