use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use snackbar_catalog::config::Config;
use snackbar_catalog::{db, handlers, seed};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let pool = db::build_pool(&config.database_url);

    {
        let mut conn = pool
            .get()
            .expect("Failed to check out a database connection");
        db::run_migrations(&mut conn).expect("Failed to run database migrations");
        seed::seed(&mut conn).expect("Failed to seed the catalog");
    }

    log::info!("Starting snackbar catalog API on port {}", config.port);

    let port = config.port;
    let pool = web::Data::new(pool);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        let cors = Cors::permissive(); // Configure this properly for production

        App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .app_data(pool.clone())
            .app_data(config.clone())
            .service(handlers::health)
            .service(handlers::list_products)
            .service(handlers::gluten_free)
            .service(handlers::list_allergens)
            .service(handlers::products_pdf)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
