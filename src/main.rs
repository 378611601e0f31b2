mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io::{Error as IoError, ErrorKind};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, StoreBackend};
use crate::database::{MemoryStore, MongoDB, ProductStore, UserStore};
use crate::services::auth_service::AUTH_HEADER;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        IoError::new(ErrorKind::InvalidInput, e)
    })?;

    log::info!("🚀 Starting Storefront Service...");

    let (users, products): (Arc<dyn UserStore>, Arc<dyn ProductStore>) = match config.store_backend {
        StoreBackend::MongoDB => {
            let url = config.database_url.clone().unwrap_or_default();
            let db = MongoDB::new(&url).await.map_err(|e| {
                log::error!("❌ Failed to connect to MongoDB: {}", e);
                IoError::new(ErrorKind::ConnectionRefused, e.to_string())
            })?;
            let db = Arc::new(db);
            let users: Arc<dyn UserStore> = db.clone();
            let products: Arc<dyn ProductStore> = db;
            (users, products)
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  STORE_BACKEND=memory: data lives only as long as this process");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let products: Arc<dyn ProductStore> = store;
            (users, products)
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let host = config.host.clone();
    let port = config.port;
    let upload_dir = config.upload_dir.clone();
    let allowed_origins = config.allowed_origins.clone();
    let state = web::Data::new(AppState::new(users, products, config));

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("🖼️  Serving images from {} at /images", upload_dir);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::HeaderName::from_static(AUTH_HEADER),
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .expose_headers(vec![header::CONTENT_TYPE])
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Uploaded product images
            .service(actix_files::Files::new("/images", &upload_dir))
            .configure(api::configure)
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
