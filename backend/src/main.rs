use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use closet_rental_backend::{
    config::AppConfig,
    database::{Database, DatabaseConfig, TransactionConfig, TransactionManager},
    error::AppError,
    handlers,
    security::FieldCipher,
    services::Services,
    utils::jwt::JwtService,
};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting closet rental backend on {}", config.bind_address());

    let database = Database::new(&DatabaseConfig::from(&config)).await?;
    database.migrate().await?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret)?);
    let cipher = Arc::new(FieldCipher::new(&config.secret_key)?);
    let transactions = TransactionManager::new(
        database.pool().clone(),
        TransactionConfig {
            timeout: config.transaction_timeout(),
            ..Default::default()
        },
    );
    let services = Services::new(database.pool().clone(), transactions, jwt_service.clone(), cipher);

    let client_url = config.client_url.clone();
    let pool = database.pool().clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&client_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(database.clone()))
            .configure(|cfg| services.register(cfg))
            .configure(|cfg| handlers::configure(cfg, jwt_service.clone(), pool.clone()))
    })
    .client_request_timeout(config.request_timeout())
    .bind(config.bind_address())?
    .run()
    .await?;

    Ok(())
}
