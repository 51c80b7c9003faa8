use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::web::{Data, PayloadConfig};
use actix_web::{App, HttpServer, Responder, get};

mod api;
mod config;
mod docs;
mod error;
mod model;
mod rekap;
mod routes;
mod utils;

#[cfg(test)]
mod tests;

use config::Config;
use utils::batch_store::BatchStore;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance recap service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        addr = %config.server_addr,
        column_mode = %config.column_mode,
        rows_per_page = config.rows_per_page,
        "Server starting..."
    );

    let store = Data::new(BatchStore::new(
        config.batch_capacity,
        Duration::from_secs(config.batch_ttl_secs),
    ));
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(Data::new(config.clone()))
            .app_data(PayloadConfig::new(config.max_upload_bytes))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
