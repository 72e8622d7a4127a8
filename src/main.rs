use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};

mod api;
mod config;
mod db;
mod model;
mod routes;
mod service;
mod store;

use config::Config;
use db::init_db;
use service::{HrService, SystemClock};
use store::MySqlStore;

use tracing::info;
use tracing_appender::rolling;

#[get("/")]
async fn index() -> impl Responder {
    "HR leave service"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config).await?;
    let service = HrService::new(Arc::new(MySqlStore::new(pool)), Arc::new(SystemClock));

    let limiter = Arc::new(routes::build_limiter(config.rate_api_per_min)?);
    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();

    info!(%server_addr, %api_prefix, "Listening");

    HttpServer::new(move || {
        let api_prefix = api_prefix.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .wrap(limiter.clone())
            .app_data(Data::new(service.clone()))
            .service(index)
            .configure(move |cfg| routes::configure(cfg, &api_prefix))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
