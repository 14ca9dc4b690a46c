use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use portfolio_site::{
    graceful_shutdown::shutdown_signal,
    middlewares::security_headers::SecurityHeaders,
    repositories::content_repo::FsWorkRepo,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    use_cases::work::WorkHandler,
    AppState,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new();
    init_tracing(config.as_ref().map(|cfg| cfg.log_format).unwrap_or_default());

    let config = match config {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let work_handler = WorkHandler::new(FsWorkRepo::new(&config.content_dir));
    let collection = match work_handler.load_collection().await {
        Ok(collection) => collection,
        Err(e) => {
            tracing::error!("Refusing to start, work collection is invalid: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState::new(config.name.clone(), collection));
    let server_addr = config.server_addr();

    tracing::info!(
        "🚀 Starting {} v{} on {} ({})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.env
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(SecurityHeaders)
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)?
    .run();

    tokio::select! {
        res = server => res?,
        signal = shutdown_signal() => {
            tracing::warn!("🛑 {} received, shutting down", signal);
        }
    }

    Ok(())
}
