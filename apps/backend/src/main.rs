use actix_web::{web, App, HttpServer};
use storefront_backend::config::AppConfig;
use storefront_backend::infra::state::build_state;
use storefront_backend::middleware::cors::cors_middleware;
use storefront_backend::middleware::request_trace::RequestTrace;
use storefront_backend::middleware::security_headers::SecurityHeaders;
use storefront_backend::middleware::structured_logger::StructuredLogger;
use storefront_backend::middleware::trace_span::TraceSpan;
use storefront_backend::{routes, telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = telemetry::init_tracing() {
        eprintln!("❌ Failed to initialise tracing: {e}");
        std::process::exit(1);
    }

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db_url(config.database_url.clone())
        .with_security(config.security.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %config.host, port = config.port, "storefront backend listening");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);
    let origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
