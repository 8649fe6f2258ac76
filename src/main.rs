mod routes;
mod logger;
mod config;
mod response;
mod error;
mod models;
mod middleware;
mod state;
mod handler;
mod service;
mod pipeline;

mod tracer;

use dotenv::dotenv;
use log::{info, warn};
use opentelemetry::global;
use opentelemetry::global::shutdown_tracer_provider;
use tokio::signal;
use crate::logger::logger::setup_logger;
use config::settings::SETTINGS;
use crate::pipeline::diagnose_pipeline::diagnose_pipeline::DiagnosePipeline;
use crate::pipeline::model_config::config::PlaceholderImageConfig;
use crate::pipeline::module::placeholder_image::PlaceholderImage;
use crate::routes::root::{root_routes, RouterState};


#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
use crate::tracer::tracer::init_tracer_provider;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Setup logger
    setup_logger(SETTINGS.log_level());
    let addr = format!("0.0.0.0:{}", SETTINGS.server.http_port);

    // Setup pipeline
    let diagnose_pipeline = DiagnosePipeline::from_settings(&SETTINGS)
        .unwrap_or_else(|e| panic!("Failed to init diagnose pipeline: {}", e));
    let placeholder_image = PlaceholderImage::new(PlaceholderImageConfig::new())
        .unwrap_or_else(|e| panic!("Failed to init placeholder image: {}", e));
    if SETTINGS.gemini.api_key.trim().is_empty() {
        warn!("gemini api key is not configured, diagnose requests will fail");
    }
    info!("completed initializing pipelines");

    // Setup tracing
    let tracing_enabled = match &SETTINGS.tracer {
        Some(tracer) => {
            let tracer_provider = init_tracer_provider(&tracer.uri, &SETTINGS.app.name)
                .expect("Failed to initialize tracer provider.");
            global::set_tracer_provider(tracer_provider);
            true
        }
        None => false,
    };

    // Init server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to create new listener: {}", e));
    info!("starting api server on {:?} ({}), environment {:?}", addr, SETTINGS.server, SETTINGS.environment);
    let router_state = RouterState::new(diagnose_pipeline, placeholder_image);

    axum::serve(listener, root_routes(router_state, &SETTINGS))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| panic!("Failed to start api server: {}", e));

    if tracing_enabled {
        shutdown_tracer_provider();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
