//! Application startup and lifecycle management.
//!
//! The generation model is loaded before the listener is bound, so a service
//! that accepts connections always has a ready engine.

use crate::config::{GeneratorBackend, GeneratorConfig, TripPlannerConfig};
use crate::handlers::{self, TRIP_PLANNER_PREFIX};
use crate::services::generator::{MockTextGenerator, T5Generator, TextGenerator};
use crate::services::{init_metrics, ItineraryPlanner};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, permissive_cors, request_id_middleware};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub planner: ItineraryPlanner,
}

/// Load the configured generation engine. Blocking work runs off the async reactor.
pub async fn load_generator(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>, AppError> {
    match config.backend {
        GeneratorBackend::Mock => {
            tracing::info!("Using mock text generator");
            Ok(Arc::new(MockTextGenerator::new(true)))
        }
        GeneratorBackend::T5 => {
            let model_id = config.model_id.clone();
            let revision = config.revision.clone();
            tracing::info!(model = %model_id, revision = %revision, "Loading T5 model");

            let generator =
                tokio::task::spawn_blocking(move || T5Generator::load(&model_id, &revision))
                    .await
                    .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?
                    .map_err(|e| {
                        tracing::error!("Failed to load generation model: {}", e);
                        AppError::InternalError(e.into())
                    })?;

            Ok(Arc::new(generator))
        }
    }
}

/// Build the HTTP router for the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            &format!("{}/", TRIP_PLANNER_PREFIX),
            get(handlers::trip_planner_status),
        )
        .route(
            &format!("{}/generate-itinerary/", TRIP_PLANNER_PREFIX),
            post(handlers::generate_itinerary),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(permissive_cors())
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application, loading the generation engine named by `config`.
    pub async fn build(config: TripPlannerConfig) -> Result<Self, AppError> {
        let generator = load_generator(&config.generator).await?;
        Self::build_with_generator(config, generator).await
    }

    /// Build the application around an already loaded generator.
    pub async fn build_with_generator(
        config: TripPlannerConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, AppError> {
        init_metrics();

        tracing::info!(
            model = %generator.model_name(),
            max_length = config.generator.max_length,
            sample = config.generator.sample,
            temperature = config.generator.temperature,
            top_k = config.generator.top_k,
            "Initialized itinerary planner"
        );

        let planner = ItineraryPlanner::new(generator, config.generator.generation_params());
        let state = AppState { planner };

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Trip planner listening on port {}", port);

        let server = axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::new(Box::pin(server)),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
