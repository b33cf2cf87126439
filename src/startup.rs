use crate::config::ProductConfig;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::metrics_middleware;
use crate::services::MongoDb;
use axum::{
    middleware::from_fn,
    routing::{get, put},
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: ProductConfig,
    pub db: MongoDb,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: ProductConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/init", get(handlers::init_sample_product))
            .route(
                "/products",
                get(handlers::list_products).post(handlers::create_product),
            )
            .route(
                "/products/:id",
                put(handlers::update_product).delete(handlers::delete_product),
            )
            .layer(from_fn(metrics_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
