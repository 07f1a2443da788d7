use super::handlers::{health, login, register, AppState};
use super::middleware::{rate_limit_middleware, ApiRateLimiter};
use crate::auth::AuthService;
use crate::config::{ApiConfig, ServerConfig};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use zkauth_types::{ZkAuthError, ZkAuthResult};

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
    rate_limiter: Option<Arc<ApiRateLimiter>>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, auth: AuthService) -> Self {
        let rate_limiter = config.rate_limit.enabled.then(|| {
            Arc::new(ApiRateLimiter::new(
                config.rate_limit.requests_per_second,
                config.rate_limit.burst_size,
            ))
        });

        Self {
            config,
            state: AppState::new(auth),
            rate_limiter,
        }
    }

    pub fn router(&self) -> Router {
        let mut auth_routes = Router::new()
            .route("/api/auth/register", post(register))
            .route("/api/auth/login", post(login));

        if let Some(limiter) = &self.rate_limiter {
            auth_routes = auth_routes.layer(from_fn_with_state(limiter.clone(), rate_limit_middleware));
        }

        let mut router = Router::new()
            .route("/health", get(health))
            .merge(auth_routes)
            .layer(DefaultBodyLimit::max(self.config.api.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.api.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http());

        if self.config.api.cors_enabled {
            router = router.layer(cors_layer(&self.config.api));
        }

        router.with_state(self.state.clone())
    }

    /// Serves until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> ZkAuthResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.api.socket_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ZkAuthError::Network(format!("Failed to bind API server: {}", e)))?;

        info!("API server listening on http://{}", addr);
        if !self.config.api_is_localhost_only() {
            warn!("API server is reachable from other hosts");
        }
        if !self.state.auth.verifier_ready() {
            warn!("No verification key loaded, every login will fail");
        }

        let cleanup = self.rate_limiter.clone().map(|limiter| {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
                loop {
                    interval.tick().await;
                    limiter.cleanup();
                }
            })
        });

        let app = self.router();
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ZkAuthError::Network(format!("API server error: {}", e)));

        if let Some(task) = cleanup {
            task.abort();
        }

        info!("API server stopped");
        result
    }
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if config.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
