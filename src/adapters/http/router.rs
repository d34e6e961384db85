//! Top-level router: health check, authenticated API, and HTTP layers.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, AuthState};
use super::trips::{health, trip_routes, TripAppState};

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub request_timeout: Duration,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

/// Builds the service router.
///
/// `/health` is public. Everything under `/api` passes through the auth
/// middleware, and handlers require a verified identity.
pub fn build_router(state: TripAppState, validator: AuthState, options: RouterOptions) -> Router {
    let api = trip_routes()
        .with_state(state)
        .layer(middleware::from_fn_with_state(validator, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_origins_are_skipped() {
        // Builds without panicking even when every origin is malformed.
        let _ = cors_layer(&["bad\norigin".to_string()]);
        let _ = cors_layer(&["https://trips.example.com".to_string()]);
    }
}
