use axum::{
    handler::Handler,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{from_fn_with_state, map_response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS};
use crate::config::SecurityConfig;
use crate::handlers::{drinks, system};
use crate::middleware::{method_not_allowed_envelope, not_found, require_auth, AuthGate};
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(drink_routes(&state))
        .fallback(not_found)
        // Global middleware
        .layer(map_response(method_not_allowed_envelope))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn drink_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let gate = |permission: &'static str| {
        from_fn_with_state(
            AuthGate::new(state.validator.clone(), Some(permission)),
            require_auth,
        )
    };

    Router::new()
        .route(
            "/drinks",
            get(drinks::list).post(drinks::create.layer(gate(POST_DRINKS))),
        )
        .route(
            "/drinks-detail",
            get(drinks::list_detail.layer(gate(GET_DRINKS_DETAIL))),
        )
        .route(
            "/drinks/:id",
            axum::routing::patch(drinks::update.layer(gate(PATCH_DRINKS)))
                .delete(drinks::delete.layer(gate(DELETE_DRINKS))),
        )
}

fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let origins = if config.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|_| tracing::warn!(origin = %o, "Ignoring invalid CORS origin"))
                    .ok()
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
