use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, circles, contacts, health, locations, notifications, presence, sos, trips, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting is disabled when the configured limit is 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a valid user JWT)
    // Middleware order: auth runs first, then rate limiting keyed by user id
    let protected_routes = Router::new()
        // User routes
        .route("/api/v1/users/me", get(users::get_me))
        .route("/api/v1/users/me/fcm-token", put(users::update_fcm_token))
        .route("/api/v1/users/lookup", post(users::lookup_users))
        // Circle routes
        .route("/api/v1/circles", post(circles::create_circle))
        .route("/api/v1/circles", get(circles::list_circles))
        .route("/api/v1/circles/join", post(circles::join_circle))
        .route("/api/v1/circles/:circle_id/leave", post(circles::leave_circle))
        .route("/api/v1/circles/:circle_id", delete(circles::delete_circle))
        .route("/api/v1/circles/:circle_id/members", get(circles::get_members))
        .route("/api/v1/circles/:circle_id/trips", get(trips::list_circle_trips))
        .route("/api/v1/circles/:circle_id/presence", get(presence::circle_presence))
        // Location routes
        .route("/api/v1/locations", post(locations::upload_location))
        .route("/api/v1/locations/:user_id", get(locations::get_last_location))
        // Contact routes
        .route("/api/v1/contacts", post(contacts::create_contact))
        .route("/api/v1/contacts", get(contacts::list_contacts))
        .route("/api/v1/contacts/incoming", get(contacts::list_incoming))
        .route("/api/v1/contacts/:email", delete(contacts::delete_contact))
        // Trip routes
        .route("/api/v1/trips", post(trips::start_trip))
        .route("/api/v1/trips/shared-with-me", get(trips::list_shared_with_me))
        .route("/api/v1/trips/:trip_id/stop", post(trips::stop_trip))
        // SOS
        .route("/api/v1/sos", post(sos::send_sos))
        // Notifications
        .route("/api/v1/notifications", get(notifications::list_notifications))
        // Presence heartbeat
        .route("/api/v1/presence", put(presence::heartbeat))
        // Rate limiting runs after auth (keyed by the authenticated user)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
