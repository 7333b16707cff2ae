use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/vehicles", get(handlers::bookings::list_vehicles))
        .route(
            "/api/bookings",
            get(handlers::bookings::bookings_by_phone).post(handlers::bookings::submit_booking),
        )
        .route("/api/bookings/search", get(handlers::bookings::search_bookings))
        .route("/api/bookings/:id/status", get(handlers::bookings::booking_status))
        .route("/api/me/role", get(handlers::account::get_role))
        .route("/api/me/admin", get(handlers::account::is_admin))
        .route(
            "/api/me/profile",
            get(handlers::account::get_profile).put(handlers::account::save_profile),
        )
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route("/api/admin/stats", get(handlers::admin::get_stats))
        .route(
            "/api/admin/bookings/:id/status",
            put(handlers::admin::update_booking_status),
        )
        .route("/api/admin/bookings/:id", delete(handlers::admin::delete_booking))
        .route("/api/admin/users", get(handlers::admin::get_user_id_by_name))
        .route(
            "/api/admin/users/:principal/role",
            put(handlers::admin::assign_role),
        )
        .route(
            "/api/admin/users/:principal/profile",
            get(handlers::admin::get_user_profile),
        );

    if state.config.dev_mode {
        router = router.route("/api/dev/token", post(handlers::dev::mint_token));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
