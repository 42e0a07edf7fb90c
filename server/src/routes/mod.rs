use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{admin, auth, dashboard, events, health_check, tickets};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/:id/tickets", post(tickets::purchase_tickets));

    let admin_routes = Router::new()
        .route("/events", get(admin::list_events))
        .route("/events/:id/status", patch(admin::moderate_event))
        .route("/stats", get(admin::stats));

    Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(dashboard::dashboard))
        .nest("/auth", auth_routes)
        .nest("/events", event_routes)
        .nest("/admin", admin_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.allowed_origins))
}
