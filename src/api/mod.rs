mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::db::Database;
use crate::service::RosterService;

pub use error::{ApiError, ErrorBody};
pub use handlers::{AuthenticateResponse, MessageResponse};

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub roster: RosterService<Database>,
    /// URL encoded by `/api/qr` and returned by `/api/ip`.
    pub public_url: Arc<str>,
}

impl AppState {
    pub fn new(roster: RosterService<Database>, public_url: impl Into<Arc<str>>) -> Self {
        Self {
            roster,
            public_url: public_url.into(),
        }
    }
}

pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let api = Router::new()
        .route("/authenticate", post(handlers::authenticate))
        .route(
            "/cleaners",
            get(handlers::list_cleaners)
                .post(handlers::add_cleaner)
                .delete(handlers::remove_cleaner),
        )
        .route(
            "/tasks",
            get(handlers::list_tasks)
                .post(handlers::add_task)
                .put(handlers::set_task_completed)
                .delete(handlers::remove_task),
        )
        .route("/events", get(handlers::events))
        .route("/qr", get(handlers::qr_code))
        .route("/ip", get(handlers::reachable_url))
        .route("/health", get(handlers::health));

    let mut app = Router::new().nest("/api", api);
    if let Some(dir) = &settings.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(settings.cors_origins.as_deref())),
    )
    .with_state(state)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
