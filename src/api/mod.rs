// API module - HTTP endpoints

pub mod auth;
pub mod crud;
pub mod dashboard;
pub mod health;
pub mod import;
pub mod middleware;
pub mod nav;
pub mod review;

use axum::{
    middleware::from_fn,
    response::Redirect,
    routing::{get, get_service},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::error::panic_response;
use crate::models::{Class, Course, Faculty, Program, ReviewBatch, Student, User};
use middleware::auth::{require_admin, require_session};
use middleware::session::{create_session_layer, AppState};

/// Builds the complete application router
pub fn router(state: AppState) -> Router {
    let session_layer = create_session_layer(&state.config);

    // Serve static assets
    let static_routes = Router::new().nest_service(
        "/static",
        get_service(ServeDir::new(&state.config.static_dir)),
    );

    let admin_routes = crud::router::<User>().route_layer(from_fn(require_admin));

    let protected = Router::new()
        .merge(dashboard::router())
        .merge(crud::router::<Faculty>())
        .merge(crud::router::<Program>())
        .merge(crud::router::<Course>())
        .merge(crud::router::<Class>())
        .merge(crud::router::<Student>())
        .merge(crud::router::<ReviewBatch>())
        .merge(admin_routes)
        .merge(review::router())
        .merge(import::router(state.config.import_max_bytes))
        .route_layer(from_fn(require_session));

    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .merge(health::router())
        .merge(auth::router())
        .merge(protected)
        .merge(static_routes)
        .fallback(|| async { Redirect::to("/login") })
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}
