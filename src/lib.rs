use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{middleware as axum_middleware, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod state;
pub mod testing;

use middleware::jwt_auth_middleware;
use state::AppState;

/// Build the full application router. Everything under `/api` except the
/// login and register routes sits behind the JWT middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth_public_routes())
        .merge(protected_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    auth_routes()
        .merge(alumni_routes())
        .merge(employment_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            jwt_auth_middleware,
        ))
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/profile", get(auth::profile))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/validate", get(auth::validate))
}

fn alumni_routes() -> Router<AppState> {
    use handlers::alumni;

    Router::new()
        .route("/api/alumni", get(alumni::list).post(alumni::create))
        .route("/api/alumni/without-jobs", get(alumni::without_jobs))
        .route(
            "/api/alumni/:id",
            get(alumni::get)
                .put(alumni::update)
                .delete(alumni::delete),
        )
}

fn employment_routes() -> Router<AppState> {
    use handlers::employment;

    Router::new()
        .route(
            "/api/employment",
            get(employment::list).post(employment::create),
        )
        // static segments before the :id catch-all
        .route("/api/employment/trash", get(employment::list_trash))
        .route(
            "/api/employment/trash/restore/:id",
            put(employment::restore),
        )
        .route(
            "/api/employment/trash/:id",
            delete(employment::delete_trashed),
        )
        .route(
            "/api/employment/soft-delete/:id",
            delete(employment::soft_delete),
        )
        .route("/api/employment/alumni/:alumni_id", get(employment::by_alumni))
        .route(
            "/api/employment/:id",
            get(employment::get)
                .put(employment::update)
                .delete(employment::delete),
        )
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.pinger.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Service is healthy",
                "database": "up",
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "Service degraded",
                    "database": "down",
                })),
            )
        }
    }
}
