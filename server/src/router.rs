use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::probes::{healthz, livez};
use crate::handlers::{applications, interviews, jobs};
use crate::middleware::authn::{authenticate, require_company, require_user};
use crate::state::AppState;

fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/interviews/schedule", post(interviews::schedule))
        .route("/interviews/company", get(interviews::list))
        .route("/interviews/company/{id}", get(interviews::get))
        .route("/interviews/company/{id}/feedback", post(interviews::feedback))
        .route("/interviews/{id}", put(interviews::update))
        .route("/interviews/{id}/reschedule", put(interviews::reschedule))
        .route("/interviews/{id}/cancel", put(interviews::cancel))
        .route("/interviews/{id}/complete", put(interviews::complete))
        .route("/applications/company", get(applications::list))
        .route("/applications/{id}/status", put(applications::set_status))
        .route_layer(from_fn(require_company))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/interviews/user", get(interviews::list))
        .route("/interviews/user/{id}", get(interviews::get))
        .route("/interviews/user/{id}/feedback", post(interviews::feedback))
        .route("/interviews/{id}/confirm", put(interviews::confirm))
        .route("/applications", post(applications::apply))
        .route("/applications/user", get(applications::list))
        .route_layer(from_fn(require_user))
}

/// Routes open to any authenticated principal; the lifecycle checks ownership.
fn shared_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route("/jobs/{id}", axum::routing::delete(jobs::delete))
        .route("/applications/{id}", get(applications::get))
}

pub fn build_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .merge(company_routes())
        .merge(user_routes())
        .merge(shared_routes())
        .layer(from_fn_with_state(state.clone(), authenticate))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
