//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::db::PatientStore;

/// Build the API router over a patient store.
pub fn api_router(store: PatientStore) -> Router {
    build_router(ApiContext::new(store))
}

fn build_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/login", post(endpoints::auth::login))
        .route(
            "/patients",
            get(endpoints::patients::list).put(endpoints::patients::replace),
        )
        .with_state(ctx);

    Router::new().nest("/api", routes)
}
