//! Internal admin routes, nested under `/admin`

use crate::api::handlers::admin;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/reindex", post(admin::reindex))
}
