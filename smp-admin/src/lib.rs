//! smp-admin library - membership portal admin backend
//!
//! Units, committee members, programs with photos, and the unit
//! scoring/ranking pipeline, exposed over an HTTP API.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::rank_job::RankQueue;
use crate::services::storage::PhotoStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Photo object storage
    pub photos: Arc<dyn PhotoStore>,
    /// Fire-and-forget trigger for rank recomputation
    pub rank_queue: RankQueue,
}

impl AppState {
    /// Create application state and start the rank worker
    pub fn new(db: SqlitePool, photos: Arc<dyn PhotoStore>) -> Self {
        let rank_queue = RankQueue::start(db.clone());
        Self {
            db,
            photos,
            rank_queue,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/api/units", post(api::create_unit).get(api::list_units))
        .route("/api/units/:id", get(api::get_unit))
        .route(
            "/api/units/:id/reset-credentials",
            post(api::reset_credentials),
        )
        .route(
            "/api/units/:id/programs",
            post(api::add_program).get(api::list_programs),
        )
        .route(
            "/api/units/:id/programs/:program_id",
            put(api::edit_program).delete(api::delete_program),
        )
        .route("/api/units/:id/committee/assign", post(api::assign_role))
        .route("/api/units/:id/committee/remove", post(api::remove_member))
        .route("/api/members", post(api::create_member).get(api::list_members))
        .route(
            "/api/members/:id",
            get(api::get_member).delete(api::delete_member),
        )
        .route("/api/ranking", get(api::get_ranking))
        .merge(api::health_routes())
        .with_state(state)
}
