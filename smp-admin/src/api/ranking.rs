//! Scoreboard API

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{db, AppState};

/// One scoreboard row
#[derive(Debug, Serialize)]
pub struct RankingEntry {
    pub id: Uuid,
    pub name: String,
    pub total_score: i64,
    pub rank: i64,
    pub grade: String,
    pub classification: String,
}

/// GET /api/ranking
///
/// Units in scoreboard order (score descending, unit id as the
/// deterministic tie-break, matching the rank job's ordering).
pub async fn get_ranking(State(state): State<AppState>) -> ApiResult<Json<Vec<RankingEntry>>> {
    let units = db::units::list_units(&state.db).await?;

    let entries = units
        .into_iter()
        .map(|unit| RankingEntry {
            id: unit.id,
            name: unit.name,
            total_score: unit.total_score,
            rank: unit.rank,
            grade: unit.grade.as_str().to_string(),
            classification: unit.classification.as_str().to_string(),
        })
        .collect();

    Ok(Json(entries))
}
