//! Rank recomputation job
//!
//! Orders all units by score and reassigns rank, grade and classification.
//! The job runs behind `RankQueue`, a channel-fed worker detached from the
//! request path: triggering is fire-and-forget, and worker failures are
//! logged, never retried and never surfaced to any caller.

use smp_common::Result;
use sqlx::{Row, SqlitePool};
use tokio::sync::mpsc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::models::{grade_for_score, Classification, Grade};

struct RankRow {
    id: Uuid,
    total_score: i64,
    rank: i64,
    grade: Grade,
    classification: Classification,
}

/// Recompute rank, grade and classification for every unit
///
/// Units are ordered by total score descending; equal scores are broken
/// deterministically by unit id ascending. Ranks are 1-based positions in
/// that order. Only rows whose rank, grade or classification actually
/// changed are written back; returns the number of rows written.
pub async fn recompute_all_ranks(pool: &SqlitePool) -> Result<usize> {
    let rows = sqlx::query(
        r#"
        SELECT id, total_score, rank, grade, classification
        FROM units
        ORDER BY total_score DESC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut units = Vec::with_capacity(rows.len());
    for row in &rows {
        let id_str: String = row.get("id");
        let grade_str: String = row.get("grade");
        let classification_str: String = row.get("classification");
        units.push(RankRow {
            id: Uuid::parse_str(&id_str)
                .map_err(|e| smp_common::Error::Internal(format!("Invalid unit id: {}", e)))?,
            total_score: row.get("total_score"),
            rank: row.get("rank"),
            grade: Grade::parse(&grade_str).unwrap_or(Grade::F),
            classification: Classification::parse(&classification_str)
                .unwrap_or(Classification::Average),
        });
    }

    let mut written = 0;
    for (index, unit) in units.iter().enumerate() {
        let new_rank = index as i64 + 1;
        let (new_grade, new_classification) = grade_for_score(unit.total_score);

        // Diff before write: untouched rows cost nothing
        if unit.rank == new_rank
            && unit.grade == new_grade
            && unit.classification == new_classification
        {
            continue;
        }

        sqlx::query(
            r#"
            UPDATE units
            SET rank = ?, grade = ?, classification = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(new_rank)
        .bind(new_grade.as_str())
        .bind(new_classification.as_str())
        .bind(unit.id.to_string())
        .execute(pool)
        .await?;
        written += 1;
    }

    debug!("Rank recomputation complete ({} units, {} written)", units.len(), written);

    Ok(written)
}

/// Fire-and-forget trigger for rank recomputation
///
/// Wraps an unbounded channel into a dedicated worker task. Callers
/// `trigger()` after a program mutation and move on; the worker coalesces
/// pending triggers, runs the recompute, and logs failures inside its own
/// error boundary.
#[derive(Clone)]
pub struct RankQueue {
    tx: mpsc::UnboundedSender<()>,
}

impl RankQueue {
    /// Spawn the worker task and return its trigger handle
    pub fn start(pool: SqlitePool) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // Coalesce triggers that queued up while a run was pending;
                // one recompute covers all of them.
                while rx.try_recv().is_ok() {}

                if let Err(e) = recompute_all_ranks(&pool).await {
                    error!("Rank recomputation failed: {}", e);
                }
            }
        });

        Self { tx }
    }

    /// Request a recomputation without waiting for it
    pub fn trigger(&self) {
        // Send only fails when the worker is gone, i.e. at shutdown
        let _ = self.tx.send(());
    }
}
