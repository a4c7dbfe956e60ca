//! Unit database operations

use smp_common::{Error, Result};
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::{Classification, Committee, Grade, Unit};

fn unit_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Unit> {
    let id_str: String = row.get("id");
    let msf_json: String = row.get("msf_committee");
    let haritha_json: String = row.get("haritha_committee");
    let grade_str: String = row.get("grade");
    let classification_str: String = row.get("classification");
    let default_username: Option<String> = row.get("default_username");
    let default_password_hash: Option<String> = row.get("default_password_hash");

    Ok(Unit {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid unit id: {}", e)))?,
        name: row.get("name"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        default_username,
        default_password_hash,
        msf_committee: serde_json::from_str::<Committee>(&msf_json)
            .map_err(|e| Error::Internal(format!("Invalid msf committee JSON: {}", e)))?,
        haritha_committee: serde_json::from_str::<Committee>(&haritha_json)
            .map_err(|e| Error::Internal(format!("Invalid haritha committee JSON: {}", e)))?,
        total_score: row.get("total_score"),
        rank: row.get("rank"),
        grade: Grade::parse(&grade_str)
            .ok_or_else(|| Error::Internal(format!("Invalid grade: {}", grade_str)))?,
        classification: Classification::parse(&classification_str).ok_or_else(|| {
            Error::Internal(format!("Invalid classification: {}", classification_str))
        })?,
    })
}

const UNIT_COLUMNS: &str = "id, name, username, password_hash, default_username, \
     default_password_hash, msf_committee, haritha_committee, total_score, rank, \
     grade, classification";

/// Insert a new unit
pub async fn insert_unit(conn: &mut SqliteConnection, unit: &Unit) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO units (
            id, name, username, password_hash, default_username, default_password_hash,
            msf_committee, haritha_committee, total_score, rank, grade, classification,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(unit.id.to_string())
    .bind(&unit.name)
    .bind(&unit.username)
    .bind(&unit.password_hash)
    .bind(&unit.default_username)
    .bind(&unit.default_password_hash)
    .bind(serde_json::to_string(&unit.msf_committee).map_err(|e| Error::Internal(e.to_string()))?)
    .bind(
        serde_json::to_string(&unit.haritha_committee)
            .map_err(|e| Error::Internal(e.to_string()))?,
    )
    .bind(unit.total_score)
    .bind(unit.rank)
    .bind(unit.grade.as_str())
    .bind(unit.classification.as_str())
    .execute(conn)
    .await?;

    Ok(())
}

/// Load unit by id
pub async fn load_unit(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Unit>> {
    let row = sqlx::query(&format!("SELECT {} FROM units WHERE id = ?", UNIT_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(conn)
        .await?;

    match row {
        Some(row) => Ok(Some(unit_from_row(&row)?)),
        None => Ok(None),
    }
}

/// Check whether a unit name or username is already taken
pub async fn name_or_username_taken(
    conn: &mut SqliteConnection,
    name: &str,
    username: &str,
) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM units WHERE name = ? OR username = ?")
            .bind(name)
            .bind(username)
            .fetch_one(conn)
            .await?;
    Ok(count > 0)
}

/// List all units in scoreboard order (score descending, id as tie-break)
pub async fn list_units(pool: &SqlitePool) -> Result<Vec<Unit>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM units ORDER BY total_score DESC, id ASC",
        UNIT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(unit_from_row).collect()
}

/// Persist both committee documents for a unit
pub async fn update_committees(conn: &mut SqliteConnection, unit: &Unit) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE units
        SET msf_committee = ?, haritha_committee = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(serde_json::to_string(&unit.msf_committee).map_err(|e| Error::Internal(e.to_string()))?)
    .bind(
        serde_json::to_string(&unit.haritha_committee)
            .map_err(|e| Error::Internal(e.to_string()))?,
    )
    .bind(unit.id.to_string())
    .execute(conn)
    .await?;

    Ok(())
}

/// Replace a unit's login credentials
pub async fn update_credentials(
    conn: &mut SqliteConnection,
    unit_id: Uuid,
    username: &str,
    password_hash: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE units
        SET username = ?, password_hash = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(unit_id.to_string())
    .execute(conn)
    .await?;

    Ok(())
}

/// Read the current total score for a unit
pub async fn load_total_score(conn: &mut SqliteConnection, unit_id: Uuid) -> Result<Option<i64>> {
    let score = sqlx::query_scalar("SELECT total_score FROM units WHERE id = ?")
        .bind(unit_id.to_string())
        .fetch_optional(conn)
        .await?;
    Ok(score)
}

/// Write a unit's total score
pub async fn update_total_score(
    conn: &mut SqliteConnection,
    unit_id: Uuid,
    total_score: i64,
) -> Result<()> {
    sqlx::query(
        "UPDATE units SET total_score = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(total_score)
    .bind(unit_id.to_string())
    .execute(conn)
    .await?;

    Ok(())
}
