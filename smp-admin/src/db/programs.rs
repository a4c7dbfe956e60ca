//! Program database operations (unit-owned sub-records)

use chrono::NaiveDate;
use smp_common::{Error, Result};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::models::{PhotoRef, Program};

fn program_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Program> {
    let id_str: String = row.get("id");
    let unit_id_str: String = row.get("unit_id");
    let date_str: String = row.get("date");
    let photos_json: String = row.get("photos");
    let created_by_str: Option<String> = row.get("created_by");

    Ok(Program {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid program id: {}", e)))?,
        unit_id: Uuid::parse_str(&unit_id_str)
            .map_err(|e| Error::Internal(format!("Invalid unit id: {}", e)))?,
        name: row.get("name"),
        description: row.get("description"),
        date: date_str
            .parse::<NaiveDate>()
            .map_err(|e| Error::Internal(format!("Invalid program date: {}", e)))?,
        photos: serde_json::from_str::<Vec<PhotoRef>>(&photos_json)
            .map_err(|e| Error::Internal(format!("Invalid photos JSON: {}", e)))?,
        created_by: created_by_str
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| Error::Internal(format!("Invalid creator id: {}", e)))?,
    })
}

/// Insert a new program row
pub async fn insert_program(conn: &mut SqliteConnection, program: &Program) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO programs (id, unit_id, name, description, date, photos, created_by,
                              created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(program.id.to_string())
    .bind(program.unit_id.to_string())
    .bind(&program.name)
    .bind(&program.description)
    .bind(program.date.to_string())
    .bind(serde_json::to_string(&program.photos).map_err(|e| Error::Internal(e.to_string()))?)
    .bind(program.created_by.map(|id| id.to_string()))
    .execute(conn)
    .await?;

    Ok(())
}

/// Load a program owned by the given unit
pub async fn load_program(
    conn: &mut SqliteConnection,
    unit_id: Uuid,
    program_id: Uuid,
) -> Result<Option<Program>> {
    let row = sqlx::query(
        r#"
        SELECT id, unit_id, name, description, date, photos, created_by
        FROM programs
        WHERE id = ? AND unit_id = ?
        "#,
    )
    .bind(program_id.to_string())
    .bind(unit_id.to_string())
    .fetch_optional(conn)
    .await?;

    match row {
        Some(row) => Ok(Some(program_from_row(&row)?)),
        None => Ok(None),
    }
}

/// List a unit's programs, newest date first
pub async fn list_programs(conn: &mut SqliteConnection, unit_id: Uuid) -> Result<Vec<Program>> {
    let rows = sqlx::query(
        r#"
        SELECT id, unit_id, name, description, date, photos, created_by
        FROM programs
        WHERE unit_id = ?
        ORDER BY date DESC, id ASC
        "#,
    )
    .bind(unit_id.to_string())
    .fetch_all(conn)
    .await?;

    rows.iter().map(program_from_row).collect()
}

/// Update a program row in place
pub async fn update_program(conn: &mut SqliteConnection, program: &Program) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE programs
        SET name = ?, description = ?, date = ?, photos = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND unit_id = ?
        "#,
    )
    .bind(&program.name)
    .bind(&program.description)
    .bind(program.date.to_string())
    .bind(serde_json::to_string(&program.photos).map_err(|e| Error::Internal(e.to_string()))?)
    .bind(program.id.to_string())
    .bind(program.unit_id.to_string())
    .execute(conn)
    .await?;

    Ok(())
}

/// Remove a program row
pub async fn delete_program(conn: &mut SqliteConnection, program_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM programs WHERE id = ?")
        .bind(program_id.to_string())
        .execute(conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_program_round_trip_and_ownership() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        crate::db::init_tables(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let unit = Unit::new("Gamma".to_string(), "gamma".to_string(), "h".to_string());
        crate::db::units::insert_unit(&mut conn, &unit).await.unwrap();

        let photos = vec![PhotoRef {
            key: "gamma/abc.jpg".to_string(),
            url: "/photos/gamma/abc.jpg".to_string(),
        }];
        let program = Program::new(
            unit.id,
            "Cleanup Drive".to_string(),
            "Beach cleanup".to_string(),
            "2026-01-15".parse::<NaiveDate>().unwrap(),
            photos.clone(),
            None,
        );
        insert_program(&mut conn, &program).await.unwrap();

        let loaded = load_program(&mut conn, unit.id, program.id)
            .await
            .unwrap()
            .expect("program not found");
        assert_eq!(loaded.name, "Cleanup Drive");
        assert_eq!(loaded.photos, photos);
        assert_eq!(loaded.date, "2026-01-15".parse::<NaiveDate>().unwrap());

        // Ownership check: a different unit id does not resolve the program
        let other_unit = Uuid::new_v4();
        assert!(load_program(&mut conn, other_unit, program.id)
            .await
            .unwrap()
            .is_none());
    }
}
