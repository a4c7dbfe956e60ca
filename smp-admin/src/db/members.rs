//! Member database operations

use smp_common::{Error, Result};
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::{Gender, Member, RoleKey};

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Member> {
    let id_str: String = row.get("id");
    let gender_str: String = row.get("gender");
    let unit_id_str: Option<String> = row.get("unit_id");
    let role_str: Option<String> = row.get("role");

    let role = match role_str {
        Some(s) => Some(
            RoleKey::parse(&s).ok_or_else(|| Error::Internal(format!("Invalid role: {}", s)))?,
        ),
        None => None,
    };

    Ok(Member {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| Error::Internal(format!("Invalid member id: {}", e)))?,
        name: row.get("name"),
        gender: Gender::parse(&gender_str)
            .ok_or_else(|| Error::Internal(format!("Invalid gender: {}", gender_str)))?,
        unit_id: unit_id_str
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| Error::Internal(format!("Invalid unit id: {}", e)))?,
        role,
    })
}

/// Insert a new member
pub async fn insert_member(conn: &mut SqliteConnection, member: &Member) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO members (id, name, gender, unit_id, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(member.id.to_string())
    .bind(&member.name)
    .bind(member.gender.as_str())
    .bind(member.unit_id.map(|id| id.to_string()))
    .bind(member.role.map(|r| r.as_str()))
    .execute(conn)
    .await?;

    Ok(())
}

/// Load member by id
pub async fn load_member(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Member>> {
    let row = sqlx::query("SELECT id, name, gender, unit_id, role FROM members WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(conn)
        .await?;

    match row {
        Some(row) => Ok(Some(member_from_row(&row)?)),
        None => Ok(None),
    }
}

/// List all members, name order
pub async fn list_members(pool: &SqlitePool) -> Result<Vec<Member>> {
    let rows = sqlx::query("SELECT id, name, gender, unit_id, role FROM members ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(member_from_row).collect()
}

/// Replace the member-side role record
pub async fn update_role(
    conn: &mut SqliteConnection,
    member_id: Uuid,
    role: Option<RoleKey>,
) -> Result<()> {
    sqlx::query("UPDATE members SET role = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(role.map(|r| r.as_str()))
        .bind(member_id.to_string())
        .execute(conn)
        .await?;

    Ok(())
}

/// Delete a member row
pub async fn delete_member(conn: &mut SqliteConnection, member_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM members WHERE id = ?")
        .bind(member_id.to_string())
        .execute(conn)
        .await?;

    Ok(())
}
