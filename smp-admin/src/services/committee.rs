//! Committee membership directory
//!
//! Keeps a unit's committee slots and the member-side role records
//! consistent. The member's own role record is the source of truth for
//! "what am I currently assigned to"; slot changes never scan the unit to
//! find a member's current role. Both sides of an assignment are written
//! inside one transaction.

use smp_common::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;
use crate::models::{CommitteeScope, Member, RoleKey};

/// Assign a member to a committee role slot
///
/// Singular slots (president/secretary/treasurer) reject assignment while
/// occupied by a different member; the occupant must be vacated first.
/// Re-assigning the current occupant is an idempotent success. List slots
/// append without duplicating. The member's previous slot in the scope is
/// cleared before the new one is occupied. The member must be affiliated
/// with the unit whose committee is being filled.
pub async fn assign_role(
    pool: &SqlitePool,
    unit_id: Uuid,
    scope: CommitteeScope,
    role: RoleKey,
    member_id: Uuid,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let member = db::members::load_member(&mut tx, member_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Member {} not found", member_id)))?;

    // Only a unit's own members may hold its committee slots. Without
    // this, deleting the member could not find the slot to vacate (the
    // vacate path goes through member.unit_id).
    if member.unit_id != Some(unit_id) {
        return Err(Error::InvalidInput(format!(
            "Member {} is not affiliated with unit {}",
            member_id, unit_id
        )));
    }

    if member.gender.committee_scope() != scope {
        return Err(Error::InvalidInput(format!(
            "Member {} does not belong to the {} committee track",
            member_id,
            scope.as_str()
        )));
    }

    let mut unit = db::units::load_unit(&mut tx, unit_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Unit {} not found", unit_id)))?;

    let committee = unit.committee_mut(scope);

    // Restricted-slot conflict rule: an occupied singular slot belongs to
    // its holder until explicitly vacated.
    if role.is_singular() {
        if let Some(holder) = committee.singular_holder(role) {
            if holder != member_id {
                return Err(Error::Conflict(format!(
                    "{} of the {} committee is already held by another member",
                    role.as_str(),
                    scope.as_str()
                )));
            }
        }
    }

    // Clear the slot named by the member's own role record, then occupy
    // the requested one.
    if let Some(previous) = member.role {
        committee.clear_role(previous, member_id);
    }
    committee.assign(role, member_id);

    db::units::update_committees(&mut tx, &unit).await?;
    db::members::update_role(&mut tx, member_id, Some(role)).await?;

    tx.commit().await?;
    Ok(())
}

/// Remove a member from whatever committee slot they currently hold
///
/// The slot is derived from the member's role record; the caller does not
/// name it. A member with no role record is a no-op success.
pub async fn remove_member(pool: &SqlitePool, unit_id: Uuid, member_id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await?;

    let member = db::members::load_member(&mut tx, member_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Member {} not found", member_id)))?;

    let Some(role) = member.role else {
        return Ok(());
    };

    let mut unit = db::units::load_unit(&mut tx, unit_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Unit {} not found", unit_id)))?;

    let scope = member.gender.committee_scope();
    unit.committee_mut(scope).clear_role(role, member_id);

    db::units::update_committees(&mut tx, &unit).await?;
    db::members::update_role(&mut tx, member_id, None).await?;

    tx.commit().await?;
    Ok(())
}

/// Delete a member, vacating any committee slot first
///
/// Run before the row delete so unit committee documents never hold
/// dangling references.
pub async fn delete_member(pool: &SqlitePool, member: &Member) -> Result<()> {
    if let Some(unit_id) = member.unit_id {
        remove_member(pool, unit_id, member.id).await?;
    }

    let mut tx = pool.begin().await?;
    db::members::delete_member(&mut tx, member.id).await?;
    tx.commit().await?;
    Ok(())
}
