//! Member model and committee role vocabulary
//!
//! Role kinds form a closed enumeration. The only place the collaborator's
//! free-form role titles ("Vice President", ...) are accepted is
//! [`RoleKey::from_title`]; everything downstream dispatches on the enum.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Member gender, which selects the applicable committee track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The committee scope this member participates in
    pub fn committee_scope(&self) -> CommitteeScope {
        match self {
            Gender::Male => CommitteeScope::Msf,
            Gender::Female => CommitteeScope::Haritha,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Committee track within a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitteeScope {
    Msf,
    Haritha,
}

impl CommitteeScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitteeScope::Msf => "msf",
            CommitteeScope::Haritha => "haritha",
        }
    }
}

/// Committee role slot kind
///
/// President, secretary and treasurer are singular slots (at most one
/// holder per unit); vice president and joint secretary are list slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKey {
    President,
    Secretary,
    Treasurer,
    VicePresident,
    JointSecretary,
}

impl RoleKey {
    /// Whether this role is a singular (zero-or-one holder) slot
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            RoleKey::President | RoleKey::Secretary | RoleKey::Treasurer
        )
    }

    /// Resolve a collaborator role title ("Vice President", ...) to a role kind.
    ///
    /// Matching lowercases and strips spaces, so "Vice President",
    /// "vice president" and "VicePresident" all resolve identically.
    pub fn from_title(title: &str) -> Option<Self> {
        let normalized: String = title
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "president" => Some(RoleKey::President),
            "secretary" => Some(RoleKey::Secretary),
            "treasurer" => Some(RoleKey::Treasurer),
            "vicepresident" => Some(RoleKey::VicePresident),
            "jointsecretary" => Some(RoleKey::JointSecretary),
            _ => None,
        }
    }

    /// Storage string for the member-side role record
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKey::President => "president",
            RoleKey::Secretary => "secretary",
            RoleKey::Treasurer => "treasurer",
            RoleKey::VicePresident => "vice_president",
            RoleKey::JointSecretary => "joint_secretary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "president" => Some(RoleKey::President),
            "secretary" => Some(RoleKey::Secretary),
            "treasurer" => Some(RoleKey::Treasurer),
            "vice_president" => Some(RoleKey::VicePresident),
            "joint_secretary" => Some(RoleKey::JointSecretary),
            _ => None,
        }
    }
}

/// Portal member
///
/// `role` is the member-side role record and is the source of truth for
/// the member's current committee assignment. `unit_id` is affiliation
/// only and is independent of holding a committee role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub unit_id: Option<Uuid>,
    pub role: Option<RoleKey>,
}

impl Member {
    pub fn new(name: String, gender: Gender, unit_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            gender,
            unit_id,
            role: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_titles_resolve_to_closed_enum() {
        assert_eq!(RoleKey::from_title("President"), Some(RoleKey::President));
        assert_eq!(RoleKey::from_title("Secretary"), Some(RoleKey::Secretary));
        assert_eq!(RoleKey::from_title("Treasurer"), Some(RoleKey::Treasurer));
        assert_eq!(
            RoleKey::from_title("Vice President"),
            Some(RoleKey::VicePresident)
        );
        assert_eq!(
            RoleKey::from_title("Joint Secretary"),
            Some(RoleKey::JointSecretary)
        );
        assert_eq!(RoleKey::from_title("Chairperson"), None);
    }

    #[test]
    fn singular_and_list_roles() {
        assert!(RoleKey::President.is_singular());
        assert!(RoleKey::Secretary.is_singular());
        assert!(RoleKey::Treasurer.is_singular());
        assert!(!RoleKey::VicePresident.is_singular());
        assert!(!RoleKey::JointSecretary.is_singular());
    }

    #[test]
    fn gender_selects_committee_scope() {
        assert_eq!(Gender::Male.committee_scope(), CommitteeScope::Msf);
        assert_eq!(Gender::Female.committee_scope(), CommitteeScope::Haritha);
    }

    #[test]
    fn role_storage_round_trip() {
        for role in [
            RoleKey::President,
            RoleKey::Secretary,
            RoleKey::Treasurer,
            RoleKey::VicePresident,
            RoleKey::JointSecretary,
        ] {
            assert_eq!(RoleKey::parse(role.as_str()), Some(role));
        }
    }
}
