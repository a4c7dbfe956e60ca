//! Unit model, committee slots, and the grade threshold table

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::member::RoleKey;

/// Unit grade band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "F" => Some(Grade::F),
            _ => None,
        }
    }
}

/// Unit classification band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Excellent,
    Good,
    Average,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Excellent => "Excellent",
            Classification::Good => "Good",
            Classification::Average => "Average",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Excellent" => Some(Classification::Excellent),
            "Good" => Some(Classification::Good),
            "Average" => Some(Classification::Average),
            _ => None,
        }
    }
}

/// Grade/classification threshold table:
///
/// | score >= | grade | classification |
/// |----------|-------|----------------|
/// | 100      | A     | Excellent      |
/// | 75       | B     | Good           |
/// | 50       | C     | Average        |
/// | 25       | D     | Average        |
/// | (else)   | F     | Average        |
pub fn grade_for_score(score: i64) -> (Grade, Classification) {
    if score >= 100 {
        (Grade::A, Classification::Excellent)
    } else if score >= 75 {
        (Grade::B, Classification::Good)
    } else if score >= 50 {
        (Grade::C, Classification::Average)
    } else if score >= 25 {
        (Grade::D, Classification::Average)
    } else {
        (Grade::F, Classification::Average)
    }
}

/// Committee role slots for one track (msf or haritha)
///
/// Serialized as a JSON document into a TEXT column on the unit row.
/// A member reference appears in at most one slot at a time; the
/// assignment logic clears the prior slot before occupying a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Committee {
    pub president: Option<Uuid>,
    pub secretary: Option<Uuid>,
    pub treasurer: Option<Uuid>,
    #[serde(default)]
    pub vice_presidents: Vec<Uuid>,
    #[serde(default)]
    pub joint_secretaries: Vec<Uuid>,
}

impl Committee {
    /// Current holder of a singular slot (None for list slots)
    pub fn singular_holder(&self, role: RoleKey) -> Option<Uuid> {
        match role {
            RoleKey::President => self.president,
            RoleKey::Secretary => self.secretary,
            RoleKey::Treasurer => self.treasurer,
            RoleKey::VicePresident | RoleKey::JointSecretary => None,
        }
    }

    /// Clear `member` from `role` if it currently holds it
    pub fn clear_role(&mut self, role: RoleKey, member: Uuid) {
        match role {
            RoleKey::President => {
                if self.president == Some(member) {
                    self.president = None;
                }
            }
            RoleKey::Secretary => {
                if self.secretary == Some(member) {
                    self.secretary = None;
                }
            }
            RoleKey::Treasurer => {
                if self.treasurer == Some(member) {
                    self.treasurer = None;
                }
            }
            RoleKey::VicePresident => self.vice_presidents.retain(|m| *m != member),
            RoleKey::JointSecretary => self.joint_secretaries.retain(|m| *m != member),
        }
    }

    /// Occupy `role` with `member`
    ///
    /// Singular slots overwrite; list slots append only if absent.
    /// Conflict checking for occupied singular slots happens in the
    /// committee service, not here.
    pub fn assign(&mut self, role: RoleKey, member: Uuid) {
        match role {
            RoleKey::President => self.president = Some(member),
            RoleKey::Secretary => self.secretary = Some(member),
            RoleKey::Treasurer => self.treasurer = Some(member),
            RoleKey::VicePresident => {
                if !self.vice_presidents.contains(&member) {
                    self.vice_presidents.push(member);
                }
            }
            RoleKey::JointSecretary => {
                if !self.joint_secretaries.contains(&member) {
                    self.joint_secretaries.push(member);
                }
            }
        }
    }
}

/// Portal unit (organizational chapter)
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    /// Admin-issued default credential pair for reset-to-default flows
    pub default_username: Option<String>,
    pub default_password_hash: Option<String>,
    pub msf_committee: Committee,
    pub haritha_committee: Committee,
    /// Running total score; never negative (deductions clamp at zero)
    pub total_score: i64,
    /// 1-based position among all units; 0 = not yet ranked
    pub rank: i64,
    pub grade: Grade,
    pub classification: Classification,
}

impl Unit {
    pub fn new(name: String, username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            username,
            password_hash,
            default_username: None,
            default_password_hash: None,
            msf_committee: Committee::default(),
            haritha_committee: Committee::default(),
            total_score: 0,
            rank: 0,
            grade: Grade::F,
            classification: Classification::Average,
        }
    }

    pub fn committee(&self, scope: super::CommitteeScope) -> &Committee {
        match scope {
            super::CommitteeScope::Msf => &self.msf_committee,
            super::CommitteeScope::Haritha => &self.haritha_committee,
        }
    }

    pub fn committee_mut(&mut self, scope: super::CommitteeScope) -> &mut Committee {
        match scope {
            super::CommitteeScope::Msf => &mut self.msf_committee,
            super::CommitteeScope::Haritha => &mut self.haritha_committee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_table_boundaries() {
        assert_eq!(grade_for_score(24), (Grade::F, Classification::Average));
        assert_eq!(grade_for_score(25), (Grade::D, Classification::Average));
        assert_eq!(grade_for_score(49), (Grade::D, Classification::Average));
        assert_eq!(grade_for_score(50), (Grade::C, Classification::Average));
        assert_eq!(grade_for_score(74), (Grade::C, Classification::Average));
        assert_eq!(grade_for_score(75), (Grade::B, Classification::Good));
        assert_eq!(grade_for_score(99), (Grade::B, Classification::Good));
        assert_eq!(grade_for_score(100), (Grade::A, Classification::Excellent));
        assert_eq!(grade_for_score(0), (Grade::F, Classification::Average));
    }

    #[test]
    fn list_slot_assignment_is_idempotent() {
        let mut committee = Committee::default();
        let member = Uuid::new_v4();
        committee.assign(RoleKey::VicePresident, member);
        committee.assign(RoleKey::VicePresident, member);
        assert_eq!(committee.vice_presidents, vec![member]);
    }

    #[test]
    fn clear_role_only_clears_matching_member() {
        let mut committee = Committee::default();
        let holder = Uuid::new_v4();
        let other = Uuid::new_v4();
        committee.assign(RoleKey::President, holder);
        committee.clear_role(RoleKey::President, other);
        assert_eq!(committee.president, Some(holder));
        committee.clear_role(RoleKey::President, holder);
        assert_eq!(committee.president, None);
    }

    #[test]
    fn committee_json_round_trip() {
        let mut committee = Committee::default();
        committee.assign(RoleKey::Secretary, Uuid::new_v4());
        committee.assign(RoleKey::JointSecretary, Uuid::new_v4());
        let json = serde_json::to_string(&committee).unwrap();
        let back: Committee = serde_json::from_str(&json).unwrap();
        assert_eq!(back, committee);
    }
}
