//! Domain models for the membership portal

pub mod member;
pub mod program;
pub mod unit;

pub use member::{CommitteeScope, Gender, Member, RoleKey};
pub use program::{PhotoRef, Program};
pub use unit::{grade_for_score, Classification, Committee, Grade, Unit};
