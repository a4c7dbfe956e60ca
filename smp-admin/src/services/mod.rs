//! Domain services for the membership portal
//!
//! - `score_ledger`: point rules and the clamped running total
//! - `rank_job`: full rank/grade recomputation, fed by a fire-and-forget queue
//! - `committee`: committee slot assignment with the member record as source of truth
//! - `program_store`: program add/edit/delete orchestration
//! - `storage`: photo object-storage seam

pub mod committee;
pub mod program_store;
pub mod rank_job;
pub mod score_ledger;
pub mod storage;
