//! HTTP API handlers for smp-admin

pub mod committee;
pub mod health;
pub mod members;
pub mod programs;
pub mod ranking;
pub mod units;

pub use committee::{assign_role, remove_member};
pub use health::health_routes;
pub use members::{create_member, delete_member, get_member, list_members};
pub use programs::{add_program, delete_program, edit_program, list_programs};
pub use ranking::get_ranking;
pub use units::{create_unit, get_unit, list_units, reset_credentials};
