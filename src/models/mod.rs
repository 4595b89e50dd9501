//! Data models for the Recipe Box application.
//!
//! These models match the frontend objects for seamless interoperability.

mod planner;
mod recipe;
mod user;

pub use planner::*;
pub use recipe::*;
pub use user::*;
