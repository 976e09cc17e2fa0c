//! Per-entity repositories.
//!
//! Repositories own a cloned pool handle and expose async CRUD methods
//! returning `AppResult`. No business rules live here; ownership and
//! privacy checks belong to the service layer.

pub mod item;
pub mod token;
pub mod user;
