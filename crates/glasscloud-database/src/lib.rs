//! # glasscloud-database
//!
//! SQLite access layer for GlassCloud: pool management, embedded
//! migrations, and per-entity repositories.

pub mod connection;
pub mod migration;
pub mod repositories;
