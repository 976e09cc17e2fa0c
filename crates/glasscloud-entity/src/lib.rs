//! # glasscloud-entity
//!
//! Database entity models for GlassCloud: users, bearer tokens, and the
//! polymorphic file/folder item tree.

pub mod item;
pub mod token;
pub mod user;

pub use item::{CreateItem, Item, ItemKind};
pub use token::AuthToken;
pub use user::{CreateUser, User};
