//! # glasscloud-auth
//!
//! Authentication primitives: Argon2id password hashing and the opaque
//! bearer-token lifecycle (mint, resolve, revoke, prune).

pub mod password;
pub mod token;

pub use password::PasswordHasher;
pub use token::{TokenManager, random_hex};
