//! # glasscloud-service
//!
//! Business logic for GlassCloud. Services sit between the HTTP handlers
//! and the repositories: every operation takes a [`context::RequestContext`]
//! (or an optional viewer id, for public share access) and enforces
//! ownership and privacy before touching rows or blobs.

pub mod account;
pub mod context;
pub mod download;
pub mod item;
pub mod share;
mod tree;

pub use account::AccountService;
pub use context::RequestContext;
pub use download::{Download, DownloadBody, DownloadService};
pub use item::{ItemService, NewUpload};
pub use share::{ResolvedShare, ShareService};
