//! # glasscloud-storage
//!
//! Blob persistence for GlassCloud: a flat on-disk blob directory behind
//! the [`blob::BlobStore`] trait, plus zip archiving for folder downloads.

pub mod archive;
pub mod blob;

pub use archive::ArchiveBuilder;
pub use blob::{BlobStore, ByteStream, LocalBlobStore, mime_for_name};
