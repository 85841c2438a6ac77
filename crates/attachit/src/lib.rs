//! AttachIt - image attachment storage
//!
//! AttachIt persists an uploaded image together with a set of derived
//! renditions ("styles") into a pluggable content store, purges them, and
//! reads them back. Every blob is addressed by a deterministic key:
//! `{object_id}_{name}_{style}`.
//!
//! # Features
//!
//! - **Failure isolation**: A broken style never stops the rest of a flush
//! - **Idempotent purges**: Deleting an absent key is not an error
//! - **Pluggable backends**: In-memory and sharded filesystem stores
//! - **Geometry styles**: ImageMagick-style `WxH` geometry strings
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use attachit::{AttachItConfig, AttachmentDescriptor, Attachment};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AttachItConfig::load()?;
//!     let adapter = config.adapter()?;
//!
//!     let mut avatar = AttachmentDescriptor::builder()
//!         .object_id("42")
//!         .name("avatar")
//!         .assigned_file("me.jpg")
//!         .styles(config.styles()?.iter().map(|s| (s.name().clone(), *s.params())))
//!         .build()?;
//!
//!     let report = adapter.flush_write(&mut avatar).await;
//!     println!("stored {} blobs, errors: {:?}", report.written().len(), avatar.errors());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;

pub use config::{
    AttachItConfig, Backend, ConfiguredAdapter, StorageConfig, StyleConfig, TransformConfig,
};

// Re-export the workspace crates
pub use attachit_core::*;
pub use attachit_error::*;
pub use attachit_storage::{
    BlobReference, ContentStore, DeleteFailure, DeleteReport, FileSystemStore, FlushReport,
    MemoryStore, StorageAdapter, StyleFailure,
};
pub use attachit_transform::*;
