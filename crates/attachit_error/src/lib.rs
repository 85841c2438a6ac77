//! Error types for the AttachIt library.
//!
//! This crate provides the foundation error types used throughout the AttachIt workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use attachit_error::{AttachItResult, StorageError, StorageErrorKind};
//!
//! fn fetch_blob() -> AttachItResult<Vec<u8>> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("42_avatar_thumb".to_string())))?
//! }
//!
//! match fetch_blob() {
//!     Ok(data) => println!("Got {} bytes", data.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod storage;
mod transform;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{AttachItError, AttachItErrorKind, AttachItResult};
pub use storage::{StorageError, StorageErrorKind};
pub use transform::{TransformError, TransformErrorKind};
