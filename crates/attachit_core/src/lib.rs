//! Core data types for AttachIt.
//!
//! An attachment is one uploaded original plus a set of named derivatives
//! ("styles"). Every stored blob is addressed by a [`StorageKey`] derived from
//! the owning record, the attachment name, and the style name:
//!
//! ```text
//! {object_id}_{name}_{style}      e.g. 42_avatar_thumb
//! {object_id}_{name}_original     the unprocessed upload
//! ```
//!
//! Storage backends and adapters live in `attachit_storage`; this crate only
//! defines the vocabulary they share.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attachment;
mod key;
mod styles;

pub use attachment::{Attachment, AttachmentDescriptor, AttachmentDescriptorBuilder, FilenameFn};
pub use key::{ORIGINAL_STYLE, StorageKey, derive_filename};
pub use styles::{Style, Styles};
