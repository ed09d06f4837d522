//! Directory trees: walking them, locating files relative to their root, and
//! fingerprinting file contents for change detection.

pub mod error;
mod fingerprint;
mod path;
mod walk;

pub use crate::fingerprint::{Fingerprint, fingerprint};
pub use crate::path::{is_within, resolve, to_slash, with_extension};
pub use crate::walk::{TreeEntry, Walk, Walker, walk};
