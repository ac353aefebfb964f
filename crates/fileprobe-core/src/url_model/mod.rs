//! URL modeling: candidate resolution and output placement.
//!
//! Resolves candidates against a target's root and maps the final response
//! URL to a sanitized, host-scoped location under the output root.

mod path;
mod resolve;
mod sanitize;

pub use path::{output_path, INDEX_NAME};
pub use resolve::{resolve, InvalidPath};
pub use sanitize::{sanitize_segment, PLACEHOLDER};
