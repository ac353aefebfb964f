//! Disk side of a probe: spool the body to a temp file inside the output
//! root, inspect it there, then either drop it (temp file removed) or
//! atomically rename it into `{root}/{host}/{path}`.

mod spool;

pub use spool::{Spool, Spooled};

/// Temp file name prefix; hidden so half-written spools never look like hits.
pub const TEMP_PREFIX: &str = ".fileprobe-";

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";
