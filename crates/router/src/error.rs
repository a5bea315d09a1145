//! Typed errors at the router's configuration boundary. Per-packet
//! processing never returns `Result` (§7: "all errors are local"); this is
//! the narrow exception for config loading, a genuine fallible boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: malformed entry: {reason}")]
    Parse {
        path: String,
        line: usize,
        reason: String,
    },
}
