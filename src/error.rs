use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop the whole run. Everything else is plain I/O and
/// goes through `anyhow` with file context attached.
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("no \"Data Documentation\" heading in {}", path.display())]
    HeadingNotFound { path: PathBuf },

    #[error("dataset \"{title}\" has no local markdown page")]
    UnknownDataset { title: String },

    #[error("{}: missing required field `{field}`", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{page}: table rows need {needed} anchors but only {available} are left")]
    AnchorsExhausted {
        page: String,
        needed: usize,
        available: usize,
    },
}
