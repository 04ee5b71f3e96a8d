use std::path::PathBuf;

use thiserror::Error;

/// Reasons a `.desktop` descriptor is rejected.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("could not parse desktop entry: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("group [Desktop Entry] is missing")]
    MissingGroup,

    #[error("key '{0}' is missing")]
    MissingKey(&'static str),

    #[error("could not convert file_name of {} to String", .0.display())]
    InvalidFilename(PathBuf),
}
