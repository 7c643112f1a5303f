use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A color string that is neither `#RRGGBB`, `#RRGGBBAA` nor `transparent`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}, expected #RRGGBB, #RRGGBBAA or \"transparent\"")]
pub struct ColorError(pub String);

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid theme: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum NavigateError {
    #[error("refusing to navigate to an empty url")]
    EmptyUrl,
    #[error("failed to launch opener for {url}: {source}")]
    Launch {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Other(String),
}
