//! Error types of the printer firmware.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the firmware error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Setting up, reading or driving a GPIO pin failed
    #[error("GPIO failure: {0}")]
    Gpio(String),

    /// The serial link to the printer could not be opened or configured
    #[error("Failed to open printer link: {0}")]
    Serial(#[from] rppal::uart::Error),

    /// Writing to the printer failed
    #[error("Printer write failed: {0}")]
    Printer(#[source] io::Error),

    /// A spooled image could not be loaded
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// Quote request failed on the network or HTTP level
    #[error("Quote request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Quote service answered with something unusable
    #[error("Unexpected quote payload: {0}")]
    Quote(String),

    /// Listing, creating or removing spool entries failed
    #[error("Filesystem operation on '{}' failed: {}", .path.display(), .source)]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Host shutdown could not be issued
    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}

impl From<rppal::gpio::Error> for Error {
    fn from(error: rppal::gpio::Error) -> Self {
        Self::Gpio(error.to_string())
    }
}

impl Error {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
