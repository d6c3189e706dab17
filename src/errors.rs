//! Errors that can happen when using `bevy_dialogue_window`.

use thiserror::Error;

/// Errors when showing a dialogue or starting a reveal.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DialogueError {
    /// The reveal rate is zero, negative, not finite, or so small that a
    /// single character would take longer than a [`Duration`](std::time::Duration) can hold.
    #[error("reveal rate must be a positive number of characters per second, got {0}")]
    InvalidRevealRate(f32),
}

/// Errors when loading a string table from a `strings.ron` file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RonLoaderError {
    /// An [IO Error](std::io::Error)
    #[error("Could not read the file: {0}")]
    Io(#[from] std::io::Error),
    /// A [RON Error](serde_ron::error::SpannedError)
    #[error("Could not parse RON: {0}")]
    RonError(#[from] serde_ron::error::SpannedError),
}
