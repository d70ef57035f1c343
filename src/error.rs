//! Error types surfaced by the playback core

use thiserror::Error;

/// Failures reported by [`ProgramController`](crate::controller::ProgramController)
/// while switching items or resolving a provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// The requested item has no playable source. Raised synchronously; an
    /// empty playlist being cleared ends up here on purpose.
    #[error("No media")]
    NoMedia,
    /// Provider loading finished but nothing registered can play the source.
    #[error("No providers for playlist")]
    NoProvidersForPlaylist,
    /// The registry failed while fetching provider constructors.
    #[error("Failed to load providers: {0}")]
    ProviderLoad(String),
}

/// A play request rejected by the media runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// Blocked by the autoplay policy (no user gesture).
    #[error("play() was not allowed: {0}")]
    NotAllowed(String),
    /// Interrupted by a later load or pause on the same surface.
    #[error("play() was aborted: {0}")]
    Aborted(String),
    #[error("provider error: {0}")]
    Provider(String),
}

/// Error returned by a [`ProviderLoader`](crate::provider::ProviderLoader).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not load provider '{kind}': {reason}")]
pub struct ProviderLoadError {
    pub kind: String,
    pub reason: String,
}

impl ProviderLoadError {
    pub fn new(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

impl From<ProviderLoadError> for ProgramError {
    fn from(error: ProviderLoadError) -> Self {
        ProgramError::ProviderLoad(error.to_string())
    }
}
