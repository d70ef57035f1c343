//! Typed notifications published by the player model

use serde_json::Value;

use crate::error::PlayError;

use super::types::{PlayReason, PlaybackState, PlaylistItem};

/// Everything observers of a [`PlayerModel`](super::PlayerModel) can receive.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    /// The player-visible state changed.
    State {
        state: PlaybackState,
        previous: PlaybackState,
    },
    /// The active media model's state was set. `previous == state` marks a
    /// resynchronization rather than a transition.
    MediaState {
        state: PlaybackState,
        previous: PlaybackState,
    },
    /// A new item became active; its provider may not be ready yet.
    PlaylistItem { index: usize, item: PlaylistItem },
    /// The provider for the active item is initialized.
    ItemReady { item: PlaylistItem },
    ProviderChanged { name: Option<String> },
    PlayAttempt {
        item: PlaylistItem,
        play_reason: PlayReason,
    },
    PlayAttemptFailed {
        error: PlayError,
        item: PlaylistItem,
        play_reason: PlayReason,
    },
    Time { position: f64, duration: f64 },
    Meta { duration: f64 },
    BufferChange { percent: f64 },
    VisualQuality(Value),
    Complete,
    Error { message: String },
}
