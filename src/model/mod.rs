//! Model module - player and media state
//!
//! This module contains the state holders the controllers read and write.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (states, play reasons, playlist items)
//! - `time`: Start time / duration values and their parsing
//! - `media_model`: Per-item playback state
//! - `events`: Typed notifications published by the player model
//! - `player_model`: Session-wide player state with change notifications

mod events;
mod media_model;
mod player_model;
mod time;
mod types;

// Re-export all public types for convenient access
pub use types::{MediaContainer, PlayReason, PlaybackState, PlaylistItem, Preload, Source};

pub use time::{TimeValue, parse_seconds, seconds_or_zero};

pub use media_model::{MediaAttributes, MediaModel, MediaModelHandle};

pub use events::PlayerEvent;

pub use player_model::{PlayerAttributes, PlayerModel};
