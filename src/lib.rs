//! Playback orchestration core of an embeddable media player.
//!
//! A [`ProgramController`] picks a [`Provider`](provider::Provider) for each
//! active playlist item, replaces it when a source needs a different engine,
//! and forwards play / stop / preload requests to the [`MediaController`]
//! bound to it. State is shared through a [`PlayerModel`]; observers
//! subscribe to its [`PlayerEvent`] stream.
//!
//! Everything asynchronous runs on the ambient tokio runtime.

pub mod cancelable;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod provider;
pub mod task;

pub use config::{LoggingConfig, PlayerConfig};
pub use controller::{MediaController, ProgramController, ProviderTask};
pub use error::{PlayError, ProgramError, ProviderLoadError};
pub use model::{PlayReason, PlaybackState, PlayerEvent, PlayerModel, PlaylistItem, Source};
