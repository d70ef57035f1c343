//! Playback providers and the registry that selects them
//!
//! A [`Provider`] is one playback engine bound to a media surface: the native
//! media element, an adaptive-streaming engine, or a plugin bridge. The
//! controllers only ever see the trait; concrete engines live with the
//! embedder and are handed over through [`ProviderFactory`] constructors.
//!
//! - `kind`: provider families and their static source support checks
//! - `media_element`: the media surface contract
//! - `registry`: provider selection and lazy loading

mod kind;
mod media_element;
mod registry;

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::PlayerConfig;
use crate::error::PlayError;
use crate::model::{MediaContainer, PlaybackState, PlaylistItem, Source};

pub use kind::ProviderKind;
pub use media_element::{MediaElement, MediaElementFactory};
pub use registry::{ProviderController, ProviderLoader, ProviderRegistry};

/// Completion of a provider `load` or `play` call.
pub type PlayFuture = BoxFuture<'static, Result<(), PlayError>>;

/// Where a provider publishes its events once subscribed.
pub type ProviderEventSender = mpsc::UnboundedSender<ProviderEvent>;

/// Events a provider emits about its media surface
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderEvent {
    State(PlaybackState),
    Time { position: f64, duration: f64 },
    Meta { duration: f64 },
    BufferChange { percent: f64 },
    VisualQuality(Value),
    Complete,
    Error { message: String },
}

/// One playback engine bound to a media surface.
///
/// `load` and `play` return `None` when they complete synchronously.
pub trait Provider: Send + Sync {
    /// Name shared by every provider built from the same constructor.
    fn name(&self) -> &str;

    /// Prepares for `item` without loading it.
    fn init(&self, item: &PlaylistItem);

    fn load(&self, item: &PlaylistItem) -> Option<PlayFuture>;

    fn play(&self) -> Option<PlayFuture>;

    fn stop(&self);

    fn preload(&self, item: &PlaylistItem);

    fn set_container(&self, container: MediaContainer);

    fn container(&self) -> Option<MediaContainer>;

    /// Detaches the provider's output from its container.
    fn remove(&self);

    /// Subscribes `events` to everything the provider emits.
    fn on_all(&self, events: ProviderEventSender);

    /// Drops every event subscription.
    fn off_all(&self);

    fn set_instream_mode(&self, _enabled: bool) {}

    /// The media surface backing this provider, if it exposes one.
    fn media_element(&self) -> Option<Arc<dyn MediaElement>> {
        None
    }

    fn supports_playback_rate(&self) -> bool {
        false
    }

    fn set_playback_rate(&self, _rate: f64) {}

    fn set_volume(&self, _volume: u8) {}

    fn set_mute(&self, _mute: bool) {}
}

/// Builds providers of one kind.
pub trait ProviderFactory: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Name of the providers this factory builds.
    fn name(&self) -> &str {
        self.kind().name()
    }

    /// Whether built providers can play `source`. Defaults to the kind's
    /// static support check.
    fn supports(&self, source: &Source, config: &PlayerConfig) -> bool {
        self.kind().supports(source, config)
    }

    fn create(&self, player_id: &str, config: &PlayerConfig) -> Arc<dyn Provider>;
}

/// A loaded provider class, ready to construct providers.
pub type ProviderConstructor = Arc<dyn ProviderFactory>;
