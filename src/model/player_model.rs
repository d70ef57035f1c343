//! Session-wide player state with change notifications

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::config::PlayerConfig;
use crate::provider::{MediaElement, Provider, ProviderEvent};

use super::events::PlayerEvent;
use super::media_model::{MediaModel, MediaModelHandle};
use super::time::seconds_or_zero;
use super::types::{MediaContainer, PlayReason, PlaybackState, PlaylistItem};

const EVENT_CAPACITY: usize = 256;

/// Plain attributes of the player model
#[derive(Clone, Debug)]
pub struct PlayerAttributes {
    pub playlist: Vec<PlaylistItem>,
    /// Index of the active item within `playlist`.
    pub item: usize,
    pub playlist_item: Option<PlaylistItem>,
    /// Name of the active provider.
    pub provider: Option<String>,
    pub media_container: Option<MediaContainer>,
    pub state: PlaybackState,
    pub play_reason: PlayReason,
    pub play_rejected: bool,
    pub autostart: bool,
    pub default_playback_rate: f64,
    pub playback_rate: f64,
    pub volume: u8,
    pub mute: bool,
}

impl PlayerAttributes {
    fn from_config(config: &PlayerConfig) -> Self {
        Self {
            playlist: Vec::new(),
            item: 0,
            playlist_item: None,
            provider: None,
            media_container: None,
            state: PlaybackState::Idle,
            play_reason: PlayReason::default(),
            play_rejected: false,
            autostart: config.autostart,
            default_playback_rate: config.default_playback_rate,
            playback_rate: config.default_playback_rate,
            volume: config.volume.min(100),
            mute: config.mute,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle on the player state.
///
/// Cloning is cheap; every clone observes and mutates the same state.
#[derive(Clone)]
pub struct PlayerModel {
    config: Arc<PlayerConfig>,
    attributes: Arc<Mutex<PlayerAttributes>>,
    media_model: Arc<Mutex<Option<MediaModelHandle>>>,
    media_element: Arc<Mutex<Option<Arc<dyn MediaElement>>>>,
    container_listener: Arc<Mutex<Option<Arc<dyn Provider>>>>,
    events: broadcast::Sender<PlayerEvent>,
}

impl PlayerModel {
    pub fn new(config: PlayerConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            attributes: Arc::new(Mutex::new(PlayerAttributes::from_config(&config))),
            config: Arc::new(config),
            media_model: Arc::new(Mutex::new(None)),
            media_element: Arc::new(Mutex::new(None)),
            container_listener: Arc::new(Mutex::new(None)),
            events,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    pub fn emit(&self, event: PlayerEvent) {
        tracing::trace!(?event, "Player event");
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn snapshot(&self) -> PlayerAttributes {
        lock(&self.attributes).clone()
    }

    // ========================================================================
    // Playlist & active item
    // ========================================================================

    pub fn set_playlist(&self, playlist: Vec<PlaylistItem>) {
        let mut attributes = lock(&self.attributes);
        attributes.playlist = playlist;
        attributes.item = 0;
    }

    pub fn playlist(&self) -> Vec<PlaylistItem> {
        lock(&self.attributes).playlist.clone()
    }

    pub fn item_index(&self) -> usize {
        lock(&self.attributes).item
    }

    pub fn set_item_index(&self, index: usize) {
        lock(&self.attributes).item = index;
    }

    pub fn playlist_item(&self) -> Option<PlaylistItem> {
        lock(&self.attributes).playlist_item.clone()
    }

    /// Makes `item` the active item and installs a fresh media model for it.
    pub fn set_active_item(&self, item: Option<PlaylistItem>) -> MediaModelHandle {
        let index = {
            let mut attributes = lock(&self.attributes);
            if let Some(index) = item
                .as_ref()
                .and_then(|item| attributes.playlist.iter().position(|entry| entry == item))
            {
                attributes.item = index;
            }
            attributes.playlist_item = item.clone();
            attributes.item
        };

        let media_model = MediaModel::new();
        self.set_media_model(media_model.clone());

        if let Some(item) = item {
            self.emit(PlayerEvent::PlaylistItem { index, item });
        }
        media_model
    }

    /// Clears transient per-item state and seeds the active media model's
    /// position and duration from `item`.
    pub fn reset_item(&self, item: Option<&PlaylistItem>) {
        lock(&self.attributes).play_rejected = false;

        if let Some(media_model) = self.media_model() {
            media_model.set_position(seconds_or_zero(item.and_then(|i| i.starttime.as_ref())));
            media_model.set_duration(seconds_or_zero(item.and_then(|i| i.duration.as_ref())));
        }
    }

    /// Puts `playlist[item]` back as the active item and resets it.
    pub fn restore_playlist_item(&self) -> Option<PlaylistItem> {
        let item = {
            let mut attributes = lock(&self.attributes);
            let item = attributes.playlist.get(attributes.item).cloned();
            attributes.playlist_item = item.clone();
            item
        };
        self.reset_item(item.as_ref());
        item
    }

    // ========================================================================
    // Media model
    // ========================================================================

    pub fn media_model(&self) -> Option<MediaModelHandle> {
        lock(&self.media_model).clone()
    }

    pub fn set_media_model(&self, media_model: MediaModelHandle) {
        *lock(&self.media_model) = Some(media_model);
    }

    /// Identity check against the active media model.
    pub fn is_active_media_model(&self, media_model: &MediaModelHandle) -> bool {
        lock(&self.media_model)
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, media_model))
    }

    /// Sets the state of `media_model`; the player follows only when it is the
    /// active one.
    pub fn set_media_state(&self, media_model: &MediaModelHandle, state: PlaybackState) {
        let previous = media_model.replace_state(state);
        if previous == state || !self.is_active_media_model(media_model) {
            return;
        }
        self.emit(PlayerEvent::MediaState { state, previous });
        self.set_state(state);
    }

    /// Re-announces the media model's current state so observers resync even
    /// though nothing changed.
    pub fn sync_player_with_media_model(&self, media_model: &MediaModelHandle) {
        if !self.is_active_media_model(media_model) {
            return;
        }
        let state = media_model.state();
        self.emit(PlayerEvent::MediaState {
            state,
            previous: state,
        });
        self.set_state(state);
    }

    // ========================================================================
    // Player state & flags
    // ========================================================================

    pub fn state(&self) -> PlaybackState {
        lock(&self.attributes).state
    }

    pub fn set_state(&self, state: PlaybackState) {
        let previous = std::mem::replace(&mut lock(&self.attributes).state, state);
        if previous != state {
            tracing::debug!(%previous, %state, "Player state changed");
            self.emit(PlayerEvent::State { state, previous });
        }
    }

    pub fn play_rejected(&self) -> bool {
        lock(&self.attributes).play_rejected
    }

    pub fn set_play_rejected(&self, rejected: bool) {
        lock(&self.attributes).play_rejected = rejected;
    }

    pub fn play_reason(&self) -> PlayReason {
        lock(&self.attributes).play_reason
    }

    pub fn set_play_reason(&self, reason: PlayReason) {
        lock(&self.attributes).play_reason = reason;
    }

    pub fn autostart(&self) -> bool {
        lock(&self.attributes).autostart
    }

    pub fn set_autostart(&self, autostart: bool) {
        lock(&self.attributes).autostart = autostart;
    }

    pub fn volume(&self) -> u8 {
        lock(&self.attributes).volume
    }

    pub fn set_volume(&self, volume: u8) {
        lock(&self.attributes).volume = volume.min(100);
    }

    pub fn mute(&self) -> bool {
        lock(&self.attributes).mute
    }

    pub fn set_mute(&self, mute: bool) {
        lock(&self.attributes).mute = mute;
    }

    pub fn default_playback_rate(&self) -> f64 {
        lock(&self.attributes).default_playback_rate
    }

    pub fn playback_rate(&self) -> f64 {
        lock(&self.attributes).playback_rate
    }

    pub fn set_playback_rate(&self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            lock(&self.attributes).playback_rate = rate;
        }
    }

    // ========================================================================
    // Provider, container & media element
    // ========================================================================

    pub fn provider_name(&self) -> Option<String> {
        lock(&self.attributes).provider.clone()
    }

    pub fn set_provider(&self, name: &str) {
        let changed = {
            let mut attributes = lock(&self.attributes);
            let changed = attributes.provider.as_deref() != Some(name);
            attributes.provider = Some(name.to_string());
            changed
        };
        if changed {
            tracing::info!(provider = name, "Provider changed");
            self.emit(PlayerEvent::ProviderChanged {
                name: Some(name.to_string()),
            });
        }
    }

    pub fn reset_provider(&self) {
        if lock(&self.attributes).provider.take().is_some() {
            self.emit(PlayerEvent::ProviderChanged { name: None });
        }
    }

    pub fn media_container(&self) -> Option<MediaContainer> {
        lock(&self.attributes).media_container.clone()
    }

    /// Records the container and hands it to a provider waiting for one.
    pub fn set_media_container(&self, container: MediaContainer) {
        lock(&self.attributes).media_container = Some(container.clone());

        let waiting = lock(&self.container_listener).take();
        if let Some(provider) = waiting {
            tracing::debug!(provider = provider.name(), container = container.id(), "Attaching provider to late container");
            provider.set_container(container);
        }
    }

    /// Arms a one-shot attachment of `provider` to the next container set.
    pub fn once_media_container(&self, provider: Arc<dyn Provider>) {
        *lock(&self.container_listener) = Some(provider);
    }

    pub fn off_media_container(&self) {
        lock(&self.container_listener).take();
    }

    pub fn media_element(&self) -> Option<Arc<dyn MediaElement>> {
        lock(&self.media_element).clone()
    }

    /// Stores a new media element, returning the one it replaces.
    pub fn set_media_element(&self, element: Arc<dyn MediaElement>) -> Option<Arc<dyn MediaElement>> {
        lock(&self.media_element).replace(element)
    }

    // ========================================================================
    // Provider event routing
    // ========================================================================

    /// Applies one provider event to the active media model and republishes it.
    pub fn handle_video_event(&self, event: ProviderEvent) {
        let Some(media_model) = self.media_model() else {
            tracing::trace!(?event, "Video event without media model");
            return;
        };

        match event {
            ProviderEvent::State(state) => self.set_media_state(&media_model, state),
            ProviderEvent::Time { position, duration } => {
                media_model.set_position(position);
                media_model.set_duration(duration);
                self.emit(PlayerEvent::Time { position, duration });
            }
            ProviderEvent::Meta { duration } => {
                media_model.set_duration(duration);
                self.emit(PlayerEvent::Meta { duration });
            }
            ProviderEvent::BufferChange { percent } => {
                self.emit(PlayerEvent::BufferChange { percent });
            }
            ProviderEvent::VisualQuality(quality) => {
                media_model.set_visual_quality(Some(quality.clone()));
                self.emit(PlayerEvent::VisualQuality(quality));
            }
            ProviderEvent::Complete => {
                self.set_media_state(&media_model, PlaybackState::Complete);
                self.emit(PlayerEvent::Complete);
            }
            ProviderEvent::Error { message } => {
                tracing::warn!(%message, "Provider reported an error");
                self.set_media_state(&media_model, PlaybackState::Error);
                self.emit(PlayerEvent::Error { message });
            }
        }
    }
}
