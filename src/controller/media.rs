//! Media controller: one provider and the media model of one active item

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cancelable::Cancelable;
use crate::error::PlayError;
use crate::model::{
    MediaModel, MediaModelHandle, PlayReason, PlaybackState, PlayerEvent, PlayerModel, PlaylistItem,
    seconds_or_zero,
};
use crate::provider::{PlayFuture, Provider};
use crate::task::{SharedTask, settled, spawn_shared};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wraps the provider calls for the active item and tracks whether the item
/// was loaded, preloaded and started.
pub struct MediaController {
    provider: Mutex<Option<Arc<dyn Provider>>>,
    model: PlayerModel,
    media_model: Mutex<Option<MediaModelHandle>>,
    /// Guards the `play()` chained onto a pending provider `load()`.
    then_play: Cancelable,
    /// Subscription of the provider's events to the player model.
    events: Cancelable,
}

impl MediaController {
    pub fn new(provider: Arc<dyn Provider>, model: PlayerModel, events: Cancelable) -> Self {
        Self {
            provider: Mutex::new(Some(provider)),
            model,
            media_model: Mutex::new(None),
            then_play: Cancelable::new(),
            events,
        }
    }

    pub fn provider(&self) -> Option<Arc<dyn Provider>> {
        lock(&self.provider).clone()
    }

    pub fn media_model(&self) -> Option<MediaModelHandle> {
        lock(&self.media_model).clone()
    }

    /// Starts a new item: fresh media model seeded from the item's start time
    /// and duration, then the provider's own `init`.
    pub fn init(&self, item: &PlaylistItem) -> MediaModelHandle {
        let media_model = MediaModel::new();
        media_model.src_reset();
        media_model.set_position(seconds_or_zero(item.starttime.as_ref()));
        media_model.set_duration(seconds_or_zero(item.duration.as_ref()));
        *lock(&self.media_model) = Some(media_model.clone());

        if let Some(provider) = self.provider() {
            tracing::debug!(provider = provider.name(), item = item.label(), "Initializing provider");
            provider.init(item);
        }
        media_model
    }

    /// Plays `item`, loading it first when this is the first request since
    /// `init`.
    ///
    /// The returned task fails when the runtime rejected the request. While
    /// the item has not started, the attempt is also reported on the player
    /// model, which is where callers should observe rejections.
    pub fn play_video(&self, item: &PlaylistItem, play_reason: PlayReason) -> SharedTask<(), PlayError> {
        let (Some(provider), Some(media_model)) = (self.provider(), self.media_model()) else {
            tracing::debug!(item = item.label(), "Play requested on a released media controller");
            return settled(Ok(()));
        };

        self.model.set_play_rejected(false);
        let first_attempt = !media_model.started();

        let play = if media_model.begin_setup() {
            self.load_and_play(item, &provider)
        } else {
            into_task(provider.play())
        };

        if first_attempt {
            track_play_attempt(&self.model, &provider, media_model, item.clone(), play_reason, play.clone());
        }
        play
    }

    pub fn stop_video(&self) {
        if let Some(provider) = self.provider() {
            provider.stop();
        }
    }

    /// Preloads `item` once. Never issued after `load`.
    pub fn preload_video(&self, item: &PlaylistItem) {
        let (Some(provider), Some(media_model)) = (self.provider(), self.media_model()) else {
            return;
        };
        if media_model.preloaded() || media_model.setup() {
            return;
        }

        tracing::debug!(provider = provider.name(), item = item.label(), "Preloading");
        provider.preload(item);
        media_model.set_preloaded(true);
    }

    /// Unsubscribes, detaches and releases the provider. Safe to call again.
    pub fn destroy(&self) {
        self.then_play.cancel();
        self.events.cancel();

        let Some(provider) = lock(&self.provider).take() else {
            return;
        };
        tracing::info!(provider = provider.name(), "Tearing down provider");
        provider.off_all();
        if provider.container().is_some() {
            provider.remove();
        }
        provider.set_instream_mode(false);
    }

    pub fn setup(&self) -> bool {
        self.media_model().is_some_and(|media_model| media_model.setup())
    }

    pub fn preloaded(&self) -> bool {
        self.media_model().is_some_and(|media_model| media_model.preloaded())
    }

    fn load_and_play(&self, item: &PlaylistItem, provider: &Arc<dyn Provider>) -> SharedTask<(), PlayError> {
        match provider.load(item) {
            // Engines that need async setup hand back a future; play once it settles
            Some(setup) => {
                let provider = provider.clone();
                let then_play = self.then_play.clone();
                spawn_shared(async move {
                    setup.await?;
                    match then_play.run(|| provider.play()) {
                        Some(Some(play)) => play.await,
                        _ => Ok(()),
                    }
                })
            }
            None => into_task(provider.play()),
        }
    }
}

fn into_task(play: Option<PlayFuture>) -> SharedTask<(), PlayError> {
    match play {
        Some(play) => spawn_shared(play),
        None => settled(Ok(())),
    }
}

/// Reports one play attempt on the player model and follows its settlement.
fn track_play_attempt(
    model: &PlayerModel,
    provider: &Arc<dyn Provider>,
    media_model: MediaModelHandle,
    item: PlaylistItem,
    play_reason: PlayReason,
    play: SharedTask<(), PlayError>,
) {
    model.emit(PlayerEvent::PlayAttempt {
        item: item.clone(),
        play_reason,
    });

    // Playback may already be running before the request settles
    let element = provider.media_element();
    if element.as_ref().is_some_and(|element| !element.paused()) {
        model.set_state(PlaybackState::Buffering);
    }

    let model = model.clone();
    tokio::spawn(async move {
        let result = play.await;
        crate::log_play_result!(item.label(), result);

        match result {
            Ok(()) => {
                if !model.is_active_media_model(&media_model) {
                    tracing::debug!(item = item.label(), "Ignoring play settlement for a replaced item");
                    return;
                }
                media_model.set_started(true);
                model.sync_player_with_media_model(&media_model);
            }
            // Rejections are reported even when the item was replaced meanwhile
            Err(error) => {
                model.set_play_rejected(true);
                if element.is_some_and(|element| element.paused()) {
                    model.set_media_state(&media_model, PlaybackState::Paused);
                }
                model.emit(PlayerEvent::PlayAttemptFailed {
                    error,
                    item,
                    play_reason,
                });
            }
        }
    });
}
