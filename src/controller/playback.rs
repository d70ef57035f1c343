//! Playback control methods

use crate::cancelable::Cancelable;
use crate::error::ProgramError;
use crate::model::{PlayReason, PlaybackState, PlayerEvent, Preload};
use crate::task::{SharedTask, settled, spawn_shared};

use super::{MediaController, ProgramController, reset_provider};

impl ProgramController {
    /// Plays the active item.
    ///
    /// Returns `None` when there is no active item. A request made before the
    /// provider is ready waits for the resolution and is dropped if the item
    /// changes or playback is stopped meanwhile. The returned task settles
    /// once the request reached the provider; runtime rejections are reported
    /// as `PlayAttemptFailed` events, never through this task. It fails only
    /// when provider resolution failed.
    pub fn play_video(&self, play_reason: Option<PlayReason>) -> Option<SharedTask<(), ProgramError>> {
        let Some(item) = self.model.playlist_item() else {
            tracing::debug!("Play requested without an active item");
            return None;
        };
        let play_reason = play_reason.unwrap_or_else(|| self.model.play_reason());

        let mut state = self.lock_state();
        let ready = state
            .media_controller
            .clone()
            .filter(|media_controller| self.is_set_up_for_active_item(media_controller));
        if let Some(media_controller) = ready {
            drop(state);
            tracing::debug!(item = item.label(), ?play_reason, "Playing loaded item");
            // Spawned; settles without being awaited
            let _ = media_controller.play_video(&item, play_reason);
            return Some(settled(Ok(())));
        }

        let previous = state.pending_play.clone();
        let provider_task = state.provider_task.clone();
        let then_play = state.then_play.clone();
        let model = self.model.clone();
        let play = spawn_shared(async move {
            // Its outcome was reported to its own caller
            let _ = previous.await;
            match provider_task.await {
                Ok(Some(media_controller)) => {
                    let issued = then_play.run(|| media_controller.play_video(&item, play_reason));
                    if issued.is_none() {
                        tracing::debug!(item = item.label(), "Chained play request was cancelled");
                    }
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(error) => {
                    model.emit(PlayerEvent::Error {
                        message: format!("Could not play video: {error}"),
                    });
                    Err(error)
                }
            }
        });
        state.pending_play = play.clone();
        Some(play)
    }

    /// Stops playback and restores the playlist's current item.
    pub fn stop_video(&self) {
        let media_controller = {
            let mut state = self.lock_state();
            state.then_play.cancel();
            state.then_play = Cancelable::new();
            state.media_controller.clone()
        };

        self.model.restore_playlist_item();
        if let Some(media_controller) = media_controller {
            media_controller.stop_video();
        }
    }

    /// Preloads the active item when the player is idle, autostart is off,
    /// the item allows it and nothing was loaded or preloaded yet.
    pub fn preload_video(&self) {
        let Some(media_controller) = self.media_controller() else {
            return;
        };
        let Some(item) = self.model.playlist_item() else {
            return;
        };

        let allowed = self.is_active_media_controller(&media_controller)
            && self.model.state() == PlaybackState::Idle
            && item.preload != Some(Preload::None)
            && !self.model.autostart()
            && !media_controller.setup()
            && !media_controller.preloaded();
        if !allowed {
            tracing::trace!(item = item.label(), "Skipping preload");
            return;
        }

        media_controller.preload_video(&item);
    }

    /// Whether `media_controller` was initialized for the active item.
    fn is_active_media_controller(&self, media_controller: &MediaController) -> bool {
        media_controller
            .media_model()
            .is_some_and(|media_model| self.model.is_active_media_model(&media_model))
    }

    fn is_set_up_for_active_item(&self, media_controller: &MediaController) -> bool {
        self.is_active_media_controller(media_controller) && media_controller.setup()
    }

    /// Releases the active provider and drops every pending continuation.
    pub fn destroy(&self) {
        let media_controller = {
            let mut state = self.lock_state();
            state.then_play.cancel();
            state.media_controller.take()
        };

        self.model.off_media_container();
        reset_provider(media_controller.as_deref(), &self.model);
    }
}
