//! Controller module - playback orchestration
//!
//! The program controller picks a provider for each active item, replaces it
//! when a new source needs a different engine, and hands playback requests to
//! the media controller bound to that provider. It is organized into
//! submodules by responsibility:
//!
//! - `media`: `MediaController`, one provider plus its media model
//! - `item`: active item changes and provider resolution
//! - `playback`: play / stop / preload requests
//! - `video_events`: provider event listener

mod item;
mod media;
mod playback;
mod video_events;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cancelable::Cancelable;
use crate::error::ProgramError;
use crate::model::PlayerModel;
use crate::provider::{MediaElementFactory, ProviderRegistry};
use crate::task::{SharedTask, settled};

pub use media::MediaController;

/// Settles with the media controller ready for the item, or `None` when the
/// resolution was superseded by a later item change.
pub type ProviderTask = SharedTask<Option<Arc<MediaController>>, ProgramError>;

pub(crate) struct ProgramState {
    media_controller: Option<Arc<MediaController>>,
    /// Latest provider resolution; play requests issued before it settles
    /// chain onto it.
    provider_task: ProviderTask,
    /// Guards play requests chained onto `provider_task`.
    then_play: Cancelable,
    /// Last chained play request; the next one waits for it so requests
    /// reach the provider in issuance order.
    pending_play: SharedTask<(), ProgramError>,
}

#[derive(Clone)]
pub struct ProgramController {
    pub(crate) model: PlayerModel,
    pub(crate) registry: Arc<dyn ProviderRegistry>,
    media_elements: MediaElementFactory,
    state: Arc<Mutex<ProgramState>>,
}

impl ProgramController {
    pub fn new(
        model: PlayerModel,
        registry: Arc<dyn ProviderRegistry>,
        media_elements: MediaElementFactory,
    ) -> Self {
        Self {
            model,
            registry,
            media_elements,
            state: Arc::new(Mutex::new(ProgramState {
                media_controller: None,
                provider_task: settled(Ok(None)),
                then_play: Cancelable::new(),
                pending_play: settled(Ok(())),
            })),
        }
    }

    pub fn model(&self) -> &PlayerModel {
        &self.model
    }

    pub fn media_controller(&self) -> Option<Arc<MediaController>> {
        self.lock_state().media_controller.clone()
    }

    /// The latest provider resolution.
    pub fn provider_task(&self) -> ProviderTask {
        self.lock_state().provider_task.clone()
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, ProgramState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swaps in a fresh media element, carrying volume and mute over, and
    /// loads it so a pending user-gesture unlock survives.
    pub(crate) fn replace_media_element(&self) {
        let next = (self.media_elements)();
        if let Some(last) = self.model.media_element() {
            next.set_volume(last.volume());
            next.set_muted(last.muted());
        }
        next.load();
        self.model.set_media_element(next);
    }
}

/// Tears down the media controller's provider, if any, and clears the model's
/// provider reference.
pub(crate) fn reset_provider(media_controller: Option<&MediaController>, model: &PlayerModel) {
    if let Some(media_controller) = media_controller {
        media_controller.destroy();
    }
    model.reset_provider();
}
