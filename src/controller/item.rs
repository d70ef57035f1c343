//! Active item changes and provider resolution

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::sync::mpsc;

use crate::cancelable::Cancelable;
use crate::error::ProgramError;
use crate::model::{MediaModelHandle, PlaybackState, PlayerEvent, PlaylistItem, Source};
use crate::provider::{Provider, ProviderConstructor};
use crate::task::spawn_shared;

use super::{MediaController, ProgramController, ProviderTask, reset_provider};

impl ProgramController {
    /// Makes `item` the active item and resolves a provider for it.
    ///
    /// Fails immediately with [`ProgramError::NoMedia`] when the item has no
    /// source; clearing an empty playlist ends up here. Otherwise returns the
    /// resolution task, which fails when no provider can be found. A
    /// resolution overtaken by a later call settles with `None` and changes
    /// nothing.
    pub fn set_active_item(&self, item: Option<PlaylistItem>) -> Result<ProviderTask, ProgramError> {
        let mut state = self.lock_state();
        state.then_play.cancel();
        state.then_play = Cancelable::new();

        let active_media_model = self.model.set_active_item(item.clone());
        self.model.reset_item(item.as_ref());

        let Some((item, source)) = item.and_then(|item| {
            let source = item.source().cloned()?;
            Some((item, source))
        }) else {
            tracing::debug!("Active item has no media");
            return Err(ProgramError::NoMedia);
        };

        if let Some(media_controller) = state.media_controller.clone() {
            let compatible = media_controller
                .provider()
                .is_some_and(|provider| self.registry.can_play(provider.as_ref(), &source));
            if !compatible {
                tracing::info!(item = item.label(), "Active provider cannot play the new source");
                reset_provider(Some(&*media_controller), &self.model);
                state.media_controller = None;
                self.replace_media_element();
                self.model.set_state(PlaybackState::Buffering);
            }
        }

        let constructor = self.load_provider_constructor(&source, &active_media_model);
        let controller = self.clone();
        let task = spawn_shared(async move {
            let constructor = constructor.await?;
            Ok(controller.activate(&item, &active_media_model, &constructor))
        });

        state.provider_task = task.clone();
        Ok(task)
    }

    /// Resolves a constructor able to play `source`, loading the providers
    /// the whole playlist needs when none is loaded yet.
    ///
    /// When nothing can play the source the active provider is torn down,
    /// unless `active_media_model` was superseded while loading.
    pub fn load_provider_constructor(
        &self,
        source: &Source,
        active_media_model: &MediaModelHandle,
    ) -> BoxFuture<'static, Result<ProviderConstructor, ProgramError>> {
        if let Some(constructor) = self.registry.choose(source) {
            return future::ready(Ok(constructor)).boxed();
        }

        let controller = self.clone();
        let source = source.clone();
        let active_media_model = active_media_model.clone();
        async move {
            let mut playlist = controller.model.playlist();
            if !playlist.iter().any(|item| item.source() == Some(&source)) {
                playlist.push(PlaylistItem::new(vec![source.clone()]));
            }

            controller.registry.load_providers(&playlist).await?;

            if let Some(constructor) = controller.registry.choose(&source) {
                return Ok(constructor);
            }

            tracing::warn!(file = %source.file, kind = %source.kind(), "No provider can play source");
            let mut state = controller.lock_state();
            if controller.model.is_active_media_model(&active_media_model) {
                let media_controller = state.media_controller.take();
                reset_provider(media_controller.as_deref(), &controller.model);
            } else {
                tracing::debug!(file = %source.file, "Superseded resolution failed; keeping active provider");
            }
            Err(ProgramError::NoProvidersForPlaylist)
        }
        .boxed()
    }

    /// Attaches a freshly built provider to the container and the player
    /// model. Returns the provider's event subscription.
    pub fn change_video_provider(&self, provider: Arc<dyn Provider>) -> Cancelable {
        self.model.off_media_container();
        match self.model.media_container() {
            Some(container) => provider.set_container(container),
            None => self.model.once_media_container(provider.clone()),
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        provider.on_all(sender);
        let subscription = Cancelable::new();
        self.start_video_event_listener(receiver, subscription.clone());

        self.model.set_playback_rate(self.model.default_playback_rate());
        self.registry.sync(&self.model, provider.as_ref());
        subscription
    }

    fn activate(
        &self,
        item: &PlaylistItem,
        active_media_model: &MediaModelHandle,
        constructor: &ProviderConstructor,
    ) -> Option<Arc<MediaController>> {
        let mut state = self.lock_state();
        if !self.model.is_active_media_model(active_media_model) {
            tracing::debug!(item = item.label(), "Discarding superseded provider resolution");
            return None;
        }

        let media_controller = match state.media_controller.clone() {
            Some(media_controller) => media_controller,
            None => {
                let provider = constructor.create(self.model.id(), self.model.config());
                tracing::info!(provider = provider.name(), item = item.label(), "Created provider");
                let events = self.change_video_provider(provider.clone());
                let media_controller = Arc::new(MediaController::new(provider, self.model.clone(), events));
                state.media_controller = Some(media_controller.clone());
                media_controller
            }
        };

        let media_model = media_controller.init(item);
        if let Some(provider) = media_controller.provider() {
            self.model.set_provider(provider.name());
        }
        self.model.set_media_model(media_model.clone());
        self.model.sync_player_with_media_model(&media_model);
        self.model.emit(PlayerEvent::ItemReady { item: item.clone() });
        Some(media_controller)
    }
}
