use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::config::PlayerConfig;
use crate::error::ProviderLoadError;
use crate::model::{PlayerModel, PlaylistItem, Source};

use super::{Provider, ProviderConstructor, ProviderKind};

/// Capability registry consulted by the program controller.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Whether the active `provider` can play `source` without being rebuilt.
    fn can_play(&self, provider: &dyn Provider, source: &Source) -> bool;

    /// Best loaded constructor for `source`.
    fn choose(&self, source: &Source) -> Option<ProviderConstructor>;

    /// Loads every constructor the playlist needs. Idempotent.
    async fn load_providers(&self, playlist: &[PlaylistItem]) -> Result<(), ProviderLoadError>;

    /// Pushes the model's current preferences onto a freshly built provider.
    fn sync(&self, model: &PlayerModel, provider: &dyn Provider);
}

/// Fetches provider code that is not bundled with the player.
#[async_trait]
pub trait ProviderLoader: Send + Sync {
    async fn load(&self, kind: ProviderKind) -> Result<ProviderConstructor, ProviderLoadError>;
}

/// Default registry: constructors are ordered by the configured provider
/// priority and missing ones are fetched through a [`ProviderLoader`].
pub struct ProviderController {
    config: Arc<PlayerConfig>,
    loader: Option<Arc<dyn ProviderLoader>>,
    loaded: RwLock<Vec<ProviderConstructor>>,
}

impl ProviderController {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config: Arc::new(config),
            loader: None,
            loaded: RwLock::new(Vec::new()),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn ProviderLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Registers a constructor, replacing any previous one of the same kind.
    pub fn register(&self, constructor: ProviderConstructor) {
        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        let kind = constructor.kind();
        tracing::debug!(provider = constructor.name(), "Registering provider");
        match loaded.iter_mut().find(|existing| existing.kind() == kind) {
            Some(existing) => *existing = constructor,
            None => loaded.push(constructor),
        }
    }

    pub fn is_loaded(&self, kind: ProviderKind) -> bool {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|constructor| constructor.kind() == kind)
    }

    /// Kinds the playlist needs that are not loaded yet, in priority order.
    fn required(&self, playlist: &[PlaylistItem]) -> Vec<ProviderKind> {
        let mut required = Vec::new();
        for source in playlist.iter().filter_map(PlaylistItem::source) {
            let kind = self
                .config
                .provider_order
                .iter()
                .copied()
                .find(|kind| kind.supports(source, &self.config));
            if let Some(kind) = kind {
                if !required.contains(&kind) && !self.is_loaded(kind) {
                    required.push(kind);
                }
            }
        }
        required
    }
}

#[async_trait]
impl ProviderRegistry for ProviderController {
    fn can_play(&self, provider: &dyn Provider, source: &Source) -> bool {
        self.choose(source)
            .is_some_and(|constructor| constructor.name() == provider.name())
    }

    fn choose(&self, source: &Source) -> Option<ProviderConstructor> {
        let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
        self.config.provider_order.iter().find_map(|kind| {
            loaded
                .iter()
                .find(|constructor| constructor.kind() == *kind && constructor.supports(source, &self.config))
                .cloned()
        })
    }

    async fn load_providers(&self, playlist: &[PlaylistItem]) -> Result<(), ProviderLoadError> {
        let required = self.required(playlist);
        let Some(loader) = self.loader.as_ref() else {
            if !required.is_empty() {
                tracing::debug!(?required, "No provider loader configured");
            }
            return Ok(());
        };
        if required.is_empty() {
            return Ok(());
        }

        tracing::info!(?required, "Loading providers");
        let constructors = try_join_all(required.into_iter().map(|kind| loader.load(kind))).await?;
        for constructor in constructors {
            self.register(constructor);
        }
        Ok(())
    }

    fn sync(&self, model: &PlayerModel, provider: &dyn Provider) {
        provider.set_volume(model.volume());
        provider.set_mute(model.mute());
        if provider.supports_playback_rate() {
            provider.set_playback_rate(model.playback_rate());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaContainer;
    use crate::provider::{PlayFuture, ProviderEventSender, ProviderFactory};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullProvider(&'static str);

    impl Provider for NullProvider {
        fn name(&self) -> &str {
            self.0
        }
        fn init(&self, _item: &PlaylistItem) {}
        fn load(&self, _item: &PlaylistItem) -> Option<PlayFuture> {
            None
        }
        fn play(&self) -> Option<PlayFuture> {
            None
        }
        fn stop(&self) {}
        fn preload(&self, _item: &PlaylistItem) {}
        fn set_container(&self, _container: MediaContainer) {}
        fn container(&self) -> Option<MediaContainer> {
            None
        }
        fn remove(&self) {}
        fn on_all(&self, _events: ProviderEventSender) {}
        fn off_all(&self) {}
    }

    struct Factory(ProviderKind);

    impl ProviderFactory for Factory {
        fn kind(&self) -> ProviderKind {
            self.0
        }
        fn create(&self, _player_id: &str, _config: &PlayerConfig) -> Arc<dyn Provider> {
            Arc::new(NullProvider(self.0.name()))
        }
    }

    #[derive(Default)]
    struct CountingLoader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProviderLoader for CountingLoader {
        async fn load(&self, kind: ProviderKind) -> Result<ProviderConstructor, ProviderLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if kind == ProviderKind::Plugin {
                return Err(ProviderLoadError::new(kind.name(), "blocked"));
            }
            Ok(Arc::new(Factory(kind)))
        }
    }

    #[test]
    fn test_choose_follows_priority_order() {
        let registry = ProviderController::new(PlayerConfig::default());
        let hls = Source::new("live.m3u8");
        assert!(registry.choose(&hls).is_none());

        registry.register(Arc::new(Factory(ProviderKind::Adaptive)));
        registry.register(Arc::new(Factory(ProviderKind::Html5)));

        assert_eq!(registry.choose(&hls).unwrap().name(), "adaptive");
        assert_eq!(registry.choose(&Source::new("a.mp4")).unwrap().name(), "html5");
    }

    #[test]
    fn test_can_play_requires_matching_provider() {
        let registry = ProviderController::new(PlayerConfig::default());
        registry.register(Arc::new(Factory(ProviderKind::Html5)));
        registry.register(Arc::new(Factory(ProviderKind::Adaptive)));
        let html5 = NullProvider("html5");

        assert!(registry.can_play(&html5, &Source::new("a.mp4")));
        assert!(!registry.can_play(&html5, &Source::new("live.m3u8")));
    }

    #[tokio::test]
    async fn test_load_providers_is_idempotent() {
        let loader = Arc::new(CountingLoader::default());
        let registry = ProviderController::new(PlayerConfig::default()).with_loader(loader.clone());
        let playlist = vec![
            PlaylistItem::from_file("a.mp4"),
            PlaylistItem::from_file("b.mp4"),
            PlaylistItem::from_file("live.m3u8"),
        ];

        registry.load_providers(&playlist).await.unwrap();
        registry.load_providers(&playlist).await.unwrap();

        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
        assert!(registry.is_loaded(ProviderKind::Html5));
        assert!(registry.is_loaded(ProviderKind::Adaptive));
    }

    #[tokio::test]
    async fn test_load_failure_is_reported() {
        let registry = ProviderController::new(PlayerConfig::default())
            .with_loader(Arc::new(CountingLoader::default()));
        let error = registry
            .load_providers(&[PlaylistItem::from_file("rtmp://origin/live")])
            .await
            .unwrap_err();
        assert_eq!(error.kind, "plugin");
    }

    #[tokio::test]
    async fn test_unsupported_sources_load_nothing() {
        let loader = Arc::new(CountingLoader::default());
        let registry = ProviderController::new(PlayerConfig::default()).with_loader(loader.clone());
        registry
            .load_providers(&[PlaylistItem::from_file("doc.pdf")])
            .await
            .unwrap();
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
        assert!(registry.choose(&Source::new("doc.pdf")).is_none());
    }
}
