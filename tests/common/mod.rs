#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::{Notify, broadcast};

use playback_core::model::MediaContainer;
use playback_core::provider::{
    MediaElement, MediaElementFactory, PlayFuture, Provider, ProviderConstructor, ProviderController,
    ProviderEvent, ProviderEventSender, ProviderFactory, ProviderKind, ProviderLoader,
};
use playback_core::{
    PlayError, PlayerConfig, PlayerEvent, PlayerModel, PlaylistItem, ProgramController, ProviderLoadError,
    Source,
};

/// Every provider, factory and element call, in order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }
}

/// How a provider's `load` or `play` settles.
#[derive(Clone)]
pub enum Settle {
    /// Returns no future.
    Sync,
    Resolve,
    Reject(PlayError),
    /// Resolves once the gate is opened.
    Gated(Arc<Notify>),
}

impl Settle {
    fn future(&self) -> Option<PlayFuture> {
        match self.clone() {
            Settle::Sync => None,
            Settle::Resolve => Some(async { Ok(()) }.boxed()),
            Settle::Reject(error) => Some(async move { Err(error) }.boxed()),
            Settle::Gated(gate) => Some(
                async move {
                    gate.notified().await;
                    Ok(())
                }
                .boxed(),
            ),
        }
    }
}

#[derive(Default)]
pub struct MockElement {
    pub paused: AtomicBool,
    pub muted: AtomicBool,
    pub volume: Mutex<f64>,
    pub loads: AtomicUsize,
}

impl MockElement {
    pub fn new(paused: bool) -> Arc<Self> {
        let element = Self::default();
        element.paused.store(paused, Ordering::SeqCst);
        *element.volume.lock().unwrap() = 1.0;
        Arc::new(element)
    }
}

impl MediaElement for MockElement {
    fn paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
    fn volume(&self) -> f64 {
        *self.volume.lock().unwrap()
    }
    fn set_volume(&self, volume: f64) {
        *self.volume.lock().unwrap() = volume;
    }
    fn muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }
    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }
    fn load(&self) {
        self.loads.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockProvider {
    pub name: String,
    log: CallLog,
    load: Settle,
    play: Settle,
    element: Option<Arc<MockElement>>,
    container: Mutex<Option<MediaContainer>>,
    events: Mutex<Option<ProviderEventSender>>,
    pub playback_rate: Mutex<Option<f64>>,
    pub volume: Mutex<Option<u8>>,
}

impl MockProvider {
    pub fn new(name: &str, log: CallLog, load: Settle, play: Settle, element: Option<Arc<MockElement>>) -> Self {
        Self {
            name: name.to_string(),
            log,
            load,
            play,
            element,
            container: Mutex::new(None),
            events: Mutex::new(None),
            playback_rate: Mutex::new(None),
            volume: Mutex::new(None),
        }
    }

    fn record(&self, call: &str) {
        self.log.push(format!("{}:{}", call, self.name));
    }

    /// Publishes `event` to whoever is subscribed.
    pub fn emit(&self, event: ProviderEvent) {
        if let Some(events) = self.events.lock().unwrap().as_ref() {
            let _ = events.send(event);
        }
    }
}

impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }
    fn init(&self, _item: &PlaylistItem) {
        self.record("init");
    }
    fn load(&self, _item: &PlaylistItem) -> Option<PlayFuture> {
        self.record("load");
        self.load.future()
    }
    fn play(&self) -> Option<PlayFuture> {
        self.record("play");
        self.play.future()
    }
    fn stop(&self) {
        self.record("stop");
    }
    fn preload(&self, _item: &PlaylistItem) {
        self.record("preload");
    }
    fn set_container(&self, container: MediaContainer) {
        self.record("set_container");
        *self.container.lock().unwrap() = Some(container);
    }
    fn container(&self) -> Option<MediaContainer> {
        self.container.lock().unwrap().clone()
    }
    fn remove(&self) {
        self.record("remove");
        self.container.lock().unwrap().take();
    }
    fn on_all(&self, events: ProviderEventSender) {
        self.record("on");
        *self.events.lock().unwrap() = Some(events);
    }
    fn off_all(&self) {
        self.record("off");
        self.events.lock().unwrap().take();
    }
    fn set_instream_mode(&self, enabled: bool) {
        self.record(&format!("instream={enabled}"));
    }
    fn media_element(&self) -> Option<Arc<dyn MediaElement>> {
        self.element.clone().map(|element| element as Arc<dyn MediaElement>)
    }
    fn supports_playback_rate(&self) -> bool {
        true
    }
    fn set_playback_rate(&self, rate: f64) {
        *self.playback_rate.lock().unwrap() = Some(rate);
    }
    fn set_volume(&self, volume: u8) {
        *self.volume.lock().unwrap() = Some(volume);
    }
}

/// Builds [`MockProvider`]s and keeps every one it built.
pub struct MockFactory {
    pub kind: ProviderKind,
    log: CallLog,
    pub load: Settle,
    pub play: Settle,
    pub element: Option<Arc<MockElement>>,
    /// Overrides the kind's static support check.
    pub supports: Option<bool>,
    pub created: Mutex<Vec<Arc<MockProvider>>>,
}

impl MockFactory {
    pub fn new(kind: ProviderKind, log: &CallLog) -> Self {
        Self {
            kind,
            log: log.clone(),
            load: Settle::Sync,
            play: Settle::Sync,
            element: None,
            supports: None,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn last(&self) -> Arc<MockProvider> {
        self.created.lock().unwrap().last().cloned().expect("no provider created")
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

impl ProviderFactory for MockFactory {
    fn kind(&self) -> ProviderKind {
        self.kind
    }
    fn supports(&self, source: &Source, config: &PlayerConfig) -> bool {
        self.supports.unwrap_or_else(|| self.kind.supports(source, config))
    }
    fn create(&self, _player_id: &str, _config: &PlayerConfig) -> Arc<dyn Provider> {
        self.log.push(format!("create:{}", self.kind.name()));
        let provider = Arc::new(MockProvider::new(
            self.kind.name(),
            self.log.clone(),
            self.load.clone(),
            self.play.clone(),
            self.element.clone(),
        ));
        self.created.lock().unwrap().push(provider.clone());
        provider
    }
}

/// Hands out pre-built factories, optionally waiting on a gate first.
#[derive(Default)]
pub struct ScriptedLoader {
    pub factories: Mutex<Vec<Arc<MockFactory>>>,
    pub gate: Option<Arc<Notify>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ProviderLoader for ScriptedLoader {
    async fn load(&self, kind: ProviderKind) -> Result<ProviderConstructor, ProviderLoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(ProviderLoadError::new(kind.name(), "network down"));
        }
        let factory = self
            .factories
            .lock()
            .unwrap()
            .iter()
            .find(|factory| factory.kind == kind)
            .cloned()
            .ok_or_else(|| ProviderLoadError::new(kind.name(), "not scripted"))?;
        Ok(factory)
    }
}

pub struct Harness {
    pub controller: ProgramController,
    pub model: PlayerModel,
    pub registry: Arc<ProviderController>,
    pub log: CallLog,
    pub elements: Arc<Mutex<Vec<Arc<MockElement>>>>,
}

impl Harness {
    pub fn new(config: PlayerConfig, loader: Option<Arc<ScriptedLoader>>) -> Self {
        let model = PlayerModel::new(config.clone());
        let mut registry = ProviderController::new(config);
        if let Some(loader) = loader {
            registry = registry.with_loader(loader);
        }
        let registry = Arc::new(registry);

        let elements: Arc<Mutex<Vec<Arc<MockElement>>>> = Arc::default();
        let made = elements.clone();
        let factory: MediaElementFactory = Arc::new(move || {
            let element = MockElement::new(true);
            made.lock().unwrap().push(element.clone());
            element as Arc<dyn MediaElement>
        });

        Self {
            controller: ProgramController::new(model.clone(), registry.clone(), factory),
            model,
            registry,
            log: CallLog::default(),
            elements,
        }
    }

    pub fn factory(&self, kind: ProviderKind) -> MockFactory {
        MockFactory::new(kind, &self.log)
    }

    /// Registers `factory` as an already loaded constructor.
    pub fn register(&self, factory: MockFactory) -> Arc<MockFactory> {
        let factory = Arc::new(factory);
        self.registry.register(factory.clone());
        factory
    }

    /// Registers a plain factory of `kind`.
    pub fn register_kind(&self, kind: ProviderKind) -> Arc<MockFactory> {
        self.register(self.factory(kind))
    }
}

pub fn item(file: &str) -> PlaylistItem {
    PlaylistItem::from_file(file)
}

/// Lets spawned continuations run.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Waits for the first event matching `pred`.
pub async fn wait_for(
    events: &mut broadcast::Receiver<PlayerEvent>,
    pred: impl Fn(&PlayerEvent) -> bool,
) -> PlayerEvent {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = events.recv().await.expect("event stream closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for player event")
}

pub fn drain(events: &mut broadcast::Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}
