//! Per-item playback state
//!
//! A [`MediaModel`] lives for exactly one active item. Handles are compared by
//! identity (`Arc::ptr_eq`) to decide whether an asynchronous continuation
//! still belongs to the active item.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::types::PlaybackState;

pub type MediaModelHandle = Arc<MediaModel>;

/// Snapshot of a media model's attributes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaAttributes {
    pub state: PlaybackState,
    /// `load` has been issued on the provider for this item.
    pub setup: bool,
    /// A play attempt for this item succeeded.
    pub started: bool,
    pub preloaded: bool,
    pub position: f64,
    /// Negative for live streams whose duration is unknown.
    pub duration: f64,
    pub visual_quality: Option<Value>,
}

#[derive(Debug, Default)]
pub struct MediaModel {
    attributes: Mutex<MediaAttributes>,
}

impl MediaModel {
    pub fn new() -> MediaModelHandle {
        Arc::new(Self::default())
    }

    fn attributes(&self) -> MutexGuard<'_, MediaAttributes> {
        self.attributes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears the per-source flags.
    pub fn src_reset(&self) {
        let mut attributes = self.attributes();
        attributes.setup = false;
        attributes.started = false;
        attributes.preloaded = false;
        attributes.visual_quality = None;
    }

    pub fn snapshot(&self) -> MediaAttributes {
        self.attributes().clone()
    }

    pub fn state(&self) -> PlaybackState {
        self.attributes().state
    }

    /// Stores `state` and returns the previous one.
    pub(crate) fn replace_state(&self, state: PlaybackState) -> PlaybackState {
        std::mem::replace(&mut self.attributes().state, state)
    }

    pub fn setup(&self) -> bool {
        self.attributes().setup
    }

    pub fn set_setup(&self, setup: bool) {
        self.attributes().setup = setup;
    }

    /// Marks the item as set up. Returns `true` for the caller that flipped
    /// the flag, which is the one that must issue `load`.
    pub fn begin_setup(&self) -> bool {
        !std::mem::replace(&mut self.attributes().setup, true)
    }

    pub fn started(&self) -> bool {
        self.attributes().started
    }

    pub fn set_started(&self, started: bool) {
        self.attributes().started = started;
    }

    pub fn preloaded(&self) -> bool {
        self.attributes().preloaded
    }

    pub fn set_preloaded(&self, preloaded: bool) {
        self.attributes().preloaded = preloaded;
    }

    pub fn position(&self) -> f64 {
        self.attributes().position
    }

    pub fn set_position(&self, position: f64) {
        self.attributes().position = position.max(0.0);
    }

    pub fn duration(&self) -> f64 {
        self.attributes().duration
    }

    pub fn set_duration(&self, duration: f64) {
        self.attributes().duration = duration;
    }

    pub fn visual_quality(&self) -> Option<Value> {
        self.attributes().visual_quality.clone()
    }

    pub fn set_visual_quality(&self, quality: Option<Value>) {
        self.attributes().visual_quality = quality;
    }
}
