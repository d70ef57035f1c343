//! Core type definitions shared by the models and controllers

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::time::TimeValue;

/// Playback state of the player and of each media model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Buffering,
    Playing,
    Paused,
    Complete,
    Error,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Buffering => "buffering",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Complete => "complete",
            PlaybackState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Why a play request was issued
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayReason {
    /// A user gesture on the player.
    Interaction,
    /// Configured autostart.
    Autostart,
    /// Advancing to the next playlist item.
    Playlist,
    /// Automatic advance into related content.
    RelatedAuto,
    /// The player scrolled into view.
    Viewable,
    /// An API call from the embedding page.
    #[default]
    External,
}

/// Item level preload hint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preload {
    Auto,
    Metadata,
    None,
}

/// One alternative media resource for an item
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    pub file: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub default: bool,
}

impl Source {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Lowercase media type, taken from the explicit `type` or derived from
    /// the file name.
    pub fn kind(&self) -> String {
        if let Some(media_type) = self.media_type.as_deref().filter(|t| !t.is_empty()) {
            return normalize_type(&media_type.to_ascii_lowercase());
        }

        let file = self.file.to_ascii_lowercase();
        if file.starts_with("rtmp") {
            return "rtmp".to_string();
        }

        let path = file.split(['?', '#']).next().unwrap_or_default();
        let extension = path
            .rsplit_once('/')
            .map_or(path, |(_, name)| name)
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        normalize_type(extension)
    }
}

fn normalize_type(raw: &str) -> String {
    let raw = raw.rsplit('/').next().unwrap_or(raw);
    match raw {
        "m3u8" | "m3u" | "vnd.apple.mpegurl" | "x-mpegurl" => "hls".to_string(),
        "mpd" | "dash+xml" => "dash".to_string(),
        "m4v" => "mp4".to_string(),
        "mp4a" => "aac".to_string(),
        "mpeg" => "mp3".to_string(),
        other => other.to_string(),
    }
}

/// A playlist entry as configured by the embedding page
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starttime: Option<TimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<Preload>,
}

impl PlaylistItem {
    pub fn new(sources: Vec<Source>) -> Self {
        Self {
            sources,
            ..Default::default()
        }
    }

    pub fn from_file(file: impl Into<String>) -> Self {
        Self::new(vec![Source::new(file)])
    }

    /// The source that gets played: the first entry of the source list.
    pub fn source(&self) -> Option<&Source> {
        self.sources.first()
    }

    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or_else(|| self.source().map(|s| s.file.as_str()))
            .unwrap_or("<empty>")
    }
}

/// Opaque handle on the page element that hosts provider output
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaContainer(Arc<str>);

impl MediaContainer {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}
