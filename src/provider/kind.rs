use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;
use crate::model::Source;

const NATIVE_TYPES: &[&str] = &[
    "mp4", "webm", "mov", "mp3", "aac", "m4a", "ogg", "oga", "ogv", "wav", "flac",
];
const ADAPTIVE_TYPES: &[&str] = &["hls", "dash"];
const PLUGIN_TYPES: &[&str] = &["rtmp", "flv", "f4v", "smil"];

/// Families of playback engines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// The browser's own media element.
    Html5,
    /// A streaming engine feeding the media element (HLS, DASH).
    Adaptive,
    /// An engine bridged through a plugin.
    Plugin,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [ProviderKind::Html5, ProviderKind::Adaptive, ProviderKind::Plugin];

    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Html5 => "html5",
            ProviderKind::Adaptive => "adaptive",
            ProviderKind::Plugin => "plugin",
        }
    }

    /// Static support check, usable before the provider code is loaded.
    pub fn supports(self, source: &Source, config: &PlayerConfig) -> bool {
        let kind = source.kind();
        match self {
            ProviderKind::Html5 => {
                NATIVE_TYPES.contains(&kind.as_str()) || (config.native_hls && kind == "hls")
            }
            ProviderKind::Adaptive => ADAPTIVE_TYPES.contains(&kind.as_str()),
            ProviderKind::Plugin => PLUGIN_TYPES.contains(&kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_support() {
        let config = PlayerConfig::default();
        let mp4 = Source::new("a.mp4");
        let hls = Source::new("live.m3u8");
        let rtmp = Source::new("rtmp://origin/live");

        assert!(ProviderKind::Html5.supports(&mp4, &config));
        assert!(!ProviderKind::Html5.supports(&hls, &config));
        assert!(ProviderKind::Adaptive.supports(&hls, &config));
        assert!(!ProviderKind::Adaptive.supports(&mp4, &config));
        assert!(ProviderKind::Plugin.supports(&rtmp, &config));
    }

    #[test]
    fn test_native_hls_flag() {
        let config = PlayerConfig {
            native_hls: true,
            ..PlayerConfig::default()
        };
        assert!(ProviderKind::Html5.supports(&Source::new("live.m3u8"), &config));
    }
}
