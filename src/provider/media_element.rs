use std::sync::Arc;

/// The playable surface a provider renders into.
pub trait MediaElement: Send + Sync {
    fn paused(&self) -> bool;

    /// Volume in `0.0..=1.0`.
    fn volume(&self) -> f64;

    fn set_volume(&self, volume: f64);

    fn muted(&self) -> bool;

    fn set_muted(&self, muted: bool);

    /// Resets the surface; keeps a user-gesture unlock alive on fresh elements.
    fn load(&self);
}

/// Yields a fresh media surface.
pub type MediaElementFactory = Arc<dyn Fn() -> Arc<dyn MediaElement> + Send + Sync>;
