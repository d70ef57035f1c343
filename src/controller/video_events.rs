//! Provider event listener

use tokio::sync::mpsc;

use crate::cancelable::Cancelable;
use crate::provider::ProviderEvent;

use super::ProgramController;

impl ProgramController {
    /// Forwards a provider's events to the player model until the provider
    /// drops its sender or the subscription is cancelled.
    pub(crate) fn start_video_event_listener(
        &self,
        mut events: mpsc::UnboundedReceiver<ProviderEvent>,
        subscription: Cancelable,
    ) {
        let model = self.model.clone();
        tracing::debug!("Starting video event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if subscription.is_cancelled() {
                    break;
                }
                tracing::trace!(?event, "Video event");
                model.handle_video_event(event);
            }
            tracing::debug!("Video event listener shutting down");
        });
    }
}
