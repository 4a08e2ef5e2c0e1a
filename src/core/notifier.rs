use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{sleep, Duration};

use crate::core::events::ViewEvent;
use crate::core::model::MessageKind;
use crate::core::view::ViewState;

/// The status banner shared by every workflow.
///
/// A new message replaces the current one immediately. Non-error messages
/// hide themselves after `hide_after`; errors stay until replaced. A pending
/// auto-hide is bound to the message that scheduled it and never hides a
/// newer one.
#[derive(Clone)]
pub struct Notifier {
    view: Arc<Mutex<ViewState>>,
    event_tx: broadcast::Sender<ViewEvent>,
    generation: Arc<AtomicU64>,
    hide_after: Duration,
}

impl Notifier {
    pub fn new(view: Arc<Mutex<ViewState>>, event_tx: broadcast::Sender<ViewEvent>, hide_after: Duration) -> Self {
        Self { view, event_tx, generation: Arc::new(AtomicU64::new(0)), hide_after }
    }

    pub async fn show(&self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut v = self.view.lock().await;
            v.banner.text = text.clone();
            v.banner.kind = kind;
            v.banner.visible = true;
        }
        let _ = self.event_tx.send(ViewEvent::MessageShown { text, kind });

        if kind == MessageKind::Error {
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            sleep(this.hide_after).await;
            if this.generation.load(Ordering::SeqCst) == generation {
                this.hide().await;
            }
        });
    }

    pub async fn hide(&self) {
        let was_visible = {
            let mut v = self.view.lock().await;
            std::mem::replace(&mut v.banner.visible, false)
        };
        if was_visible {
            let _ = self.event_tx.send(ViewEvent::MessageHidden);
        }
    }
}
