use tracing::warn;

use crate::core::controller::Controller;
use crate::core::model::MessageKind;
use crate::plugins::registry::ClipboardError;

impl Controller {
    /// Paste button: fills the URL field from the clipboard as if typed.
    pub async fn paste_from_clipboard(&self) {
        let Some(clipboard) = self.clipboard.clone() else {
            self.notifier.show(self.msgs.clipboard_unavailable, MessageKind::Error).await;
            return;
        };

        match clipboard.read_text().await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    self.notifier.show(self.msgs.clipboard_empty, MessageKind::Info).await;
                    return;
                }
                self.on_input(text).await;
                self.notifier.show(self.msgs.pasted, MessageKind::Success).await;
            }
            Err(ClipboardError::Unavailable) => {
                self.notifier.show(self.msgs.clipboard_unavailable, MessageKind::Error).await;
            }
            Err(e) => {
                warn!(clipboard = clipboard.name(), error = %e, "clipboard read failed");
                self.notifier
                    .show(format!("{}{}", self.msgs.clipboard_failed, e), MessageKind::Error)
                    .await;
            }
        }
    }
}
