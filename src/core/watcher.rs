use tokio::time::sleep;
use tracing::debug;

use crate::core::controller::Controller;
use crate::core::events::ViewEvent;
use crate::core::model::{DownloadPhase, SearchPhase};
use crate::core::view::SelectOption;

impl Controller {
    /// Whether trimmed input is worth asking the backend about.
    pub fn looks_like_video_url(&self, url: &str) -> bool {
        url.len() > self.cfg.min_url_len && self.cfg.url_markers.iter().any(|m| url.contains(m.as_str()))
    }

    /// Handles one edit of the URL field.
    pub async fn on_input(&self, value: &str) {
        let mut timer = self.search_timer.lock().await;
        if let Some(pending) = timer.take() {
            pending.abort();
        }

        let url = value.trim().to_string();
        let qualifies = self.looks_like_video_url(&url);
        {
            let mut v = self.view.lock().await;
            v.url = value.to_string();
            v.download_options_shown = false;
            if v.download != DownloadPhase::InFlight {
                v.download = DownloadPhase::Idle;
            }
            if qualifies {
                v.resolution_options = vec![SelectOption::placeholder(self.msgs.option_searching)];
                v.selected_resolution.clear();
                v.video_info.visible = true;
                v.video_info.loading = true;
                v.video_info.content_visible = false;
                v.video_info.thumbnail_visible = false;
                v.search = SearchPhase::Searching;
            } else {
                v.video_info.visible = false;
                v.search = SearchPhase::Idle;
            }
        }
        self.emit(ViewEvent::InputChanged { value: value.to_string() });
        self.emit(ViewEvent::DownloadOptionsHidden);

        if !qualifies {
            self.emit(ViewEvent::VideoInfoHidden);
            return;
        }

        debug!(%url, delay_ms = self.cfg.debounce.as_millis() as u64, "search scheduled");
        self.emit(ViewEvent::SearchScheduled { url });

        let this = self.clone();
        *timer = Some(tokio::spawn(async move {
            sleep(this.cfg.debounce).await;
            // Detached so a later input can only cancel the wait, never the request.
            tokio::spawn(async move {
                this.search_resolutions().await;
            });
        }));
    }
}
