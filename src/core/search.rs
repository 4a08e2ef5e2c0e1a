use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::controller::Controller;
use crate::core::events::ViewEvent;
use crate::core::format::format_duration;
use crate::core::model::{MessageKind, SearchOutcome, SearchPhase, SearchResult};
use crate::core::view::SelectOption;
use crate::i18n::found_resolutions;

impl Controller {
    /// Asks the backend which resolutions the URL field's video has and
    /// renders the answer, unless a newer search has started meanwhile.
    pub async fn search_resolutions(&self) -> SearchOutcome {
        let url = self.view.lock().await.url.trim().to_string();
        *self.current_url.lock().await = url.clone();

        {
            let mut v = self.view.lock().await;
            v.search = SearchPhase::Searching;
        }
        self.emit(ViewEvent::SearchStarted { url: url.clone() });
        self.notifier.show(self.msgs.searching, MessageKind::Info).await;

        debug!(%url, backend = self.backend.name(), "search started");
        let result = self.backend.search_resolutions(&url).await;

        match result {
            Ok(data) => {
                if *self.current_url.lock().await != url {
                    debug!(%url, "discarding stale search result");
                    self.emit(ViewEvent::StaleResultDiscarded { url });
                    return SearchOutcome::Stale;
                }
                info!(%url, count = data.count, title = %data.title, "resolutions found");
                self.render_resolutions(&data).await;
                SearchOutcome::Rendered(data)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(%url, error = %message, "resolution search failed");
                self.render_search_error(&message).await;
                SearchOutcome::Failed(message)
            }
        }
    }

    async fn render_resolutions(&self, data: &SearchResult) {
        let duration = format!("{}{}", self.msgs.duration_prefix, format_duration(data.duration));
        let selected = data.resolutions.first().cloned().unwrap_or_default();
        {
            let mut v = self.view.lock().await;
            let mut options = vec![SelectOption::placeholder(self.msgs.option_select)];
            options.extend(data.resolutions.iter().map(|r| SelectOption::resolution(r)));
            v.resolution_options = options;
            v.selected_resolution = selected.clone();

            v.video_info.title = data.title.clone();
            v.video_info.duration = duration.clone();
            if let Some(thumb) = &data.thumbnail {
                v.video_info.thumbnail = Some(thumb.clone());
                v.video_info.thumbnail_visible = true;
            }
            v.video_info.loading = false;
            v.video_info.content_visible = true;
            v.search = SearchPhase::Ready;
        }
        self.emit(ViewEvent::ResolutionsReady {
            title: data.title.clone(),
            duration,
            thumbnail: data.thumbnail.clone(),
            resolutions: data.resolutions.clone(),
            selected,
        });

        let this = self.clone();
        tokio::spawn(async move {
            sleep(this.cfg.options_reveal_delay).await;
            this.view.lock().await.download_options_shown = true;
            this.emit(ViewEvent::DownloadOptionsShown);
        });

        self.notifier
            .show(found_resolutions(self.msgs, data.count), MessageKind::Success)
            .await;
    }

    async fn render_search_error(&self, message: &str) {
        {
            let mut v = self.view.lock().await;
            v.resolution_options = vec![SelectOption::placeholder(self.msgs.option_error)];
            v.selected_resolution.clear();
            v.video_info.loading = false;
            v.download_options_shown = false;
            v.search = SearchPhase::Error;
        }
        self.emit(ViewEvent::SearchFailed { message: message.to_string() });
        self.emit(ViewEvent::DownloadOptionsHidden);
        self.notifier
            .show(format!("{}{}", self.msgs.error_prefix, message), MessageKind::Error)
            .await;
    }
}
