use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::core::content_disposition::filename_or_default;
use crate::core::controller::Controller;
use crate::core::events::ViewEvent;
use crate::core::format::progress_label;
use crate::core::model::{
    DownloadPhase, DownloadRequest, DownloadType, MessageKind, SubmitOutcome, TransferProgress,
};

struct Saved {
    filename: String,
    location: String,
    bytes: u64,
}

impl Controller {
    /// Form submission: validate, stream the file, save it, then schedule
    /// the page reset.
    pub async fn submit(&self) -> SubmitOutcome {
        let req = {
            let v = self.view.lock().await;
            if !v.download_button.enabled {
                return SubmitOutcome::Ignored;
            }
            DownloadRequest {
                url: v.url.clone(),
                resolution: match v.download_type {
                    DownloadType::Audio => String::new(),
                    DownloadType::Video => v.selected_resolution.clone(),
                },
                kind: v.download_type,
            }
        };

        if req.kind == DownloadType::Video && req.resolution.is_empty() {
            self.notifier.show(self.msgs.select_resolution, MessageKind::Error).await;
            return SubmitOutcome::Rejected;
        }

        {
            let mut v = self.view.lock().await;
            v.download_button.enabled = false;
            v.download_button.label = self.msgs.button_starting.to_string();
            v.progress.visible = true;
            v.download = DownloadPhase::InFlight;
        }
        self.notifier.hide().await;
        info!(backend = self.backend.name(), url = %req.url, resolution = %req.resolution, kind = %req.kind, "download started");
        self.emit(ViewEvent::DownloadStarted {
            url: req.url.clone(),
            resolution: req.resolution.clone(),
            kind: req.kind,
        });

        match self.run_download(&req).await {
            Ok(saved) => {
                self.finish_download(&saved).await;
                SubmitOutcome::Completed {
                    filename: saved.filename,
                    bytes: saved.bytes,
                    location: saved.location,
                }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(url = %req.url, error = %message, "download failed");
                self.fail_download(&message).await;
                SubmitOutcome::Failed(message)
            }
        }
    }

    async fn run_download(&self, req: &DownloadRequest) -> anyhow::Result<Saved> {
        let mut resp = self.backend.download(req).await?;
        let filename = filename_or_default(resp.content_disposition.as_deref());

        self.view.lock().await.progress.label = self.msgs.downloading_label.to_string();

        let mut progress = TransferProgress::new(resp.content_length);
        let mut chunks: Vec<Bytes> = Vec::new();
        while let Some(chunk) = resp.body.next().await {
            let chunk = chunk?;
            progress.record(chunk.len());
            chunks.push(chunk);
            self.report_progress(&progress).await;
        }

        let mut blob = BytesMut::with_capacity(progress.received as usize);
        for c in &chunks {
            blob.extend_from_slice(c);
        }
        drop(chunks);
        let location = self.saver.save(&filename, blob.freeze()).await?;

        Ok(Saved { filename, location, bytes: progress.received })
    }

    async fn report_progress(&self, progress: &TransferProgress) {
        let percent = progress.percent();
        let label = progress_label(self.msgs.downloaded_prefix, progress);
        if let (Some(p), Some(l)) = (percent, &label) {
            let mut v = self.view.lock().await;
            v.set_progress(p);
            v.progress.label = l.clone();
        }
        self.emit(ViewEvent::Progress {
            received: progress.received,
            total: progress.total,
            percent,
            label,
        });
    }

    async fn finish_download(&self, saved: &Saved) {
        {
            let mut v = self.view.lock().await;
            v.set_progress(100);
            v.progress.label = self.msgs.download_complete_label.to_string();
            v.download_button.label = self.msgs.button_download.to_string();
            v.download_button.enabled = true;
            v.download = DownloadPhase::Done;
        }
        self.emit(ViewEvent::FileSaved {
            filename: saved.filename.clone(),
            location: saved.location.clone(),
            bytes: saved.bytes,
        });
        self.notifier.show(self.msgs.download_success, MessageKind::Success).await;

        let this = self.clone();
        tokio::spawn(async move {
            sleep(this.cfg.reset_delay).await;
            {
                let mut v = this.view.lock().await;
                v.progress.visible = false;
                v.set_progress(0);
            }
            this.emit(ViewEvent::ProgressHidden);
            this.reset().await;
        });
    }

    async fn fail_download(&self, message: &str) {
        {
            let mut v = self.view.lock().await;
            v.download_button.label = self.msgs.button_download.to_string();
            v.download_button.enabled = true;
            v.progress.visible = false;
            v.download = DownloadPhase::Error;
        }
        self.emit(ViewEvent::ProgressHidden);
        self.emit(ViewEvent::DownloadFailed { message: message.to_string() });
        self.notifier
            .show(format!("{}{}", self.msgs.error_prefix, message), MessageKind::Error)
            .await;
    }
}
