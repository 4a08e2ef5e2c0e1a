use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::debug;

use crate::core::events::ViewEvent;
use crate::core::model::DownloadType;
use crate::core::notifier::Notifier;
use crate::core::view::ViewState;
use crate::i18n::{get_messages, Locale, Messages};
use crate::plugins::registry::{Backend, Clipboard, SaveTarget};

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub debounce: Duration,
    /// Trimmed input must be strictly longer than this to trigger a search.
    pub min_url_len: usize,
    pub url_markers: Vec<String>,
    pub message_hide_after: Duration,
    pub options_reveal_delay: Duration,
    pub reset_delay: Duration,
    pub locale: Locale,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(800),
            min_url_len: 20,
            url_markers: vec!["youtube.com".to_string(), "youtu.be".to_string()],
            message_hide_after: Duration::from_secs(4),
            options_reveal_delay: Duration::from_millis(100),
            reset_delay: Duration::from_secs(3),
            locale: Locale::En,
        }
    }
}

/// One form session. Cheap to clone; all clones drive the same page.
#[derive(Clone)]
pub struct Controller {
    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) clipboard: Option<Arc<dyn Clipboard>>,
    pub(crate) saver: Arc<dyn SaveTarget>,
    pub(crate) cfg: Arc<ControllerConfig>,
    pub(crate) msgs: &'static Messages,
    pub(crate) view: Arc<Mutex<ViewState>>,
    /// URL of the most recent search; older responses are dropped on mismatch.
    pub(crate) current_url: Arc<Mutex<String>>,
    pub(crate) search_timer: Arc<Mutex<Option<JoinHandle<()>>>>,
    pub(crate) notifier: Notifier,
    pub(crate) event_tx: broadcast::Sender<ViewEvent>,
}

impl Controller {
    pub fn new(
        backend: Arc<dyn Backend>,
        clipboard: Option<Arc<dyn Clipboard>>,
        saver: Arc<dyn SaveTarget>,
        cfg: ControllerConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        let msgs = get_messages(cfg.locale);
        let view = Arc::new(Mutex::new(ViewState::initial(msgs)));
        let notifier = Notifier::new(view.clone(), event_tx.clone(), cfg.message_hide_after);

        Self {
            backend,
            clipboard,
            saver,
            cfg: Arc::new(cfg),
            msgs,
            view,
            current_url: Arc::new(Mutex::new(String::new())),
            search_timer: Arc::new(Mutex::new(None)),
            notifier,
            event_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.event_tx.subscribe()
    }

    pub fn messages(&self) -> &'static Messages {
        self.msgs
    }

    /// Snapshot of the form as it is right now.
    pub async fn view(&self) -> ViewState {
        self.view.lock().await.clone()
    }

    pub(crate) fn emit(&self, evt: ViewEvent) {
        let _ = self.event_tx.send(evt);
    }

    pub async fn set_download_type(&self, kind: DownloadType) {
        let hidden = kind == DownloadType::Audio;
        {
            let mut v = self.view.lock().await;
            v.download_type = kind;
            v.resolution_group_hidden = hidden;
        }
        self.emit(ViewEvent::DownloadTypeChanged { kind, resolution_group_hidden: hidden });
    }

    /// Returns false (and clears the selection) for values not on the list.
    pub async fn select_resolution(&self, value: &str) -> bool {
        let (ok, selected) = {
            let mut v = self.view.lock().await;
            let ok = v.select_resolution(value);
            (ok, v.selected_resolution.clone())
        };
        self.emit(ViewEvent::ResolutionSelected { value: selected });
        ok
    }

    /// Back to the freshly loaded page.
    pub async fn reset(&self) {
        if let Some(h) = self.search_timer.lock().await.take() {
            h.abort();
        }
        self.current_url.lock().await.clear();
        *self.view.lock().await = ViewState::initial(self.msgs);
        debug!("form reset");
        self.emit(ViewEvent::Reset);
    }
}
