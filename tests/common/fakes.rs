//! In-memory stand-ins for the backend, the clipboard and the save target.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tube_grabber::core::controller::{Controller, ControllerConfig};
use tube_grabber::core::model::{DownloadRequest, SearchResult};
use tube_grabber::plugins::registry::{
    Backend, BackendError, Clipboard, ClipboardError, DownloadResponse, SaveTarget,
};

pub fn search_result(title: &str, duration: u64, resolutions: &[&str]) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        duration,
        thumbnail: Some(format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", title)),
        resolutions: resolutions.iter().map(|r| r.to_string()).collect(),
        count: resolutions.len(),
    }
}

pub enum FakeDownload {
    Ok {
        content_length: Option<u64>,
        content_disposition: Option<String>,
        chunks: Vec<Result<Vec<u8>, String>>,
    },
    Err(String),
}

#[derive(Default)]
pub struct FakeBackend {
    search_calls: Mutex<Vec<String>>,
    download_calls: Mutex<Vec<DownloadRequest>>,
    results: Mutex<HashMap<String, SearchResult>>,
    search_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    download: Mutex<Option<FakeDownload>>,
    download_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_result(&self, url: &str, result: SearchResult) {
        self.results.lock().unwrap().insert(url.to_string(), result);
    }

    /// The search for `url` blocks until the returned sender fires.
    pub fn gate_search(&self, url: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().insert(url.to_string(), rx);
        tx
    }

    pub fn set_download(&self, d: FakeDownload) {
        *self.download.lock().unwrap() = Some(d);
    }

    pub fn gate_download(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.download_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn download_calls(&self) -> Vec<DownloadRequest> {
        self.download_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn name(&self) -> &'static str { "fake-backend" }

    async fn search_resolutions(&self, url: &str) -> Result<SearchResult, BackendError> {
        self.search_calls.lock().unwrap().push(url.to_string());
        let gate = self.search_gates.lock().unwrap().remove(url);
        if let Some(g) = gate {
            let _ = g.await;
        }
        self.results
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| BackendError::Server {
                status: 400,
                message: "Failed to fetch video info: Video unavailable".to_string(),
            })
    }

    async fn download(&self, req: &DownloadRequest) -> Result<DownloadResponse, BackendError> {
        self.download_calls.lock().unwrap().push(req.clone());
        let gate = self.download_gate.lock().unwrap().take();
        if let Some(g) = gate {
            let _ = g.await;
        }
        match self.download.lock().unwrap().take() {
            Some(FakeDownload::Ok { content_length, content_disposition, chunks }) => {
                let body = stream::iter(chunks.into_iter().map(|c| match c {
                    Ok(b) => Ok(Bytes::from(b)),
                    Err(e) => Err(BackendError::Decode(e)),
                }))
                .boxed();
                Ok(DownloadResponse { content_length, content_disposition, body })
            }
            Some(FakeDownload::Err(message)) => Err(BackendError::Server { status: 400, message }),
            None => Err(BackendError::Server { status: 500, message: "no download configured".to_string() }),
        }
    }
}

pub struct FakeClipboard {
    text: Result<String, String>,
}

impl FakeClipboard {
    pub fn with_text(text: &str) -> Arc<Self> {
        Arc::new(Self { text: Ok(text.to_string()) })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self { text: Err(reason.to_string()) })
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    fn name(&self) -> &'static str { "fake-clipboard" }

    async fn read_text(&self) -> Result<String, ClipboardError> {
        self.text.clone().map_err(ClipboardError::Command)
    }
}

#[derive(Default)]
pub struct MemorySaveTarget {
    saved: Mutex<Vec<(String, Bytes)>>,
}

impl MemorySaveTarget {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saved(&self) -> Vec<(String, Bytes)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SaveTarget for MemorySaveTarget {
    async fn save(&self, filename: &str, blob: Bytes) -> anyhow::Result<String> {
        self.saved.lock().unwrap().push((filename.to_string(), blob));
        Ok(format!("memory://{}", filename))
    }
}

pub fn controller(
    backend: Arc<FakeBackend>,
    clipboard: Option<Arc<FakeClipboard>>,
    saver: Arc<MemorySaveTarget>,
) -> Controller {
    let clipboard = clipboard.map(|c| c as Arc<dyn Clipboard>);
    Controller::new(backend, clipboard, saver, ControllerConfig::default())
}
