use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata returned by the resolution search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "de_seconds")]
    pub duration: u64,
    #[serde(default, deserialize_with = "de_thumbnail")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub resolutions: Vec<String>,
    #[serde(default)]
    pub count: usize,
}

// yt-dlp reports fractional or missing durations for some sources.
fn de_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let v: Option<f64> = Option::deserialize(d)?;
    Ok(v.filter(|s| s.is_finite() && *s > 0.0).map(|s| s.floor() as u64).unwrap_or(0))
}

fn de_thumbnail<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v: Option<String> = Option::deserialize(d)?;
    Ok(v.filter(|s| !s.is_empty()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DownloadType {
    #[default]
    Video,
    Audio,
}

impl DownloadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
        }
    }
}

impl fmt::Display for DownloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            other => anyhow::bail!("unknown download type: {}", other),
        }
    }
}

/// Body of `POST /api/download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub resolution: String,
    #[serde(rename = "type")]
    pub kind: DownloadType,
}

/// Running byte counts for one streamed download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferProgress {
    pub received: u64,
    pub total: Option<u64>,
}

impl TransferProgress {
    pub fn new(total: Option<u64>) -> Self {
        Self { received: 0, total }
    }

    pub fn record(&mut self, chunk_len: usize) {
        self.received = self.received.saturating_add(chunk_len as u64);
    }

    /// `None` when the server did not announce a usable length.
    pub fn percent(&self) -> Option<u32> {
        let total = self.total.filter(|t| *t > 0)?;
        Some(((self.received as f64 / total as f64) * 100.0).round() as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn css_class(&self) -> String {
        format!("message {}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    InFlight,
    Done,
    Error,
}

/// Coarse page state, derived from the two workflow phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Searching,
    ResolutionsReady,
    SearchError,
    Downloading,
    DownloadComplete,
    DownloadError,
}

impl UiState {
    pub fn from_phases(search: SearchPhase, download: DownloadPhase) -> Self {
        match download {
            DownloadPhase::InFlight => return Self::Downloading,
            DownloadPhase::Done => return Self::DownloadComplete,
            DownloadPhase::Error => return Self::DownloadError,
            DownloadPhase::Idle => {}
        }
        match search {
            SearchPhase::Idle => Self::Idle,
            SearchPhase::Searching => Self::Searching,
            SearchPhase::Ready => Self::ResolutionsReady,
            SearchPhase::Error => Self::SearchError,
        }
    }
}

/// What happened to one resolution search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Rendered(SearchResult),
    Stale,
    Failed(String),
}

/// What happened to one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The download button was disabled.
    Ignored,
    /// Local validation failed; nothing was sent.
    Rejected,
    Completed { filename: String, bytes: u64, location: String },
    Failed(String),
}
