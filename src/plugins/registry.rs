use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use clap::{ArgMatches, Command};
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use crate::core::model::{DownloadRequest, SearchResult};

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// Non-2xx answer; `message` is the server's `error` field or a fallback.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    Decode(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard reader available")]
    Unavailable,

    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A successful `/api/download` answer whose body has not been read yet.
pub struct DownloadResponse {
    pub content_length: Option<u64>,
    pub content_disposition: Option<String>,
    pub body: BoxStream<'static, Result<Bytes, BackendError>>,
}

/// The two endpoints the form talks to.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search_resolutions(&self, url: &str) -> Result<SearchResult, BackendError>;
    async fn download(&self, req: &DownloadRequest) -> Result<DownloadResponse, BackendError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    fn name(&self) -> &'static str;
    async fn read_text(&self) -> Result<String, ClipboardError>;
}

/// Where a finished download ends up; returns a printable location.
#[async_trait]
pub trait SaveTarget: Send + Sync {
    async fn save(&self, filename: &str, blob: Bytes) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct BackendContext {
    pub base_url: Url,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
    pub headers: HashMap<String, String>,
}

impl BackendContext {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            user_agent: "tube-grabber/0.1".to_string(),
            timeout_secs: None,
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrontendCliConfig {
    pub backend_ctx: BackendContext,
    pub clipboard_cmd: Option<String>,
    pub out_dir: PathBuf,
}

pub trait CliPlugin: Send + Sync {
    fn name(&self) -> &'static str;
    fn augment_command(&self, cmd: Command) -> Command;
    fn apply_matches(&self, matches: &ArgMatches, cfg: &mut FrontendCliConfig) -> anyhow::Result<()>;
}

pub struct PluginRegistry {
    cli_plugins: Vec<Box<dyn CliPlugin>>,
}

impl PluginRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self { cli_plugins: vec![] };
        reg.cli_plugins.push(Box::new(crate::plugins::http::cli::HttpCliPlugin::new()));
        reg.cli_plugins.push(Box::new(crate::plugins::clipboard::ClipboardCliPlugin::new()));
        reg.cli_plugins.push(Box::new(crate::plugins::save::SaveCliPlugin::new()));
        reg
    }

    pub fn augment_command(&self, cmd: Command) -> Command {
        self.cli_plugins
            .iter()
            .fold(cmd, |c, p| p.augment_command(c))
    }

    pub fn apply_matches(&self, matches: &ArgMatches, cfg: &mut FrontendCliConfig) -> anyhow::Result<()> {
        for p in &self.cli_plugins {
            p.apply_matches(matches, cfg)
                .with_context(|| format!("invalid {} options", p.name()))?;
        }
        Ok(())
    }

    pub fn backend(&self, cfg: &FrontendCliConfig) -> anyhow::Result<Arc<dyn Backend>> {
        Ok(Arc::new(crate::plugins::http::backend::HttpBackend::new(cfg.backend_ctx.clone())?))
    }

    pub fn clipboard(&self, cfg: &FrontendCliConfig) -> Option<Arc<dyn Clipboard>> {
        let cb = match &cfg.clipboard_cmd {
            Some(cmd) => crate::plugins::clipboard::CommandClipboard::from_command_line(cmd),
            None => crate::plugins::clipboard::CommandClipboard::detect(),
        }?;
        Some(Arc::new(cb))
    }

    pub fn save_target(&self, cfg: &FrontendCliConfig) -> Arc<dyn SaveTarget> {
        Arc::new(crate::plugins::save::DirSaveTarget::new(cfg.out_dir.clone()))
    }
}
