use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_DISPOSITION, CONTENT_LENGTH, USER_AGENT};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::core::model::{DownloadRequest, SearchResult};
use crate::plugins::registry::{Backend, BackendContext, BackendError, DownloadResponse};

const SEARCH_PATH: &str = "api/search-resolutions";
const DOWNLOAD_PATH: &str = "api/download";
const SEARCH_FALLBACK: &str = "Failed to fetch resolutions";
const DOWNLOAD_FALLBACK: &str = "Download failed";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct SearchBody<'a> {
    url: &'a str,
}

pub struct HttpBackend {
    client: reqwest::Client,
    ctx: BackendContext,
    headers: HeaderMap,
    search_url: Url,
    download_url: Url,
}

impl HttpBackend {
    pub fn new(ctx: BackendContext) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        let headers = Self::build_headers(&ctx)?;
        let search_url = ctx.base_url.join(SEARCH_PATH)?;
        let download_url = ctx.base_url.join(DOWNLOAD_PATH)?;
        Ok(Self { client, ctx, headers, search_url, download_url })
    }

    fn build_headers(ctx: &BackendContext) -> anyhow::Result<HeaderMap> {
        let mut h = HeaderMap::new();
        h.insert(USER_AGENT, HeaderValue::from_str(&ctx.user_agent)?);
        for (k, v) in &ctx.headers {
            let name = HeaderName::from_bytes(k.as_bytes())?;
            let value = HeaderValue::from_str(v)?;
            h.insert(name, value);
        }
        Ok(h)
    }

    fn post(&self, url: &Url) -> RequestBuilder {
        let req = self.client.post(url.clone()).headers(self.headers.clone());
        match self.ctx.timeout_secs {
            Some(secs) => req.timeout(Duration::from_secs(secs)),
            None => req,
        }
    }

    /// Turns a non-2xx answer into the server's `{error}` message.
    async fn server_error(resp: Response, fallback: &str) -> BackendError {
        let status = resp.status().as_u16();
        let message = match resp.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string()),
            Err(e) => {
                warn!("reading error body failed: {}", e);
                fallback.to_string()
            }
        };
        BackendError::Server { status, message }
    }

    /// Header bytes read as latin-1, the way browsers expose them.
    fn header_str(resp: &Response, name: HeaderName) -> Option<String> {
        resp.headers()
            .get(name)
            .map(|v| v.as_bytes().iter().map(|&b| b as char).collect())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn name(&self) -> &'static str { "http-backend" }

    async fn search_resolutions(&self, url: &str) -> Result<SearchResult, BackendError> {
        debug!(endpoint = %self.search_url, %url, "search request");
        let resp = self.post(&self.search_url).json(&SearchBody { url }).send().await?;

        if !resp.status().is_success() {
            return Err(Self::server_error(resp, SEARCH_FALLBACK).await);
        }

        let body = resp.bytes().await?;
        serde_json::from_slice::<SearchResult>(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn download(&self, req: &DownloadRequest) -> Result<DownloadResponse, BackendError> {
        debug!(endpoint = %self.download_url, url = %req.url, kind = %req.kind, "download request");
        let resp = self.post(&self.download_url).json(req).send().await?;

        if !resp.status().is_success() {
            return Err(Self::server_error(resp, DOWNLOAD_FALLBACK).await);
        }

        let content_length = Self::header_str(&resp, CONTENT_LENGTH).and_then(|s| s.trim().parse::<u64>().ok());
        let content_disposition = Self::header_str(&resp, CONTENT_DISPOSITION);
        let body = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(BackendError::from))
            .boxed();

        Ok(DownloadResponse { content_length, content_disposition, body })
    }
}
