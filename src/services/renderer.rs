// src/services/renderer.rs

//! Page rendering capability.
//!
//! A [`Renderer`] hands out one [`RenderSession`] per poll cycle. Sessions
//! are never reused; the coordinator closes each one before the cycle ends.
//!
//! [`HttpRenderer`] is the bundled implementation: it fetches the status
//! page over HTTP and reads one label attribute per complaint element.
//! It never executes scripts, so pages that build their list client-side
//! need a browser-backed [`Renderer`] instead.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::utils::http;

/// Source of per-cycle render sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Acquire a fresh session. Any error here is treated as fatal.
    async fn open(&self) -> Result<Box<dyn RenderSession>>;
}

/// A single-cycle handle on the rendered page.
#[async_trait]
pub trait RenderSession: Send {
    /// Return raw complaint labels, waiting at most `wait` for them to appear.
    async fn fetch_labels(&mut self, wait: Duration) -> Result<Vec<String>>;

    /// Release the session. Called exactly once per opened session.
    async fn close(&mut self) -> Result<()>;
}

/// Renderer that reads labels straight from the served HTML.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    source: SourceConfig,
}

impl HttpRenderer {
    pub fn new(source: SourceConfig) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>> {
        parse_selector(&self.source.item_selector)
            .map_err(|e| AppError::renderer_init(e.to_string()))?;
        let client = http::create_async_client(&self.source)
            .map_err(|e| AppError::renderer_init(e.to_string()))?;

        log::debug!("Opened HTTP render session for {}", self.source.url);
        Ok(Box::new(HttpSession {
            client: Some(client),
            source: self.source.clone(),
        }))
    }
}

/// One HTTP session; owns its own client so nothing leaks across cycles.
struct HttpSession {
    client: Option<reqwest::Client>,
    source: SourceConfig,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn fetch_labels(&mut self, wait: Duration) -> Result<Vec<String>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::config("render session already closed"))?;

        match tokio::time::timeout(wait, wait_for_labels(client, &self.source)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::FetchTimeout {
                url: self.source.url.clone(),
                waited_ms: wait.as_millis(),
            }),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.client.take().is_some() {
            log::debug!("Closed HTTP render session for {}", self.source.url);
        }
        Ok(())
    }
}

/// Re-fetch the page until at least one complaint element is present.
async fn wait_for_labels(client: &reqwest::Client, source: &SourceConfig) -> Result<Vec<String>> {
    loop {
        let body = http::fetch_text(client, &source.url).await?;
        if let Some(labels) = extract_labels(&body, &source.item_selector, &source.label_attr)? {
            return Ok(labels);
        }

        log::debug!(
            "No complaint elements yet at {}, retrying in {}ms",
            source.url,
            source.poll_interval_ms
        );
        tokio::time::sleep(source.poll_interval()).await;
    }
}

/// Collect label attributes from matching elements.
///
/// Returns `None` when no element matches, so callers can keep waiting.
/// Elements without the attribute are skipped.
pub fn extract_labels(html: &str, item_selector: &str, attr: &str) -> Result<Option<Vec<String>>> {
    let selector = parse_selector(item_selector)?;
    let document = Html::parse_document(html);

    let mut found = 0usize;
    let mut labels = Vec::new();
    for element in document.select(&selector) {
        found += 1;
        match element.value().attr(attr) {
            Some(label) => labels.push(label.to_string()),
            None => log::debug!("Complaint element without '{}' attribute skipped", attr),
        }
    }

    Ok((found > 0).then_some(labels))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
