use log2::{error, info};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use super::config::FetchConfig;
use super::extract::{extract, LinkCandidate};

/// Status reported when the request failed before any response arrived
pub const FALLBACK_STATUS: u16 = 500;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error fetching {url}: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("Error fetching {url}: {status}")]
    Status { url: Url, status: StatusCode },
    #[error("Failed to parse <{selector}> selector: {reason}")]
    Selector {
        selector: &'static str,
        reason: String,
    },
}

impl FetchError {
    /// Status of the upstream response if one was received, 500 otherwise
    pub fn status(&self) -> u16 {
        match self {
            FetchError::Request { source, .. } => source
                .status()
                .map(|status| status.as_u16())
                .unwrap_or(FALLBACK_STATUS),
            FetchError::Status { status, .. } => status.as_u16(),
            FetchError::Selector { .. } => FALLBACK_STATUS,
        }
    }
}

/// Everything one successful fetch yields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub title: String,
    pub status: u16,
    pub links: Vec<LinkCandidate>,
}

/// Issues exactly one GET for `url` and extracts title and links from the body.
/// Relative hrefs resolve against `url` itself, not against any redirect target.
/// Failures are logged here once and handed back to the caller.
pub async fn fetch_and_extract(
    url: &Url,
    client: &Client,
    config: &FetchConfig,
) -> Result<Extraction, FetchError> {
    let result = fetch(url, client, config).await;
    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

async fn fetch(url: &Url, client: &Client, config: &FetchConfig) -> Result<Extraction, FetchError> {
    let request_error = |source: reqwest::Error| FetchError::Request {
        url: url.clone(),
        source,
    };

    let response = client
        .get(url.clone())
        .timeout(config.timeout())
        .send()
        .await
        .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.clone(),
            status,
        });
    }

    let html = response.text().await.map_err(request_error)?;
    let extracted = extract(&html, url, config.max_text_len)?;

    info!("Found {} links on page {}", extracted.links.len(), url);

    Ok(Extraction {
        title: extracted.title,
        status: status.as_u16(),
        links: extracted.links,
    })
}
