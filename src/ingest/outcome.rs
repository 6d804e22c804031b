use serde::Serialize;

/// How the caller should present an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    Success,
    Info,
    Error,
}

/// Every way one ingest can end. Nothing here is fatal to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// New page stored together with its links
    Scraped { page_id: i64, links: u64 },
    /// Page was already known; nothing fetched, nothing written
    AlreadyExists { page_id: i64 },
    /// Upstream failed or answered with something other than 200
    BadResponse { status: u16 },
    /// Input could not be parsed as a URL
    InvalidUrl { reason: String },
    /// Page stored, link batch rejected
    LinksFailed { page_id: i64, reason: String },
    /// Page could not be stored; nothing persisted
    PageFailed { reason: String },
}

impl Outcome {
    pub fn status(&self) -> u16 {
        match self {
            Outcome::Scraped { .. } | Outcome::AlreadyExists { .. } => 200,
            Outcome::BadResponse { status } => *status,
            Outcome::InvalidUrl { .. } => 400,
            Outcome::LinksFailed { .. } | Outcome::PageFailed { .. } => 500,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Outcome::Scraped { .. } => Level::Success,
            Outcome::AlreadyExists { .. } => Level::Info,
            _ => Level::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.level() == Level::Success
    }

    /// Human readable line for the scrape of `url`
    pub fn message(&self, url: &str) -> String {
        match self {
            Outcome::Scraped { .. } => format!("Page {url} successfully scraped"),
            Outcome::AlreadyExists { .. } => format!("Page {url} already exists"),
            Outcome::BadResponse { .. } => format!("Page {url} bad response"),
            Outcome::InvalidUrl { reason } => format!("Invalid URL {url}: {reason}"),
            Outcome::LinksFailed { .. } => format!("Error scraping {url}"),
            Outcome::PageFailed { reason } => format!("Error {reason} creating the page {url}"),
        }
    }
}
