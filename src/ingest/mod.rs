//! One scrape, end to end: look the page up, fetch it, store it with its links.
pub mod outcome;


pub use outcome::{Level, Outcome};

use std::collections::HashSet;

use log2::{debug, error, info, warn};
use reqwest::Client;
use url::Url;

use crate::fetcher::{fetch_and_extract, FetchConfig, LinkCandidate};
use crate::store::{Actor, NewLink, Store};

pub struct Ingestor {
    client: Client,
    store: Store,
    config: FetchConfig,
}

impl Ingestor {
    pub fn new(store: Store, config: FetchConfig) -> Self {
        Self::with_client(Client::new(), store, config)
    }

    pub fn with_client(client: Client, store: Store, config: FetchConfig) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Scrapes `url` on behalf of `actor`.
    /// A page that already exists is left alone and is not fetched again.
    pub async fn ingest(&self, url: &str, actor: &Actor) -> Outcome {
        let url = url.trim();
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Rejected {:?}: {}", url, e);
                return Outcome::InvalidUrl {
                    reason: e.to_string(),
                };
            }
        };

        match self.store.find_page(url, actor).await {
            Ok(Some(page)) => {
                info!("Page {} already exists", url);
                return Outcome::AlreadyExists { page_id: page.id };
            }
            Ok(None) => {}
            Err(e) => {
                error!("Error {} looking up the page {}", e, url);
                return Outcome::PageFailed {
                    reason: e.to_string(),
                };
            }
        }

        // fetch_and_extract already logged the failure
        let extraction = match fetch_and_extract(&parsed, &self.client, &self.config).await {
            Ok(extraction) => extraction,
            Err(e) => return Outcome::BadResponse { status: e.status() },
        };
        if extraction.status != 200 {
            debug!("Page {} answered {}, not storing", url, extraction.status);
            return Outcome::BadResponse {
                status: extraction.status,
            };
        }

        let name = if extraction.title.is_empty() {
            url
        } else {
            extraction.title.as_str()
        };
        let page = match self.store.create_page(url, name, actor).await {
            Ok(page) => page,
            Err(e) => {
                error!("Error {} creating the page {}", e, url);
                return Outcome::PageFailed {
                    reason: e.to_string(),
                };
            }
        };

        let links = dedupe_links(extraction.links);
        match self.store.insert_links(page.id, &links).await {
            Ok(inserted) => {
                info!("Page {} scraped with {} links", url, inserted);
                Outcome::Scraped {
                    page_id: page.id,
                    links: inserted,
                }
            }
            Err(e) => {
                error!("Error creating links for {}: {}", url, e);
                Outcome::LinksFailed {
                    page_id: page.id,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Keeps the first candidate for each URL and names it by its text,
/// or by the URL itself when there is no text.
pub fn dedupe_links(candidates: Vec<LinkCandidate>) -> Vec<NewLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::with_capacity(candidates.len());
    for LinkCandidate { url, text } in candidates {
        if !seen.insert(url.clone()) {
            debug!("Dropped repeated link {}", url);
            continue;
        }
        let name = if text.is_empty() { url.clone() } else { text };
        links.push(NewLink { url, name });
    }
    links
}
