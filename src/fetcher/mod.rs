pub mod config;
pub mod extract;
pub mod fetch;


pub use config::{FetchConfig, MAX_LINK_TEXT_LEN, PAGE_REQUEST_TIMEOUT_SEC};
pub use extract::{extract, resolve_href, truncate_text, Extracted, LinkCandidate};
pub use fetch::{fetch_and_extract, Extraction, FetchError, FALLBACK_STATUS};
