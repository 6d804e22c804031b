use std::time::Duration;

/// Default timeout for the page request in seconds
pub const PAGE_REQUEST_TIMEOUT_SEC: u64 = 5;

/// Longest link text kept, in characters
pub const MAX_LINK_TEXT_LEN: usize = 126;

/// Configuration for a single fetch
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub request_timeout_sec: u64,
    pub max_text_len: usize,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self {
            request_timeout_sec: PAGE_REQUEST_TIMEOUT_SEC,
            max_text_len: MAX_LINK_TEXT_LEN,
        }
    }

    pub fn with_timeout(mut self, timeout_sec: u64) -> Self {
        self.request_timeout_sec = timeout_sec;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}
