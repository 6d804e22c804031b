use log2::debug;
use scraper::{Html, Selector};
use url::Url;

use super::fetch::FetchError;

/// One qualifying anchor: resolved target and its trimmed, truncated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub url: String,
    pub text: String,
}

impl LinkCandidate {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// Title and anchors pulled out of a document, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub links: Vec<LinkCandidate>,
}

/// Joins `href` onto `base` (relative paths, `//host` forms, bare `?query`
/// and `#fragment`, same-scheme forms like `https:foo`). An href that is
/// already absolute and resolves to itself is kept as written.
/// Returns `None` when it can't be resolved.
pub fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    let joined = match base.join(href) {
        Ok(joined) => joined,
        Err(e) => {
            debug!("Skipped unresolvable href {:?} on {}: {}", href, base, e);
            return None;
        }
    };
    match Url::parse(href) {
        Ok(parsed) if parsed == joined => Some(href.to_string()),
        _ => Some(joined.to_string()),
    }
}

/// Cuts `text` to at most `max_chars` characters, never inside a code point
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn selector(css: &'static str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Selector {
        selector: css,
        reason: e.to_string(),
    })
}

/// Parses `html` and collects the document title plus every anchor that has
/// an `href` and non-blank text. Anchors that don't qualify are skipped.
/// Duplicate targets are kept; callers decide what to do with them.
pub fn extract(html: &str, base: &Url, max_text_len: usize) -> Result<Extracted, FetchError> {
    let document = Html::parse_document(html);
    let title_selector = selector("title")?;
    let anchor_selector = selector("a[href]")?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut links = Vec::new();
    for element in document.select(&anchor_selector) {
        let text = element.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(url) = resolve_href(href, base) {
            links.push(LinkCandidate::new(url, truncate_text(text, max_text_len)));
        }
    }

    Ok(Extracted { title, links })
}
