use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which key makes a page unique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum PageScope {
    /// One page per URL, whoever scraped it first owns it
    #[default]
    Global,
    /// One page per URL and actor
    PerActor,
}

/// Identity a scrape runs on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub can_view_pages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Page {
    pub id: i64,
    pub url: String,
    pub name: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub name: String,
    pub page_id: i64,
}

/// Link row waiting to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub name: String,
}

/// Page row as the listing shows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PageSummary {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub total_links: i64,
    pub created_by: String,
}

/// One slice of a page's links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPage {
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub links: Vec<Link>,
}

impl LinkPage {
    pub fn has_other_pages(&self) -> bool {
        self.num_pages > 1
    }
}
