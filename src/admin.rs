//! Read and delete access to stored pages, scoped by who is asking.
use log2::info;
use serde::Serialize;
use thiserror::Error;

use crate::store::{Actor, LinkPage, Page, PageSummary, Store, StoreError, LINKS_PER_PAGE};

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{0} may not view pages")]
    CannotView(String),
    #[error("{0} may not delete pages")]
    CannotDelete(String),
    #[error("page {0} not found")]
    PageNotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDetail {
    pub page: Page,
    pub links: LinkPage,
}

impl PageDetail {
    pub fn total_links(&self) -> i64 {
        self.links.total
    }
}

fn ensure_can_view(actor: &Actor) -> Result<(), AccessError> {
    if actor.is_superuser || actor.can_view_pages {
        Ok(())
    } else {
        Err(AccessError::CannotView(actor.name.clone()))
    }
}

/// Superusers see every page, everyone else only their own
pub async fn list_pages(store: &Store, actor: &Actor) -> Result<Vec<PageSummary>, AccessError> {
    ensure_can_view(actor)?;
    let owner = (!actor.is_superuser).then_some(actor.id);
    Ok(store.list_pages(owner).await?)
}

/// Page plus slice `number` of its links. Pages the actor can't see look missing.
pub async fn show_page(store: &Store, actor: &Actor, id: i64, number: i64) -> Result<PageDetail, AccessError> {
    ensure_can_view(actor)?;
    let page = match store.page(id).await {
        Ok(page) => page,
        Err(StoreError::NotFound(_)) => return Err(AccessError::PageNotFound(id)),
        Err(e) => return Err(e.into()),
    };
    if !actor.is_superuser && page.created_by != actor.id {
        return Err(AccessError::PageNotFound(id));
    }
    let links = store.link_page(page.id, number, LINKS_PER_PAGE).await?;
    Ok(PageDetail { page, links })
}

/// Superuser only; links are removed with the page
pub async fn delete_page(store: &Store, actor: &Actor, id: i64) -> Result<(), AccessError> {
    if !actor.is_superuser {
        return Err(AccessError::CannotDelete(actor.name.clone()));
    }
    if !store.delete_page(id).await? {
        return Err(AccessError::PageNotFound(id));
    }
    info!("Page {} deleted by {}", id, actor.name);
    Ok(())
}
