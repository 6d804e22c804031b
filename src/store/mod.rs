//! SQLite persistence for actors, pages and their links.
//!
//! Pages are unique per URL or per (URL, actor) depending on [`PageScope`];
//! links are unique per (URL, page) and are removed together with their page.
//! Every constraint failure surfaces as [`StoreError::Integrity`] so callers
//! can tell a rejected write from a broken database.
use std::str::FromStr;

use log2::debug;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;

pub mod models;


pub use models::{Actor, Link, LinkPage, NewLink, Page, PageScope, PageSummary};

/// Primary result code SQLite uses for every constraint failure
const SQLITE_CONSTRAINT: i32 = 19;

/// Rows per INSERT statement, keeps binds under SQLite's variable limit
const LINK_INSERT_CHUNK: usize = 500;

/// Links per slice on the page detail view
pub const LINKS_PER_PAGE: i64 = 10;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS actors (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        name           TEXT    NOT NULL UNIQUE,
        is_staff       INTEGER NOT NULL DEFAULT 0,
        is_superuser   INTEGER NOT NULL DEFAULT 0,
        can_view_pages INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pages (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        url        TEXT    NOT NULL,
        name       TEXT    NOT NULL DEFAULT '',
        created_by INTEGER NOT NULL REFERENCES actors(id) ON DELETE CASCADE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS links (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        url     TEXT    NOT NULL,
        name    TEXT    NOT NULL,
        page_id INTEGER NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
        UNIQUE (url, page_id)
    )"#,
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("integrity error: {0}")]
    Integrity(#[source] sqlx::Error),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("cannot switch to global page scope: {0} URLs are stored for more than one actor")]
    ScopeConflict(i64),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if is_integrity_violation(&e) {
            StoreError::Integrity(e)
        } else {
            StoreError::Database(e)
        }
    }
}

fn is_integrity_violation(e: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db) = e else {
        return false;
    };
    if !matches!(db.kind(), sqlx::error::ErrorKind::Other) {
        return true;
    }
    // trigger aborts and other extended codes still carry the primary code
    db.code()
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| code & 0xff == SQLITE_CONSTRAINT)
}

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    scope: PageScope,
}

impl Store {
    /// Opens (creating if needed) the database at `database_url` and brings the schema up to date
    pub async fn connect(database_url: &str, scope: PageScope) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::with_pool(pool, scope).await
    }

    /// Private database living as long as the store; used by tests
    pub async fn in_memory(scope: PageScope) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        // every connection would get its own memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool, scope).await
    }

    pub async fn with_pool(pool: SqlitePool, scope: PageScope) -> Result<Self, StoreError> {
        let store = Self { pool, scope };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        if self.scope == PageScope::Global {
            // per-actor data may hold the same URL twice
            let shared: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM (SELECT url FROM pages GROUP BY url HAVING COUNT(*) > 1)",
            )
            .fetch_one(&self.pool)
            .await?;
            if shared > 0 {
                return Err(StoreError::ScopeConflict(shared));
            }
        }
        let (stale, current) = match self.scope {
            PageScope::Global => (
                "DROP INDEX IF EXISTS pages_url_owner_key",
                "CREATE UNIQUE INDEX IF NOT EXISTS pages_url_key ON pages(url)",
            ),
            PageScope::PerActor => (
                "DROP INDEX IF EXISTS pages_url_key",
                "CREATE UNIQUE INDEX IF NOT EXISTS pages_url_owner_key ON pages(url, created_by)",
            ),
        };
        sqlx::query(stale).execute(&self.pool).await?;
        sqlx::query(current).execute(&self.pool).await?;
        debug!("Schema ready, page scope {:?}", self.scope);
        Ok(())
    }

    pub fn scope(&self) -> PageScope {
        self.scope
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // actors

    pub async fn create_actor(&self, name: &str, is_superuser: bool) -> Result<Actor, StoreError> {
        let result = sqlx::query(
            "INSERT INTO actors (name, is_staff, is_superuser) VALUES (?1, ?2, ?2)",
        )
        .bind(name)
        .bind(is_superuser)
        .execute(&self.pool)
        .await?;
        self.actor(result.last_insert_rowid()).await
    }

    pub async fn actor(&self, id: i64) -> Result<Actor, StoreError> {
        sqlx::query_as::<_, Actor>(
            "SELECT id, name, is_staff, is_superuser, can_view_pages FROM actors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("actor {id}")))
    }

    pub async fn find_actor(&self, name: &str) -> Result<Option<Actor>, StoreError> {
        let actor = sqlx::query_as::<_, Actor>(
            "SELECT id, name, is_staff, is_superuser, can_view_pages FROM actors WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(actor)
    }

    /// Marks the actor as staff allowed to view pages
    pub async fn grant_view_pages(&self, actor_id: i64) -> Result<Actor, StoreError> {
        let result = sqlx::query("UPDATE actors SET is_staff = 1, can_view_pages = 1 WHERE id = ?")
            .bind(actor_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("actor {actor_id}")));
        }
        self.actor(actor_id).await
    }

    // pages

    /// Looks the page up by the key the configured scope uses
    pub async fn find_page(&self, url: &str, owner: &Actor) -> Result<Option<Page>, StoreError> {
        let query = match self.scope {
            PageScope::Global => sqlx::query_as::<_, Page>(
                "SELECT id, url, name, created_by FROM pages WHERE url = ?1",
            )
            .bind(url),
            PageScope::PerActor => sqlx::query_as::<_, Page>(
                "SELECT id, url, name, created_by FROM pages WHERE url = ?1 AND created_by = ?2",
            )
            .bind(url)
            .bind(owner.id),
        };
        Ok(query.fetch_optional(&self.pool).await?)
    }

    /// Plain insert; the unique index rejects a page that already exists
    pub async fn create_page(&self, url: &str, name: &str, owner: &Actor) -> Result<Page, StoreError> {
        let result = sqlx::query("INSERT INTO pages (url, name, created_by) VALUES (?, ?, ?)")
            .bind(url)
            .bind(name)
            .bind(owner.id)
            .execute(&self.pool)
            .await?;
        Ok(Page {
            id: result.last_insert_rowid(),
            url: url.to_string(),
            name: name.to_string(),
            created_by: owner.id,
        })
    }

    pub async fn page(&self, id: i64) -> Result<Page, StoreError> {
        sqlx::query_as::<_, Page>("SELECT id, url, name, created_by FROM pages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("page {id}")))
    }

    /// Pages with their link count, newest first. `owner` narrows to one actor.
    pub async fn list_pages(&self, owner: Option<i64>) -> Result<Vec<PageSummary>, StoreError> {
        let pages = sqlx::query_as::<_, PageSummary>(
            r#"SELECT p.id, p.name, p.url, COUNT(l.id) AS total_links, a.name AS created_by
               FROM pages p
               JOIN actors a ON a.id = p.created_by
               LEFT JOIN links l ON l.page_id = p.id
               WHERE ?1 IS NULL OR p.created_by = ?1
               GROUP BY p.id
               ORDER BY p.id DESC"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(pages)
    }

    /// Deletes the page; its links go with it. Returns false if there was nothing to delete.
    pub async fn delete_page(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // links

    /// Inserts all links in one transaction. On any failure nothing is kept.
    pub async fn insert_links(&self, page_id: i64, links: &[NewLink]) -> Result<u64, StoreError> {
        if links.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for chunk in links.chunks(LINK_INSERT_CHUNK) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO links (url, name, page_id) ");
            builder.push_values(chunk, |mut row, link| {
                row.push_bind(link.url.clone())
                    .push_bind(link.name.clone())
                    .push_bind(page_id);
            });
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        debug!("Inserted {} links for page {}", inserted, page_id);
        Ok(inserted)
    }

    pub async fn links(&self, page_id: i64) -> Result<Vec<Link>, StoreError> {
        let links = sqlx::query_as::<_, Link>(
            "SELECT id, url, name, page_id FROM links WHERE page_id = ? ORDER BY id",
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    pub async fn total_links(&self, page_id: i64) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE page_id = ?")
            .bind(page_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Slice `number` (1-based) of the page's links. Out of range numbers clamp
    /// to the first or last slice; an empty page still has one empty slice.
    pub async fn link_page(&self, page_id: i64, number: i64, per_page: i64) -> Result<LinkPage, StoreError> {
        let per_page = per_page.max(1);
        let total = self.total_links(page_id).await?;
        let num_pages = ((total + per_page - 1) / per_page).max(1);
        let number = number.clamp(1, num_pages);

        let links = sqlx::query_as::<_, Link>(
            "SELECT id, url, name, page_id FROM links WHERE page_id = ? ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(page_id)
        .bind(per_page)
        .bind((number - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        Ok(LinkPage {
            number,
            num_pages,
            total,
            links,
        })
    }
}
