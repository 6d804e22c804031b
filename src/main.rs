mod config;

use anyhow::{Context, Result};
use log2::*;
use page_scraper::fetcher::FetchConfig;
use page_scraper::ingest::{Ingestor, Level};
use page_scraper::store::{Actor, Store};
use page_scraper::{accounts, admin};
use std::time::Instant;

use config::Command;

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

async fn find_actor(store: &Store, name: &str) -> Result<Actor> {
    store
        .find_actor(name)
        .await?
        .with_context(|| format!("unknown actor {name}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    cfg.validate()?;
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("page_scraper"))
        .compress(false)
        .level(cfg.log_level.to_string())
        .start();

    let store = Store::connect(&cfg.database_url, cfg.scope).await?;

    match &cfg.command {
        Command::Scrape { url, actor } => {
            let actor = find_actor(&store, actor).await?;
            let ingestor = Ingestor::new(store, FetchConfig::new().with_timeout(cfg.timeout));
            let outcome = ingestor.ingest(url, &actor).await;
            debug!("Scrape of {} took {:?}", url, START_TIME.elapsed());
            let message = outcome.message(url);
            match outcome.level() {
                Level::Error => anyhow::bail!("{} (status {})", message, outcome.status()),
                Level::Success | Level::Info => println!("{}", message),
            }
        }
        Command::Pages { actor } => {
            let actor = find_actor(&store, actor).await?;
            for page in admin::list_pages(&store, &actor).await? {
                if actor.is_superuser {
                    println!("{}\t{}\t{}\t{}\t{}", page.id, page.name, page.url, page.total_links, page.created_by);
                } else {
                    println!("{}\t{}\t{}\t{}", page.id, page.name, page.url, page.total_links);
                }
            }
        }
        Command::Show { id, actor, page } => {
            let actor = find_actor(&store, actor).await?;
            let detail = admin::show_page(&store, &actor, *id, *page).await?;
            println!("{}\n{}\n{} links", detail.page.name, detail.page.url, detail.total_links());
            for link in &detail.links.links {
                println!("  {}\t{}", link.name, link.url);
            }
            if detail.links.has_other_pages() {
                println!("page {} of {}", detail.links.number, detail.links.num_pages);
            }
        }
        Command::Delete { id, actor } => {
            let actor = find_actor(&store, actor).await?;
            admin::delete_page(&store, &actor, *id).await?;
            println!("Page {} deleted", id);
        }
        Command::Actor { name, superuser } => {
            let actor = accounts::register_actor(&store, name, *superuser).await?;
            println!("Actor {} registered", actor.name);
        }
    }

    Ok(())
}
