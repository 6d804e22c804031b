use clap::{Parser, Subcommand, ValueEnum};
use page_scraper::fetcher::PAGE_REQUEST_TIMEOUT_SEC;
use page_scraper::store::PageScope;
use serde::{Deserialize, Serialize};
/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
/// Program arguments. What to do is picked by the subcommand,
/// where to store and how long to wait by the global options.
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// SQLite database holding actors, pages and links
    #[arg(long, default_value = "sqlite://scraper.db")]
    pub database_url: String,
    /// Whether a URL is unique overall or per actor
    #[arg(long, default_value = "global", value_enum)]
    pub scope: PageScope,
    /// Page request timeout in seconds
    #[arg(short, long, default_value_t = PAGE_REQUEST_TIMEOUT_SEC)]
    pub timeout: u64,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Fetch a page and store it with its links
    Scrape {
        url: String,
        /// Actor the page is stored for
        #[arg(short, long)]
        actor: String,
    },
    /// List the pages the actor can see
    Pages {
        #[arg(short, long)]
        actor: String,
    },
    /// Show one page and a slice of its links
    Show {
        id: i64,
        #[arg(short, long)]
        actor: String,
        /// Slice of links to show, 10 per slice
        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Delete a page and its links (superusers only)
    Delete {
        id: i64,
        #[arg(short, long)]
        actor: String,
    },
    /// Register an actor
    Actor {
        name: String,
        #[arg(long)]
        superuser: bool,
    },
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout == 0 {
            anyhow::bail!("timeout must be greater than 0");
        }
        Ok(())
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
