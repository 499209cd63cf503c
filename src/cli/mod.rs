//! Command-line interface for libris.
//!
//! Every invocation builds a fresh catalog from the configured documents,
//! runs one command against it, and exits.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{self, ResolvedConfig};
use crate::domain::{Document, User, UserKind};
use crate::library::{
    describe, describe_with_annotation, export_snapshot, BorrowLedger, Catalog, Indexer,
};

/// Longest simulated loan accepted by `borrow --days` (100 years)
const MAX_BORROW_DAYS: i64 = 36_500;

/// libris - in-memory document catalog
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents in the catalog
    List {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Search documents (all given filters must match)
    Search {
        /// Exact category
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive author substring
        #[arg(short, long)]
        author: Option<String>,

        /// Case-insensitive title substring
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Group documents by a field
    Group {
        /// Field to group by
        #[arg(short, long, value_enum, default_value = "category")]
        by: GroupKey,
    },

    /// Run the background indexer and print the titles it saw
    Index {
        /// Stop waiting after this many milliseconds (overrides config)
        #[arg(long, env = "LIBRIS_INDEX_TIMEOUT_MS")]
        timeout_ms: Option<u64>,
    },

    /// Describe a document by title
    Describe {
        /// Exact title
        title: String,

        /// Append the premium annotation
        #[arg(short, long)]
        premium: bool,
    },

    /// Borrow a document, then return it, showing ledger state
    Borrow {
        /// Borrower name
        user: String,

        /// Exact title
        title: String,

        /// Borrower kind
        #[arg(short, long, value_enum, default_value = "student")]
        kind: BorrowerKind,

        /// Simulate returning this many days after borrowing
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=MAX_BORROW_DAYS))]
        days: u32,
    },

    /// Export a snapshot of the catalog as JSON
    Export {
        /// Output file (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Field to group documents by
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupKey {
    Category,
    Author,
    Year,
    Kind,
}

impl GroupKey {
    fn key(self, doc: &Document) -> String {
        match self {
            GroupKey::Category => doc.category().to_string(),
            GroupKey::Author => doc.author().to_string(),
            GroupKey::Year => doc.year().to_string(),
            GroupKey::Kind => doc.kind().label().to_string(),
        }
    }
}

/// Borrower kind for CLI (maps to UserKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BorrowerKind {
    Student,
    Staff,
}

impl From<BorrowerKind> for UserKind {
    fn from(k: BorrowerKind) -> Self {
        match k {
            BorrowerKind::Student => UserKind::Student,
            BorrowerKind::Staff => UserKind::Staff,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::config()?;

        match self.command {
            Commands::List { category } => list_documents(cfg, category),
            Commands::Search {
                category,
                author,
                title,
            } => search_documents(cfg, category, author, title),
            Commands::Group { by } => group_documents(cfg, by),
            Commands::Index { timeout_ms } => run_indexer(cfg, timeout_ms),
            Commands::Describe { title, premium } => describe_document(cfg, &title, premium),
            Commands::Borrow {
                user,
                title,
                kind,
                days,
            } => borrow_document(cfg, &user, &title, kind.into(), days),
            Commands::Export { output, category } => export_documents(cfg, output, category).await,
            Commands::Config => show_config(cfg),
        }
    }
}

/// Build the catalog from configured documents
fn open_catalog(cfg: &ResolvedConfig) -> Result<Arc<Catalog>> {
    let catalog = Catalog::with_documents(cfg.build_documents()?)
        .context("Failed to populate catalog")?;
    Ok(Arc::new(catalog))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn print_table(docs: &[Arc<Document>]) {
    println!("{:<10} {:<12} {:<40} {:<20} {:>6}", "ID", "KIND", "TITLE", "AUTHOR", "YEAR");
    println!("{}", "-".repeat(92));

    for doc in docs {
        let id = doc.id().to_string();
        println!(
            "{:<10} {:<12} {:<40} {:<20} {:>6}",
            &id[..8],
            doc.kind().label(),
            truncate(doc.title(), 40),
            truncate(doc.author(), 20),
            doc.year()
        );
    }
}

/// List the catalog
fn list_documents(cfg: &ResolvedConfig, category: Option<String>) -> Result<()> {
    let catalog = open_catalog(cfg)?;

    let docs = match category {
        Some(category) => catalog.search(|d| d.category() == category)?,
        None => catalog.all()?,
    };

    if docs.is_empty() {
        println!("Catalog is empty. Add documents to .libris/config.yaml.");
        return Ok(());
    }

    print_table(&docs);
    println!("\nTotal: {} documents", catalog.len()?);

    Ok(())
}

/// Search the catalog
fn search_documents(
    cfg: &ResolvedConfig,
    category: Option<String>,
    author: Option<String>,
    title: Option<String>,
) -> Result<()> {
    let catalog = open_catalog(cfg)?;

    let author = author.map(|a| a.to_lowercase());
    let title = title.map(|t| t.to_lowercase());

    let results = catalog.search(|d| {
        category.as_deref().map_or(true, |c| d.category() == c)
            && author
                .as_deref()
                .map_or(true, |a| d.author().to_lowercase().contains(a))
            && title
                .as_deref()
                .map_or(true, |t| d.title().to_lowercase().contains(t))
    })?;

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s):\n", results.len());
    print_table(&results);

    Ok(())
}

/// Group the catalog
fn group_documents(cfg: &ResolvedConfig, by: GroupKey) -> Result<()> {
    let catalog = open_catalog(cfg)?;
    let index = catalog.group_by(|d| by.key(d))?;

    for (key, docs) in index.iter() {
        let label = if key.is_empty() { "(none)" } else { key };
        println!("{} ({}):", label, docs.len());
        for doc in docs {
            println!("  - {}", doc.title());
        }
    }

    println!("\n{} groups, {} documents", index.len(), index.total());

    Ok(())
}

/// Run the indexer on its own thread and wait for it
fn run_indexer(cfg: &ResolvedConfig, timeout_ms: Option<u64>) -> Result<()> {
    let catalog = open_catalog(cfg)?;

    let timeout = timeout_ms.map(Duration::from_millis).or(cfg.indexer_timeout);
    let titles = match timeout {
        Some(timeout) => Indexer::run_with_deadline(catalog, timeout)?,
        None => Indexer::run(catalog)?,
    };

    for title in &titles {
        println!("Indexing: {}", title);
    }
    println!("\nIndexed {} documents", titles.len());

    Ok(())
}

/// Describe one document
fn describe_document(cfg: &ResolvedConfig, title: &str, premium: bool) -> Result<()> {
    let catalog = open_catalog(cfg)?;
    let doc = catalog.find_by_title(title)?;

    if premium {
        println!("{}", describe_with_annotation(&doc, &cfg.premium_label));
    } else {
        println!("{}", describe(&doc));
    }

    Ok(())
}

/// Walk one document through a borrow and return
fn borrow_document(
    cfg: &ResolvedConfig,
    user_name: &str,
    title: &str,
    kind: UserKind,
    days: u32,
) -> Result<()> {
    let catalog = open_catalog(cfg)?;
    let ledger = BorrowLedger::with_policy(cfg.lending.clone());
    let user = User::new(user_name, kind)?;
    let doc = catalog.find_by_title(title)?;

    let borrowed_at = days_ago(days)?;
    ledger.borrow_at(&user, &doc, borrowed_at);

    println!("{} ({}) borrows {}", user.name(), user.kind(), doc.title());
    println!("  Status:   {}", ledger.status(&doc));
    println!("  Holding:  {} document(s)", ledger.borrowed(&user).len());

    let loan = ledger.return_item(&user, &doc)?;
    let fee = ledger.overdue_fee(&loan, &user, Utc::now());

    println!("{} returned after {} day(s)", doc.title(), days);
    println!("  Due:      {}", loan.due_at(user.kind(), ledger.policy()).format("%Y-%m-%d"));
    println!("  Late fee: {:.2}", fee);
    println!("  Status:   {}", ledger.status(&doc));

    Ok(())
}

/// The instant `days` days before now
fn days_ago(days: u32) -> Result<DateTime<Utc>> {
    chrono::Duration::try_days(i64::from(days))
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .with_context(|| format!("{} days before now is out of range", days))
}

/// Export a snapshot to JSON
async fn export_documents(
    cfg: &ResolvedConfig,
    output: Option<PathBuf>,
    category: Option<String>,
) -> Result<()> {
    let catalog = open_catalog(cfg)?;

    let docs = match category {
        Some(category) => catalog.search(|d| d.category() == category)?,
        None => catalog.all()?,
    };

    let path = match output {
        Some(path) => path,
        None => cfg
            .exports
            .join(format!("catalog-{}.json", Utc::now().format("%Y%m%dT%H%M%S"))),
    };

    export_snapshot(&docs, &path).await?;
    println!("Exported {} documents to {}", docs.len(), path.display());

    Ok(())
}

/// Show resolved configuration
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("libris configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Exports: {}", cfg.exports.display());
    println!();
    println!("Lending:");
    println!("  Late fee per day:  {:.2}", cfg.lending.late_fee_per_day);
    println!("  Student loan days: {}", cfg.lending.student_loan_days);
    println!("  Staff loan days:   {}", cfg.lending.staff_loan_days);
    println!();
    println!(
        "Indexer timeout: {}",
        cfg.indexer_timeout
            .map(|t| format!("{}ms", t.as_millis()))
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Premium label:   {}", cfg.premium_label);
    println!("Documents:       {}", cfg.documents.len());

    Ok(())
}
