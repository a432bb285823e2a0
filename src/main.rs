use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use card_catalog::batch::{BatchRunner, RunSummary};
use card_catalog::error::Result;
use card_catalog::http::Http;
use card_catalog::models::Card;
use card_catalog::provider::TcgdexClient;
use card_catalog::{catalog, config, csv_view, jobs, migrate, review, rules, store};

#[derive(Parser)]
#[command(name = "card-catalog", about = "Maintain a trading-card collection catalog")]
struct Cli {
    /// Catalog file to read (`.gz` is decompressed)
    #[arg(long, short = 'c', global = true)]
    catalog: Option<PathBuf>,

    /// Where to write the updated catalog (defaults to --catalog)
    #[arg(long, short = 'o', global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Flatten the catalog to one spreadsheet row per variation
    ToCsv { csv: PathBuf },
    /// Rebuild the catalog from a spreadsheet written by to-csv
    FromCsv { csv: PathBuf },
    /// Convert variations from the legacy `owned` status schema
    Migrate,
    /// Apply the language-availability rule table
    FixLanguages,
    /// List variations whose available languages need review
    LanguageReport { csv: PathBuf },
    /// Write a variation review sheet
    ReviewExport { csv: PathBuf },
    /// Apply an edited variation review sheet
    ReviewApply { csv: PathBuf },
    /// Apply hand-written variation maps keyed by card name
    Overrides { file: PathBuf },
    /// Refresh variations from TCGdex
    SyncTcgdex {
        #[arg(long, default_value = config::DEFAULT_ILLUSTRATOR)]
        illustrator: String,
        /// Directory for cached API responses
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        /// Use cached responses only
        #[arg(long)]
        offline: bool,
        /// Drop cached responses before fetching
        #[arg(long, conflicts_with = "offline")]
        clear_cache: bool,
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Propose variations from era defaults and scraped card pages
    EnrichWeb {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Find image URLs for cards that have none
    FillImages {
        #[command(flatten)]
        batch: BatchArgs,
    },
}

#[derive(Args)]
struct BatchArgs {
    /// Milliseconds between two requests
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Request timeout in seconds
    #[arg(long, default_value_t = config::REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,
    /// Index of the first card to process
    #[arg(long, default_value_t = 0)]
    start_from: usize,
    /// Save progress every N cards
    #[arg(long, default_value_t = config::CHECKPOINT_EVERY)]
    checkpoint_every: usize,
}

impl BatchArgs {
    fn delay(&self, default: Duration) -> Duration {
        self.delay_ms.map(Duration::from_millis).unwrap_or(default)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn runner(&self, output: &Path) -> BatchRunner {
        let interrupt = Arc::new(AtomicBool::new(false));
        let flag = interrupt.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            log::warn!("Could not install Ctrl-C handler: {}", e);
        }
        BatchRunner::new()
            .checkpoint(output, self.checkpoint_every)
            .start_from(self.start_from)
            .interrupt_flag(interrupt)
    }
}

fn print_summary(label: &str, summary: &RunSummary) {
    println!("{label}: {summary}");
}

fn run(cli: Cli) -> Result<()> {
    let catalog_path = cli.catalog.unwrap_or_else(config::default_catalog_path);
    let output = cli.output.unwrap_or_else(|| catalog_path.clone());
    let load = || store::load_catalog(&catalog_path);
    let save = |cards: &[Card]| store::save_catalog(&output, cards);

    match cli.command {
        Command::ToCsv { csv } => {
            let cards = load()?;
            let rows = csv_view::write_sheet_file(&csv, &cards)?;
            println!("Converted {} cards ({} variations) to {}", cards.len(), rows, csv.display());
        }
        Command::FromCsv { csv } => {
            let import = csv_view::read_sheet_file(&csv)?;
            save(&import.cards)?;
            let summary = RunSummary {
                processed: import.cards.len(),
                created: import.cards.len(),
                ..RunSummary::default()
            };
            print_summary("from-csv", &summary);
            println!("{} malformed cells replaced with defaults", import.malformed.len());
        }
        Command::Migrate => {
            let mut cards = load()?;
            let report = migrate::migrate_catalog(&mut cards);
            save(&cards)?;
            println!(
                "Migrated {} variations in {} of {} cards",
                report.variations_migrated,
                report.cards_touched,
                cards.len()
            );
        }
        Command::FixLanguages => {
            let mut cards = load()?;
            let fixes = rules::apply_language_rules(&mut cards, rules::LANGUAGE_RULES);
            save(&cards)?;
            println!("Auto-fixed {} variations", fixes.len());
        }
        Command::LanguageReport { csv } => {
            let cards = load()?;
            let items = review::language_review(&cards);
            review::write_language_review(&items, BufWriter::new(File::create(&csv)?))?;
            let findings = catalog::audit(&cards);
            for f in &findings {
                log::warn!("{} ({}) - {}: {:?}", f.card_name, f.card_id, f.variation, f.issue);
            }
            println!(
                "{} variations need language review ({} invariant findings); exported to {}",
                items.len(),
                findings.len(),
                csv.display()
            );
        }
        Command::ReviewExport { csv } => {
            let cards = load()?;
            review::write_review_sheet(&cards, BufWriter::new(File::create(&csv)?))?;
            println!("Wrote review sheet for {} cards to {}", cards.len(), csv.display());
        }
        Command::ReviewApply { csv } => {
            let cards = load()?;
            let actions = review::read_review_sheet(File::open(&csv)?)?;
            let (cards, summary) = review::apply_review(cards, &actions);
            save(&cards)?;
            println!(
                "Updated: {}, deleted: {}, unchanged: {}, preserved user data in {} variations",
                summary.updated, summary.deleted, summary.unchanged, summary.preserved
            );
        }
        Command::Overrides { file } => {
            let mut cards = load()?;
            let overrides = jobs::load_overrides(&file)?;
            let fixed = jobs::apply_overrides(&mut cards, &overrides);
            save(&cards)?;
            println!("Applied overrides to {} cards", fixed);
        }
        Command::SyncTcgdex {
            illustrator,
            cache_dir,
            offline,
            clear_cache,
            batch,
        } => {
            let mut cards = load()?;
            let mut builder = TcgdexClient::builder()
                .offline(offline)
                .timeout(batch.timeout())
                .delay(batch.delay(config::API_DELAY));
            if let Some(dir) = cache_dir {
                builder = builder.cache_dir(dir);
            }
            let mut client = builder.build()?;
            if clear_cache {
                client.cache().clear()?;
                log::info!("Cleared response cache {}", client.cache().cache_dir.display());
            }
            let runner = batch.runner(&output);
            let summary = jobs::sync_with_provider(&mut cards, &mut client, &illustrator, &runner)?;
            save(&cards)?;
            print_summary("sync-tcgdex", &summary);
        }
        Command::EnrichWeb { batch } => {
            let mut cards = load()?;
            let mut http = Http::new(batch.timeout(), batch.delay(config::SCRAPE_DELAY));
            let runner = batch.runner(&output);
            let summary = jobs::enrich_from_web(&mut cards, &mut http, &runner)?;
            save(&cards)?;
            print_summary("enrich-web", &summary);
        }
        Command::FillImages { batch } => {
            let mut cards = load()?;
            let mut http = Http::new(batch.timeout(), batch.delay(config::IMAGE_DELAY));
            let runner = batch.runner(&output);
            let summary = jobs::fill_images(&mut cards, &mut http, &runner)?;
            save(&cards)?;
            print_summary("fill-images", &summary);
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
