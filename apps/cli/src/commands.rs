//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use endorsetrack_core::{
    ImportOptions, InMemoryRegistry, ProgressReporter, Resolver, SilentProgress, content_hash,
    import_document,
};
use endorsetrack_shared::{
    AppConfig, ImportId, config_file_path, init_config, load_config, load_config_from,
};
use endorsetrack_storage::Storage;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// EndorseTrack: structured records from endorsement-list markup.
#[derive(Parser)]
#[command(
    name = "endorsetrack",
    version,
    about = "Convert endorsement-list markup into structured, citation-backed records.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path (defaults to ~/.endorsetrack/endorsetrack.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Import an endorsement-list document and persist its records.
    Import {
        /// Path to the document's markup text.
        file: PathBuf,

        /// Provenance slug for the import (defaults to the file stem).
        #[arg(short, long)]
        slug: Option<String>,

        /// Database path override.
        #[arg(long)]
        db: Option<String>,
    },

    /// Parse a document and print records as JSON lines, without storage.
    Parse {
        /// Path to the document's markup text.
        file: PathBuf,
    },

    /// Re-run the resolver over stored records with no confirmed endorser.
    Confirm {
        /// Database path override.
        #[arg(long)]
        db: Option<String>,
    },

    /// List recorded imports with record and resolution counts.
    List {
        /// Database path override.
        #[arg(long)]
        db: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "endorsetrack=info",
        1 => "endorsetrack=debug",
        _ => "endorsetrack=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command routing
// ---------------------------------------------------------------------------

/// Dispatch the parsed CLI to its command handler.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Import { file, slug, db } => cmd_import(&config, &file, slug, db).await,
        Command::Parse { file } => cmd_parse(&config, &file),
        Command::Confirm { db } => cmd_confirm(&config, db).await,
        Command::List { db } => cmd_list(&config, db).await,
        Command::Config { action } => cmd_config(&config, action),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// `import`: run the pipeline on a document file and persist the records.
async fn cmd_import(
    config: &AppConfig,
    file: &Path,
    slug: Option<String>,
    db: Option<String>,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| eyre!("failed to read {}: {e}", file.display()))?;
    let slug = slug.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import".into())
    });

    let db_path = resolve_db_path(db, config)?;
    let storage = Storage::open(&db_path).await?;
    let registry = InMemoryRegistry::new(storage.load_endorsers().await?);
    info!(registry_size = registry.len(), slug = %slug, "starting import");

    let progress = BarProgress::new();
    let records = import_document(&text, &registry, &ImportOptions::from(config), &progress);
    progress.finish();

    let import_id = ImportId::new();
    storage
        .insert_import(&import_id.to_string(), &slug, &content_hash(&text), &text)
        .await?;

    let mut inserted = 0usize;
    let mut duplicates = 0usize;
    for record in &records {
        if storage
            .insert_endorsement(&import_id.to_string(), record)
            .await?
        {
            inserted += 1;
        } else {
            duplicates += 1;
        }
    }
    let resolved = records.iter().filter(|r| r.resolved.is_some()).count();

    println!(
        "Import {import_id} ({slug}): {inserted} new records, \
         {duplicates} already present, {resolved} resolved"
    );
    Ok(())
}

/// `parse`: dry-run the pipeline and print JSON-line records.
fn cmd_parse(config: &AppConfig, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| eyre!("failed to read {}: {e}", file.display()))?;

    let registry = InMemoryRegistry::default();
    let records = import_document(&text, &registry, &ImportOptions::from(config), &SilentProgress);
    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

/// `confirm`: resolve stored records that newly match the registry.
async fn cmd_confirm(config: &AppConfig, db: Option<String>) -> Result<()> {
    let db_path = resolve_db_path(db, config)?;
    let storage = Storage::open(&db_path).await?;
    let registry = InMemoryRegistry::new(storage.load_endorsers().await?);
    let resolver = Resolver::new(config.resolver.clone());

    let unresolved = storage.unresolved_endorsements().await?;
    let total = unresolved.len();
    let mut confirmed = 0usize;
    for (id, name) in unresolved {
        if let Some(endorser) = resolver.resolve(&name, &registry).resolved() {
            storage.set_resolved(&id, endorser).await?;
            confirmed += 1;
        }
    }

    println!("Confirmed endorsers for {confirmed} of {total} unresolved records");
    Ok(())
}

/// `list`: show recorded imports.
async fn cmd_list(config: &AppConfig, db: Option<String>) -> Result<()> {
    let db_path = resolve_db_path(db, config)?;
    let storage = Storage::open(&db_path).await?;
    let imports = storage.list_imports().await?;

    if imports.is_empty() {
        println!("No imports recorded.");
        return Ok(());
    }
    for import in imports {
        println!(
            "{}  {:<24} {}  {} records ({} resolved)",
            import.created_at, import.slug, import.id, import.record_count, import.resolved_count
        );
    }
    Ok(())
}

/// `config init` / `config show`.
fn cmd_config(config: &AppConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = init_config()?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            println!("# {}", config_file_path()?.display());
            print!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| eyre!("serialize config: {e}"))?
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the database path: flag > config value, with `~/` expansion.
fn resolve_db_path(flag: Option<String>, config: &AppConfig) -> Result<PathBuf> {
    let raw = flag.unwrap_or_else(|| config.defaults.db_path.clone());
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| eyre!("could not determine home directory"))?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Spinner-backed progress reporter for interactive imports.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("valid progress template"),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.tick();
    }

    fn record_emitted(&self, raw_text: &str, current: usize) {
        let preview: String = raw_text.chars().take(48).collect();
        self.bar.set_message(format!("[{current}] {preview}"));
        self.bar.tick();
    }

    fn done(&self, record_count: usize) {
        self.bar.set_message(format!("{record_count} records"));
    }
}
