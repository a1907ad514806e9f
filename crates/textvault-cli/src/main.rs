use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use textvault_core::{Config, Coordinator, Extractor, HttpFetcher, RecordId, Store};
use textvault_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// textvault - Extract and search text from PDFs and web pages
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the record database (overrides config and TEXTVAULT_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text from a PDF file or a URL and store it
    Add {
        /// Input kind: "pdf" or "url"
        kind: String,

        /// Path to the PDF, or the URL to fetch
        payload: String,

        /// Label stored for a PDF (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List all stored records
    List,

    /// Find records whose name or text contains a keyword (case-insensitive)
    Search {
        keyword: String,
    },

    /// Print one record with its full text
    Show {
        id: RecordId,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    let color = ColorMode(!cli.no_color);

    let coordinator = build_coordinator(&config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Add {
            kind,
            payload,
            name,
        } => add(&coordinator, &kind, &payload, name, &mut out, color).await,
        Command::List => {
            let records = coordinator.list_all().await?;
            output::print_summaries(&mut out, &records, color)?;
            Ok(())
        }
        Command::Search { keyword } => {
            let records = coordinator.search(keyword.trim()).await?;
            output::print_summaries(&mut out, &records, color)?;
            Ok(())
        }
        Command::Show { id } => {
            let record = coordinator.get(id).await?;
            output::print_record(&mut out, &record, color)?;
            Ok(())
        }
    }
}

fn build_coordinator(config: &Config) -> anyhow::Result<Coordinator> {
    let store = Arc::new(Store::open(&config.database_path)?);
    let fetcher = HttpFetcher::new(config.fetch_timeout, &config.user_agent)?;
    let extractor = Extractor::new(Arc::new(MupdfBackend::new()), Arc::new(fetcher));
    Ok(Coordinator::new(extractor, store))
}

async fn add(
    coordinator: &Coordinator,
    kind: &str,
    payload: &str,
    name: Option<String>,
    out: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    // The kind itself is validated by the coordinator; only "pdf" reads a file.
    let (bytes, source_name) = if kind == "pdf" {
        let path = Path::new(payload);
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let label = name.unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| payload.to_string())
        });
        (bytes, label)
    } else {
        (payload.as_bytes().to_vec(), payload.to_string())
    };

    let id = coordinator.process(kind, bytes, &source_name).await?;
    let stored = coordinator.get(id).await?;
    output::print_created(out, id, &stored.source_name, color)?;
    Ok(())
}
