use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use partfinder::cache::CacheStore;
use partfinder::config::{AppConfig, ConfigOverrides};
use partfinder::core::PartFinder;
use partfinder::export::{ExportFormat, ExportManager};
use partfinder::llm::StaticExtractor;
use partfinder::logging::init_logging;
use partfinder::query::ParsedQuery;
use partfinder::source::{SampleProvider, Source};

#[derive(Parser)]
#[command(name = "partfinder")]
#[command(about = "Natural language auto-part search with cached source fan-out")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Enable verbose logging")]
    verbose: bool,

    #[arg(short, long, help = "Configuration file path")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all sources for a part request
    Search {
        #[arg(help = "Natural language part request")]
        request: Option<String>,

        #[arg(long, help = "Part type (skips the language model)")]
        part: Option<String>,

        #[arg(long, help = "Vehicle model (skips the language model)")]
        vehicle: Option<String>,

        #[arg(short, long, help = "Output file path")]
        output: Option<String>,

        #[arg(short, long, help = "Output format (defaults to configured format)", value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the supported part sources
    Sources,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum OutputFormat {
    Csv,
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Json => ExportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path).await?,
        None => AppConfig::load().await?,
    };
    ConfigOverrides::apply(&mut config);

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging)?;

    info!("Starting partfinder v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Search { request, part, vehicle, output, format } => {
            let format = match format {
                Some(f) => f.into(),
                None => config.export.default_format.parse()?,
            };
            run_search(&config, request, part, vehicle, output, format).await
        }
        Commands::Sources => {
            for source in Source::registry() {
                println!("{:<18} {}", source.id, source.display_name);
            }
            Ok(())
        }
    }
}

async fn run_search(
    config: &AppConfig,
    request: Option<String>,
    part: Option<String>,
    vehicle: Option<String>,
    output: Option<String>,
    format: ExportFormat,
) -> Result<()> {
    let report = if part.is_some() || vehicle.is_some() {
        // Direct fields bypass the language model entirely.
        let parsed = ParsedQuery::new(part.unwrap_or_default(), vehicle.unwrap_or_default());
        let store = Arc::new(CacheStore::new(config.cache.directory.clone()));
        let finder = PartFinder::with_components(
            Arc::new(StaticExtractor::new(parsed.clone())),
            Arc::new(SampleProvider::new(store)),
            Source::registry(),
        );
        finder.search_parsed(parsed).await?
    } else {
        let request = request
            .ok_or_else(|| anyhow::anyhow!("Provide a request, or --part/--vehicle for offline use"))?;
        let finder = PartFinder::new(config)?;
        finder.search(&request).await?
    };

    println!("Search query: {}", report.query);
    if let Some(reason) = &report.fallback_reason {
        println!("(query extraction failed, searched with defaults: {})", reason);
    }

    println!("\nAll results:");
    for ranked in &report.scored {
        println!(
            "  {:<60} price {:>8.2}  rating {:.2}  score {:.4}",
            ranked.result.name, ranked.result.price, ranked.result.rating, ranked.score
        );
    }

    match &report.best {
        Some(best) => {
            println!("\nOptimal recommendation:");
            println!("  {} ({})", best.result.name, best.result.link);
            println!("  price {:.2}, rating {:.2}, score {:.4}", best.result.price, best.result.rating, best.score);
        }
        None => println!("\nNo suitable products found."),
    }

    if let Some(output_path) = output {
        let stats = ExportManager::export(&report.results, &output_path, format).await?;
        println!("\nWrote {} records to {} ({} bytes)", stats.record_count, stats.file_path, stats.file_size_bytes);
    }

    Ok(())
}
