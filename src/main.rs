use batch_export::archive::download_all;
use batch_export::catalog::{OutputFormat, find_preset};
use batch_export::export::export_many;
use batch_export::imaging::RustBackend;
use batch_export::media::MediaItem;
use batch_export::naming::ARCHIVE_FILENAME;
use batch_export::presentation::CollectionPresentation;
use batch_export::saver::DirectorySaver;
use batch_export::{config, output, scan};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let hash = env!("BATCH_EXPORT_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "batch-export")]
#[command(about = "Export processed uploads at preset sizes as PNG/SVG, or all at once as a zip")]
#[command(long_about = "\
Export processed uploads at preset sizes as PNG/SVG, or all at once as a zip

Every media file in the upload directory is an item, numbered in filename
order. An item is ready once the processed directory holds a PNG with the
same stem; until then it is still processing and cannot be exported.

  uploads/                # --source
  ├── config.toml         # Optional (see gen-config)
  ├── beach.jpg           # item 1
  └── clip.mp4            # item 2
  processed/              # --processed
  └── beach.png           # item 1 is ready

Exported files are named processed-<id>-<width>x<height>.<ext>, or
processed-<id>-original.<ext> for the original size preset. download-all
writes processed-images.zip with one processed-<id>.png per ready item.

Run 'batch-export gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Upload directory
    #[arg(long, default_value = "uploads", global = true)]
    source: PathBuf,

    /// Directory holding processed PNGs
    #[arg(long, default_value = "processed", global = true)]
    processed: PathBuf,

    /// Directory exported files are saved into
    #[arg(long, default_value = "downloads", global = true)]
    output: PathBuf,

    /// Log pipeline steps to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Item id to export (repeatable; repeats are exported once)
    #[arg(long = "item", required_unless_present = "all")]
    items: Vec<u64>,

    /// Export every ready item
    #[arg(long, conflicts_with = "items")]
    all: bool,

    /// Output format, in export order (repeatable or comma-separated)
    #[arg(long = "format", required = true, value_delimiter = ',')]
    formats: Vec<OutputFormat>,

    /// Size preset id (see `presets`)
    #[arg(long)]
    size: String,
}

#[derive(Subcommand)]
enum Command {
    /// Show the upload grid with each item's status and actions
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the size preset catalog
    Presets,
    /// Export items at one size in one or more formats
    Export(ExportArgs),
    /// Zip every processed image into processed-images.zip
    DownloadAll,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::List { json } => {
            let collection = scan::scan(&cli.source, &cli.processed)?;
            let views = CollectionPresentation::views(&collection);
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                output::print_list(
                    &views,
                    CollectionPresentation::shows_download_all(&collection),
                );
            }
        }
        Command::Presets => {
            let config = config::load_config(&cli.source)?;
            output::print_presets(&config.presets);
        }
        Command::Export(args) => {
            let config = config::load_config(&cli.source)?;
            let preset = find_preset(&config.presets, &args.size)
                .ok_or_else(|| format!("unknown size preset: {}", args.size))?;
            let collection = scan::scan(&cli.source, &cli.processed)?;

            let items: Vec<&MediaItem> = if args.all {
                collection.processed().collect()
            } else {
                collection.select(&args.items)?
            };
            if items.is_empty() {
                println!("Nothing to export: no item is ready yet");
                return Ok(());
            }

            init_thread_pool(&config.processing);
            let saver = DirectorySaver::new(&cli.output);
            info!(
                items = items.len(),
                preset = %preset.id,
                dir = %saver.dir().display(),
                "exporting"
            );
            let results = export_many(
                &RustBackend::new(),
                &saver,
                &config.export_options(),
                &items,
                preset,
                &args.formats,
            );
            output::print_exports(&results);

            let failed = results.iter().filter(|r| r.result.is_err()).count();
            if failed > 0 {
                return Err(format!("{failed} of {} exports failed", results.len()).into());
            }
        }
        Command::DownloadAll => {
            let config = config::load_config(&cli.source)?;
            let collection = scan::scan(&cli.source, &cli.processed)?;
            let saver = DirectorySaver::new(&cli.output);
            let archive = download_all(&collection, &saver, config.export.compression)?;
            output::print_archive(&archive, ARCHIVE_FILENAME);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for listings and `--json`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "batch_export=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
