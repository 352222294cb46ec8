//! Tagsweep CLI - renumber album tracks and export tags to CSV
//!
//! # Commands
//!
//! ```bash
//! tagsweep renumber music/Album1 --album   # 1/N..N/N for one album
//! tagsweep renumber music                  # every subdirectory is an album
//! tagsweep extract music other -o exports  # chunked CSV export
//! tagsweep inspect music/Album1/a.mp3      # one normalized record as JSON
//! ```
//!
//! Defaults for `extract` can come from the environment (or a `.env` file):
//! `TAGSWEEP_OUTPUT_DIR`, `TAGSWEEP_BASE_NAME`, `TAGSWEEP_CHUNK_SIZE`.
//! Log verbosity follows `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tagsweep::logs::{drain_errors, LogEntry, LOG_BROADCASTER};
use tagsweep::{
    extract_tags_with, read_record, renumber_album, renumber_root, ExtractOptions, FileCodec,
    KeyScope, ProgressEvent, RenumberError, RenumberOptions, RunTimestamp,
};
use tokio::sync::broadcast::Receiver;
use tracing_subscriber::EnvFilter;

/// Progress line cadence for `extract`.
const PROGRESS_EVERY: usize = 1000;

/// Per-file errors repeated in the final summary.
const MAX_REPORTED_ERRORS: usize = 5;

#[derive(Parser)]
#[command(name = "tagsweep")]
#[command(about = "Renumber album tracks and export MP3/FLAC tags to CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every tag of every audio file to chunked CSV files
    Extract {
        /// Root directories to scan recursively
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Output directory (default: $TAGSWEEP_OUTPUT_DIR or .)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chunk file base name (default: current_tags)
        #[arg(short, long)]
        base_name: Option<String>,

        /// Records per chunk file (default: 100000)
        #[arg(short, long)]
        chunk_size: Option<usize>,

        /// Keep header columns from earlier chunks in later ones
        #[arg(long)]
        carry_keys: bool,
    },

    /// Write i/N track numbers
    Renumber {
        /// Album directory, or a directory of album directories
        path: PathBuf,

        /// Treat PATH itself as the album
        #[arg(long)]
        album: bool,

        /// Show the assignments without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the normalized record of one file as JSON
    Inspect {
        /// Audio file
        file: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            roots,
            output,
            base_name,
            chunk_size,
            carry_keys,
        } => cmd_extract(roots, output, base_name, chunk_size, carry_keys),

        Commands::Renumber {
            path,
            album,
            dry_run,
        } => cmd_renumber(&path, album, dry_run),

        Commands::Inspect { file } => cmd_inspect(&file),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    roots: Vec<PathBuf>,
    output: Option<PathBuf>,
    base_name: Option<String>,
    chunk_size: Option<usize>,
    carry_keys: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Environment first, flags win
    let mut options = ExtractOptions::from_env()?;
    options.roots = roots;
    if let Some(dir) = output {
        options.output_dir = dir;
    }
    if let Some(name) = base_name {
        options.base_name = name;
    }
    if let Some(size) = chunk_size {
        options.chunk_size = size;
    }
    if carry_keys {
        options.key_scope = KeyScope::Carried;
    }

    eprintln!("📂 Extracting tags from {} root(s)", options.roots.len());
    eprintln!("   Output: {}", options.output_dir.display());
    eprintln!("   Chunk size: {}", options.chunk_size);

    let mut log_rx = LOG_BROADCASTER.subscribe();
    let result = extract_tags_with(&FileCodec, &options, RunTimestamp::now(), |event| {
        if let ProgressEvent::FileProcessed { processed, .. } = event {
            if processed % PROGRESS_EVERY == 0 {
                eprintln!("   ... {} files", processed);
            }
        }
    });

    report_errors(&mut log_rx);

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            if let Some(stats) = e.partial_stats() {
                for chunk in &stats.chunks {
                    eprintln!("   💾 Kept: {}", chunk.display());
                }
            }
            return Err(e.into());
        }
    };

    eprintln!("\n📊 Results:");
    eprintln!("   ✅ Processed: {}", stats.processed);
    eprintln!("   ❌ Errors: {}", stats.errors);
    if stats.duplicates > 0 {
        eprintln!("   🔁 Duplicates skipped: {}", stats.duplicates);
    }
    if stats.roots_skipped > 0 {
        eprintln!("   ⚠️  Roots skipped: {}", stats.roots_skipped);
    }
    for chunk in &stats.chunks {
        eprintln!("   💾 {}", chunk.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_renumber(path: &Path, album: bool, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let options = RenumberOptions { dry_run };
    let mut log_rx = LOG_BROADCASTER.subscribe();

    if album {
        eprintln!("🔢 Renumbering album: {}", path.display());
        match renumber_album(&FileCodec, path, &options) {
            Ok(report) => {
                eprintln!("   ✅ Updated: {}", report.updated);
                if !report.failures.is_empty() {
                    eprintln!("   ❌ Failed: {}", report.failures.len());
                }
            }
            Err(RenumberError::EmptyAlbum(_)) => eprintln!("   No audio files found"),
            Err(e) => return Err(e.into()),
        }
    } else {
        eprintln!("🔢 Renumbering albums under: {}", path.display());
        let summary = renumber_root(&FileCodec, path, &options)?;
        eprintln!("\n📊 Results:");
        eprintln!("   Albums: {}", summary.albums);
        eprintln!("   ✅ Updated: {}", summary.updated);
        eprintln!("   ❌ Failed: {}", summary.errors);
        if summary.empty_albums > 0 {
            eprintln!("   Empty albums: {}", summary.empty_albums);
        }
        if summary.skipped_albums > 0 {
            eprintln!("   ⚠️  Skipped albums: {}", summary.skipped_albums);
        }
    }

    report_errors(&mut log_rx);
    if dry_run {
        eprintln!("\n(dry run, nothing written)");
    }
    eprintln!("\n✨ Done!");
    Ok(())
}

/// Repeat the last few errors the run logged.
fn report_errors(log_rx: &mut Receiver<LogEntry>) {
    let errors = drain_errors(log_rx);
    if errors.is_empty() {
        return;
    }

    let skip = errors.len().saturating_sub(MAX_REPORTED_ERRORS);
    eprintln!("\n❌ Last {} error(s):", errors.len() - skip);
    for entry in &errors[skip..] {
        eprintln!("   - {}", entry.message);
    }
}

fn cmd_inspect(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let record = read_record(&FileCodec, file)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
