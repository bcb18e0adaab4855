//! filekit - filesystem walking, copying and archiving helpers.
//!
//! Usage:
//!   filekit cat PATH [--suffix S]     Concatenate files to stdout
//!   filekit list PATH --ext E         List files by extension
//!   filekit tree PATH                 Export the info tree as JSON
//!   filekit copy SRC DST              Recursively copy a directory or file
//!   filekit zip SRC TARGET            Pack a directory or file
//!   filekit unzip ARCHIVE TARGET      Unpack an archive
//!   filekit convert INPUT OUTPUT      Convert between JSON and YAML

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use humansize::{DECIMAL, format_size};
use tracing_subscriber::EnvFilter;

use filekit_ops::{copy_path, load_data, remove_duplicates, save_data, unzip, zipit};
use filekit_scan::{TreeWalker, WalkConfig};

#[derive(Parser)]
#[command(
    name = "filekit",
    version,
    about = "Filesystem walking, copying and archiving helpers"
)]
struct Cli {
    /// Log per-entry progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Concatenate the contents of files under a directory
    Cat {
        /// Directory to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Only include files whose name ends with this suffix
        #[arg(short, long)]
        suffix: Option<String>,

        /// Descend into symlinked directories
        #[arg(short = 'L', long)]
        follow_symlinks: bool,
    },

    /// List files with a given extension, relative to the directory
    List {
        /// Directory to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Extension to match, including the dot (e.g. ".html")
        #[arg(short, long)]
        ext: String,

        /// Remove the extension from listed names
        #[arg(short, long)]
        strip: bool,

        /// Descend into symlinked directories
        #[arg(short = 'L', long)]
        follow_symlinks: bool,
    },

    /// Export the directory tree as JSON
    Tree {
        /// Directory to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recursively copy a directory (or a single file)
    Copy { source: PathBuf, destination: PathBuf },

    /// Pack a directory or file into a ZIP archive
    Zip { source: PathBuf, target: PathBuf },

    /// Unpack a ZIP archive into a directory
    Unzip { archive: PathBuf, target: PathBuf },

    /// Convert a structured file between JSON and YAML (by extension)
    Convert { input: PathBuf, output: PathBuf },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Cat {
            path,
            suffix,
            follow_symlinks,
        } => run_cat(path, suffix, follow_symlinks)?,
        Command::List {
            path,
            ext,
            strip,
            follow_symlinks,
        } => run_list(path, &ext, strip, follow_symlinks)?,
        Command::Tree { path, output } => run_tree(path, output)?,
        Command::Copy {
            source,
            destination,
        } => run_copy(&source, &destination)?,
        Command::Zip { source, target } => {
            zipit(&source, &target).context("Failed to create archive")?;
            eprintln!("Wrote {}", target.display());
        }
        Command::Unzip { archive, target } => {
            unzip(&archive, &target).context("Failed to extract archive")?;
            eprintln!("Extracted to {}", target.display());
        }
        Command::Convert { input, output } => {
            let value: serde_json::Value = load_data(&input).context("Failed to read input")?;
            save_data(&output, &value).context("Failed to write output")?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn walker(path: PathBuf, follow_symlinks: bool) -> Result<TreeWalker> {
    let config = WalkConfig::builder()
        .root(path)
        .follow_symlinks(follow_symlinks)
        .build()
        .context("Invalid walk configuration")?;
    Ok(TreeWalker::new(config))
}

fn run_cat(path: PathBuf, suffix: Option<String>, follow_symlinks: bool) -> Result<()> {
    let walker = walker(path, follow_symlinks)?;
    let bytes = match suffix {
        Some(suffix) => walker.concat_matching(&suffix),
        None => walker.concat_all(),
    }
    .context("Failed to read files")?;

    std::io::stdout()
        .lock()
        .write_all(&bytes)
        .context("Failed to write output")?;
    Ok(())
}

fn run_list(path: PathBuf, ext: &str, strip: bool, follow_symlinks: bool) -> Result<()> {
    let walker = walker(path, follow_symlinks)?;
    let list = walker
        .list_by_extension(ext, strip)
        .context("Failed to list files")?;

    // Stripping can map two files onto one name (`a.txt.b.txt`, `a.b.txt.txt`).
    for entry in remove_duplicates(list) {
        println!("{entry}");
    }
    Ok(())
}

fn run_tree(path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let nodes = walker(path, false)?
        .file_info_tree()
        .context("Failed to build tree")?;

    let json = serde_json::to_string_pretty(&nodes)?;
    match output {
        Some(output) => {
            std::fs::write(&output, json).context("Failed to write output")?;
            eprintln!("Exported to {}", output.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_copy(source: &Path, destination: &Path) -> Result<()> {
    let report = copy_path(source, destination).context("Copy failed")?;

    eprintln!(
        "{} ({})",
        report.summary(),
        format_size(report.bytes_copied, DECIMAL)
    );
    for error in &report.errors {
        eprintln!("  {error}");
    }
    Ok(())
}
