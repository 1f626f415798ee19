//! Command line interface for compressing files into Huffman containers and back.

#[path = "ruhuff/progress.rs"]
mod progress;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use console::style;
use progress::{fmt_size, ProgressMonitor};
use ruhuff::{CodeBook, Container};
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::prelude::*;

/// Extension added to compressed files
const EXTENSION: &str = "huff";

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print more information, pass twice for even more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a Huffman container
    Compress {
        input: PathBuf,
        /// Defaults to the input path with `.huff` appended
        output: Option<PathBuf>,
        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },
    /// Restore the original file from a Huffman container
    Decompress {
        input: PathBuf,
        /// Defaults to the input path without `.huff`, or with `.out` appended
        output: Option<PathBuf>,
        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },
    /// Print the header of a container and the codes it implies
    Inspect { input: PathBuf },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Compress {
            input,
            output,
            force,
        } => {
            let output = output.unwrap_or_else(|| compressed_path(&input));
            compress(&input, &output, force)
        }
        Commands::Decompress {
            input,
            output,
            force,
        } => {
            let output = output.unwrap_or_else(|| decompressed_path(&input));
            decompress(&input, &output, force)
        }
        Commands::Inspect { input } => inspect(&input),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::WARN,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(level)
        .init();
}

/// `file.txt` becomes `file.txt.huff`
fn compressed_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// `file.txt.huff` becomes `file.txt`, anything else gets `.out` appended
fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().map_or(false, |ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = OsString::from(input.as_os_str());
        name.push(".out");
        PathBuf::from(name)
    }
}

/// Reads the whole file while showing a progress bar
fn read_input(path: &Path, label: &str) -> Result<Vec<u8>> {
    let file = File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let size = file
        .metadata()
        .wrap_err_with(|| format!("failed to stat {}", path.display()))?
        .len();
    let mut monitor = ProgressMonitor::new(BufReader::new(file), size, label);
    let mut data = Vec::with_capacity(size as usize);
    monitor
        .read_to_end(&mut data)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    debug!("read {} from {}", fmt_size(monitor.read), path.display());
    Ok(data)
}

fn write_output(path: &Path, data: &[u8], force: bool) -> Result<()> {
    if !force && path.exists() {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    let file =
        File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(data)
        .and_then(|_| writer.flush())
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn ratio(compressed: usize, original: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    compressed as f64 / original as f64 * 100.0
}

fn compress(input: &Path, output: &Path, force: bool) -> Result<()> {
    let data = read_input(input, "compressing")?;
    let compressed = ruhuff::compress(&data);
    write_output(output, &compressed, force)?;
    info!(
        "{} {} -> {} ({} -> {}, {:.1}%)",
        style("compressed").green(),
        input.display(),
        output.display(),
        fmt_size(data.len() as u64),
        fmt_size(compressed.len() as u64),
        ratio(compressed.len(), data.len())
    );
    Ok(())
}

fn decompress(input: &Path, output: &Path, force: bool) -> Result<()> {
    let data = read_input(input, "decompressing")?;
    let decompressed = ruhuff::decompress(&data)
        .wrap_err_with(|| format!("{} is not a valid container", input.display()))?;
    write_output(output, &decompressed, force)?;
    info!(
        "{} {} -> {} ({} -> {})",
        style("decompressed").green(),
        input.display(),
        output.display(),
        fmt_size(data.len() as u64),
        fmt_size(decompressed.len() as u64)
    );
    Ok(())
}

/// Printable ascii shows as a character, everything else as hex
fn fmt_symbol(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("{:#04x}", symbol)
    }
}

fn inspect(input: &Path) -> Result<()> {
    let data = fs::read(input).wrap_err_with(|| format!("failed to read {}", input.display()))?;
    let container = Container::deserialize(&data)
        .wrap_err_with(|| format!("{} is not a valid container", input.display()))?;
    let tree = container.code_tree();
    let book = CodeBook::derive(&tree);
    let total = container.frequencies().total().unwrap_or(u64::MAX);

    println!("{}", style(input.display()).bold());
    println!("  container size: {}", fmt_size(data.len() as u64));
    println!("  header size:    {}", fmt_size(container.header_size() as u64));
    println!("  original size:  {}", fmt_size(total));
    println!("  payload bits:   {}", container.payload_bits());
    println!("  symbols:        {}", container.frequencies().distinct_symbols());
    match tree.depth() {
        Some(depth) => println!("  tree depth:     {}", depth),
        None => println!("  tree depth:     -"),
    }
    match container.checksum() {
        Some(checksum) => println!("  checksum:       {:#010x}", checksum),
        None => println!("  checksum:       {}", style("none").dim()),
    }

    if book.is_empty() {
        return Ok(());
    }
    println!();
    println!(
        "  {:<8} {:>12}  {}",
        style("symbol").underlined(),
        style("frequency").underlined(),
        style("code").underlined()
    );
    for (symbol, code) in book.iter() {
        println!(
            "  {:<8} {:>12}  {}",
            fmt_symbol(symbol),
            container.frequencies().count(symbol),
            code
        );
    }
    Ok(())
}
