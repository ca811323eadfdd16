//! bulkmerge CLI
//!
//! Command-line tool for merging a directory of data exports into one table.

use bulk_core::{
    plan, read_bulk, write_csv, write_json, DelimitedParser, MergeConfig,
    SubdirSpec, TableParser, TracingReporter, DEFAULT_NA,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bulkmerge")]
#[command(about = "Merge many similar data files into one table", long_about = None)]
#[command(version)]
struct Cli {
    /// Only report warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read and merge all matching files
    Merge {
        #[command(flatten)]
        source: SourceArgs,

        /// Output of an earlier run to put in front of the new rows
        #[arg(long)]
        prior: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Text written for missing values in CSV output
        #[arg(long, default_value = DEFAULT_NA)]
        na: String,
    },

    /// List the files a merge would read, without parsing them
    Files {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write a config file from the given options
    CreateConfig {
        #[command(flatten)]
        source: SourceArgs,

        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root directory
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Subdirectories to read: true, false, or a comma-separated list
    #[arg(short, long)]
    subdirectories: Option<SubdirSpec>,

    /// Keep only file names containing this string
    #[arg(long)]
    fixed: Option<String>,

    /// Keep only file names matching this regular expression
    #[arg(long)]
    pattern: Option<String>,

    /// Keep only file names ending in this string (e.g. ".csv")
    #[arg(short, long)]
    extension: Option<String>,

    /// Field delimiter of the input files
    #[arg(long)]
    delimiter: Option<char>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn setup_logging(quiet: bool) {
    let filter = if quiet { "warn" } else { "info" };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).without_time().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn run(cli: Cli) -> bulk_core::Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Merge {
            source,
            prior,
            output,
            format,
            na,
        } => cmd_merge(&source, quiet, prior, output.as_deref(), format, &na),
        Commands::Files { source } => cmd_files(&source),
        Commands::CreateConfig { source, output } => cmd_create_config(&source, &output),
    }
}

/// Config file values with command-line flags applied on top
fn resolve_config(source: &SourceArgs) -> bulk_core::Result<MergeConfig> {
    let mut config = match &source.config {
        Some(path) => MergeConfig::load(path)?,
        None => MergeConfig::default(),
    };

    let bulk = &mut config.bulk;
    if let Some(directory) = &source.directory {
        bulk.directory = directory.clone();
    }
    if let Some(subdirectories) = &source.subdirectories {
        bulk.subdirectories = subdirectories.clone();
    }
    if let Some(fixed) = &source.fixed {
        bulk.fixed = Some(fixed.clone());
    }
    if let Some(pattern) = &source.pattern {
        bulk.pattern = Some(pattern.clone());
    }
    if let Some(extension) = &source.extension {
        bulk.extension = Some(extension.clone());
    }
    if let Some(delimiter) = source.delimiter {
        config.parser.delimiter = delimiter;
    }

    config.parser.validate()?;
    Ok(config)
}

fn cmd_merge(
    source: &SourceArgs,
    quiet: bool,
    prior: Option<PathBuf>,
    output: Option<&Path>,
    format: Format,
    na: &str,
) -> bulk_core::Result<()> {
    let mut config = resolve_config(source)?;
    if quiet {
        config.bulk.verbose = false;
    }
    let parser: &DelimitedParser = &config.parser;

    let prior = match prior.or_else(|| config.prior.clone()) {
        Some(path) => Some(parser.parse(&path)?),
        None => None,
    };

    let merged = read_bulk(&config.bulk, parser, prior, &TracingReporter)?;

    match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            write_table(&merged, writer, format, na)?;
            tracing::info!(
                rows = merged.row_count(),
                columns = merged.column_count(),
                "Wrote {}",
                path.display()
            );
        }
        None => write_table(&merged, io::stdout().lock(), format, na)?,
    }

    Ok(())
}

fn write_table<W: Write>(
    table: &bulk_core::Table,
    writer: W,
    format: Format,
    na: &str,
) -> bulk_core::Result<()> {
    match format {
        Format::Csv => write_csv(table, writer, na),
        Format::Json => write_json(table, writer),
    }
}

fn cmd_files(source: &SourceArgs) -> bulk_core::Result<()> {
    let config = resolve_config(source)?;
    let passes = plan(&config.bulk)?;

    let mut total = 0;
    for pass in &passes {
        match &pass.subdirectory {
            Some(name) => println!("{}/ ({} files)", name, pass.files.len()),
            None => println!("{} ({} files)", pass.directory.display(), pass.files.len()),
        }
        for file in &pass.files {
            println!("  {}", file.display());
        }
        total += pass.files.len();
    }

    println!();
    println!("{} files in {} pass(es)", total, passes.len());

    Ok(())
}

fn cmd_create_config(source: &SourceArgs, output: &Path) -> bulk_core::Result<()> {
    let config = resolve_config(source)?;
    config.bulk.file_filter()?;
    config.save(output)?;

    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to adjust your options, then run:");
    println!("  bulkmerge merge --config {}", output.display());

    Ok(())
}
