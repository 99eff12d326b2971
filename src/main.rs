//! pboforge CLI - Command-line tool for DayZ mod configs and PBO packing.
//!
//! This is the main entry point for the pboforge command-line application.

mod modules;
mod scan;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use pboforge::prelude::*;

use crate::modules::ModuleFile;
use crate::scan::ScanOptions;

/// pboforge - DayZ mod config and PBO packing tool
#[derive(Parser)]
#[command(name = "pboforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write logs to this file instead of the console
    #[arg(short, long, global = true, env = "PBOFORGE_LOG")]
    log: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

/// Options shared by commands that read mod directories.
#[derive(Args)]
struct SourceArgs {
    /// Mod source directories
    #[arg(short, long = "source", required = true, num_args = 1..)]
    sources: Vec<PathBuf>,

    /// Include hidden files
    #[arg(long)]
    hidden_files: bool,

    /// Include hidden directories
    #[arg(long)]
    hidden_dirs: bool,

    /// Semicolon-separated glob patterns of paths to exclude, relative to the mod folder (e.g. "*.psd;docs/*")
    #[arg(short = 'x', long, value_delimiter = ';')]
    exclude: Vec<String>,

    /// JSON module configuration selecting packer components
    #[arg(short, long, env = "PBOFORGE_MODULES")]
    modules: Option<PathBuf>,
}

impl SourceArgs {
    fn scan_options(&self) -> Result<ScanOptions> {
        ScanOptions::new(self.hidden_files, self.hidden_dirs, &self.exclude)
    }

    fn components(&self, registry: &ComponentRegistry) -> Result<Vec<Box<dyn PackerComponent>>> {
        match &self.modules {
            Some(path) => Ok(ModuleFile::load(path)?.components(registry)),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the PBO in each source folder and print its info
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// List every error found in the config file
        #[arg(short = 'e', long)]
        config_errors: bool,

        /// List the files that are part of the PBO
        #[arg(short, long)]
        files_list: bool,

        /// Include source paths and sizes in the file list
        #[arg(short, long)]
        detailed: bool,
    },

    /// Build a PBO from each source folder
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory
        #[arg(short, long, default_value = ".", env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Treat recoverable config errors as warnings
        #[arg(short, long)]
        warn: bool,

        /// Override the PBO prefix
        #[arg(short, long)]
        prefix: Option<String>,

        /// Binarize config.cpp into config.bin
        #[arg(short, long)]
        binarize: bool,
    },

    /// Render or binarize a single config file
    Config {
        /// Input config.cpp
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Write the binary (rapified) form
        #[arg(short, long)]
        binarize: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Analyze {
            source,
            config_errors,
            files_list,
            detailed,
        } => {
            cmd_analyze(&source, config_errors, files_list, detailed)?;
        }
        Commands::Build {
            source,
            output,
            warn,
            prefix,
            binarize,
        } => {
            cmd_build(&source, &output, warn, prefix, binarize)?;
        }
        Commands::Config {
            input,
            output,
            binarize,
        } => {
            cmd_config(&input, &output, binarize)?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .filter_level(cli.verbose.log_level_filter());

    if let Some(path) = &cli.log {
        let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::fmt::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn load_descriptor(directory: &Path, options: &ScanOptions) -> Result<PboDescriptor> {
    let scanned = scan::scan(directory, options)?;
    PboDescriptor::load(scanned.directory, scanned.entries, scanned.config)
        .with_context(|| format!("Failed to load PBO from {}", directory.display()))
}

fn cmd_analyze(source: &SourceArgs, config_errors: bool, files_list: bool, detailed: bool) -> Result<()> {
    let options = source.scan_options()?;
    let components = source.components(&ComponentRegistry::with_builtins())?;
    if !components.is_empty() {
        info!("{} packer component(s) configured", components.len());
    }

    for directory in &source.sources {
        let descriptor = load_descriptor(directory, &options)?;
        println!("Found PBO located in: {}", descriptor.directory().display());

        if config_errors {
            for file in descriptor.configs() {
                println!();
                println!("Found a config at '{}'.", file.full_path());

                let Some(parsed) = file.parsed_config() else {
                    continue;
                };
                if parsed.is_valid() {
                    println!("No errors were detected in the config file.");
                } else {
                    for error in &parsed.errors {
                        println!("  {error}");
                    }
                }
            }
        }

        if files_list {
            println!();
            println!("File list:");
            if detailed {
                println!("{:>12}  {:<48} {}", "Size", "Path in PBO", "Source");
            }
            for file in &descriptor.files {
                if detailed {
                    let source = file
                        .source_path()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default();
                    println!("{:>12}  {:<48} {}", file.data_size, file.full_path(), source);
                } else {
                    println!("{}", file.full_path());
                }
            }
            println!("\nTotal: {} files", descriptor.files.len());
        }
    }

    Ok(())
}

fn cmd_build(source: &SourceArgs, output: &Path, warn_only: bool, prefix: Option<String>, binarize: bool) -> Result<()> {
    let options = source.scan_options()?;
    let registry = ComponentRegistry::with_builtins();

    let mut packer = Packer::new().binarize(binarize);
    packer.prefix = prefix;
    packer.components = source.components(&registry)?;

    if packer.prefix.is_some() && source.sources.len() > 1 {
        warn!("--prefix is set: every PBO gets the same prefix");
    }

    let pb = if source.sources.len() > 1 {
        let pb = ProgressBar::new(source.sources.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let start = Instant::now();
    let mut built = 0;
    let mut failed = 0;

    for directory in &source.sources {
        match build_one(&packer, directory, output, &options, warn_only) {
            Ok(Some(path)) => {
                pb.suspend(|| println!("Packed {}", path.display()));
                built += 1;
            }
            Ok(None) => failed += 1,
            Err(e) => {
                error!("Failed to pack {}: {e:#}", directory.display());
                failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!("Built {} PBO(s) in {:?} ({} failed)", built, start.elapsed(), failed);

    if failed > 0 {
        anyhow::bail!("{failed} PBO(s) could not be built");
    }
    Ok(())
}

/// Pack one source folder. Returns `None` when config errors abort packing.
fn build_one(
    packer: &Packer,
    directory: &Path,
    output: &Path,
    options: &ScanOptions,
    warn_only: bool,
) -> Result<Option<PathBuf>> {
    let mut descriptor = load_descriptor(directory, options)?;

    if descriptor.has_config_errors() {
        for file in descriptor.configs() {
            let Some(parsed) = file.parsed_config() else {
                continue;
            };
            if parsed.is_valid() {
                continue;
            }
            warn!("Errors in config at '{}' ({})", file.full_path(), directory.display());
            for error in &parsed.errors {
                warn!("  {error}");
            }
        }

        if !warn_only {
            error!("Aborting packing of {}", directory.display());
            return Ok(None);
        }
        warn!("--warn is set, ignoring config errors");
    }

    let path = packer
        .pack(&mut descriptor, output)
        .with_context(|| format!("Failed to write PBO to {}", output.display()))?;
    Ok(Some(path))
}

fn cmd_config(input: &Path, output: &Path, binarize: bool) -> Result<()> {
    println!("Converting: {} -> {}", input.display(), output.display());

    let result = parse_file(input).context("Failed to read config file")?;
    for error in &result.errors {
        warn!("{}: {error}", input.display());
    }

    let bytes = if binarize {
        rapify(&result.config).context("Failed to binarize config")?
    } else {
        render_text(&result.config)
    };
    fs::write(output, &bytes).context("Failed to write output file")?;

    println!(
        "Wrote {} bytes ({} error(s) recovered)",
        bytes.len(),
        result.errors.len()
    );

    Ok(())
}
