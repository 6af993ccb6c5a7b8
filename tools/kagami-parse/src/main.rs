//! Kagami command-line front end.
//!
//! Parses release names from arguments or stdin and prints one JSON object
//! per line, for batch checks and manual inspection.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;

use kagami_core::matching::{get_root, is_match};
use kagami_core::parser::{ParseContext, ParserConfig, ReleaseParser};
use kagami_core::{ParsedRelease, QUALITY_TABLE, ShowRoot};

/// CLI arguments
#[derive(Parser)]
#[command(name = "kagami-parse")]
#[command(about = "Parse scene release names and match show titles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Parser configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse release names (reads stdin when none are given)
    Parse {
        /// Release names or file names
        names: Vec<String>,

        /// Ancestor directory, closest first (repeatable)
        #[arg(short, long = "dir")]
        dirs: Vec<String>,

        /// Known show title, enables absolute episode numbers
        #[arg(short, long)]
        show: Option<String>,
    },
    /// Print the canonical root of a show title
    Root {
        title: String,
    },
    /// Check whether a candidate title names the reference show
    Match {
        candidate: String,
        reference: String,
    },
    /// List the quality table in classification order
    Qualities,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    input: &'a str,
    #[serde(flatten)]
    release: ParsedRelease,
}

#[derive(Serialize)]
struct RootOutput<'a> {
    title: &'a str,
    root: ShowRoot,
    year: Option<u16>,
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    candidate: &'a str,
    reference: &'a str,
    matched: bool,
}

#[derive(Serialize)]
struct QualityOutput {
    rank: usize,
    quality: String,
    description: &'static str,
    tier: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let config = load_config(cli.config.as_ref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Parse { names, dirs, show } => {
            let parser = ReleaseParser::with_config(config).context("invalid parser configuration")?;
            let mut context = ParseContext::new().with_directories(dirs);
            if let Some(show) = show {
                context = context.with_known_show(get_root(&show));
            }

            if names.is_empty() {
                info!("reading release names from stdin");
                for line in io::stdin().lock().lines() {
                    let line = line.context("failed to read stdin")?;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    print_release(&mut out, &parser, line, &context)?;
                }
            } else {
                for name in &names {
                    print_release(&mut out, &parser, name, &context)?;
                }
            }
        }
        Commands::Root { title } => {
            let root = get_root(&title);
            let output = RootOutput {
                title: &title,
                year: root.year(),
                root,
            };
            print_json(&mut out, &output)?;
        }
        Commands::Match {
            candidate,
            reference,
        } => {
            let output = MatchOutput {
                matched: is_match(candidate.as_str(), &get_root(&reference)),
                candidate: &candidate,
                reference: &reference,
            };
            print_json(&mut out, &output)?;
        }
        Commands::Qualities => {
            for (rank, entry) in QUALITY_TABLE.iter().enumerate() {
                let output = QualityOutput {
                    rank,
                    quality: format!("{:?}", entry.quality),
                    description: entry.description,
                    tier: format!("{:?}", entry.tier),
                };
                print_json(&mut out, &output)?;
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<ParserConfig> {
    let Some(path) = path else {
        return Ok(ParserConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ParserConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded parser configuration");
    Ok(config)
}

fn print_release(
    out: &mut impl Write,
    parser: &ReleaseParser,
    name: &str,
    context: &ParseContext,
) -> Result<()> {
    let output = ParseOutput {
        input: name,
        release: parser.parse_file_with(name, context),
    };
    print_json(out, &output)
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).context("failed to serialize output")?;
    writeln!(out).context("failed to write output")?;
    Ok(())
}
