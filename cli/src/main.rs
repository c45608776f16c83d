//! docstitch CLI - document model reassembly and chunking tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docstitch::chunk::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP, DEFAULT_SOURCE};
use docstitch::render::DEFAULT_MIN_IMAGE_DIMENSION;
use docstitch::{
    chunk_text, collect_inputs, load_model, merge_tables, BatchReport, ChunkOptions,
    ChunkingStatus, CleanupPreset, ItemLabel, JsonFormat, Pipeline,
    PipelineOptions, ReconstructOptions, TokenizerKind,
};

#[derive(Parser)]
#[command(name = "docstitch")]
#[command(version)]
#[command(about = "Rebuild reading-order Markdown and retrieval chunks from layout-engine output", long_about = None)]
struct Cli {
    /// Input model file or folder
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output root directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    #[command(flatten)]
    chunk: ChunkArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a model file or folder into run directories
    Process {
        /// Input model file or folder
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output root directory
        #[arg(short, long, value_name = "DIR", env = "DOCSTITCH_OUTPUT_DIR", default_value = "output")]
        output: PathBuf,

        /// Process folder documents in parallel
        #[arg(long, env = "DOCSTITCH_PARALLEL")]
        parallel: bool,

        /// Omit the engine/file header block from output.md
        #[arg(long)]
        no_header: bool,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        chunk: ChunkArgs,
    },

    /// Print the reading-order Markdown of a model
    #[command(alias = "md")]
    Markdown {
        /// Input model file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prepend the engine/file header block
        #[arg(long)]
        header: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Chunk a model (or an existing Markdown/text file) to JSON
    Chunk {
        /// Input model, Markdown, or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        chunk: ChunkArgs,
    },

    /// Show document model information
    Info {
        /// Input model file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct RenderArgs {
    /// Text cleanup preset
    #[arg(long, value_enum, env = "DOCSTITCH_CLEANUP")]
    cleanup: Option<CleanupLevel>,

    /// Drop items containing this text (repeatable, comma-separated)
    #[arg(long, value_name = "TEXT", env = "DOCSTITCH_BOILERPLATE", value_delimiter = ',')]
    boilerplate: Vec<String>,

    /// File with one boilerplate string per line
    #[arg(long, value_name = "FILE", env = "DOCSTITCH_BOILERPLATE_FILE")]
    boilerplate_file: Option<PathBuf>,

    /// Keep tables split across pages as separate tables
    #[arg(long)]
    no_merge: bool,

    /// Skip images narrower or shorter than this many pixels
    #[arg(long, value_name = "PX", default_value_t = DEFAULT_MIN_IMAGE_DIMENSION, env = "DOCSTITCH_MIN_IMAGE")]
    min_image: u32,
}

impl RenderArgs {
    fn to_options(&self) -> Result<ReconstructOptions, Box<dyn std::error::Error>> {
        let mut patterns = self.boilerplate.clone();
        if let Some(ref path) = self.boilerplate_file {
            patterns.extend(read_boilerplate_file(path)?);
        }

        let mut options = ReconstructOptions::new()
            .with_boilerplate_list(patterns)
            .with_table_merge(!self.no_merge)
            .with_min_image_dimension(self.min_image);

        if let Some(level) = self.cleanup {
            options = options.with_cleanup_preset(level.into());
        }
        Ok(options)
    }
}

#[derive(Args, Clone)]
struct ChunkArgs {
    /// Maximum tokens per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "DOCSTITCH_CHUNK_SIZE")]
    chunk_size: usize,

    /// Tokens shared between neighbouring chunks
    #[arg(long, default_value_t = DEFAULT_OVERLAP, env = "DOCSTITCH_OVERLAP")]
    overlap: usize,

    /// Tokenizer used to measure chunks
    #[arg(long, value_enum, default_value = "cl100k", env = "DOCSTITCH_TOKENIZER")]
    tokenizer: TokenizerArg,

    /// Label written to chunk metadata
    #[arg(long, default_value = DEFAULT_SOURCE, env = "DOCSTITCH_SOURCE")]
    source: String,
}

impl ChunkArgs {
    fn to_options(&self) -> ChunkOptions {
        ChunkOptions::new()
            .with_chunk_size(self.chunk_size)
            .with_overlap(self.overlap)
            .with_tokenizer(self.tokenizer.into())
            .with_source(self.source.clone())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Unicode normalization and blank-line collapsing (default)
    Minimal,
    /// Minimal + ligature and replacement-character fixes
    Standard,
    /// Standard + repeated letterhead and page-number removal
    Aggressive,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
            CleanupLevel::Aggressive => CleanupPreset::Aggressive,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TokenizerArg {
    /// tiktoken cl100k_base
    Cl100k,
    /// tiktoken o200k_base
    O200k,
    /// One token per character
    Chars,
}

impl From<TokenizerArg> for TokenizerKind {
    fn from(arg: TokenizerArg) -> Self {
        match arg {
            TokenizerArg::Cl100k => TokenizerKind::Cl100k,
            TokenizerArg::O200k => TokenizerKind::O200k,
            TokenizerArg::Chars => TokenizerKind::Chars,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Process {
            input,
            output,
            parallel,
            no_header,
            render,
            chunk,
        }) => cmd_process(&input, &output, parallel, !no_header, &render, &chunk),
        Some(Commands::Markdown {
            input,
            output,
            header,
            max_heading,
            render,
        }) => cmd_markdown(&input, output.as_deref(), header, max_heading, &render),
        Some(Commands::Chunk {
            input,
            output,
            compact,
            render,
            chunk,
        }) => cmd_chunk(&input, output.as_deref(), compact, &render, &chunk),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: process if input is provided
            if let Some(input) = cli.input {
                let output = cli.output.unwrap_or_else(|| PathBuf::from("output"));
                cmd_process(&input, &output, false, true, &cli.render, &cli.chunk)
            } else {
                println!("{}", "Usage: docstitch <INPUT> [OUTPUT]".yellow());
                println!("       docstitch --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_process(
    input: &Path,
    output: &Path,
    parallel: bool,
    header: bool,
    render: &RenderArgs,
    chunk: &ChunkArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = PipelineOptions::new()
        .with_output_dir(output)
        .with_parallel(parallel)
        .with_reconstruct_options(render.to_options()?.with_header(header))
        .with_chunk_options(chunk.to_options());

    let pipeline = Pipeline::new(options)?;
    let inputs = collect_inputs(input)?;
    if inputs.is_empty() {
        println!(
            "{} {}",
            "No document models found in".yellow(),
            input.display()
        );
        return Ok(());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message(if parallel {
        "Processing in parallel..."
    } else {
        "Processing..."
    });
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    let report = pipeline.process_paths_with(inputs, |outcome| {
        pb.set_message(display_name(&outcome.path));
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    print_report(&report);

    let failed = report.len() - report.succeeded();
    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, report.len()).into());
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!("\n{}", "Runs:".green().bold());
    for outcome in &report.outcomes {
        let name = display_name(&outcome.path);
        match &outcome.result {
            Ok(run) => {
                let chunking = match &run.chunking {
                    ChunkingStatus::Completed { chunks } => format!("{} chunks", chunks),
                    ChunkingStatus::Failed { reason } => {
                        format!("{} ({})", "chunking failed".yellow(), reason)
                    }
                };
                println!(
                    "  {} {} {} {} | {} images | {}",
                    "✓".green(),
                    name,
                    "->".dimmed(),
                    run.run_dir.display(),
                    run.stats.images_saved,
                    chunking
                );
            }
            Err(e) => println!("  {} {}: {}", "✗".red(), name, e),
        }
    }
    println!(
        "\n{} {}/{} documents processed",
        "Done!".green().bold(),
        report.succeeded(),
        report.len()
    );
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    header: bool,
    max_heading: u8,
    render: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(input)?;
    let options = render.to_options()?.with_max_heading(max_heading);

    let mut markdown = String::new();
    if header {
        markdown.push_str(&model.origin.to_header_block());
    }
    markdown.push_str(&docstitch::render::to_markdown(&model, &options));

    if let Some(path) = output {
        fs::write(path, &markdown)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", markdown);
    }

    Ok(())
}

fn cmd_chunk(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    render: &RenderArgs,
    chunk: &ChunkArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = if is_plain_text(input) {
        fs::read_to_string(input)?
    } else {
        let model = load_model(input)?;
        docstitch::render::to_markdown(&model, &render.to_options()?)
    };

    let chunks = chunk_text(&text, &chunk.to_options())?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = docstitch::render::to_json(&chunks, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} chunks to {}",
            "Saved".green(),
            chunks.len(),
            path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(input)?;
    let groups = merge_tables(&model.tables);
    let merged = groups.iter().filter(|g| g.is_merged()).count();

    let labels = [
        ItemLabel::SectionHeader,
        ItemLabel::Text,
        ItemLabel::ListItem,
        ItemLabel::Table,
        ItemLabel::Picture,
        ItemLabel::Code,
        ItemLabel::Header,
        ItemLabel::Footer,
    ];

    if json {
        let counts: serde_json::Map<String, serde_json::Value> = labels
            .iter()
            .map(|l| (l.to_string(), model.count_label(*l).into()))
            .collect();
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "engine": model.origin.engine,
            "ocr_enabled": model.origin.ocr_enabled,
            "pages": model.page_count(),
            "items": model.items.len(),
            "labels": counts,
            "tables": model.tables.len(),
            "logical_tables": groups.len(),
            "merged_tables": merged,
            "pictures": model.pictures.len(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref name) = model.origin.filename {
        println!("{}: {}", "Source".bold(), name);
    }
    println!("{}: {}", "Engine".bold(), model.origin.engine);
    println!(
        "{}: {}",
        "OCR".bold(),
        if model.origin.ocr_enabled { "Yes" } else { "No" }
    );
    println!("{}: {}", "Pages".bold(), model.page_count());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Items".bold(), model.items.len());
    for label in labels {
        let count = model.count_label(label);
        if count > 0 {
            println!("  {} {}: {}", "·".dimmed(), label, count);
        }
    }
    println!(
        "{}: {} ({} logical, {} merged)",
        "Tables".bold(),
        model.tables.len(),
        groups.len(),
        merged
    );
    println!("{}: {}", "Pictures".bold(), model.pictures.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docstitch".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document reassembly and chunking tool");
    println!();
    println!("License: MIT");
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_plain_text(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown" | "txt"))
}

/// One pattern per line; blank lines and `#` comments are ignored.
fn read_boilerplate_file(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_boilerplate(&content))
}

fn parse_boilerplate(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
