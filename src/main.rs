//! mindmark - XMind to Markdown converter

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use mindmark::{ConversionResult, ConvertOptions, Converter};

#[derive(Parser)]
#[command(name = "mindmark")]
#[command(version, about = "Convert XMind mind maps to Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    mindmark ideas.xmind                Print Markdown to stdout
    mindmark ideas.xmind -o ideas.md    Write Markdown to a file
    mindmark *.xmind -o out/            Convert several maps into a directory
    mindmark --json ideas.xmind         Print the full conversion result as JSON")]
struct Cli {
    /// Input files (.xmind)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (one input) or directory (several inputs)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the conversion result as JSON instead of Markdown
    #[arg(long)]
    json: bool,

    /// Add a metadata comment (time, topic count, depth) after the title
    #[arg(short, long)]
    metadata: bool,

    /// Override a marker symbol, e.g. --marker flag-red=❗ (repeatable)
    #[arg(long = "marker", value_name = "ID=SYMBOL", value_parser = parse_marker)]
    markers: Vec<(String, String)>,

    /// Print statistics to stderr
    #[arg(short, long)]
    stats: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Log progress (same as RUST_LOG=info)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

fn parse_marker(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((id, symbol)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), symbol.to_string()))
        }
        _ => Err(format!("expected ID=SYMBOL, got '{value}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    let mut options = ConvertOptions::new().with_metadata(cli.metadata);
    for (id, symbol) in &cli.markers {
        options = options.with_marker(id.clone(), symbol.clone());
    }
    let converter = Converter::new(options);

    let mut failed = 0;
    for input in &cli.inputs {
        let result = converter.convert_file(input);
        if let Err(e) = emit(&cli, input, &result) {
            eprintln!("error: {}: {e}", input.display());
            failed += 1;
            continue;
        }
        if !result.success {
            failed += 1;
        }
    }

    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Write one result to its destination and report on stderr.
fn emit(cli: &Cli, input: &Path, result: &ConversionResult) -> io::Result<()> {
    if !result.success && !cli.json {
        let message = result.error.as_deref().unwrap_or("unknown error");
        eprintln!("error: {}: {message}", input.display());
        return Ok(());
    }

    let body = if cli.json {
        result.to_json().map_err(io::Error::other)?
    } else {
        result.content.clone()
    };

    match output_path(cli, input) {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, body)?;
            info!(input = %input.display(), output = %path.display(), "wrote output");
            if !cli.quiet {
                eprintln!("{} -> {}", input.display(), path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(body.as_bytes())?;
            if cli.json {
                stdout.write_all(b"\n")?;
            }
        }
    }

    if cli.stats && result.success {
        print_stats(input, result);
    }

    Ok(())
}

/// Destination for an input, or `None` for stdout.
fn output_path(cli: &Cli, input: &Path) -> Option<PathBuf> {
    let extension = if cli.json { "json" } else { "md" };
    let file_name = input.with_extension(extension);
    let file_name = file_name.file_name()?;

    match &cli.output {
        Some(output) if cli.inputs.len() == 1 && !names_directory(output) => {
            Some(output.clone())
        }
        Some(dir) => Some(dir.join(file_name)),
        None if cli.inputs.len() == 1 => None,
        None => Some(input.with_extension(extension)),
    }
}

/// An existing directory, or a path written with a trailing separator.
fn names_directory(path: &Path) -> bool {
    path.is_dir()
        || path
            .as_os_str()
            .to_string_lossy()
            .ends_with(['/', std::path::MAIN_SEPARATOR])
}

fn print_stats(input: &Path, result: &ConversionResult) {
    let stats = &result.stats;
    eprintln!("File: {}", input.display());
    eprintln!("Topics: {}", stats.total_topics);
    eprintln!("Root topics: {}", stats.root_topics);
    eprintln!("Max depth: {}", stats.max_depth);
    eprintln!("Markers: {}", stats.markers_processed);
    eprintln!("Links: {}", stats.links_processed);
    eprintln!(
        "Attachments: {} ({} images)",
        stats.attachments_processed, stats.images_processed
    );
    eprintln!("Words: {}", stats.word_count);
    eprintln!("Characters: {}", stats.char_count);
    eprintln!("Time: {:.1} ms", result.metadata.processing_duration_ms);
}
