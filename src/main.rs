// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for chat2html.
//!
//! This binary provides the `chat2html` command for rendering transcripts
//! (JSON block lists or plain marker-annotated text) as inline-styled HTML.

use chat2html::{Config, ContentBlock, config, render_markup, render_preview, transcript};
use lexopt::prelude::*;
use snafu::{OptionExt, ensure, prelude::*};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use walkdir::WalkDir;

/// Where to write the rendered output.
#[derive(Clone)]
enum OutputTarget {
    /// Write each file to the specified directory.
    Directory(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    config: Option<PathBuf>,
    title: Option<String>,
    concat: bool,
    preview: bool,
    quiet: bool,
    dry_run: bool,
    force: bool,
    verbose: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("no transcript files found in the given inputs"))]
    NoInputFiles,

    #[snafu(display("cannot output multiple files to stdout without --concat"))]
    MultipleFilesToStdout,

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: io::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile { path: PathBuf, source: io::Error },

    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseBlocks {
        path: PathBuf,
        source: transcript::ParseError,
    },

    #[snafu(display("failed to load configuration {}: {source}", path.display()))]
    ParseConfig {
        path: PathBuf,
        source: config::ConfigError,
    },

    #[snafu(display("invalid input filename: no file stem"))]
    InvalidFilename,

    #[snafu(display("failed to serialize preview tree: {source}"))]
    SerializePreview { source: serde_json::Error },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile { path: PathBuf, source: io::Error },
}

fn print_help() {
    println!(
        "\
{name} {version}
Render chat transcripts as inline-styled HTML

Usage: {name} [OPTIONS] -o <OUTPUT> <INPUT>...

Arguments:
  <INPUT>...  Transcript files (.json block lists or plain text) or directories

Options:
  -o, --output <OUTPUT>     Output directory (or file with --concat, or - for stdout)
  -c, --config <FILE>       Style configuration JSON (default: built-in theme)
      --title <TEXT>        Document title (overrides the configuration)
      --concat              Combine all inputs into a single document
      --preview             Write the live preview tree as JSON instead of HTML

Transcript syntax:
  >> text                   AI turn
  << text                   User turn
  # / ## / ### text         Heading
  --- / === / ***           Divider
  anything else             Narration (**bold**, *italic*, \"dialogue\")

Other options:
  -q, --quiet               Suppress progress messages
  -n, --dry-run             Show what would be processed without writing
  -f, --force               Overwrite existing output files
  -v, --verbose             Log rendering details to stderr
  -h, --help                Print help
  -V, --version             Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output: Option<OutputTarget> = None;
    let mut config = None;
    let mut title = None;
    let mut concat = false;
    let mut preview = false;
    let mut quiet = false;
    let mut dry_run = false;
    let mut force = false;
    let mut verbose = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = Some(if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::Directory(val)
                });
            }
            Short('c') | Long("config") => config = Some(parser.value()?.parse()?),
            Long("title") => title = Some(parser.value()?.string()?),
            Long("concat") => concat = true,
            Long("preview") => preview = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('v') | Long("verbose") => verbose = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output: output.ok_or("missing required option: --output")?,
        config,
        title,
        concat,
        preview,
        quiet,
        dry_run,
        force,
        verbose,
    })
}

/// Installs the stderr log subscriber; `RUST_LOG` refines the level.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_tracing(cli.verbose);

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    let config = load_config(&cli)?;

    // Collect all input files first
    let files = collect_input_files(&cli.input);
    debug!(files = files.len(), "collected inputs");
    ensure!(!files.is_empty(), NoInputFilesSnafu);

    if cli.concat {
        process_concat(&files, &config, &cli)?;
    } else {
        match &cli.output {
            OutputTarget::Stdout => {
                // Without concat, we can only output one file to stdout
                ensure!(files.len() == 1, MultipleFilesToStdoutSnafu);
                process_to_stdout(&files[0], &config, &cli)?;
            }
            OutputTarget::Directory(dir) => {
                if !cli.dry_run {
                    std::fs::create_dir_all(dir).context(CreateOutputDirSnafu)?;
                }
                for file in &files {
                    process_file(file, dir, &config, &cli)?;
                }
            }
        }
    }

    Ok(())
}

/// Reads the configuration file, if any, and applies `--title`.
fn load_config(cli: &Cli) -> Result<Config, Error> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
            Config::from_json(&json).context(ParseConfigSnafu { path })?
        }
        None => Config::default(),
    };
    if let Some(title) = &cli.title {
        config.title.clone_from(title);
    }
    Ok(config)
}

/// Collects all transcript files from the given inputs (files and directories).
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| {
                    e.file_type().is_file()
                        && e.path()
                            .extension()
                            .is_some_and(|ext| ext == "json" || ext == "txt")
                })
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Reads one input: a JSON block list, or plain text as a single block.
fn load_blocks(path: &Path) -> Result<Vec<ContentBlock>, Error> {
    let text = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
    if path.extension().is_some_and(|ext| ext == "json") {
        transcript::parse_blocks(&text).context(ParseBlocksSnafu { path })
    } else {
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(vec![transcript::block_from_text(&title, &text)])
    }
}

/// Renders blocks as HTML, or as the pretty-printed preview tree.
fn render(blocks: &[ContentBlock], config: &Config, cli: &Cli) -> Result<String, Error> {
    if cli.preview {
        let tree = render_preview(blocks, config);
        serde_json::to_string_pretty(&tree).context(SerializePreviewSnafu)
    } else {
        Ok(render_markup(blocks, config))
    }
}

const fn output_extension(cli: &Cli) -> &'static str {
    if cli.preview { "json" } else { "html" }
}

/// Processes a single file and outputs to stdout.
fn process_to_stdout(input: &Path, config: &Config, cli: &Cli) -> Result<(), Error> {
    if cli.dry_run {
        eprintln!("Would output {}", input.display());
        return Ok(());
    }

    let blocks = load_blocks(input)?;
    let rendered = render(&blocks, config, cli)?;

    println!("{rendered}");
    Ok(())
}

/// Processes multiple files and merges their blocks into a single document.
fn process_concat(files: &[PathBuf], config: &Config, cli: &Cli) -> Result<(), Error> {
    let mut blocks = Vec::new();
    for path in files {
        blocks.extend(load_blocks(path)?);
    }
    // Ids must stay unique across the merged list
    for (block, id) in blocks.iter_mut().zip(0u64..) {
        block.id = id;
    }

    let rendered = render(&blocks, config, cli)?;

    match &cli.output {
        OutputTarget::Stdout => {
            if cli.dry_run {
                eprintln!("Would output {} files concatenated", files.len());
            } else {
                println!("{rendered}");
            }
        }
        OutputTarget::Directory(path) => {
            // In concat mode, treat path as a file, not directory
            if cli.dry_run {
                eprintln!(
                    "Would write {} ({} files concatenated)",
                    path.display(),
                    files.len()
                );
            } else if path.exists() && !cli.force {
                eprintln!(
                    "Skipping {} (already exists, use --force to overwrite)",
                    path.display()
                );
            } else {
                // Create parent directory if needed
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent).context(CreateOutputDirSnafu)?;
                }
                std::fs::write(path, &rendered).context(WriteFileSnafu { path })?;
                if !cli.quiet {
                    eprintln!("Wrote {} ({} files)", path.display(), files.len());
                }
            }
        }
    }

    Ok(())
}

/// Processes a single file and writes to the output directory.
fn process_file(input: &Path, out_dir: &Path, config: &Config, cli: &Cli) -> Result<(), Error> {
    let out_name = input.file_stem().context(InvalidFilenameSnafu)?;
    let out_path = out_dir.join(format!(
        "{}.{}",
        out_name.to_string_lossy(),
        output_extension(cli)
    ));

    // Handle dry-run mode
    if cli.dry_run {
        eprintln!("Would write {}", out_path.display());
        return Ok(());
    }

    // Check if output exists and handle overwrite
    if out_path.exists() && !cli.force {
        eprintln!(
            "Skipping {} (already exists, use --force to overwrite)",
            out_path.display()
        );
        return Ok(());
    }

    let blocks = load_blocks(input)?;
    let rendered = render(&blocks, config, cli)?;

    std::fs::write(&out_path, &rendered).context(WriteFileSnafu { path: &out_path })?;

    if !cli.quiet {
        eprintln!("Wrote {}", out_path.display());
    }
    Ok(())
}
