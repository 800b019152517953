//! Command-line interface for cortxt.
//!
//! Thin wrapper over the library: every subcommand builds options, calls into
//! `cortxt`, and prints the result to stdout (or a file). Diagnostics go to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use cortxt::deps::{DependencyScope, read_dependencies};
use cortxt::extract::extract_files;
use cortxt::ignore_rules::{self, AddOutcome, RemoveOutcome};
use cortxt::output::{self, OutputFormat};
use cortxt::stats::{ProjectStats, extension_breakdown, format_bytes};
use cortxt::tree::{DEFAULT_TREE_DEPTH, build_tree};
use cortxt::{
    ContextOutcome, ContextReport, CortxtBuilder, CortxtError, DEFAULT_MAX_TOTAL_KB, IgnoreRules,
    Pipeline, scan,
};
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing_subscriber::EnvFilter;

/// cortxt — share project context with an AI assistant
#[derive(Parser)]
#[command(name = "cortxt", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the whole project into one document
    Context {
        /// Root directory (default current dir)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Include everything: no size limit, no budgeting
        #[arg(short, long)]
        force: bool,

        /// Output budget in kilobytes
        #[arg(long, default_value_t = DEFAULT_MAX_TOTAL_KB)]
        max_size: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a file-type and largest-file breakdown to stderr
        #[arg(short, long)]
        stats: bool,

        /// Also honour .gitignore files
        #[arg(long)]
        gitignore: bool,
    },
    /// Show the project folder structure
    Tree {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Maximum depth to show
        #[arg(short, long, default_value_t = DEFAULT_TREE_DEPTH)]
        depth: usize,
    },
    /// Show project statistics (files, lines, size)
    Stats {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Extract dependencies from package.json
    Deps {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Only devDependencies
        #[arg(long, conflicts_with = "prod_only")]
        dev_only: bool,

        /// Only dependencies
        #[arg(long)]
        prod_only: bool,
    },
    /// Extract specific files
    File {
        /// Files relative to the root
        #[arg(required = true)]
        paths: Vec<String>,

        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Prefix each line with its number
        #[arg(short, long)]
        lines: bool,
    },
    /// Manage .cortxtignore patterns
    Ignore {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Add a pattern
        #[arg(long, group = "action")]
        add: Option<String>,

        /// Remove a pattern
        #[arg(long, group = "action")]
        remove: Option<String>,

        /// Rewrite the file with the default patterns
        #[arg(long, group = "action")]
        reset: bool,

        /// List the effective patterns (default)
        #[arg(long, group = "action")]
        list: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputFormat::Markdown,
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let result = match cli.command {
        Command::Context {
            root,
            force,
            max_size,
            format,
            output,
            stats,
            gitignore,
        } => run_context(root, force, max_size, format.into(), output, stats, gitignore),
        Command::Tree { root, depth } => run_tree(&root, depth),
        Command::Stats { root } => run_stats(root),
        Command::Deps {
            root,
            dev_only,
            prod_only,
        } => {
            let scope = if dev_only {
                DependencyScope::DevOnly
            } else if prod_only {
                DependencyScope::ProdOnly
            } else {
                DependencyScope::All
            };
            run_deps(&root, scope)
        }
        Command::File { paths, root, lines } => run_file(&root, &paths, lines),
        Command::Ignore {
            root,
            add,
            remove,
            reset,
            list: _,
        } => run_ignore(&root, add, remove, reset),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match e {
            CortxtError::RootNotFound(_) => 2,
            _ => 1,
        };
        exit(code);
    }
}

fn run_context(
    root: PathBuf,
    force: bool,
    max_size: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
    stats: bool,
    gitignore: bool,
) -> Result<(), CortxtError> {
    let options = CortxtBuilder::new(root)
        .force_include_all(force)
        .max_total_kb(max_size)
        .respect_gitignore(gitignore)
        .build();
    let report = match Pipeline::new(options).with_format(format).run()? {
        ContextOutcome::Rendered(report) => report,
        ContextOutcome::NothingToProcess { skipped } => {
            eprintln!("No files found to process ({} skipped)", skipped);
            eprintln!("Not in a project folder? Navigate to your code directory first");
            return Ok(());
        }
    };

    match output {
        Some(path) => output::write_rendered(report.selection.pairs(), format, &path)?,
        None => print!("{}", report.rendered),
    }
    print_summary(&report);
    if stats {
        eprintln!("\nFile types:");
        let paths = report.selection.files.iter().map(|f| f.path.as_str());
        for ext in extension_breakdown(paths, 5) {
            eprintln!("  {:<12} {} files", ext.extension, ext.files);
        }
        let mut largest: Vec<_> = report.selection.files.iter().collect();
        largest.sort_by(|a, b| b.content.len().cmp(&a.content.len()));
        eprintln!("\nLargest files:");
        for file in largest.iter().take(3) {
            eprintln!("  {:<25} {}", file.path, format_bytes(file.content.len()));
        }
    }
    Ok(())
}

fn print_summary(report: &ContextReport) {
    if report.selection.was_reduced() {
        eprintln!(
            "Processed {} priority files ({}), {} truncated",
            report.final_count(),
            format_bytes(report.final_bytes()),
            report.selection.truncated_count()
        );
        eprintln!(
            "Original: {} files ({})",
            report.original_count(),
            format_bytes(report.original_bytes())
        );
        eprintln!("Smart filtering applied - use --force to include all files");
    } else {
        eprintln!(
            "Processed {} files ({})",
            report.final_count(),
            format_bytes(report.final_bytes())
        );
    }
    if report.skipped > 0 {
        eprintln!("Skipped {} binary/large/unreadable files", report.skipped);
    }
    eprintln!("~{} tokens", report.estimated_tokens());
}

fn run_tree(root: &Path, depth: usize) -> Result<(), CortxtError> {
    let rules = IgnoreRules::load(&root.join(ignore_rules::IGNORE_FILE_NAME));
    print!("{}", build_tree(root, rules, depth)?);
    Ok(())
}

fn run_stats(root: PathBuf) -> Result<(), CortxtError> {
    let options = CortxtBuilder::new(root).build();
    let rules = IgnoreRules::load(&options.ignore_file_path());
    let result = scan(&options, rules)?;
    print!("{}", ProjectStats::from_scan(&result).render());
    Ok(())
}

fn run_deps(root: &Path, scope: DependencyScope) -> Result<(), CortxtError> {
    let deps = read_dependencies(root, scope)?;
    println!("{}", deps.render()?);
    Ok(())
}

fn run_file(root: &Path, paths: &[String], lines: bool) -> Result<(), CortxtError> {
    let extraction = extract_files(root, paths, lines);
    for (path, err) in &extraction.failures {
        eprintln!("Error reading {}: {}", path, err);
    }
    let extraction = extraction.require_any()?;
    print!("{}", output::render_markdown(extraction.pairs()));
    eprintln!(
        "Processed {} file(s), {}",
        extraction.files.len(),
        format_bytes(extraction.total_bytes())
    );
    Ok(())
}

fn run_ignore(
    root: &Path,
    add: Option<String>,
    remove: Option<String>,
    reset: bool,
) -> Result<(), CortxtError> {
    let path = root.join(ignore_rules::IGNORE_FILE_NAME);
    if let Some(pattern) = add {
        match ignore_rules::add_pattern(&path, &pattern)? {
            AddOutcome::Added => eprintln!("Added \"{}\" to ignore list", pattern),
            AddOutcome::AlreadyPresent => {
                eprintln!("Pattern \"{}\" already exists in ignore list", pattern)
            }
        }
    } else if let Some(pattern) = remove {
        match ignore_rules::remove_pattern(&path, &pattern)? {
            RemoveOutcome::Removed => eprintln!("Removed \"{}\" from ignore list", pattern),
            RemoveOutcome::PatternNotFound => {
                eprintln!("Pattern \"{}\" not found in ignore list", pattern)
            }
            RemoveOutcome::NoIgnoreFile => eprintln!("No .cortxtignore file found"),
        }
    } else if reset {
        ignore_rules::reset_ignore_file(&path)?;
        eprintln!("Reset ignore patterns to default");
    } else {
        let rules = IgnoreRules::load(&path);
        if rules.is_default() {
            eprintln!("Using default ignore patterns (no usable .cortxtignore file found)");
        }
        for (i, pattern) in rules.patterns().enumerate() {
            println!("{:>2}. {}", i + 1, pattern);
        }
    }
    Ok(())
}
