//! econwrite: title and abstract feedback CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use econwrite::analyzer::FeedbackEngine;
use econwrite::config::{
    build_ignore_set, default_config_json, is_ignored, load_config, Config, CONFIG_FILENAME,
};
use econwrite::draft::Draft;
use econwrite::guide::{self, Page};
use econwrite::reporter::{ConsoleReporter, JsonReporter};
use econwrite::watcher::{is_draft_file, DraftWatcher};
use econwrite::FeedbackReport;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Environment variable holding the log filter
const LOG_ENV: &str = "ECONWRITE_LOG";

/// econwrite: feedback on economics paper titles and abstracts
#[derive(Parser, Debug)]
#[command(name = "econwrite")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Draft file or directory to analyze ("-" reads a draft from stdin)
    path: Option<PathBuf>,

    /// Analyze this title instead of a draft file
    #[arg(long, conflicts_with = "path")]
    title: Option<String>,

    /// Analyze this abstract instead of a draft file
    #[arg(long = "abstract", value_name = "TEXT", conflicts_with = "path")]
    abstract_text: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (one line per draft)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (rule ids, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Exit 1 when any warning remains
    #[arg(long)]
    strict: bool,

    /// Path to config file (default: search .econwriterc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch for draft changes and re-analyze
    #[arg(long)]
    watch: bool,

    /// Analyze drafts in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run MCP server (stdio JSON-RPC)
    Mcp,

    /// Create .econwriterc.json with the default heuristics
    Init {
        /// Write "strict": true
        #[arg(long)]
        strict: bool,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// List the writing guide pages
    Pages {
        #[arg(long, short)]
        json: bool,
    },

    /// Show one guide page by slug, label or section number
    Page {
        tag: String,

        #[arg(long, short)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "econwrite=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(ref cmd) = args.command {
        return match cmd {
            Commands::Mcp => {
                info!("starting MCP server on stdio");
                econwrite::mcp::run_mcp_server().map(|_| ExitCode::SUCCESS)
            }
            Commands::Init { strict, dir } => run_init(*strict, dir.as_deref()),
            Commands::Pages { json } => run_pages(*json),
            Commands::Page { tag, json } => run_page(tag, *json),
        };
    }

    if args.title.is_some() || args.abstract_text.is_some() {
        return run_inline(&args);
    }

    let path = match args.path {
        Some(ref p) => p.clone(),
        None => anyhow::bail!("Nothing to analyze: pass a draft PATH, --title or --abstract"),
    };

    if path.as_os_str() == "-" {
        return run_stdin(&args);
    }

    if args.watch {
        return run_watch(&args, &path);
    }

    let work_dir = work_dir_for(&path);
    let config = load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.strict);
    let engine = FeedbackEngine::from_config(&config)?;

    let drafts = collect_drafts(&path, &config)?;
    if drafts.is_empty() {
        eprintln!("{}: No drafts found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }
    debug!(count = drafts.len(), "collected drafts");

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let use_parallel = args.parallel || drafts.len() > 10;
    let outcomes = if use_parallel {
        engine.analyze_parallel(&drafts)
    } else {
        engine.analyze_many(&drafts)
    };

    let mut had_errors = false;
    let mut reports = Vec::with_capacity(outcomes.len());
    for (file, outcome) in drafts.iter().zip(outcomes) {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                had_errors = true;
                if !args.quiet {
                    eprintln!(
                        "{}: Failed to analyze {}: {:#}",
                        "Error".red(),
                        file.display(),
                        e
                    );
                }
            }
        }
    }

    if reports.is_empty() {
        eprintln!("{}: All drafts failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    emit(&args, &reports);

    if let Some(code) = strict_failure(&args, &config, &reports) {
        return Ok(code);
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Directory used for config lookup
fn work_dir_for(path: &Path) -> &Path {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    } else {
        path
    }
}

fn current_dir_config(args: &Args) -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(load_config(&cwd, args.config.as_deref())?.merge_with_cli(args.strict))
}

fn run_inline(args: &Args) -> Result<ExitCode> {
    let config = current_dir_config(args)?;
    let engine = FeedbackEngine::from_config(&config)?;
    let report = engine.evaluate(args.title.as_deref(), args.abstract_text.as_deref());
    let reports = [report];
    emit(args, &reports);
    Ok(strict_failure(args, &config, &reports).unwrap_or(ExitCode::SUCCESS))
}

fn run_stdin(args: &Args) -> Result<ExitCode> {
    let config = current_dir_config(args)?;
    let engine = FeedbackEngine::from_config(&config)?;
    let draft = Draft::from_reader(std::io::stdin().lock())?;
    if draft.is_empty() && !args.quiet && !args.json {
        eprintln!("{}: Draft on stdin is empty", "Warning".yellow());
    }
    let reports = [engine.evaluate_draft(&draft, None)];
    emit(args, &reports);
    Ok(strict_failure(args, &config, &reports).unwrap_or(ExitCode::SUCCESS))
}

/// Print reports in the requested format
fn emit(args: &Args, reports: &[FeedbackReport]) {
    let stats = FeedbackEngine::aggregate_stats(reports);
    if args.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 {
            println!("{}", reporter.report(&reports[0]));
        } else {
            println!("{}", reporter.report_with_summary(reports, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for report in reports {
            reporter.report_quiet(report);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(reports, &stats);
        }
    }
}

/// Exit code 1 when strict mode is on and warnings remain
fn strict_failure(args: &Args, config: &Config, reports: &[FeedbackReport]) -> Option<ExitCode> {
    if !config.is_strict() {
        return None;
    }
    let warnings: usize = reports.iter().map(FeedbackReport::warning_count).sum();
    if warnings == 0 {
        return None;
    }
    if !args.quiet && !args.json {
        eprintln!(
            "\n{}: {} warning{} remain (strict mode)",
            "Failed".red().bold(),
            warnings,
            if warnings == 1 { "" } else { "s" }
        );
    }
    Some(ExitCode::from(1))
}

fn run_init(strict: bool, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = default_config_json(strict)?;
    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with strict={}",
        "Done".green().bold(),
        config_path.display(),
        strict
    );
    Ok(ExitCode::SUCCESS)
}

fn run_pages(json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", JsonReporter::new().pretty().report_pages());
        return Ok(ExitCode::SUCCESS);
    }
    for page in Page::ALL {
        println!("{:<32} {}", page.label(), page.slug().dimmed());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_page(tag: &str, json: bool) -> Result<ExitCode> {
    let page: Page = tag.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let blocks = guide::render(page);
    if json {
        println!("{}", JsonReporter::new().pretty().report_page(page, &blocks));
    } else {
        ConsoleReporter::new().report_page(page, &blocks);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let config =
        load_config(work_dir_for(path), args.config.as_deref())?.merge_with_cli(args.strict);
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let engine = FeedbackEngine::from_config(&config)?;

    let suffixes = config.get_draft_patterns();
    let watcher =
        DraftWatcher::watch(path, suffixes.as_slice()).context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    let mut reporter = ConsoleReporter::new();
    if args.verbose {
        reporter = reporter.verbose();
    }

    while let Some(changed) = watcher.next_changes() {
        for file in changed.into_iter().filter(|p| {
            ignore_set
                .as_ref()
                .map(|set| !is_ignored(p, set))
                .unwrap_or(true)
        }) {
            match engine.analyze_file(&file) {
                Ok(report) => {
                    if args.json {
                        println!("{}", JsonReporter::new().report(&report));
                    } else if args.quiet {
                        reporter.report_quiet(&report);
                    } else {
                        reporter.report(&report);
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}: {:#}", "Error".red(), file.display(), e);
                }
            }
        }
    }

    eprintln!("{}: File watcher stopped", "Error".red());
    Ok(ExitCode::from(2))
}

/// Collect draft paths under `path`, honoring config ignores and draft suffixes.
/// An explicit file is always analyzed unless ignored.
fn collect_drafts(path: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let ignored = |p: &Path| ignore_set.as_ref().is_some_and(|set| is_ignored(p, set));

    if path.is_file() {
        if ignored(path) {
            return Ok(vec![]);
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let suffixes = config.get_draft_patterns();
    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if entry.file_type().is_file()
            && is_draft_file(file_path, suffixes.as_slice())
            && !ignored(file_path)
        {
            files.push(file_path.to_path_buf());
        }
    }

    // Sort for consistent output
    files.sort();
    Ok(files)
}
