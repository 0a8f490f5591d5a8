use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;

use toolbelt::audit::LogSink;
use toolbelt::config::FileConfig;
use toolbelt::domain::Polygon;
use toolbelt::files::{FileError, FileProcessor};
use toolbelt::geometry::collides;
use toolbelt::store::KeyValueStore;
use toolbelt::words::top_k;

const DEMO_TEXT: &str = "Hello world! Hello everyone. This is a simple test. Test, test, hello.";

/// Polygon collision checks plus small key-value, word-count and file utilities
///
/// Examples:
///   # Do two squares overlap?
///   toolbelt collide --a "0,0 4,0 4,4 0,4" --b "2,2 6,2 6,6 2,6"
///
///   # Five most frequent words of a file
///   toolbelt words --file notes.txt -k 5
///
///   # Copy a tree, then count lines of its .txt and .log files
///   toolbelt copy ./source_dir ./target_dir
///   toolbelt scan ./target_dir --ext .txt,.log
///
///   # Run every utility once on sample data
///   toolbelt demo
#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (optional, auto-searches toolbelt.toml if not provided)
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(global = true, long)]
    log_level: Option<LevelFilter>,

    /// Log file path (defaults to app.log)
    #[arg(global = true, long)]
    log_file: Option<PathBuf>,

    /// Also print log records to the terminal
    #[arg(global = true, short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether two polygons overlap or one contains the other
    Collide(CollideArgs),
    /// List the most frequent words of a text
    Words(WordsArgs),
    /// Copy a directory tree, overwriting existing files
    Copy {
        source: PathBuf,
        target: PathBuf,
    },
    /// Count lines of files with the given extensions, recursively
    Scan(ScanArgs),
    /// Exercise every utility once on sample data
    Demo {
        #[arg(long, default_value = "./source_dir")]
        source: PathBuf,
        #[arg(long, default_value = "./target_dir")]
        target: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CollideArgs {
    /// First polygon as "x,y x,y x,y ..."
    #[arg(long, allow_hyphen_values = true, requires = "b", conflicts_with = "input")]
    a: Option<Polygon>,

    /// Second polygon as "x,y x,y x,y ..."
    #[arg(long, allow_hyphen_values = true, requires = "a")]
    b: Option<Polygon>,

    /// JSON file holding {"a": [[x, y], ...], "b": [[x, y], ...]}
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct WordsArgs {
    /// Text to analyze
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// File to analyze
    #[arg(long)]
    file: Option<PathBuf>,

    /// Number of words to list (defaults to config words.top_k)
    #[arg(short = 'k', long)]
    top: Option<usize>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ScanArgs {
    directory: PathBuf,

    /// Extensions to include, comma separated (defaults to config files.extensions)
    #[arg(long, value_delimiter = ',')]
    ext: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct Shapes {
    a: Polygon,
    b: Polygon,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => FileConfig::load_from(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let level = match cli.log_level {
        Some(level) => level,
        None => file_config
            .logging
            .level
            .parse()
            .context(format!("Invalid log level: {}", file_config.logging.level))?,
    };
    let log_file = cli.log_file.clone().or(file_config.logging.file.clone());
    init_logging(level, log_file.as_deref(), cli.verbose)?;

    let max_depth = file_config.files.max_depth;

    match cli.command {
        Command::Collide(args) => run_collide(args),
        Command::Words(args) => {
            let k = args.top.unwrap_or(file_config.words.top_k);
            run_words(args, k)
        }
        Command::Copy { source, target } => run_copy(&source, &target, max_depth),
        Command::Scan(args) => {
            let extensions = if args.ext.is_empty() {
                file_config.files.extensions.clone()
            } else {
                args.ext.clone()
            };
            run_scan(&args.directory, &extensions, args.json, max_depth)
        }
        Command::Demo { source, target } => {
            run_demo(&source, &target, &file_config.files.extensions, max_depth)
        }
    }
}

fn init_logging(level: LevelFilter, file: Option<&Path>, verbose: bool) -> Result<()> {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    // Terminal shows warnings and worse unless asked for everything
    let term_level = if verbose {
        level
    } else {
        level.min(LevelFilter::Warn)
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = file {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        loggers.push(WriteLogger::new(level, config, log_file));
    }

    CombinedLogger::init(loggers).context("Failed to initialize logging")
}

fn run_collide(args: CollideArgs) -> Result<()> {
    let (a, b) = match (args.a, args.b, args.input) {
        (Some(a), Some(b), _) => (a, b),
        (_, _, Some(path)) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read shapes file: {}", path.display()))?;
            let shapes: Shapes =
                serde_json::from_str(&contents).context("Failed to parse shapes file")?;
            (shapes.a, shapes.b)
        }
        _ => bail!("Must provide either --a and --b, or --input"),
    };

    for (name, polygon) in [("a", &a), ("b", &b)] {
        if polygon.is_degenerate() {
            log::warn!(
                "Polygon {} is degenerate ({} vertices); the result is not meaningful",
                name,
                polygon.len()
            );
        }
    }

    let hit = collides(&a, &b);
    log::info!(
        "Collision check: {} vs {} vertices -> {}",
        a.len(),
        b.len(),
        hit
    );
    println!("{}", hit);

    Ok(())
}

fn run_words(args: WordsArgs, k: usize) -> Result<()> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read text file: {}", path.display()))?,
        (None, None) => bail!("Must provide either --text or --file"),
    };

    let top = top_k(&text, k);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&top)?);
    } else {
        for (word, count) in &top {
            println!("{:>6}  {}", count, word);
        }
    }

    Ok(())
}

fn run_copy(source: &Path, target: &Path, max_depth: usize) -> Result<()> {
    let processor = FileProcessor::with_max_depth(LogSink::default(), max_depth);

    let spinner = create_spinner("Copying directory...");
    let start = Instant::now();
    processor
        .copy_directory(source, target)
        .context("Failed to copy directory")?;
    spinner.finish_with_message(format!(
        "Copied {} -> {} [{:.1}s]",
        source.display(),
        target.display(),
        start.elapsed().as_secs_f32()
    ));

    Ok(())
}

fn run_scan(directory: &Path, extensions: &[String], json: bool, max_depth: usize) -> Result<()> {
    let processor = FileProcessor::with_max_depth(LogSink::default(), max_depth);

    let spinner = create_spinner("Scanning files...");
    let start = Instant::now();
    let counts = processor.process_files(directory, extensions);
    spinner.finish_with_message(format!(
        "Scanned {} files [{:.1}s]",
        counts.len(),
        start.elapsed().as_secs_f32()
    ));

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        for (name, lines) in &counts {
            println!("{:>8}  {}", lines, name);
        }
    }

    Ok(())
}

fn run_demo(source: &Path, target: &Path, extensions: &[String], max_depth: usize) -> Result<()> {
    println!("toolbelt demo");
    println!("=============");
    println!();

    let mut storage = KeyValueStore::new(LogSink::new("toolbelt::store"));
    storage.put("key1", "value1");
    storage.put("key2", "value2");
    println!("Storage: {:?}", storage.list());
    println!("key1 = {}", storage.get("key1"));
    storage.delete("key1");
    println!("key1 after delete = {}", storage.get("key1"));
    println!();

    println!("Top words: {:?}", top_k(DEMO_TEXT, 2));
    println!();

    let square_a = Polygon::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let square_b = Polygon::from(vec![(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]);
    println!("Squares collide: {}", collides(&square_a, &square_b));
    println!();

    let processor = FileProcessor::with_max_depth(LogSink::new("toolbelt::files"), max_depth);
    match processor.copy_directory(source, target) {
        Ok(()) => println!("File counts: {:?}", processor.process_files(source, extensions)),
        Err(e @ FileError::SourceNotFound(_)) => {
            log::error!("File operation error: {}", e);
            println!("Skipped file operations: {}", e);
        }
        Err(e) => return Err(e).context("Failed to copy directory"),
    }

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
