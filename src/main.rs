use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record};

use mdview::{ChoicePrompt, MarkdownView, TapOutcome, Theme};

#[derive(Parser)]
#[command(name = "mdview")]
#[command(about = "Render Markdown into a themed view tree")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Theme: `light`, `dark`, or a path to a TOML theme file
    #[arg(short, long, default_value = "light")]
    theme: String,

    /// Host that relative link and image urls are resolved against
    #[arg(short, long)]
    base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Outline)]
    format: Format,

    /// Activate the N-th link tap (1-based) after rendering
    #[arg(long, value_name = "N")]
    open: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Outline,
    Json,
}

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Lists the options on stderr and reads a 1-based choice from stdin.
struct StdinPrompt;

impl ChoicePrompt for StdinPrompt {
    fn choose(&self, title: &str, cancel: &str, options: &[&str]) -> Option<usize> {
        eprintln!("{title}:");
        for (i, option) in options.iter().enumerate() {
            eprintln!("  {}. {option}", i + 1);
        }
        eprint!("choice (empty to {}): ", cancel.to_lowercase());
        io::stderr().flush().ok()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        let choice: usize = line.trim().parse().ok()?;
        choice.checked_sub(1).filter(|i| *i < options.len())
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}

fn load_theme(name: &str) -> Result<Theme> {
    match name {
        "light" => Ok(Theme::light()),
        "dark" => Ok(Theme::dark()),
        path => Theme::load(path.as_ref()).with_context(|| format!("loading theme {path}")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let markdown = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let mut view = MarkdownView::new(markdown);
    view.set_theme(load_theme(&cli.theme)?);
    view.set_relative_url_host(cli.base_url);
    view.set_prompt(StdinPrompt);

    match cli.format {
        Format::Outline => print!("{}", view.rendered().outline()),
        Format::Json => {
            let json = serde_json::to_string_pretty(view.rendered())
                .context("serializing view tree")?;
            println!("{json}");
        }
    }

    if let Some(n) = cli.open {
        let taps = view.rendered().link_taps();
        let Some(tap) = n.checked_sub(1).and_then(|i| taps.get(i)) else {
            bail!("no link tap {n}; the document has {}", taps.len());
        };
        match view.activate(tap) {
            TapOutcome::Navigated(url) => eprintln!("Opened {url}"),
            TapOutcome::Cancelled => eprintln!("Cancelled"),
            TapOutcome::Failed(url) => bail!("could not open {url}"),
        }
    }

    Ok(())
}
