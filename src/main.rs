use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crypto_tracker::display;
use crypto_tracker::filter::filter_min_price;
use crypto_tracker::parser::{classify, collect_batch, normalize_row};
use crypto_tracker::settings::Settings;
use crypto_tracker::source::Source;
use crypto_tracker::store::{self, WriteOutcome};

#[derive(Parser)]
#[command(name = "crypto_tracker", about = "Cryptocurrency price table scraper")]
struct Cli {
    /// Settings file (default: ./crypto_tracker.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the live price page, parse the top rows and append them to CSV
    Scrape {
        /// Page to scrape
        #[arg(long)]
        url: Option<String>,
        /// Max seconds to wait for the page
        #[arg(long)]
        wait: Option<u64>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Parse rows from a JSON capture file instead of the live page
    Parse {
        /// Capture file: array of rows, each an array of cell strings
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Classify one row given as cells and print the fields found
    Classify {
        /// Cell texts in page order
        cells: Vec<String>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Number of top coins to parse
    #[arg(short = 'n', long)]
    top: Option<usize>,
    /// CSV file to append to
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only keep coins priced at or above this USD value
    #[arg(long)]
    min_price: Option<f64>,
    /// Don't print the table
    #[arg(short, long)]
    quiet: bool,
}

impl OutputArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(top) = self.top {
            settings.top = top;
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if self.min_price.is_some() {
            settings.min_price = self.min_price;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { url, wait, out } => {
            let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
            if let Some(url) = url {
                settings.url = url;
            }
            if let Some(wait) = wait {
                settings.wait_secs = wait;
            }
            out.apply(&mut settings);
            let source = Source::Page {
                url: settings.url.clone(),
                timeout: settings.wait(),
                user_agent: settings.user_agent.clone(),
            };
            run(&source, &settings, out.quiet).await
        }
        Commands::Parse { input, out } => {
            let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
            out.apply(&mut settings);
            run(&Source::Capture { path: input }, &settings, out.quiet).await
        }
        Commands::Classify { cells } => {
            let tokens = normalize_row(&cells);
            let classification = classify(&tokens);
            let f = classification.fields();
            println!("Name:       {}", f.name);
            println!("Price:      {}", f.price);
            println!("24h Change: {}", f.change_24h);
            println!("Market Cap: {}", f.market_cap);
            if let Some(diag) = classification.diagnostic() {
                println!("({})", diag);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(source: &Source, settings: &Settings, quiet: bool) -> anyhow::Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.set_message(format!("Fetching {}", source.describe()));
    pb.enable_steady_tick(Duration::from_millis(120));

    let rows = source.fetch_rows().await;
    pb.finish_and_clear();
    let rows = rows.with_context(|| format!("Failed to get rows from {}", source.describe()))?;

    let mut batch = collect_batch(&rows, settings.top);
    if let Some(min) = settings.min_price {
        batch = filter_min_price(batch, min);
    }

    let outcome = store::append_batch(&settings.output, &batch)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;
    match outcome {
        WriteOutcome::Empty => println!("No data to write."),
        WriteOutcome::Appended { rows, .. } => println!(
            "Appended {} rows to {} (UTC {})",
            rows,
            settings.output.display(),
            batch.timestamp()
        ),
    }

    if !quiet {
        println!();
        if let Err(e) = display::print_batch(&batch) {
            warn!("failed to print table: {}", e);
        }
    }
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
