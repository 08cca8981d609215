use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tedscrape::config::{self, ScrapeConfig};
use tedscrape::dataset::{self, BuildReport};
use tedscrape::discover::discover;
use tedscrape::fetch::Fetcher;
use tedscrape::output::{csv, json as json_out, table};

#[derive(Parser)]
#[command(
    name = "tedscrape",
    version,
    about = "TED talk scraper — talk metadata, speaker bios, and transcripts as tabular datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to config file (default: ~/.tedscrape/config.toml)
    #[arg(long, global = true, env = "TEDSCRAPE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect talk URLs from the paginated listing index
    Discover {
        /// First listing page (inclusive)
        #[arg(long, default_value = "1")]
        start_page: u32,

        /// Last listing page (inclusive)
        #[arg(long, default_value = "1")]
        end_page: u32,

        /// Write URLs to a file (one per line) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Build the talk-metadata dataset from a URL list
    Talks {
        /// File with one talk URL per line (# comments allowed)
        urls: PathBuf,

        /// Write the dataset to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Build the speaker dataset from a URL list
    Speakers {
        /// File with one talk URL per line (# comments allowed)
        urls: PathBuf,

        /// Write the dataset to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Build the transcript dataset from a URL list
    Transcripts {
        /// File with one talk URL per line (# comments allowed)
        urls: PathBuf,

        /// Write the dataset to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented default config file
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;
    let cfg = ScrapeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Discover {
            start_page,
            end_page,
            out,
        } => {
            if start_page > end_page {
                bail!("start_page ({start_page}) must not exceed end_page ({end_page})");
            }
            let fetcher = fetcher(&cfg.listing_agent, &cfg)?;
            let urls = discover(&fetcher, &cfg.base_url, start_page, end_page, cfg.page_delay());

            if let Some(path) = out {
                let mut w = BufWriter::new(
                    File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                );
                for url in &urls {
                    writeln!(w, "{url}")?;
                }
                eprintln!("Wrote {} urls to {}", urls.len(), path.display());
            } else if json_output {
                json_out::print_json(&urls)?;
            } else {
                for url in &urls {
                    println!("{url}");
                }
            }
        }

        Commands::Talks { urls, csv: csv_out } => {
            let urls = read_url_list(&urls)?;
            let fetcher = fetcher(&cfg.detail_agent, &cfg)?;
            let (records, report) =
                dataset::build_talk_dataset(&fetcher, &urls, cfg.page_delay());

            if let Some(path) = csv_out {
                write_csv(&path, |w| csv::write_talks(w, &records))?;
            } else if json_output {
                json_out::print_json(&records)?;
            } else {
                table::print_talk_preview(&records);
            }
            print_report("talks", &report);
        }

        Commands::Speakers { urls, csv: csv_out } => {
            let urls = read_url_list(&urls)?;
            let fetcher = fetcher(&cfg.detail_agent, &cfg)?;
            let (records, report) =
                dataset::build_speaker_dataset(&fetcher, &urls, cfg.page_delay())?;

            if let Some(path) = csv_out {
                write_csv(&path, |w| csv::write_speakers(w, &records))?;
            } else if json_output {
                json_out::print_json(&records)?;
            } else {
                table::print_speaker_preview(&records);
            }
            print_report("speaker rows", &report);
        }

        Commands::Transcripts { urls, csv: csv_out } => {
            let urls = read_url_list(&urls)?;
            let fetcher = fetcher(&cfg.transcript_agent, &cfg)?;
            let (records, report) =
                dataset::build_transcript_dataset(&fetcher, &urls, cfg.transcript_delay_ms)?;

            if let Some(path) = csv_out {
                write_csv(&path, |w| csv::write_transcripts(w, &records))?;
            } else if json_output {
                json_out::print_json(&records)?;
            } else {
                table::print_transcript_preview(&records);
            }
            print_report("transcripts", &report);
        }

        Commands::Config { action } => match action {
            ConfigAction::Init => {
                if config::init_config()? {
                    println!("Wrote {}", config::config_path()?.display());
                } else {
                    println!("Config already exists: {}", config::config_path()?.display());
                }
            }
            ConfigAction::Show => {
                if json_output {
                    json_out::print_json(&cfg)?;
                } else {
                    print!("{}", toml::to_string_pretty(&cfg)?);
                }
            }
        },
    }

    Ok(())
}

fn fetcher(label: &str, cfg: &ScrapeConfig) -> Result<Fetcher> {
    Fetcher::new(label, cfg.connect_timeout(), cfg.read_timeout())
        .context("Failed to build HTTP client")
}

/// Read a URL list: one URL per line, blank lines and # comments skipped.
fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read url list: {}", path.display()))?;
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        bail!("No urls in {}", path.display());
    }
    Ok(urls)
}

fn write_csv<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    write(&mut w)?;
    w.flush()?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn print_report(what: &str, report: &BuildReport) {
    eprintln!(
        "\nScraped {} {what}, {} skipped of {} urls ({:.1}s)",
        report.scraped, report.skipped, report.total, report.duration_secs
    );
}
