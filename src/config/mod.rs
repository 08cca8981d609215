use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Listing index the crawl starts from.
pub const DEFAULT_BASE_URL: &str = "https://www.ted.com/talks";

// The three call sites historically announced themselves with three
// different client labels. Kept distinct on purpose.
pub const DEFAULT_LISTING_AGENT: &str = "Scraping TED";
pub const DEFAULT_DETAIL_AGENT: &str = "Talk Scraper Bot";
pub const DEFAULT_TRANSCRIPT_AGENT: &str = "Extracting Transcripts Bot";

/// Scrape settings, with compiled-in defaults and optional overrides from
/// ~/.tedscrape/config.toml.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub base_url: String,
    /// User-Agent for listing-page requests.
    pub listing_agent: String,
    /// User-Agent for detail-page requests.
    pub detail_agent: String,
    /// User-Agent for transcript-page requests.
    pub transcript_agent: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    /// Fixed delay between listing/detail requests.
    pub page_delay_secs: u64,
    /// [min, max] randomized delay between transcript requests, in ms.
    pub transcript_delay_ms: (u64, u64),
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_agent: DEFAULT_LISTING_AGENT.to_string(),
            detail_agent: DEFAULT_DETAIL_AGENT.to_string(),
            transcript_agent: DEFAULT_TRANSCRIPT_AGENT.to_string(),
            connect_timeout_secs: 5,
            read_timeout_secs: 5,
            page_delay_secs: 2,
            transcript_delay_ms: (100, 1000),
        }
    }
}

impl ScrapeConfig {
    /// Load config from `path`, or the default location when `None`.
    /// A missing file is not an error — defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        if !path.exists() {
            return Ok(ScrapeConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: ScrapeConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }

    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.read_timeout_secs)
    }

    pub fn page_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.page_delay_secs)
    }
}

/// Path to the config file: ~/.tedscrape/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".tedscrape").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.tedscrape/config.toml
# Every key is optional; omitted keys keep their compiled-in default.

# base_url = "https://www.ted.com/talks"
# listing_agent = "Scraping TED"
# detail_agent = "Talk Scraper Bot"
# transcript_agent = "Extracting Transcripts Bot"
# connect_timeout_secs = 5
# read_timeout_secs = 5
# page_delay_secs = 2
# transcript_delay_ms = [100, 1000]
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}
