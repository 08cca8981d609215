use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;
use tracing::{error, warn};

use crate::fetch::{FetchError, PageSource};
use crate::parse::detail::{self, ExtractError};
use crate::parse::transcript;
use crate::record::{SpeakerRecord, TalkRecord, TranscriptRecord};

/// A per-URL failure, classified and carrying the URL it happened on.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to extract from {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: ExtractError,
    },
}

impl BuildError {
    fn fetch(url: &str, source: FetchError) -> Self {
        BuildError::Fetch {
            url: url.to_string(),
            source,
        }
    }

    fn extract(url: &str, source: ExtractError) -> Self {
        BuildError::Extract {
            url: url.to_string(),
            source,
        }
    }
}

/// Outcome counts for one dataset build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub total: usize,
    pub scraped: usize,
    pub skipped: usize,
    pub duration_secs: f64,
}

/// Build the talk-metadata dataset from a list of detail-page URLs.
///
/// This is the forgiving mode: every per-URL failure — fetch error, absent
/// payload, hard extract error — is logged with its classification and the
/// URL is skipped, so the run always completes with whatever it got.
pub fn build_talk_dataset(
    source: &dyn PageSource,
    urls: &[String],
    delay: Duration,
) -> (Vec<TalkRecord>, BuildReport) {
    let start = Instant::now();
    let total = urls.len();
    let width = total.to_string().len();
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (i, url) in urls.iter().enumerate() {
        eprintln!("  [{:>width$}/{}] {}", i + 1, total, url);

        match scrape_talk(source, url) {
            Ok(Some(rec)) => records.push(rec),
            Ok(None) => {
                skipped += 1;
                warn!("no embedded payload at {url}, skipping");
            }
            Err(e) => {
                skipped += 1;
                warn!("{e}, skipping");
            }
        }

        pace(i, total, delay);
    }

    let report = BuildReport {
        total,
        scraped: records.len(),
        skipped,
        duration_secs: start.elapsed().as_secs_f64(),
    };
    (records, report)
}

/// Build the speaker dataset from a list of detail-page URLs.
///
/// Unlike the talk-metadata build, this mode has no per-URL skip: a fetch
/// error or a hard extract failure aborts the whole run. A detail page with
/// no payload at all still contributes its all-null row. The asymmetry with
/// [`build_talk_dataset`] is deliberate — a speaker dataset with silent
/// holes lines up badly against the talk dataset it joins to.
pub fn build_speaker_dataset(
    source: &dyn PageSource,
    urls: &[String],
    delay: Duration,
) -> Result<(Vec<SpeakerRecord>, BuildReport), BuildError> {
    let start = Instant::now();
    let total = urls.len();
    let width = total.to_string().len();
    let mut records = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        eprintln!("  [{:>width$}/{}] {}", i + 1, total, url);

        let html = source
            .fetch(url, &[])
            .map_err(|e| abort(BuildError::fetch(url, e)))?;
        let payload = detail::extract_payload(&html);
        let rec = detail::extract_speaker_attributes(&payload)
            .map_err(|e| abort(BuildError::extract(url, e)))?;
        records.push(rec);

        pace(i, total, delay);
    }

    let report = BuildReport {
        total,
        scraped: records.len(),
        skipped: 0,
        duration_secs: start.elapsed().as_secs_f64(),
    };
    Ok((records, report))
}

/// Build the transcript dataset from a list of talk URLs.
///
/// Talk URLs are rewritten to their `/transcript` variant before fetching.
/// Fetch errors abort the run (same strictness as the speaker build);
/// a page whose transcript markup is absent still contributes a row with a
/// null transcript. Pacing is a uniformly random delay drawn from
/// `jitter_ms` between requests.
pub fn build_transcript_dataset(
    source: &dyn PageSource,
    urls: &[String],
    jitter_ms: (u64, u64),
) -> Result<(Vec<TranscriptRecord>, BuildReport), BuildError> {
    let start = Instant::now();
    let total = urls.len();
    let width = total.to_string().len();
    let mut records = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        let page_url = transcript_url(url);
        eprintln!("  [{:>width$}/{}] {}", i + 1, total, page_url);

        let html = source
            .fetch(&page_url, &[("language", "en")])
            .map_err(|e| abort(BuildError::fetch(&page_url, e)))?;
        records.push(transcript::parse_transcript(&html));

        if i + 1 < total {
            let ms = if jitter_ms.1 > jitter_ms.0 {
                rand::rng().random_range(jitter_ms.0..=jitter_ms.1)
            } else {
                jitter_ms.0
            };
            if ms > 0 {
                std::thread::sleep(Duration::from_millis(ms));
            }
        }
    }

    let report = BuildReport {
        total,
        scraped: records.len(),
        skipped: 0,
        duration_secs: start.elapsed().as_secs_f64(),
    };
    Ok((records, report))
}

/// A talk's transcript page: same URL with the language query stripped and
/// `/transcript` appended. The page itself is then requested with
/// `language=en` again, as a query parameter.
pub fn transcript_url(talk_url: &str) -> String {
    format!("{}/transcript", talk_url.replace("?language=en", ""))
}

fn scrape_talk(source: &dyn PageSource, url: &str) -> Result<Option<TalkRecord>, BuildError> {
    let html = source
        .fetch(url, &[])
        .map_err(|e| BuildError::fetch(url, e))?;
    let payload = detail::extract_payload(&html);
    detail::extract_talk_attributes(&payload).map_err(|e| BuildError::extract(url, e))
}

fn pace(i: usize, total: usize, delay: Duration) {
    if i + 1 < total && !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

fn abort(e: BuildError) -> BuildError {
    error!("{e}, aborting run");
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_url_strips_language_query() {
        assert_eq!(
            transcript_url("https://www.ted.com/talks/my_talk?language=en"),
            "https://www.ted.com/talks/my_talk/transcript"
        );
    }

    #[test]
    fn transcript_url_appends_to_plain_urls() {
        assert_eq!(
            transcript_url("https://www.ted.com/talks/my_talk"),
            "https://www.ted.com/talks/my_talk/transcript"
        );
    }
}
