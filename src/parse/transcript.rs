use scraper::{Html, Selector};
use tracing::debug;

use crate::record::TranscriptRecord;

/// The transcript paragraphs sit in grid containers carrying exactly this
/// class attribute. The match is against the whole attribute value, not
/// individual classes, so a site markup change breaks it loudly (all-null
/// transcripts) instead of half-matching.
const CHUNK_CONTAINER: &str = r#"div[class="Grid Grid--with-gutter d:f@md p-b:4"]"#;

/// Extract a talk's title and flattened transcript from its transcript page.
///
/// Transcript text is every paragraph's text content, cleaned per chunk
/// (newlines become single spaces, tabs dropped, ends trimmed) and then
/// concatenated with no separator between chunks. If the container markup
/// is entirely absent the transcript is `None`; the title is extracted
/// either way.
pub fn parse_transcript(html: &str) -> TranscriptRecord {
    let doc = Html::parse_document(html);

    let container = Selector::parse(CHUNK_CONTAINER).unwrap();
    let paragraph = Selector::parse("p").unwrap();

    let containers: Vec<_> = doc.select(&container).collect();
    let transcript = if containers.is_empty() {
        debug!("transcript containers not found");
        None
    } else {
        let mut text = String::new();
        for c in &containers {
            for p in c.select(&paragraph) {
                let chunk: String = p.text().collect();
                text.push_str(&clean_chunk(&chunk));
            }
        }
        Some(text)
    };

    let title_sel = Selector::parse("title").unwrap();
    let title = doc
        .select(&title_sel)
        .next()
        .map(|t| clean_title(&t.text().collect::<String>()))
        .unwrap_or_default();

    TranscriptRecord { title, transcript }
}

fn clean_chunk(raw: &str) -> String {
    raw.replace('\n', " ").replace('\t', "").trim().to_string()
}

/// Page titles read `"<site>: <talk title> | <site suffix>"`. Drop the
/// colon prefix and the pipe suffix when present; each split is tolerated
/// independently, so a title matching neither pattern passes through
/// unchanged.
fn clean_title(raw: &str) -> String {
    let after_colon = match raw.split_once(':') {
        Some((_, rest)) => rest,
        None => raw,
    };
    let before_pipe = match after_colon.split_once(" | ") {
        Some((head, _)) => head,
        None => after_colon,
    };
    before_pipe.trim().to_string()
}
