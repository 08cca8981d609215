use unicode_width::UnicodeWidthStr;

use crate::record::{SpeakerRecord, TalkRecord, TranscriptRecord};

/// Format duration in seconds to human-readable string.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}h{m:02}m")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Preview the talk-metadata dataset as a table.
pub fn print_talk_preview(records: &[TalkRecord]) {
    if records.is_empty() {
        println!("No talks scraped.");
        return;
    }

    println!(
        "{} talk{}:\n",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );
    println!(
        "  {:<42} {:<16} {:>10} {:<8} {:<12}",
        "TALK", "EVENT", "VIEWS", "LENGTH", "PUBLISHED"
    );
    println!("  {}", "-".repeat(92));

    for r in records {
        let published = r.published_iso().unwrap_or_default();
        println!(
            "  {:<42} {:<16} {:>10} {:<8} {:<12}",
            truncate(&r.name, 40),
            truncate(r.event.as_deref().unwrap_or("-"), 14),
            r.view_count.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
            r.duration.map(format_duration).unwrap_or_else(|| "-".into()),
            published.get(..10).unwrap_or(&published),
        );
    }
}

/// Preview the speaker dataset as a table.
pub fn print_speaker_preview(records: &[SpeakerRecord]) {
    if records.is_empty() {
        println!("No speakers scraped.");
        return;
    }

    println!(
        "{} speaker row{}:\n",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );
    println!("  {:<42} {:<24} {:<24}", "TALK", "SPEAKER", "OCCUPATION");
    println!("  {}", "-".repeat(92));

    for r in records {
        println!(
            "  {:<42} {:<24} {:<24}",
            truncate(r.talk_name.as_deref().unwrap_or("-"), 40),
            truncate(r.speaker_name.as_deref().unwrap_or("-"), 22),
            truncate(r.occupation.as_deref().unwrap_or("-"), 22),
        );
    }
}

/// Preview the transcript dataset: title plus the opening of each text.
pub fn print_transcript_preview(records: &[TranscriptRecord]) {
    if records.is_empty() {
        println!("No transcripts scraped.");
        return;
    }

    println!(
        "{} transcript{}:\n",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    );

    for r in records {
        match &r.transcript {
            Some(text) => println!("  {:<42} {}", truncate(&r.title, 40), truncate(text, 48)),
            None => println!("  {:<42} (no transcript)", truncate(&r.title, 40)),
        }
    }
}
