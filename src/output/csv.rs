use std::io::{self, Write};

use crate::record::{SpeakerRecord, TalkRecord, TranscriptRecord};

// Column names match the datasets the original notebooks were built
// around, so downstream consumers keep working.
const TALK_HEADER: [&str; 8] = [
    "talk_desc",
    "event",
    "talk_name",
    "views",
    "duration",
    "tags",
    "recorded_at",
    "published_on",
];
const SPEAKER_HEADER: [&str; 5] = [
    "talk",
    "speaker",
    "speaker_title",
    "speaker_occ",
    "speaker_bio",
];
const TRANSCRIPT_HEADER: [&str; 2] = ["title", "transcript"];

/// Write the talk-metadata dataset as CSV. Null fields become empty cells;
/// tags are joined with `", "` inside one cell; the publish timestamp is
/// written raw (epoch seconds).
pub fn write_talks<W: Write>(mut w: W, records: &[TalkRecord]) -> io::Result<()> {
    write_header(&mut w, &TALK_HEADER)?;
    for r in records {
        let row = [
            r.description.clone().unwrap_or_default(),
            r.event.clone().unwrap_or_default(),
            r.name.clone(),
            opt_num(r.view_count),
            opt_num(r.duration),
            r.tags.as_ref().map(|t| t.join(", ")).unwrap_or_default(),
            r.recorded_at.clone().unwrap_or_default(),
            r.published_at.map(|v| v.to_string()).unwrap_or_default(),
        ];
        write_row(&mut w, &row)?;
    }
    Ok(())
}

/// Write the speaker dataset as CSV.
pub fn write_speakers<W: Write>(mut w: W, records: &[SpeakerRecord]) -> io::Result<()> {
    write_header(&mut w, &SPEAKER_HEADER)?;
    for r in records {
        let row = [
            r.talk_name.clone().unwrap_or_default(),
            r.speaker_name.clone().unwrap_or_default(),
            r.title.clone().unwrap_or_default(),
            r.occupation.clone().unwrap_or_default(),
            r.bio.clone().unwrap_or_default(),
        ];
        write_row(&mut w, &row)?;
    }
    Ok(())
}

/// Write the transcript dataset as CSV.
pub fn write_transcripts<W: Write>(mut w: W, records: &[TranscriptRecord]) -> io::Result<()> {
    write_header(&mut w, &TRANSCRIPT_HEADER)?;
    for r in records {
        let row = [r.title.clone(), r.transcript.clone().unwrap_or_default()];
        write_row(&mut w, &row)?;
    }
    Ok(())
}

fn opt_num(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn write_header<W: Write>(w: &mut W, header: &[&str]) -> io::Result<()> {
    let cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    write_row(w, &cells)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one CSV row with RFC-4180 quoting.
fn write_row<W: Write>(w: &mut W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn talk(name: &str) -> TalkRecord {
        TalkRecord {
            name: name.to_string(),
            description: Some("A talk, with commas".to_string()),
            event: Some("TED2020".to_string()),
            view_count: Some(42),
            duration: None,
            tags: Some(vec!["a".to_string(), "b".to_string()]),
            recorded_at: None,
            published_at: Some(1_546_300_800),
        }
    }

    #[test]
    fn talk_rows_quote_commas_and_blank_out_nulls() {
        let mut buf = Vec::new();
        write_talks(&mut buf, &[talk("My Talk")]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "talk_desc,event,talk_name,views,duration,tags,recorded_at,published_on"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"A talk, with commas\",TED2020,My Talk,42,,\"a, b\",,1546300800"
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let mut buf = Vec::new();
        let rec = TranscriptRecord {
            title: "She said \"go\"".to_string(),
            transcript: None,
        };
        write_transcripts(&mut buf, &[rec]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with("\"She said \"\"go\"\"\","));
    }

    #[test]
    fn all_null_speaker_row_is_just_separators() {
        let mut buf = Vec::new();
        write_speakers(&mut buf, &[SpeakerRecord::default()]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().nth(1).unwrap(), ",,,,");
    }
}
