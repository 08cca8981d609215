use serde::Serialize;

/// One talk's metadata, assembled from the detail-page payload.
///
/// `name` is the primary identifier and is always present — extraction
/// fails hard without it. Every other field is whatever the payload
/// happened to carry; a missing nested structure leaves that field `None`
/// without affecting its neighbors.
#[derive(Debug, Clone, Serialize)]
pub struct TalkRecord {
    pub name: String,
    pub description: Option<String>,
    pub event: Option<String>,
    pub view_count: Option<u64>,
    /// Talk length in seconds.
    pub duration: Option<u64>,
    pub tags: Option<Vec<String>>,
    /// Raw date string exactly as the payload carried it.
    pub recorded_at: Option<String>,
    /// Raw publish timestamp (epoch seconds), untouched.
    pub published_at: Option<i64>,
}

impl TalkRecord {
    /// Render the raw publish timestamp as ISO-8601 for display/export.
    pub fn published_iso(&self) -> Option<String> {
        self.published_at.map(epoch_to_iso)
    }
}

/// One speaker row. All-`None` when the detail page had no payload at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpeakerRecord {
    pub talk_name: Option<String>,
    /// First and last name joined by a single space.
    pub speaker_name: Option<String>,
    pub title: Option<String>,
    pub occupation: Option<String>,
    pub bio: Option<String>,
}

/// One transcript row. `transcript` is `None` when the transcript page
/// carried no paragraph containers at all; the title is still extracted.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptRecord {
    pub title: String,
    pub transcript: Option<String>,
}

pub(crate) fn epoch_to_iso(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_iso_renders_epoch_seconds() {
        let rec = TalkRecord {
            name: "My Talk".into(),
            description: None,
            event: None,
            view_count: None,
            duration: None,
            tags: None,
            recorded_at: None,
            published_at: Some(1_546_300_800),
        };
        assert_eq!(rec.published_iso().as_deref(), Some("2019-01-01T00:00:00Z"));
    }

    #[test]
    fn default_speaker_record_is_all_null() {
        let rec = SpeakerRecord::default();
        assert!(rec.talk_name.is_none());
        assert!(rec.speaker_name.is_none());
        assert!(rec.title.is_none());
        assert!(rec.occupation.is_none());
        assert!(rec.bio.is_none());
    }
}
