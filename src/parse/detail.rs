use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::record::{SpeakerRecord, TalkRecord};

/// The decoded JSON object embedded in a detail page. Consumed immediately
/// by attribute extraction, never persisted.
pub type Payload = serde_json::Map<String, Value>;

/// Hard failures of the primary identifier. Everything else in the payload
/// degrades to a null field; the talk name does not.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("payload has no usable top-level name")]
    MissingName,
    #[error("talk name {0:?} has no event prefix to split on")]
    UnprefixedName(String),
}

/// Locate the `talkPage.init` bootstrap call and decode its JSON argument,
/// returning the `__INITIAL_DATA__` object inside it.
///
/// Page-structure variance is expected at scale, so every failure mode —
/// marker absent, argument not valid JSON, expected key missing — collapses
/// to an empty payload instead of an error.
pub fn extract_payload(html: &str) -> Payload {
    let marker =
        Regex::new(r#"(?s)<script data-spec="q">q\("talkPage\.init",(.*?)\)</script>"#).unwrap();

    let Some(cap) = marker.captures(html) else {
        debug!("talkPage.init marker not found");
        return Payload::new();
    };

    let json: Value = match serde_json::from_str(cap[1].trim()) {
        Ok(v) => v,
        Err(e) => {
            debug!("embedded talk payload is not valid JSON: {e}");
            return Payload::new();
        }
    };

    match json.get("__INITIAL_DATA__").and_then(Value::as_object) {
        Some(data) => data.clone(),
        None => {
            debug!("embedded talk payload lacks __INITIAL_DATA__");
            Payload::new()
        }
    }
}

/// Assemble a [`TalkRecord`] from a decoded payload.
///
/// Returns `Ok(None)` when the payload is empty. Secondary fields are read
/// defensively and default to `None` individually; the name is not defended
/// and fails hard when absent or unsplittable.
pub fn extract_talk_attributes(payload: &Payload) -> Result<Option<TalkRecord>, ExtractError> {
    if payload.is_empty() {
        return Ok(None);
    }

    let name = talk_name(payload)?;

    let talk = payload.get("talks").and_then(|t| t.get(0));
    let player = talk.and_then(|t| t.get("player_talks")).and_then(|p| p.get(0));

    Ok(Some(TalkRecord {
        name,
        description: string_field(payload.get("description")),
        event: string_field(payload.get("event")),
        view_count: payload.get("viewed_count").and_then(Value::as_u64),
        duration: talk.and_then(|t| t.get("duration")).and_then(Value::as_u64),
        tags: talk.and_then(|t| t.get("tags")).and_then(Value::as_array).map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        }),
        recorded_at: string_field(talk.and_then(|t| t.get("recorded_at"))),
        published_at: player.and_then(|p| p.get("published")).and_then(Value::as_i64),
    }))
}

/// Assemble a [`SpeakerRecord`] from a decoded payload.
///
/// An empty payload yields the all-null record immediately. The talk name
/// shares the unguarded split with [`extract_talk_attributes`]; the four
/// speaker sub-fields each default to `None` on missing structure.
pub fn extract_speaker_attributes(payload: &Payload) -> Result<SpeakerRecord, ExtractError> {
    if payload.is_empty() {
        return Ok(SpeakerRecord::default());
    }

    let talk_name = talk_name(payload)?;

    let speaker = payload.get("speakers").and_then(|s| s.get(0));
    let first = speaker.and_then(|s| s.get("firstname")).and_then(Value::as_str);
    let last = speaker.and_then(|s| s.get("lastname")).and_then(Value::as_str);
    let speaker_name = match (first, last) {
        (Some(f), Some(l)) => Some(format!("{f} {l}")),
        _ => None,
    };

    Ok(SpeakerRecord {
        talk_name: Some(talk_name),
        speaker_name,
        title: string_field(speaker.and_then(|s| s.get("title"))),
        occupation: string_field(speaker.and_then(|s| s.get("description"))),
        bio: string_field(speaker.and_then(|s| s.get("whotheyare"))),
    })
}

/// The top-level `name` key reads `"<event>: <title>"`; keep the part after
/// the first colon, trimmed.
fn talk_name(payload: &Payload) -> Result<String, ExtractError> {
    let raw = payload
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ExtractError::MissingName)?;
    let (_, title) = raw
        .split_once(':')
        .ok_or_else(|| ExtractError::UnprefixedName(raw.to_string()))?;
    Ok(title.trim().to_string())
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_from(json: &str) -> Payload {
        serde_json::from_str::<Value>(json)
            .unwrap()
            .as_object()
            .unwrap()
            .clone()
    }

    fn full_payload() -> Payload {
        payload_from(
            r#"{
                "name": "TED: My Talk",
                "description": "d",
                "event": "TED2020",
                "viewed_count": 1500000,
                "talks": [{
                    "duration": 754,
                    "tags": ["science", "humor"],
                    "recorded_at": "2020-02-05",
                    "player_talks": [{"published": 1546300800}]
                }],
                "speakers": [{
                    "firstname": "Ada",
                    "lastname": "Lovelace",
                    "title": "Ms",
                    "description": "Mathematician",
                    "whotheyare": "Wrote the first program."
                }]
            }"#,
        )
    }

    #[test]
    fn missing_marker_yields_empty_payload() {
        let payload = extract_payload("<html><body>no bootstrap here</body></html>");
        assert!(payload.is_empty());
    }

    #[test]
    fn malformed_json_yields_empty_payload() {
        let html = r#"<script data-spec="q">q("talkPage.init",{not json)</script>"#;
        assert!(extract_payload(html).is_empty());
    }

    #[test]
    fn missing_initial_data_key_yields_empty_payload() {
        let html = r#"<script data-spec="q">q("talkPage.init",{"other": 1})</script>"#;
        assert!(extract_payload(html).is_empty());
    }

    #[test]
    fn payload_is_decoded_from_bootstrap_call() {
        let html = concat!(
            r#"<head></head><script data-spec="q">q("talkPage.init","#,
            r#"{"__INITIAL_DATA__": {"name": "TED: My Talk"}})</script><footer>"#,
        );
        let payload = extract_payload(html);
        assert_eq!(
            payload.get("name").and_then(Value::as_str),
            Some("TED: My Talk")
        );
    }

    #[test]
    fn empty_payload_yields_no_talk_record() {
        assert!(extract_talk_attributes(&Payload::new()).unwrap().is_none());
    }

    #[test]
    fn full_payload_round_trips_all_fields() {
        let rec = extract_talk_attributes(&full_payload()).unwrap().unwrap();
        assert_eq!(rec.name, "My Talk");
        assert_eq!(rec.description.as_deref(), Some("d"));
        assert_eq!(rec.event.as_deref(), Some("TED2020"));
        assert_eq!(rec.view_count, Some(1_500_000));
        assert_eq!(rec.duration, Some(754));
        assert_eq!(
            rec.tags,
            Some(vec!["science".to_string(), "humor".to_string()])
        );
        assert_eq!(rec.recorded_at.as_deref(), Some("2020-02-05"));
        assert_eq!(rec.published_at, Some(1_546_300_800));
    }

    #[test]
    fn secondary_fields_null_out_individually() {
        let payload = payload_from(r#"{"name": "TED: Sparse", "description": "kept"}"#);
        let rec = extract_talk_attributes(&payload).unwrap().unwrap();
        assert_eq!(rec.name, "Sparse");
        assert_eq!(rec.description.as_deref(), Some("kept"));
        assert!(rec.event.is_none());
        assert!(rec.view_count.is_none());
        assert!(rec.duration.is_none());
        assert!(rec.tags.is_none());
        assert!(rec.recorded_at.is_none());
        assert!(rec.published_at.is_none());
    }

    #[test]
    fn missing_name_fails_hard() {
        let payload = payload_from(r#"{"description": "d"}"#);
        assert!(matches!(
            extract_talk_attributes(&payload),
            Err(ExtractError::MissingName)
        ));
    }

    #[test]
    fn unprefixed_name_fails_hard() {
        let payload = payload_from(r#"{"name": "No Event Prefix"}"#);
        assert!(matches!(
            extract_talk_attributes(&payload),
            Err(ExtractError::UnprefixedName(_))
        ));
    }

    #[test]
    fn empty_payload_yields_all_null_speaker_record() {
        let rec = extract_speaker_attributes(&Payload::new()).unwrap();
        assert!(rec.talk_name.is_none());
        assert!(rec.speaker_name.is_none());
    }

    #[test]
    fn speaker_fields_extracted_from_full_payload() {
        let rec = extract_speaker_attributes(&full_payload()).unwrap();
        assert_eq!(rec.talk_name.as_deref(), Some("My Talk"));
        assert_eq!(rec.speaker_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(rec.title.as_deref(), Some("Ms"));
        assert_eq!(rec.occupation.as_deref(), Some("Mathematician"));
        assert_eq!(rec.bio.as_deref(), Some("Wrote the first program."));
    }

    #[test]
    fn speaker_name_requires_both_halves() {
        let payload = payload_from(
            r#"{"name": "TED: T", "speakers": [{"firstname": "Ada", "title": "Ms"}]}"#,
        );
        let rec = extract_speaker_attributes(&payload).unwrap();
        assert!(rec.speaker_name.is_none());
        assert_eq!(rec.title.as_deref(), Some("Ms"));
    }

    #[test]
    fn speaker_talk_name_is_unguarded() {
        let payload = payload_from(r#"{"speakers": [{"firstname": "Ada"}]}"#);
        assert!(extract_speaker_attributes(&payload).is_err());
    }
}
