//! JSON extraction and validation of model output.
//!
//! Models wrap their JSON in prose or markdown fences often enough that the
//! extraction step is kept explicit and separately testable: locate the
//! first `{` and the last `}`, parse that span, then validate the result
//! into an [`IdiomRecord`]. Prompt-format drift therefore surfaces as a
//! typed [`GenerateError`], never as a panic in the HTTP path.

use chrono::Utc;
use serde::Deserialize;

use idiom_core::IdiomRecord;

use crate::backend::traits::GenerateError;

/// Locate and parse the JSON object embedded in candidate text.
pub fn embedded_json(text: &str) -> Result<serde_json::Value, GenerateError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let span = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => {
            return Err(GenerateError::Parse(preview(text)));
        }
    };
    serde_json::from_str(span).map_err(|_| GenerateError::Parse(preview(span)))
}

/// Loosely-typed idiom object as the model produces it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdiom {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    language_name: Option<String>,
    #[serde(default)]
    idiom: Option<String>,
    #[serde(default)]
    meaning_en: Option<String>,
    #[serde(default)]
    example_native: Option<String>,
    #[serde(default)]
    example_en: Option<String>,
    #[serde(default)]
    transliteration: Option<String>,
    #[serde(default)]
    origin: Option<String>,
}

/// Validate a parsed object into an idiom record.
///
/// `idiom`, `meaningEn` and `languageCode` must be present and non-blank;
/// an absent `id` is synthesized from the language code and a timestamp.
pub fn validate_record(value: serde_json::Value) -> Result<IdiomRecord, GenerateError> {
    let raw: RawIdiom =
        serde_json::from_value(value).map_err(|e| GenerateError::Parse(e.to_string()))?;

    let idiom = required(raw.idiom, "idiom")?;
    let meaning_en = required(raw.meaning_en, "meaningEn")?;
    let language_code = required(raw.language_code, "languageCode")?;

    let id = match raw.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => format!("{}-{}", language_code, Utc::now().timestamp_millis()),
    };

    Ok(IdiomRecord {
        id,
        language_name: raw.language_name.unwrap_or_else(|| language_code.clone()),
        language_code,
        idiom,
        meaning_en,
        example_native: raw.example_native.unwrap_or_default(),
        example_en: raw.example_en.unwrap_or_default(),
        transliteration: raw.transliteration.filter(|t| !t.trim().is_empty()),
        origin: raw.origin.filter(|o| !o.trim().is_empty()),
    })
}

/// Extract and validate in one step.
pub fn record_from_text(text: &str) -> Result<IdiomRecord, GenerateError> {
    validate_record(embedded_json(text)?)
}

fn required(field: Option<String>, name: &'static str) -> Result<String, GenerateError> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or(GenerateError::Validation { field: name })
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"Here is your idiom!

```json
{
  "id": "sv-42",
  "languageCode": "sv",
  "languageName": "Swedish",
  "idiom": "glida in på en räkmacka",
  "meaningEn": "To get somewhere without effort",
  "exampleNative": "Han gled in på en räkmacka.",
  "exampleEn": "He slid in on a shrimp sandwich."
}
```

Enjoy!"#;

    #[test]
    fn test_extracts_from_surrounding_prose() {
        let record = record_from_text(WELL_FORMED).unwrap();
        assert_eq!(record.id, "sv-42");
        assert_eq!(record.language_code, "sv");
        assert_eq!(record.idiom, "glida in på en räkmacka");
        assert!(record.transliteration.is_none());
    }

    #[test]
    fn test_no_braces_is_parse_error() {
        let result = record_from_text("Sorry, I can't produce an idiom right now.");
        assert!(matches!(result, Err(GenerateError::Parse(_))));
    }

    #[test]
    fn test_malformed_span_is_parse_error() {
        let result = record_from_text("prefix { not json at all } suffix");
        assert!(matches!(result, Err(GenerateError::Parse(_))));
    }

    #[test]
    fn test_missing_required_field_is_validation_error() {
        let text = r#"{"languageCode": "fr", "idiom": "avoir le cafard"}"#;
        match record_from_text(text) {
            Err(GenerateError::Validation { field }) => assert_eq!(field, "meaningEn"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_required_field_is_validation_error() {
        let text = r#"{"languageCode": "fr", "idiom": "  ", "meaningEn": "gloss"}"#;
        assert!(matches!(
            record_from_text(text),
            Err(GenerateError::Validation { field: "idiom" })
        ));
    }

    #[test]
    fn test_absent_id_is_synthesized() {
        let text = r#"{"languageCode": "tr", "idiom": "pireyi deve yapmak",
                       "meaningEn": "to exaggerate"}"#;
        let record = record_from_text(text).unwrap();
        assert!(record.id.starts_with("tr-"));
        // language name falls back to the code when the model omits it
        assert_eq!(record.language_name, "tr");
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let text = r#"{"languageCode": "it", "idiom": "in bocca al lupo",
                       "meaningEn": "good luck", "transliteration": " ",
                       "origin": ""}"#;
        let record = record_from_text(text).unwrap();
        assert!(record.transliteration.is_none());
        assert!(record.origin.is_none());
    }

    #[test]
    fn test_braces_inside_strings_stay_in_span() {
        // first '{' to last '}' spans the whole outer object even when a
        // string value contains braces of its own
        let text = r#"{"languageCode": "de", "idiom": "Tomaten auf den Augen haben",
                       "meaningEn": "oblivious", "origin": "noted in {dictionaries}"}"#;
        let record = record_from_text(text).unwrap();
        assert_eq!(record.origin.as_deref(), Some("noted in {dictionaries}"));
    }
}
