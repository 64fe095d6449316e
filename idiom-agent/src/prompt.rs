//! Prompt assembly for the generation API.

use crate::languages::Language;

/// Minimal prompt used by the settings "test connection" action.
pub const CONNECTION_TEST_PROMPT: &str = r#"Say "Connection successful!" in exactly those words."#;

/// Build the generation prompt for one target language.
///
/// Asks for a single JSON object with the fixed idiom schema and steers the
/// model away from idioms that have close English equivalents.
pub fn idiom_prompt(language: &Language) -> String {
    format!(
        r#"Generate one authentic idiom in {name} (language code "{code}").

Respond with a single JSON object and nothing else, using exactly these keys:
{{
  "id": "a short unique identifier",
  "languageCode": "{code}",
  "languageName": "{name}",
  "idiom": "the idiom in its native script",
  "transliteration": "romanization if the script is not Latin, otherwise omit",
  "meaningEn": "what the idiom means, in English",
  "exampleNative": "a natural example sentence using the idiom",
  "exampleEn": "the English translation of that example",
  "origin": "a brief cultural or historical note if known, otherwise omit"
}}

Pick an idiom that does NOT have a close English equivalent - prefer
expressions whose literal imagery is specific to {name}-speaking cultures."#,
        name = language.name,
        code = language.code,
    )
}
