//! Supported-language table.
//!
//! Generation targets are drawn uniformly at random from this fixed list.

use rand::seq::SliceRandom;

/// A generation target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// BCP-47-like tag sent to the model and stored on records
    pub code: &'static str,
    /// Display name used in prompts
    pub name: &'static str,
}

/// Languages the generation client may request idioms for.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "zh-CN", name: "Mandarin Chinese" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "es", name: "Spanish" },
    Language { code: "it", name: "Italian" },
    Language { code: "pt-BR", name: "Brazilian Portuguese" },
    Language { code: "ru", name: "Russian" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "pl", name: "Polish" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "el", name: "Greek" },
];

/// Pick a target language uniformly at random.
pub fn random_language() -> &'static Language {
    SUPPORTED_LANGUAGES
        .choose(&mut rand::thread_rng())
        .expect("language table is non-empty")
}
