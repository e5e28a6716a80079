//! Language profiles: which OCR pack, tokenizer, weekday labels and
//! boilerplate filters belong to each supported menu language.
//!
//! The registry is built once at startup from an explicit table and is
//! read-only afterwards, so it can be shared across threads without locks.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tokenizer::TokenizerKind;
use super::RecognitionError;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Language registered twice: {0}")]
    DuplicateLanguage(String),

    #[error("Language {0} has no weekday labels")]
    EmptyWeekdays(String),

    #[error("Language {language} lists weekday {label} twice")]
    DuplicateWeekday { language: String, label: String },

    #[error("Language {language} references unknown tokenizer: {tokenizer}")]
    UnknownTokenizer { language: String, tokenizer: String },

    #[error("Cannot read registry file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid registry file: {0}")]
    Parse(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Binds a language identifier to its OCR and tokenizer selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProfile {
    /// Identifier used by callers, e.g. `"de"`.
    pub id: String,
    /// Tesseract language pack, e.g. `"deu"`.
    pub ocr_pack: String,
    /// Tokenizer selector, resolved through [`TokenizerKind::from_id`].
    pub tokenizer: String,
}

/// Ordered day labels acting as section delimiters. Labels match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekdaySet(Vec<String>);

impl WeekdaySet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Returns the registered label equal to `text`, if any.
    pub fn find(&self, text: &str) -> Option<&str> {
        self.0.iter().find(|l| l.as_str() == text).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One row of the registry table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub profile: LanguageProfile,
    pub weekdays: WeekdaySet,
    /// Literal substrings stripped from raw OCR text, applied in order.
    #[serde(default)]
    pub filters: Vec<String>,
}

impl LanguageEntry {
    pub fn tokenizer_kind(&self) -> Option<TokenizerKind> {
        TokenizerKind::from_id(&self.profile.tokenizer)
    }
}

/// Process-wide table of supported languages.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    entries: Vec<LanguageEntry>,
}

static GLOBAL: LazyLock<LanguageRegistry> = LazyLock::new(LanguageRegistry::builtin);

impl LanguageRegistry {
    /// Validate and build a registry from explicit entries.
    pub fn new(entries: Vec<LanguageEntry>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            let id = &entry.profile.id;
            if !seen.insert(id.clone()) {
                return Err(RegistryError::DuplicateLanguage(id.clone()));
            }
            if entry.weekdays.is_empty() {
                return Err(RegistryError::EmptyWeekdays(id.clone()));
            }
            let mut labels = HashSet::new();
            for label in entry.weekdays.labels() {
                if !labels.insert(label.as_str()) {
                    return Err(RegistryError::DuplicateWeekday {
                        language: id.clone(),
                        label: label.clone(),
                    });
                }
            }
            if entry.tokenizer_kind().is_none() {
                return Err(RegistryError::UnknownTokenizer {
                    language: id.clone(),
                    tokenizer: entry.profile.tokenizer.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Languages shipped with the recognizer.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_entries(),
        }
    }

    /// Shared builtin registry.
    pub fn global() -> &'static LanguageRegistry {
        &GLOBAL
    }

    /// Load a registry table from a JSON array of [`LanguageEntry`].
    pub fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
        let entries: Vec<LanguageEntry> = serde_json::from_str(raw)?;
        Self::new(entries)
    }

    pub fn get(&self, lang: &str) -> Result<&LanguageEntry, RecognitionError> {
        self.entries
            .iter()
            .find(|e| e.profile.id == lang)
            .ok_or_else(|| RecognitionError::UnsupportedLanguage(lang.to_string()))
    }

    pub fn profile(&self, lang: &str) -> Result<&LanguageProfile, RecognitionError> {
        self.get(lang).map(|e| &e.profile)
    }

    pub fn weekdays(&self, lang: &str) -> Result<&WeekdaySet, RecognitionError> {
        self.get(lang).map(|e| &e.weekdays)
    }

    pub fn filters(&self, lang: &str) -> Result<&[String], RecognitionError> {
        self.get(lang).map(|e| e.filters.as_slice())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.profile.id.as_str())
    }
}

fn builtin_entries() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry {
            profile: LanguageProfile {
                id: "de".into(),
                ocr_pack: "deu".into(),
                tokenizer: "de-rules".into(),
            },
            weekdays: WeekdaySet::new(["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag"]),
            filters: vec![
                // "Taq" is how tesseract reads the footer on the printed plan.
                "Einen frischen Obstteller gibt es jeden Taq / Nachtisch\n\nindividuell".into(),
                "Kennzeichnung der Allergene".into(),
                "Vesper".into(),
            ],
        },
        LanguageEntry {
            profile: LanguageProfile {
                id: "en".into(),
                ocr_pack: "eng".into(),
                tokenizer: "en-rules".into(),
            },
            weekdays: WeekdaySet::new(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
            filters: vec!["Allergen information".into()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_passes_validation() {
        let entries = LanguageRegistry::builtin().entries;
        assert!(LanguageRegistry::new(entries).is_ok());
    }

    #[test]
    fn german_profile_maps_to_deu_pack() {
        let registry = LanguageRegistry::global();
        let profile = registry.profile("de").unwrap();
        assert_eq!(profile.ocr_pack, "deu");
        assert_eq!(
            registry.weekdays("de").unwrap().labels(),
            ["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag"]
        );
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = LanguageRegistry::global().get("fr").unwrap_err();
        assert!(matches!(err, RecognitionError::UnsupportedLanguage(ref l) if l == "fr"));
    }

    #[test]
    fn language_ids_are_case_sensitive() {
        assert!(LanguageRegistry::global().get("DE").is_err());
    }

    #[test]
    fn duplicate_language_rejected() {
        let mut entries = builtin_entries();
        entries.push(entries[0].clone());
        assert!(matches!(
            LanguageRegistry::new(entries),
            Err(RegistryError::DuplicateLanguage(_))
        ));
    }

    #[test]
    fn duplicate_weekday_rejected() {
        let mut entries = builtin_entries();
        entries[0].weekdays = WeekdaySet::new(["Montag", "Montag"]);
        assert!(matches!(
            LanguageRegistry::new(entries),
            Err(RegistryError::DuplicateWeekday { .. })
        ));
    }

    #[test]
    fn empty_weekdays_rejected() {
        let mut entries = builtin_entries();
        entries[1].weekdays = WeekdaySet::new(Vec::<String>::new());
        assert!(matches!(
            LanguageRegistry::new(entries),
            Err(RegistryError::EmptyWeekdays(ref l)) if l == "en"
        ));
    }

    #[test]
    fn unknown_tokenizer_rejected() {
        let mut entries = builtin_entries();
        entries[0].profile.tokenizer = "de_core_news_sm".into();
        assert!(matches!(
            LanguageRegistry::new(entries),
            Err(RegistryError::UnknownTokenizer { .. })
        ));
    }

    #[test]
    fn loads_registry_from_json() {
        let raw = r#"[
            {
                "profile": { "id": "nl", "ocr_pack": "nld", "tokenizer": "en-rules" },
                "weekdays": ["Maandag", "Dinsdag"]
            }
        ]"#;
        let registry = LanguageRegistry::from_json(raw).unwrap();
        assert_eq!(registry.languages().collect::<Vec<_>>(), ["nl"]);
        assert!(registry.filters("nl").unwrap().is_empty());
        assert!(registry.get("de").is_err());
    }

    #[test]
    fn loads_registry_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("languages.json");
        std::fs::write(
            &path,
            r#"[{"profile":{"id":"de","ocr_pack":"deu","tokenizer":"de-rules"},"weekdays":["Montag"],"filters":["Vesper"]}]"#,
        )
        .unwrap();
        let registry = LanguageRegistry::from_json_file(&path).unwrap();
        assert_eq!(registry.filters("de").unwrap(), ["Vesper"]);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            LanguageRegistry::from_json("{not json"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn weekday_find_is_exact() {
        let set = WeekdaySet::new(["Montag"]);
        assert_eq!(set.find("Montag"), Some("Montag"));
        assert_eq!(set.find("montag"), None);
        assert_eq!(set.find("Montags"), None);
    }
}
