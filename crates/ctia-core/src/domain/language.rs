//! Supported report languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LanguageError;

/// Language the provider is asked to write prose fields in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Fr,
    Ms,
    Tl,
    Id,
    Vi,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::En,
        LanguageCode::Fr,
        LanguageCode::Ms,
        LanguageCode::Tl,
        LanguageCode::Id,
        LanguageCode::Vi,
    ];

    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Fr => "fr",
            LanguageCode::Ms => "ms",
            LanguageCode::Tl => "tl",
            LanguageCode::Id => "id",
            LanguageCode::Vi => "vi",
        }
    }

    /// Label shown in the language picker, in the language itself.
    pub fn native_label(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Fr => "Français",
            LanguageCode::Ms => "Bahasa Melayu",
            LanguageCode::Tl => "Filipino",
            LanguageCode::Id => "Bahasa Indonesia",
            LanguageCode::Vi => "Tiếng Việt",
        }
    }

    /// English name used when instructing the provider.
    pub fn prompt_name(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Fr => "French",
            LanguageCode::Ms => "Malay",
            LanguageCode::Tl => "Filipino (Tagalog)",
            LanguageCode::Id => "Indonesian",
            LanguageCode::Vi => "Vietnamese",
        }
    }

    /// Locale tag used for date formatting. English reports use Canadian English.
    pub fn date_locale(self) -> &'static str {
        match self {
            LanguageCode::En => "en-CA",
            other => other.code(),
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LanguageCode::ALL
            .into_iter()
            .find(|lang| lang.code() == wanted)
            .ok_or_else(|| LanguageError {
                code: s.to_string(),
                supported: LanguageCode::ALL
                    .iter()
                    .map(|l| l.code())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("FR".parse::<LanguageCode>().unwrap(), LanguageCode::Fr);
        assert_eq!(" vi ".parse::<LanguageCode>().unwrap(), LanguageCode::Vi);
    }

    #[test]
    fn test_unknown_code_lists_supported() {
        let err = "de".parse::<LanguageCode>().unwrap_err();
        assert_eq!(err.code, "de");
        assert!(err.supported.contains("en"));
        assert!(err.supported.contains("tl"));
        assert!(err.to_string().contains("unsupported language code 'de'"));
    }

    #[test]
    fn test_english_dates_use_canadian_locale() {
        assert_eq!(LanguageCode::En.date_locale(), "en-CA");
        assert_eq!(LanguageCode::Ms.date_locale(), "ms");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&LanguageCode::Tl).unwrap(), "\"tl\"");
        let lang: LanguageCode = serde_json::from_str("\"id\"").unwrap();
        assert_eq!(lang, LanguageCode::Id);
    }
}
