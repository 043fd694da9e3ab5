//! Numerus (plural form) rules for target languages.
//!
//! A numerus message stores one translation per form; the rule decides how
//! many forms a language has and which one a given count selects.

use serde::{
    Deserialize,
    Serialize,
};

/// Plural rule families, named after a representative language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PluralRule {
    /// No plural distinction (Chinese, Japanese, Korean, ...).
    Single,
    /// `n == 1` vs everything else (English, German, ...).
    OneOther,
    /// `n <= 1` vs everything else (French, Brazilian Portuguese).
    French,
    /// one / few (2-4, not 12-14) / many.
    Polish,
    /// one (ends in 1, not 11) / few / many: Russian, Ukrainian, Belarusian, ...
    EastSlavic,
    /// by `n % 100`: 1 / 2-4 / other.
    Czech,
    /// one / 2-4 / other, on the whole number.
    Slovak,
    /// one / ends in 1-19 hundreds / other.
    Romanian,
    /// one / few / many by tens.
    Lithuanian,
    /// ends in 1 (not 11) / non-zero / zero.
    Latvian,
    /// by `n % 100`: 1 / 2 / 3-4 / other.
    Slovenian,
    /// zero / one / two / few / many / other.
    Arabic,
}

/// Languages without plural forms.
const SINGLE_LANGUAGES: &[&str] = &[
    "bo", "dz", "fa", "id", "ja", "jv", "ka", "km", "ko", "lo", "ms", "my", "su", "th", "tr",
    "ug", "vi", "yo", "zh",
];

/// Languages where zero and one share the singular.
const FRENCH_LANGUAGES: &[&str] = &["am", "br", "fil", "fr", "ln", "mg", "oc", "ti", "tl", "wa"];

/// Languages following the Russian rule.
const EAST_SLAVIC_LANGUAGES: &[&str] = &["be", "bs", "hr", "ru", "sh", "sr", "uk"];

impl PluralRule {
    /// Picks the rule for a language code such as `pl`, `pl_PL`, `zh-CN` or `pt_BR`.
    ///
    /// Unknown languages get the English rule.
    #[must_use]
    pub fn for_language(code: &str) -> Self {
        let normalized = code.to_lowercase().replace('-', "_");
        if normalized == "pt_br" {
            return Self::French;
        }
        let primary = normalized.split('_').next().unwrap_or_default();

        match primary {
            "pl" => Self::Polish,
            "cs" => Self::Czech,
            "sk" => Self::Slovak,
            "ro" | "mo" => Self::Romanian,
            "lt" => Self::Lithuanian,
            "lv" => Self::Latvian,
            "sl" => Self::Slovenian,
            "ar" => Self::Arabic,
            p if SINGLE_LANGUAGES.contains(&p) => Self::Single,
            p if FRENCH_LANGUAGES.contains(&p) => Self::French,
            p if EAST_SLAVIC_LANGUAGES.contains(&p) => Self::EastSlavic,
            _ => Self::OneOther,
        }
    }

    /// Number of plural forms a numerus translation should provide.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::French => 2,
            Self::Polish
            | Self::EastSlavic
            | Self::Czech
            | Self::Slovak
            | Self::Romanian
            | Self::Lithuanian
            | Self::Latvian => 3,
            Self::Slovenian => 4,
            Self::Arabic => 6,
        }
    }

    /// Index of the plural form used for `count`. Negative counts use their magnitude.
    #[must_use]
    pub const fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let mod10 = n % 10;
        let mod100 = n % 100;
        let teen = mod100 >= 10 && mod100 <= 19;

        match self {
            Self::Single => 0,
            Self::OneOther => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::French => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if mod10 >= 2 && mod10 <= 4 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::EastSlavic => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if mod10 >= 2 && mod10 <= 4 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Czech => {
                if mod100 == 1 {
                    0
                } else if mod100 >= 2 && mod100 <= 4 {
                    1
                } else {
                    2
                }
            }
            Self::Slovak => {
                if n == 1 {
                    0
                } else if n >= 2 && n <= 4 {
                    1
                } else {
                    2
                }
            }
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (mod100 >= 1 && mod100 <= 19) {
                    1
                } else {
                    2
                }
            }
            Self::Lithuanian => {
                if mod10 == 1 && !teen {
                    0
                } else if mod10 != 0 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Slovenian => match mod100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Arabic => {
                if n == 0 {
                    0
                } else if n == 1 {
                    1
                } else if n == 2 {
                    2
                } else if mod100 >= 3 && mod100 <= 10 {
                    3
                } else if mod100 >= 11 {
                    4
                } else {
                    5
                }
            }
        }
    }
}
