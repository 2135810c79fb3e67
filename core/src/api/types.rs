use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A translation term as PoEditor models it: a unique identifier plus the
/// tags currently attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Term {
    pub fn new(term: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            term: term.into(),
            tags,
        }
    }
}

/// A language configured in a PoEditor project. Read-only, sourced from
/// `languages/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectLanguage {
    pub name: String,
    pub code: String,
    pub translations: u32,
    pub percentage: f64,
    #[serde(default, deserialize_with = "poeditor_date")]
    pub updated: Option<DateTime<FixedOffset>>,
}

/// PoEditor serializes timestamps as `2015-05-04T14:21:41+0000` and uses an
/// empty string for "never updated".
fn poeditor_date<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Status block common to every PoEditor response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    pub status: String,
    pub code: String,
    pub message: String,
}

pub const STATUS_SUCCESS: &str = "success";

/// The `{ response, result }` wrapper every endpoint returns.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: ResponseStatus,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwraps the envelope into its payload, or the service-reported error.
    pub fn into_result(self) -> Result<T, super::ApiError> {
        if self.response.status != STATUS_SUCCESS {
            return Err(super::ApiError::Service {
                code: self.response.code,
                message: self.response.message,
            });
        }
        self.result.ok_or_else(|| {
            super::ApiError::MalformedResponse("success envelope with no result payload".into())
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListLanguagesResult {
    pub languages: Vec<ProjectLanguage>,
}

#[derive(Debug, Deserialize)]
pub struct ExportResult {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ListTermsResult {
    #[serde(default)]
    pub terms: Option<Vec<Term>>,
}

/// Term counters from `projects/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTerms {
    pub parsed: u32,
    pub added: u32,
    pub deleted: u32,
}

/// Translation counters from `projects/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTranslations {
    pub parsed: u32,
    pub added: u32,
    pub updated: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectUploadResult {
    #[serde(default)]
    pub terms: Option<UploadTerms>,
    pub translations: UploadTranslations,
}

/// Counters returned by `terms/update`.
#[derive(Debug, Clone, Deserialize)]
pub struct TermsUpdateSummary {
    pub parsed: u32,
    pub added: u32,
    pub updated: u32,
}

#[derive(Debug, Deserialize)]
pub struct TermsUpdateResult {
    pub terms: TermsUpdateSummary,
}

/// Counters returned by `terms/delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct TermsDeleteSummary {
    pub parsed: u32,
    pub deleted: u32,
}

#[derive(Debug, Deserialize)]
pub struct TermsDeleteResult {
    pub terms: TermsDeleteSummary,
}

/// Raised when a string option does not belong to its closed value set.
#[derive(Debug, Error)]
#[error("value \"{value}\" is not a valid {kind}; allowed values are: {}", allowed.join(", "))]
pub struct OptionParseError {
    pub value: String,
    pub kind: &'static str,
    pub allowed: &'static [&'static str],
}

macro_rules! closed_options {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALLOWED: &'static [&'static str] = &[$($wire),+];

            /// Wire spelling expected by the API.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = OptionParseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let lowered = value.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(OptionParseError {
                        value: value.to_string(),
                        kind: $kind,
                        allowed: Self::ALLOWED,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_options!(
    /// File formats PoEditor can export.
    ExportType, "export type", {
        Po => "po",
        Pot => "pot",
        Mo => "mo",
        Xls => "xls",
        Xlsx => "xlsx",
        Csv => "csv",
        Ini => "ini",
        Resw => "resw",
        Resx => "resx",
        AndroidStrings => "android_strings",
        AppleStrings => "apple_strings",
        Xliff => "xliff",
        Properties => "properties",
        KeyValueJson => "key_value_json",
        Json => "json",
        Yml => "yml",
        Xlf => "xlf",
        Xmb => "xmb",
        Xtb => "xtb",
        Arb => "arb",
        Rise360Xliff => "rise_360_xliff",
    }
);

closed_options!(
    /// Export result filters.
    FilterType, "filter type", {
        Translated => "translated",
        Untranslated => "untranslated",
        Fuzzy => "fuzzy",
        NotFuzzy => "not_fuzzy",
        Automatic => "automatic",
        NotAutomatic => "not_automatic",
        Proofread => "proofread",
        NotProofread => "not_proofread",
    }
);

closed_options!(
    /// Export ordering.
    OrderType, "order type", {
        None => "none",
        Terms => "terms",
    }
);

closed_options!(
    /// What an upload is allowed to touch.
    UpdatingType, "updating type", {
        Terms => "terms",
        TermsTranslations => "terms_translations",
        Translations => "translations",
    }
);
