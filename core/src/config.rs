//! Configuration for one sync run.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Language codes as PoEditor and Android accept them: `es`, `en-us`,
/// `zh-Hans`.
static LANG_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}(-[a-zA-Z]{2,4})?$").expect("valid language code regex"));

const DEFAULT_RES_FILE_NAME: &str = "strings";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("missing required setting: {0}")]
    MissingField(&'static str),
    #[error("invalid setting {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Everything one sync run needs. Loaded once, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// PoEditor API token.
    pub api_token: String,
    /// PoEditor project id.
    pub project_id: u32,
    /// Language code of the project's default language, e.g. `en`.
    pub default_lang: String,
    /// Root of the Android `res/` directory holding the `values*` folders.
    pub res_dir_path: PathBuf,
    /// Tags applied to every term this file contributes.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Per-language override of the values directory, keyed by language code.
    #[serde(default)]
    pub language_override_paths: HashMap<String, PathBuf>,
    /// Base name of the resource file, without the `.xml` extension.
    #[serde(default = "default_res_file_name")]
    pub res_file_name: String,
}

fn default_res_file_name() -> String {
    DEFAULT_RES_FILE_NAME.to_string()
}

impl SyncConfig {
    /// Loads and validates a config from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingField("apiToken"));
        }
        if self.project_id == 0 {
            return Err(ConfigError::InvalidField {
                field: "projectId",
                reason: "must be a positive project id".into(),
            });
        }
        if !LANG_CODE_RE.is_match(&self.default_lang) {
            return Err(ConfigError::InvalidField {
                field: "defaultLang",
                reason: format!("\"{}\" is not a language code", self.default_lang),
            });
        }
        for code in self.language_override_paths.keys() {
            if !LANG_CODE_RE.is_match(code) {
                return Err(ConfigError::InvalidField {
                    field: "languageOverridePaths",
                    reason: format!("\"{code}\" is not a language code"),
                });
            }
        }
        if self.res_file_name.trim().is_empty() {
            return Err(ConfigError::MissingField("resFileName"));
        }
        Ok(())
    }
}
