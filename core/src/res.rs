//! Resolution of the local Android values directory and strings file.

use std::path::PathBuf;

use crate::config::SyncConfig;

/// Converts a PoEditor language code into the Android values-folder
/// qualifier: plain codes pass through, regioned codes like `en-us` become
/// `en-rUS`.
pub fn values_modifier(language_code: &str) -> String {
    match language_code.split_once('-') {
        Some((language, region)) => format!("{language}-r{}", region.to_uppercase()),
        None => language_code.to_string(),
    }
}

/// Name of the values folder holding a language's resources. The default
/// language lives in the unqualified `values` folder.
pub fn values_folder_name(language_code: &str, default_lang: &str) -> String {
    let modifier = values_modifier(language_code);
    if modifier == default_lang {
        "values".to_string()
    } else {
        format!("values-{modifier}")
    }
}

/// Resolves the strings file for a language: an explicit override directory
/// wins, otherwise the computed values folder under the resource root.
pub fn resolve_values_file(config: &SyncConfig, language_code: &str) -> PathBuf {
    let values_dir = match config.language_override_paths.get(language_code) {
        Some(dir) => dir.clone(),
        None => config
            .res_dir_path
            .join(values_folder_name(language_code, &config.default_lang)),
    };
    values_dir.join(format!("{}.xml", config.res_file_name))
}
