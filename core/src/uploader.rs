//! Orchestration of one sync run: term reconciliation followed by the
//! translation-file upload.

use log::{error, info};
use std::path::PathBuf;
use thiserror::Error;

use crate::api::types::UpdatingType;
use crate::api::{ApiError, PoEditorClient};
use crate::config::SyncConfig;
use crate::reconcile::plan_tag_updates;
use crate::res::resolve_values_file;
use crate::xml::{extract_terms, XmlError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("strings file not found at {0}")]
    MissingResourceFile(PathBuf),
}

/// Uploads one language's strings file to PoEditor, reconciling term tags
/// first.
pub struct StringsUploader {
    client: PoEditorClient,
    config: SyncConfig,
}

impl StringsUploader {
    pub fn new(client: PoEditorClient, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs the full sequence for `language_code`: resolve the local file,
    /// sync term tags, then upload the file's translations. Fail-fast: the
    /// first error aborts the run; nothing already pushed is rolled back.
    pub async fn upload_strings(&self, language_code: &str) -> Result<(), SyncError> {
        self.run(language_code).await.map_err(|err| {
            error!(
                "sync for language {language_code} failed; \
                 review the configured paths and project settings: {err}"
            );
            err
        })
    }

    async fn run(&self, language_code: &str) -> Result<(), SyncError> {
        let values_file = resolve_values_file(&self.config, language_code);
        if !values_file.exists() {
            return Err(SyncError::MissingResourceFile(values_file));
        }

        self.sync_terms(&values_file).await?;

        info!("uploading strings file for language {language_code}");
        let content = std::fs::read(&values_file).map_err(XmlError::Io)?;
        let result = self
            .client
            .upload_language(
                self.config.project_id,
                language_code,
                UpdatingType::TermsTranslations,
                content,
                true,  // overwrite
                false, // sync_terms: reconciliation above already did this
                true,  // fuzzy_trigger
                &self.config.tags,
            )
            .await?;
        info!(
            "upload finished: {} translations parsed, {} added, {} updated",
            result.translations.parsed, result.translations.added, result.translations.updated
        );
        Ok(())
    }

    /// Retags remote terms against the local strings file and deletes the
    /// ones left untagged.
    async fn sync_terms(&self, values_file: &std::path::Path) -> Result<(), SyncError> {
        let local_terms = extract_terms(values_file, &self.config.tags)?;
        info!(
            "extracted {} terms from {}",
            local_terms.len(),
            values_file.display()
        );

        let remote_terms = self.client.list_terms(self.config.project_id).await?;
        let plan = plan_tag_updates(&local_terms, &remote_terms, &self.config.tags);

        let update = self
            .client
            .upsert_terms(self.config.project_id, true, &plan.upserts)
            .await?;
        info!(
            "updated terms: {} parsed, {} added, {} updated",
            update.parsed, update.added, update.updated
        );

        if !plan.deletions.is_empty() {
            let deletion = self
                .client
                .delete_terms(self.config.project_id, &plan.deletions)
                .await?;
            info!(
                "deleted terms: {} parsed, {} deleted",
                deletion.parsed, deletion.deleted
            );
        }

        Ok(())
    }
}
