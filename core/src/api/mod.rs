//! HTTP client for the PoEditor v2 REST API.
//!
//! Every endpoint is a form-encoded (or multipart, for uploads) POST that
//! answers with the common `{ response, result }` envelope. Calls are issued
//! one at a time and never retried; any non-success envelope or transport
//! failure surfaces as an [`ApiError`].

pub mod types;

use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use types::{
    Envelope, ExportResult, ExportType, FilterType, ListLanguagesResult, ListTermsResult,
    OrderType, ProjectLanguage, ProjectUploadResult, Term, TermsDeleteResult, TermsDeleteSummary,
    TermsUpdateResult, TermsUpdateSummary, UpdatingType,
};

const POEDITOR_API_URL: &str = "https://api.poeditor.com/v2/";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const UPLOAD_FILE_NAME: &str = "strings.xml";
const UPLOAD_FILE_MIME: &str = "text/xml";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success envelope.
    #[error("PoEditor reported an error (code {code}): {message}")]
    Service { code: String, message: String },
    /// The HTTP layer failed or the request could not be built.
    #[error("transport failure talking to PoEditor: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success HTTP status without a parseable envelope.
    #[error("PoEditor answered HTTP {status} without a readable response envelope")]
    Http { status: StatusCode },
    /// A 2xx answer whose body does not match the expected envelope.
    #[error("malformed PoEditor response: {0}")]
    MalformedResponse(String),
    /// Request parameters could not be encoded.
    #[error("failed to encode request payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Optional knobs accepted by [`PoEditorClient::export_url`].
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub filters: Vec<FilterType>,
    pub order: Option<OrderType>,
    pub tags: Vec<String>,
    pub unquoted: bool,
}

/// Client for a single PoEditor project token. Owns its connection
/// configuration; no other state survives between calls.
pub struct PoEditorClient {
    http: Client,
    base_url: Url,
    api_token: String,
}

impl PoEditorClient {
    pub fn new(api_token: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(POEDITOR_API_URL).expect("static base url is valid");
        Self::with_base_url(api_token, base_url)
    }

    /// Builds a client against an alternative base URL. Used by tests to
    /// point at a local mock server.
    pub fn with_base_url(api_token: impl Into<String>, base_url: Url) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_token: api_token.into(),
        })
    }

    /// Languages configured in the project.
    pub async fn list_languages(&self, project_id: u32) -> Result<Vec<ProjectLanguage>, ApiError> {
        let params = vec![
            ("api_token".to_string(), self.api_token.clone()),
            ("id".to_string(), project_id.to_string()),
        ];
        let result: ListLanguagesResult = self.post_form("languages/list", params).await?;
        Ok(result.languages)
    }

    /// Requests an export and returns the download URL for the generated
    /// file.
    pub async fn export_url(
        &self,
        project_id: u32,
        language: &str,
        export_type: ExportType,
        request: &ExportRequest,
    ) -> Result<String, ApiError> {
        let mut params = vec![
            ("api_token".to_string(), self.api_token.clone()),
            ("id".to_string(), project_id.to_string()),
            ("language".to_string(), language.to_string()),
            ("type".to_string(), export_type.to_string()),
        ];
        if !request.filters.is_empty() {
            let filters: Vec<&str> = request.filters.iter().map(FilterType::as_str).collect();
            params.push(("filters".to_string(), serde_json::to_string(&filters)?));
        }
        if let Some(order) = request.order {
            params.push(("order".to_string(), order.to_string()));
        }
        if !request.tags.is_empty() {
            params.push(("tags".to_string(), serde_json::to_string(&request.tags)?));
        }
        let options = serde_json::json!([{ "unquoted": u8::from(request.unquoted) }]);
        params.push(("options".to_string(), options.to_string()));

        let result: ExportResult = self.post_form("projects/export", params).await?;
        Ok(result.url)
    }

    /// Uploads a strings file for one language.
    #[allow(clippy::too_many_arguments)]
    pub async fn upload_language(
        &self,
        project_id: u32,
        language: &str,
        updating: UpdatingType,
        content: Vec<u8>,
        overwrite: bool,
        sync_terms: bool,
        fuzzy_trigger: bool,
        tags: &[String],
    ) -> Result<ProjectUploadResult, ApiError> {
        let file = Part::bytes(content)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_FILE_MIME)?;
        let mut form = Form::new()
            .text("api_token", self.api_token.clone())
            .text("id", project_id.to_string())
            .text("language", language.to_string())
            .text("updating", updating.to_string())
            .text("overwrite", flag(overwrite))
            .text("sync_terms", flag(sync_terms))
            .text("fuzzy_trigger", flag(fuzzy_trigger))
            .part("file", file);
        if !tags.is_empty() {
            form = form.text("tags", serde_json::to_string(tags)?);
        }

        let url = self.endpoint("projects/upload");
        debug!("POST {url} (multipart upload for language {language})");
        let response = self.http.post(url).multipart(form).send().await?;
        Self::decode(response).await
    }

    /// All terms currently defined in the project. An absent list in the
    /// payload means the project has no terms yet.
    pub async fn list_terms(&self, project_id: u32) -> Result<Vec<Term>, ApiError> {
        let params = vec![
            ("api_token".to_string(), self.api_token.clone()),
            ("id".to_string(), project_id.to_string()),
        ];
        let result: ListTermsResult = self.post_form("terms/list", params).await?;
        Ok(result.terms.unwrap_or_default())
    }

    /// Creates or updates the given terms, tags included.
    pub async fn upsert_terms(
        &self,
        project_id: u32,
        fuzzy_trigger: bool,
        terms: &[Term],
    ) -> Result<TermsUpdateSummary, ApiError> {
        let params = vec![
            ("api_token".to_string(), self.api_token.clone()),
            ("id".to_string(), project_id.to_string()),
            ("fuzzy_trigger".to_string(), flag(fuzzy_trigger)),
            ("data".to_string(), serde_json::to_string(terms)?),
        ];
        let result: TermsUpdateResult = self.post_form("terms/update", params).await?;
        Ok(result.terms)
    }

    /// Deletes the given terms from the project.
    pub async fn delete_terms(
        &self,
        project_id: u32,
        terms: &[Term],
    ) -> Result<TermsDeleteSummary, ApiError> {
        let params = vec![
            ("api_token".to_string(), self.api_token.clone()),
            ("id".to_string(), project_id.to_string()),
            ("data".to_string(), serde_json::to_string(terms)?),
        ];
        let result: TermsDeleteResult = self.post_form("terms/delete", params).await?;
        Ok(result.terms)
    }

    fn endpoint(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .expect("endpoint paths are valid relative urls")
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!("POST {url}");
        let response = self.http.post(url).form(&params).send().await?;
        Self::decode(response).await
    }

    /// Reads the body as text first so a failing status with a valid `fail`
    /// envelope still yields the service's own code and message. A payload is
    /// only unwrapped when both the HTTP status and the envelope status
    /// report success.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => {
                if !status.is_success() && envelope.response.status == types::STATUS_SUCCESS {
                    return Err(ApiError::Http { status });
                }
                envelope.into_result()
            }
            Err(err) => {
                if status.is_success() {
                    Err(ApiError::MalformedResponse(err.to_string()))
                } else {
                    Err(ApiError::Http { status })
                }
            }
        }
    }
}

fn flag(value: bool) -> String {
    u8::from(value).to_string()
}
