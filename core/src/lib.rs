pub mod api;
pub mod config;
pub mod reconcile;
pub mod res;
pub mod uploader;
pub mod xml;

pub use api::types::{
    ExportType, FilterType, OrderType, ProjectLanguage, Term, UpdatingType,
};
pub use api::{ApiError, ExportRequest, PoEditorClient};
pub use config::{ConfigError, SyncConfig};
pub use reconcile::{plan_tag_updates, TagPlan};
pub use uploader::{StringsUploader, SyncError};
pub use xml::{extract_terms, XmlError};
