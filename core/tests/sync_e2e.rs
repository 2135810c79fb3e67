//! End-to-end sync runs against a mocked PoEditor server:
//! resolve the strings file, reconcile term tags, upsert, delete when
//! warranted, then upload the file.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use poesync_core::{PoEditorClient, StringsUploader, SyncConfig, SyncError};
use reqwest::Url;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(res_dir: PathBuf) -> SyncConfig {
    SyncConfig {
        api_token: "token-123".into(),
        project_id: 42,
        default_lang: "en".into(),
        res_dir_path: res_dir,
        tags: vec!["app".into()],
        language_override_paths: HashMap::new(),
        res_file_name: "strings".into(),
    }
}

fn uploader_for(server: &MockServer, res_dir: PathBuf) -> StringsUploader {
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let client = PoEditorClient::with_base_url("token-123", base).unwrap();
    StringsUploader::new(client, config_for(res_dir))
}

fn write_strings_file(res_dir: &std::path::Path, folder: &str, body: &str) {
    let values_dir = res_dir.join(folder);
    fs::create_dir_all(&values_dir).unwrap();
    fs::write(values_dir.join("strings.xml"), body).unwrap();
}

fn success_body(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "response": { "status": "success", "code": "200", "message": "OK" },
        "result": result
    })
}

fn upload_response() -> serde_json::Value {
    success_body(serde_json::json!({
        "terms": { "parsed": 2, "added": 1, "deleted": 0 },
        "translations": { "parsed": 2, "added": 2, "updated": 0 }
    }))
}

#[tokio::test]
async fn full_run_retags_deletes_and_uploads() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let res_dir = workspace.path().join("res");

    // Local file keeps "a" and "b"; remote also knows "c" tagged with our
    // tag only, so "c" must end up deleted.
    write_strings_file(
        &res_dir,
        "values",
        r#"<resources>
    <string name="a">Alpha</string>
    <string name="b">Beta</string>
</resources>"#,
    );

    Mock::given(method("POST"))
        .and(path("/terms/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body(serde_json::json!({
                "terms": [
                    { "term": "b", "tags": ["legacy"] },
                    { "term": "c", "tags": ["app"] }
                ]
            }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    // "b" keeps its legacy tag and gains ours; "c" is absent from the
    // upsert payload because it lost its only tag.
    Mock::given(method("POST"))
        .and(path("/terms/update"))
        .and(body_string_contains("legacy"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body(serde_json::json!({
                "terms": { "parsed": 1, "added": 0, "updated": 1 }
            }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/terms/delete"))
        .and(body_string_contains("%22c%22"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body(serde_json::json!({
                "terms": { "parsed": 1, "deleted": 1 }
            }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upload_response()))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = uploader_for(&server, res_dir);
    uploader.upload_strings("en").await.unwrap();
}

#[tokio::test]
async fn delete_call_is_skipped_when_no_term_loses_all_tags() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let res_dir = workspace.path().join("res");

    write_strings_file(
        &res_dir,
        "values",
        r#"<resources><string name="a">Alpha</string></resources>"#,
    );

    Mock::given(method("POST"))
        .and(path("/terms/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body(serde_json::json!({
                "terms": [ { "term": "a", "tags": [] } ]
            }))),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/terms/update"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body(serde_json::json!({
                "terms": { "parsed": 1, "added": 0, "updated": 1 }
            }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/terms/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(serde_json::json!({
            "terms": { "parsed": 0, "deleted": 0 }
        }))))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upload_response()))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = uploader_for(&server, res_dir);
    uploader.upload_strings("en").await.unwrap();
}

#[tokio::test]
async fn qualified_language_folder_is_resolved() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let res_dir = workspace.path().join("res");

    write_strings_file(
        &res_dir,
        "values-en-rUS",
        r#"<resources><string name="a">Alpha</string></resources>"#,
    );

    Mock::given(method("POST"))
        .and(path("/terms/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body(serde_json::json!({ "terms": [] }))),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/terms/update"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body(serde_json::json!({
                "terms": { "parsed": 0, "added": 0, "updated": 0 }
            }))),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects/upload"))
        .and(body_string_contains("en-us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upload_response()))
        .expect(1)
        .mount(&server)
        .await;

    let uploader = uploader_for(&server, res_dir);
    uploader.upload_strings("en-us").await.unwrap();
}

#[tokio::test]
async fn missing_strings_file_aborts_before_any_call() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let uploader = uploader_for(&server, workspace.path().join("res"));
    match uploader.upload_strings("en").await {
        Err(SyncError::MissingResourceFile(path)) => {
            assert!(path.ends_with("values/strings.xml"));
        }
        other => panic!("expected missing-file error, got {other:?}"),
    }
}

#[tokio::test]
async fn service_failure_during_term_sync_aborts_the_run() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let res_dir = workspace.path().join("res");

    write_strings_file(
        &res_dir,
        "values",
        r#"<resources><string name="a">Alpha</string></resources>"#,
    );

    Mock::given(method("POST"))
        .and(path("/terms/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": { "status": "fail", "code": "4011", "message": "Invalid API Token" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upload_response()))
        .expect(0)
        .mount(&server)
        .await;

    let uploader = uploader_for(&server, res_dir);
    assert!(matches!(
        uploader.upload_strings("en").await,
        Err(SyncError::Api(_))
    ));
}
