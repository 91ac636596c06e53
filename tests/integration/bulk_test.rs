//! Integration tests for bulk delete, move and download.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_bulk_delete_reports_missing_items() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let file = app.upload(&token, None, "a.txt", b"a").await;
    let folder = app.create_folder(&token, "Old", None).await;

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({
                "action": "delete",
                "file_ids": [file, 999],
                "folder_ids": [folder],
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["processed"], 2);
    assert_eq!(response.body["failed"], 1);
    assert_eq!(response.body["failed_items"], json!(["file_999"]));

    assert!(!app.physical("root/1/1_a.txt").exists());
    assert!(!app.physical("root/1/Old").exists());
}

#[tokio::test]
async fn test_bulk_delete_ignores_foreign_items() {
    let app = helpers::TestApp::new().await;
    let file = app.upload(&app.token(1), None, "a.txt", b"a").await;

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({ "action": "delete", "file_ids": [file] })),
            Some(&app.token(2)),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["processed"], 0);
    assert_eq!(response.body["failed"], 1);
    assert!(app.physical("root/1/1_a.txt").is_file());
}

#[tokio::test]
async fn test_bulk_move_into_folder_and_back_to_top_level() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let target = app.create_folder(&token, "Target", None).await;
    let child = app.create_folder(&token, "Child", None).await;
    let file = app.upload(&token, None, "a.txt", b"a").await;

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({
                "action": "move",
                "file_ids": [file],
                "folder_ids": [child, target],
                "target_folder_id": target,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["processed"], 2);
    assert_eq!(response.body["failed"], 1);
    assert_eq!(response.body["failed_items"], json!(["Target"]));
    assert!(app.physical("root/1/Target/Child").is_dir());

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({
                "action": "move",
                "file_ids": [file],
                "folder_ids": [child],
                "target_id": 0,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["processed"], 2);
    assert!(app.physical("root/1/Child").is_dir());

    let response = app
        .request("GET", &format!("/api/files/{file}"), None, Some(&token))
        .await;
    assert!(response.data()["folder_id"].is_null());
}

#[tokio::test]
async fn test_bulk_move_requires_existing_target() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let file = app.upload(&token, None, "a.txt", b"a").await;

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({ "action": "move", "file_ids": [file] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({
                "action": "move",
                "file_ids": [file],
                "target_folder_id": 777,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_unknown_action_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({ "action": "copy", "file_ids": [1] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_bulk_download_builds_zip() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let docs = app.create_folder(&token, "Docs", None).await;
    app.upload(&token, Some(docs), "inner.txt", b"inner").await;
    let loose = app.upload(&token, None, "loose.txt", b"loose").await;

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({
                "action": "download",
                "file_ids": [loose, 404],
                "folder_ids": [docs],
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers["content-type"].to_str().expect("header"),
        "application/zip"
    );
    assert!(
        response.headers["content-disposition"]
            .to_str()
            .expect("header")
            .contains("bulk_download_1.zip")
    );
    assert_eq!(response.headers["x-bulk-processed"], "2");
    assert_eq!(response.headers["x-bulk-failed"], "1");
    assert_eq!(
        response.zip_names(),
        vec!["Docs/inner.txt".to_string(), "loose.txt".to_string()]
    );
}

#[tokio::test]
async fn test_bulk_download_counts_only_archived_files() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let a = app.upload(&token, None, "keep.txt", b"keep").await;
    let b = app.upload(&token, None, "lost.txt", b"lost").await;
    std::fs::remove_file(app.physical("root/1/1_lost.txt")).expect("remove bytes");

    let response = app
        .request(
            "POST",
            "/api/bulk",
            Some(json!({ "action": "download", "file_ids": [a, b] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["x-bulk-processed"], "1");
    assert_eq!(response.headers["x-bulk-failed"], "1");
    assert_eq!(response.zip_names(), vec!["keep.txt".to_string()]);
}
