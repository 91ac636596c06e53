//! Integration tests for file operations, versions, search, favorites and recent items.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_upload_and_download_file() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let docs = app.create_folder(&token, "Docs", None).await;

    let response = app
        .multipart(
            "/api/files/upload",
            &token,
            "notes.txt",
            b"hello world",
            &[("folder_id", &docs.to_string())],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let file = response.data().clone();
    assert_eq!(file["name"], "notes.txt");
    assert_eq!(file["folder_id"], docs);
    assert_eq!(file["size_bytes"], 11);
    assert_eq!(file["mime_type"], "text/plain");
    assert_eq!(file["current_version"], 1);
    assert!(file.get("storage_path").is_none());
    assert!(app.physical("root/1/1_notes.txt").is_file());

    let id = file["id"].as_i64().expect("file id");
    let response = app
        .request("GET", &format!("/api/files/{id}/download"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.bytes[..], b"hello world");
    assert!(
        response.headers["content-disposition"]
            .to_str()
            .expect("header")
            .contains("notes.txt")
    );
}

#[tokio::test]
async fn test_upload_without_file_part_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);

    let response = app
        .multipart("/api/files/upload", &token, "", b"", &[])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_same_name_conflicts() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let docs = app.create_folder(&token, "Docs", None).await;
    app.upload(&token, None, "report.pdf", b"first").await;

    let response = app
        .multipart(
            "/api/files/upload",
            &token,
            "report.pdf",
            b"second",
            &[("folder_id", &docs.to_string())],
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        std::fs::read(app.physical("root/1/1_report.pdf")).expect("live bytes"),
        b"first"
    );
}

#[tokio::test]
async fn test_upload_into_missing_folder_is_not_found() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);

    let response = app
        .multipart(
            "/api/files/upload",
            &token,
            "a.txt",
            b"a",
            &[("folder_id", "4242")],
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!app.physical("root/1/1_a.txt").exists());
}

#[tokio::test]
async fn test_upload_respects_size_limit() {
    let app = helpers::TestApp::with_storage(|s| s.max_upload_size_bytes = 4).await;
    let token = app.token(1);

    let response = app
        .multipart("/api/files/upload", &token, "big.txt", b"too large", &[])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!app.physical("root/1/1_big.txt").exists());
}

#[tokio::test]
async fn test_rename_move_and_delete_file() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let docs = app.create_folder(&token, "Docs", None).await;
    let id = app.upload(&token, None, "draft.txt", b"draft").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/files/{id}"),
            Some(json!({ "name": "final.txt" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "final.txt");
    assert_eq!(response.data()["original_name"], "draft.txt");
    assert!(app.physical("root/1/1_draft.txt").is_file());

    let response = app
        .request(
            "PUT",
            &format!("/api/files/{id}/move"),
            Some(json!({ "target_folder_id": docs })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["folder_id"], docs);

    let response = app
        .request("DELETE", &format!("/api/files/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!app.physical("root/1/1_draft.txt").exists());

    let response = app
        .request("GET", &format!("/api/files/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_files_are_scoped_to_their_owner() {
    let app = helpers::TestApp::new().await;
    let alice = app.token(1);
    let bob = app.token(2);
    let id = app.upload(&alice, None, "secret.txt", b"secret").await;

    for (method, path) in [
        ("GET", format!("/api/files/{id}")),
        ("GET", format!("/api/files/{id}/download")),
        ("DELETE", format!("/api/files/{id}")),
    ] {
        let response = app.request(method, &path, None, Some(&bob)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {path}");
    }
    assert!(app.physical("root/1/1_secret.txt").is_file());
}

#[tokio::test]
async fn test_version_lifecycle() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let id = app.upload(&token, None, "report.txt", b"one").await;

    let response = app
        .request("GET", &format!("/api/files/{id}/versions"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &format!("/api/files/{id}/versioning/enable"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["version_number"], 1);

    let response = app
        .request(
            "POST",
            &format!("/api/files/{id}/versioning/enable"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .multipart(
            &format!("/api/files/{id}/versions"),
            &token,
            "report.txt",
            b"two!",
            &[("comment", "second draft")],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["version_number"], 2);
    assert_eq!(response.data()["comment"], "second draft");
    assert!(app.physical("root/1/1_report_v1.txt").is_file());

    let response = app
        .request("GET", &format!("/api/files/{id}/versions"), None, Some(&token))
        .await;
    let numbers: Vec<i64> = response
        .data()
        .as_array()
        .expect("versions")
        .iter()
        .filter_map(|v| v["version_number"].as_i64())
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    let response = app
        .request(
            "GET",
            &format!("/api/files/{id}/versions/1/download"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.bytes[..], b"one");
    assert!(
        response.headers["content-disposition"]
            .to_str()
            .expect("header")
            .contains("report_v1.txt")
    );

    let response = app
        .request(
            "POST",
            &format!("/api/files/{id}/versions/1/restore"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["current_version"], 2);
    assert_eq!(response.data()["size_bytes"], 3);

    let response = app
        .request("GET", &format!("/api/files/{id}/download"), None, Some(&token))
        .await;
    assert_eq!(&response.bytes[..], b"one");

    let response = app
        .request(
            "POST",
            &format!("/api/files/{id}/versions/0/restore"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &format!("/api/files/{id}/versioning/disable"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["versioning_enabled"], false);
    assert!(!app.physical("root/1/1_report_v1.txt").exists());
    assert!(app.physical("root/1/1_report.txt").is_file());
}

#[tokio::test]
async fn test_search_by_name_and_extension() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    app.create_folder(&token, "Reports", None).await;
    app.upload(&token, None, "report-2024.pdf", b"%PDF").await;
    app.upload(&token, None, "photo.png", b"png").await;

    let response = app
        .request("GET", "/api/search?q=report", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 2);
    assert_eq!(response.data()["files"][0]["name"], "report-2024.pdf");
    assert_eq!(response.data()["folders"][0]["name"], "Reports");

    let response = app
        .request("GET", "/api/search?q=*.png", None, Some(&token))
        .await;
    assert_eq!(response.data()["total"], 1);
    assert_eq!(response.data()["files"][0]["name"], "photo.png");

    let response = app
        .request("GET", "/api/search?q=o&type=image", None, Some(&token))
        .await;
    let files = response.data()["files"].as_array().expect("files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "photo.png");

    let response = app
        .request("GET", "/api/search?q=", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("GET", "/api/search?q=a&type=spreadsheet", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("GET", "/api/search/file-types", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.data()["categories"]["image"],
        json!(["image/png"])
    );
}

#[tokio::test]
async fn test_favorites_flow() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let file = app.upload(&token, None, "fav.txt", b"fav").await;
    let folder = app.create_folder(&token, "Starred", None).await;

    let response = app
        .request(
            "POST",
            "/api/favorites",
            Some(json!({ "item_type": "file", "item_id": file })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let favorite_id = response.data()["id"].as_i64().expect("favorite id");

    let response = app
        .request(
            "POST",
            "/api/favorites",
            Some(json!({ "item_type": "file", "item_id": file })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            "/api/favorites",
            Some(json!({ "item_type": "folder", "item_id": folder })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request(
            "POST",
            "/api/favorites",
            Some(json!({ "item_type": "drive", "item_id": folder })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("GET", "/api/favorites", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().expect("favorites").len(), 2);

    let response = app
        .request("GET", &format!("/api/files/{file}"), None, Some(&token))
        .await;
    assert_eq!(response.data()["is_favorite"], true);

    let response = app
        .request(
            "GET",
            &format!("/api/favorites/check/file/{file}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.data()["is_favorite"], true);
    assert_eq!(response.data()["favorite_id"], favorite_id);

    let response = app
        .request(
            "DELETE",
            &format!("/api/favorites/{favorite_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "DELETE",
            "/api/favorites/item",
            Some(json!({ "item_type": "folder", "item_id": folder })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            &format!("/api/favorites/check/folder/{folder}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.data()["is_favorite"], false);
}

#[tokio::test]
async fn test_favorite_of_foreign_item_is_not_found() {
    let app = helpers::TestApp::new().await;
    let file = app.upload(&app.token(1), None, "mine.txt", b"x").await;

    let response = app
        .request(
            "POST",
            "/api/favorites",
            Some(json!({ "item_type": "file", "item_id": file })),
            Some(&app.token(2)),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recent_items_track_downloads_and_skip_deleted() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let kept = app.upload(&token, None, "kept.txt", b"k").await;
    let gone = app.upload(&token, None, "gone.txt", b"g").await;
    let folder = app.create_folder(&token, "Docs", None).await;

    app.request("GET", &format!("/api/files/{kept}/download"), None, Some(&token))
        .await;
    let response = app
        .request("POST", &format!("/api/recent/file/{gone}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app
        .request("POST", &format!("/api/recent/folder/{folder}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    app.request("DELETE", &format!("/api/files/{gone}"), None, Some(&token))
        .await;

    let response = app
        .request("GET", "/api/recent", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let items: Vec<i64> = response
        .data()
        .as_array()
        .expect("recent items")
        .iter()
        .filter_map(|i| i["item_id"].as_i64())
        .collect();
    assert_eq!(items.len(), 2);
    assert!(items.contains(&kept));
    assert!(items.contains(&folder));

    let response = app
        .request("GET", "/api/recent?limit=1", None, Some(&token))
        .await;
    assert_eq!(response.data().as_array().expect("recent items").len(), 1);

    let response = app
        .request("POST", "/api/recent/file/999", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
