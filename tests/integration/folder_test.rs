//! Integration tests for folder operations.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");

    let response = app.request("GET", "/api/health/ready", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["database"], "connected");
    assert_eq!(response.data()["storage"], "available");
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/folders/contents", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let expired = app.token_with_expiry(1, -3600);
    let response = app
        .request("GET", "/api/folders/contents", None, Some(&expired))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_folder_mirrors_directory() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);

    let docs = app.create_folder(&token, "Docs", None).await;
    let reports = app.create_folder(&token, "Reports", Some(docs)).await;

    assert!(app.physical("root/1/Docs").is_dir());
    assert!(app.physical("root/1/Docs/Reports").is_dir());

    let response = app
        .request("GET", &format!("/api/folders/{reports}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["path"], "Docs/Reports");
    assert_eq!(response.data()["parent_id"], docs);
    assert_eq!(response.data()["icon_type"], "folder");
}

#[tokio::test]
async fn test_list_contents_of_root_and_folder() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);

    let docs = app.create_folder(&token, "Docs", None).await;
    app.create_folder(&token, "Archive", None).await;
    app.create_folder(&token, "Inner", Some(docs)).await;
    app.upload(&token, Some(docs), "notes.txt", b"hello").await;

    let response = app
        .request("GET", "/api/folders/contents", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response.data()["folders"]
        .as_array()
        .expect("folders")
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Archive", "Docs"]);
    assert!(response.data()["files"].as_array().expect("files").is_empty());

    let response = app
        .request(
            "GET",
            &format!("/api/folders/contents?folder_id={docs}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["folders"][0]["name"], "Inner");
    assert_eq!(response.data()["files"][0]["name"], "notes.txt");

    let response = app
        .request("GET", "/api/folders/contents?folder_id=0", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.data()["folders"].as_array().expect("folders").len(),
        2
    );
}

#[tokio::test]
async fn test_duplicate_folder_is_conflict() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    app.create_folder(&token, "Docs", None).await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Docs" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_unsafe_folder_names_are_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);

    for name in ["", "..", "a/b"] {
        let response = app
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "name {name:?}");
    }
    assert!(!app.physical("root/1/a").exists());
}

#[tokio::test]
async fn test_rename_folder_rewrites_descendants() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let docs = app.create_folder(&token, "Docs", None).await;
    let inner = app.create_folder(&token, "Inner", Some(docs)).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{docs}"),
            Some(json!({ "name": "Papers" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["path"], "Papers");

    assert!(!app.physical("root/1/Docs").exists());
    assert!(app.physical("root/1/Papers/Inner").is_dir());

    let response = app
        .request("GET", &format!("/api/folders/{inner}"), None, Some(&token))
        .await;
    assert_eq!(response.data()["path"], "Papers/Inner");
}

#[tokio::test]
async fn test_move_folder_and_cycle_guard() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let a = app.create_folder(&token, "A", None).await;
    let b = app.create_folder(&token, "B", Some(a)).await;
    let c = app.create_folder(&token, "C", None).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{a}/move"),
            Some(json!({ "target_folder_id": b })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{c}/move"),
            Some(json!({ "target_folder_id": b })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["path"], "A/B/C");
    assert!(app.physical("root/1/A/B/C").is_dir());
    assert!(!app.physical("root/1/C").exists());

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{c}/move"),
            Some(json!({ "target_folder_id": 0 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["path"], "C");
    assert!(response.data()["parent_id"].is_null());
}

#[tokio::test]
async fn test_delete_folder_removes_subtree_and_bytes() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let docs = app.create_folder(&token, "Docs", None).await;
    let inner = app.create_folder(&token, "Inner", Some(docs)).await;
    let file = app.upload(&token, Some(inner), "deep.txt", b"deep").await;
    assert!(app.physical("root/1/1_deep.txt").is_file());

    let response = app
        .request("DELETE", &format!("/api/folders/{docs}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert!(!app.physical("root/1/Docs").exists());
    assert!(!app.physical("root/1/1_deep.txt").exists());

    for path in [
        format!("/api/folders/{docs}"),
        format!("/api/folders/{inner}"),
        format!("/api/files/{file}"),
    ] {
        let response = app.request("GET", &path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_folders_are_scoped_to_their_owner() {
    let app = helpers::TestApp::new().await;
    let alice = app.token(1);
    let bob = app.token(2);
    let docs = app.create_folder(&alice, "Docs", None).await;

    let response = app
        .request("GET", &format!("/api/folders/{docs}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", &format!("/api/folders/{docs}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.physical("root/1/Docs").is_dir());

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Mine", "parent_id": docs })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_folder_id_is_bad_request() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);

    let response = app
        .request("GET", "/api/folders/abc", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_tree_and_breadcrumbs() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let a = app.create_folder(&token, "A", None).await;
    let b = app.create_folder(&token, "B", Some(a)).await;
    let c = app.create_folder(&token, "C", Some(b)).await;

    let response = app
        .request("GET", &format!("/api/folders/{c}/breadcrumbs"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let crumbs: Vec<&str> = response
        .data()
        .as_array()
        .expect("breadcrumbs")
        .iter()
        .filter_map(|b| b["name"].as_str())
        .collect();
    assert_eq!(crumbs, vec!["A", "B", "C"]);

    let response = app
        .request("GET", "/api/folders/tree", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_folders"], 3);
    assert_eq!(response.data()["roots"][0]["name"], "A");
    assert_eq!(response.data()["roots"][0]["children"][0]["name"], "B");
}

#[tokio::test]
async fn test_archive_folder() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1);
    let docs = app.create_folder(&token, "My Docs", None).await;
    let inner = app.create_folder(&token, "Inner", Some(docs)).await;
    app.upload(&token, Some(docs), "a.txt", b"a").await;
    app.upload(&token, Some(inner), "b.txt", b"b").await;

    let response = app
        .request("GET", &format!("/api/folders/{docs}/archive"), None, Some(&token))
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
            .contains("My_Docs_1.zip")
    );
    assert_eq!(
        response.zip_names(),
        vec!["My Docs/Inner/b.txt".to_string(), "My Docs/a.txt".to_string()]
    );
}
