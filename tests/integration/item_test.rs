//! Item tree: folders, uploads, listing, rename, privacy, delete,
//! owner downloads.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_create_folder_and_list_root() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let folder_id = app.create_folder(&token, "documents", None).await;

    let (status, json) = app.request("GET", "/api/items", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["currentFolder"].is_null());

    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], folder_id);
    assert_eq!(items[0]["type"], "folder");
    // New items are born private
    assert_eq!(items[0]["isPrivate"], true);
}

#[tokio::test]
async fn test_create_folder_with_blank_name_gets_default() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let (status, json) = app
        .request(
            "POST",
            "/api/folders",
            Some(&token),
            Some(json!({ "name": "  " })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "New Folder");
}

#[tokio::test]
async fn test_listing_puts_folders_before_files() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    app.upload_file(&token, "alpha.txt", b"a", None).await;
    app.create_folder(&token, "zeta", None).await;
    app.create_folder(&token, "Beta", None).await;

    let (_, json) = app.request("GET", "/api/items", Some(&token), None).await;
    let names: Vec<&str> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();

    // Folders first, then case-insensitive by name
    assert_eq!(names, vec!["Beta", "zeta", "alpha.txt"]);
}

#[tokio::test]
async fn test_list_nested_folder() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let parent = app.create_folder(&token, "outer", None).await;
    let child = app.create_folder(&token, "inner", Some(parent)).await;

    let (status, json) = app
        .request(
            "GET",
            &format!("/api/items?parentId={parent}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["currentFolder"]["id"], parent);
    assert_eq!(json["data"]["items"][0]["id"], child);
}

#[tokio::test]
async fn test_list_unknown_or_foreign_parent_is_not_found() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let folder = app.create_folder(&alice, "secret", None).await;

    let (status, _) = app
        .request("GET", "/api/items?parentId=999", Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Someone else's folder id is indistinguishable from a missing one
    let (status, _) = app
        .request(
            "GET",
            &format!("/api/items?parentId={folder}"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_and_download_round_trip() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let content = b"GlassCloud stores this verbatim".as_slice();
    let file_id = app.upload_file(&token, "notes.txt", content, None).await;

    let (status, headers, body) = app
        .request_raw(
            "GET",
            &format!("/api/items/{file_id}/download"),
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), content);
    assert_eq!(headers["content-type"], "text/plain");
    assert!(
        headers["content-disposition"]
            .to_str()
            .unwrap()
            .contains("notes.txt")
    );
}

#[tokio::test]
async fn test_upload_to_unknown_parent_fails() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let (status, _) = app.upload(&token, "lost.txt", b"data", Some(424242)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_strips_path_components() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let (status, json) = app
        .upload(&token, "../../etc/passwd", b"nope", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "passwd");
}

#[tokio::test]
async fn test_rename_item() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let id = app.create_folder(&token, "drafts", None).await;

    let (status, json) = app
        .request(
            "PATCH",
            &format!("/api/items/{id}"),
            Some(&token),
            Some(json!({ "name": "final" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "final");
}

#[tokio::test]
async fn test_privacy_toggle() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let id = app.upload_file(&token, "pic.png", b"png", None).await;

    app.set_privacy(&token, id, false).await;
    let (_, json) = app.request("GET", "/api/items", Some(&token), None).await;
    assert_eq!(json["data"]["items"][0]["isPrivate"], false);

    app.set_privacy(&token, id, true).await;
    let (_, json) = app.request("GET", "/api/items", Some(&token), None).await;
    assert_eq!(json["data"]["items"][0]["isPrivate"], true);
}

#[tokio::test]
async fn test_delete_folder_removes_subtree() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let root = app.create_folder(&token, "project", None).await;
    let sub = app.create_folder(&token, "assets", Some(root)).await;
    app.upload_file(&token, "readme.md", b"# hi", Some(root)).await;
    app.upload_file(&token, "logo.svg", b"<svg/>", Some(sub)).await;
    let keeper = app.upload_file(&token, "keep.txt", b"keep", None).await;

    assert_eq!(app.count_items().await, 5);

    let (status, json) = app
        .request("DELETE", &format!("/api/items/{root}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["deleted"], 4);

    // Only the unrelated file survives
    assert_eq!(app.count_items().await, 1);
    let (_, json) = app.request("GET", "/api/items", Some(&token), None).await;
    assert_eq!(json["data"]["items"][0]["id"], keeper);

    // The deleted subtree's blob directory holds only the keeper
    let blobs = std::fs::read_dir(&app.config.storage.blob_root)
        .unwrap()
        .count();
    assert_eq!(blobs, 1);
}

#[tokio::test]
async fn test_foreign_item_mutations_are_forbidden() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let id = app.upload_file(&alice, "mine.txt", b"mine", None).await;

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/items/{id}"),
            Some(&bob),
            Some(json!({ "name": "stolen" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request("DELETE", &format!("/api/items/{id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/items/{id}/privacy"),
            Some(&bob),
            Some(json!({ "isPrivate": false })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request_raw(
            "GET",
            &format!("/api/items/{id}/download"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An id that exists for nobody is NotFound, not Forbidden
    let (status, _) = app
        .request("DELETE", "/api/items/987654", Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_folder_download_is_full_zip() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let root = app.create_folder(&token, "bundle", None).await;
    let sub = app.create_folder(&token, "nested", Some(root)).await;
    app.upload_file(&token, "a.txt", b"alpha", Some(root)).await;
    let secret = app.upload_file(&token, "b.txt", b"beta", Some(sub)).await;
    // Even a private file shows up in the owner's own archive
    app.set_privacy(&token, secret, true).await;

    let (status, headers, body) = app
        .request_raw(
            "GET",
            &format!("/api/items/{root}/download"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/zip");

    let cursor = std::io::Cursor::new(body.to_vec());
    let mut archive = zip::ZipArchive::new(cursor).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    assert!(names.contains(&"a.txt".to_string()));
    assert!(names.contains(&"nested/".to_string()));
    assert!(names.contains(&"nested/b.txt".to_string()));
}
