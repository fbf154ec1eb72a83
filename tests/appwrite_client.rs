use bytes::Bytes;
use httpmock::prelude::*;
use megablog::{
    application::repos::{BackendError, CreatePostParams, FileStore, PostsRepo, UpdatePostParams},
    config::AppwriteSettings,
    domain::{posts::ImageUpload, types::PostStatus},
    infra::appwrite::AppwriteClient,
};
use serde_json::json;
use url::Url;

const DOCUMENTS: &str = "/v1/databases/blog/collections/articles/documents";
const FILES: &str = "/v1/storage/buckets/images/files";

fn client(server: &MockServer) -> AppwriteClient {
    let settings = AppwriteSettings {
        endpoint: Url::parse(&server.url("/v1")).expect("mock endpoint"),
        project_id: "megablog".into(),
        api_key: "secret".into(),
        database_id: "blog".into(),
        collection_id: "articles".into(),
        bucket_id: "images".into(),
    };
    AppwriteClient::new(&settings).expect("client builds")
}

fn document(id: &str, title: &str, image: &str) -> serde_json::Value {
    json!({
        "$id": id,
        "$collectionId": "articles",
        "$databaseId": "blog",
        "title": title,
        "content": "<p>body</p>",
        "status": "active",
        "featuredImage": image,
        "userId": "user-1"
    })
}

#[tokio::test]
async fn create_post_sends_slug_as_document_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(DOCUMENTS)
                .header("X-Appwrite-Project", "megablog")
                .header("X-Appwrite-Key", "secret")
                .json_body(json!({
                    "documentId": "my-first-post-",
                    "data": {
                        "title": "My First Post!",
                        "content": "<p>body</p>",
                        "featuredImage": "file-1",
                        "status": "active",
                        "userId": "user-1"
                    }
                }));
            then.status(201)
                .json_body(document("my-first-post-", "My First Post!", "file-1"));
        })
        .await;

    let post = client(&server)
        .create_post(CreatePostParams {
            slug: "my-first-post-".into(),
            title: "My First Post!".into(),
            content: "<p>body</p>".into(),
            status: PostStatus::Active,
            featured_image: "file-1".into(),
            user_id: "user-1".into(),
        })
        .await
        .expect("create succeeds")
        .expect("document returned");

    mock.assert_async().await;
    assert_eq!(post.id, "my-first-post-");
    assert_eq!(post.featured_image, "file-1");
}

#[tokio::test]
async fn create_conflict_surfaces_backend_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(DOCUMENTS);
            then.status(409).json_body(json!({
                "message": "Document with the requested ID already exists.",
                "code": 409,
                "type": "document_already_exists"
            }));
        })
        .await;

    let err = client(&server)
        .create_post(CreatePostParams {
            slug: "dup".into(),
            title: "Dup".into(),
            content: String::new(),
            status: PostStatus::Active,
            featured_image: "file-1".into(),
            user_id: "user-1".into(),
        })
        .await
        .expect_err("conflict");

    assert!(matches!(err, BackendError::Rejected { status: 409, .. }));
    assert_eq!(
        err.public_message().as_deref(),
        Some("Document with the requested ID already exists.")
    );
}

#[tokio::test]
async fn update_patches_without_image_and_maps_missing_to_none() {
    let server = MockServer::start_async().await;
    let updated = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path(format!("{DOCUMENTS}/hello-world"))
                .json_body(json!({
                    "data": { "title": "Hello", "content": "<p>x</p>", "status": "inactive" }
                }));
            then.status(200)
                .json_body(document("hello-world", "Hello", "file-old"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path(format!("{DOCUMENTS}/gone"));
            then.status(404).json_body(json!({
                "message": "Document with the requested ID could not be found.",
                "code": 404,
                "type": "document_not_found"
            }));
        })
        .await;

    let appwrite = client(&server);
    let params = UpdatePostParams {
        title: "Hello".into(),
        content: "<p>x</p>".into(),
        status: PostStatus::Inactive,
        featured_image: None,
    };

    let post = appwrite
        .update_post("hello-world", params.clone())
        .await
        .expect("update succeeds");
    updated.assert_async().await;
    assert_eq!(post.map(|post| post.featured_image).as_deref(), Some("file-old"));

    let missing = appwrite
        .update_post("gone", params)
        .await
        .expect("missing is not an error");
    assert!(missing.is_none());
}

#[tokio::test]
async fn find_post_returns_none_for_missing_documents() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{DOCUMENTS}/hello-world"));
            then.status(200)
                .json_body(document("hello-world", "Hello World", "file-9"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{DOCUMENTS}/missing"));
            then.status(404).json_body(json!({ "message": "not found", "code": 404 }));
        })
        .await;

    let appwrite = client(&server);
    let post = appwrite
        .find_post("hello-world")
        .await
        .expect("lookup succeeds")
        .expect("post exists");
    assert_eq!(post.title, "Hello World");
    assert!(appwrite.find_post("missing").await.expect("lookup").is_none());
}

#[tokio::test]
async fn upload_and_delete_files() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(FILES)
                .header("X-Appwrite-Project", "megablog")
                .body_includes("unique()")
                .body_includes("cover.png");
            then.status(201).json_body(json!({
                "$id": "file-42",
                "bucketId": "images",
                "name": "cover.png",
                "mimeType": "image/png",
                "sizeOriginal": 9
            }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("{FILES}/file-41"));
            then.status(204);
        })
        .await;

    let appwrite = client(&server);
    let file = appwrite
        .upload_file(ImageUpload::new(
            "cover.png",
            Some("image/png"),
            Bytes::from_static(b"\x89PNG fake"),
        ))
        .await
        .expect("upload succeeds");
    upload.assert_async().await;
    assert_eq!(file.id, "file-42");
    assert_eq!(file.name, "cover.png");

    appwrite.delete_file("file-41").await.expect("delete succeeds");
    delete.assert_async().await;
}

#[tokio::test]
async fn upload_failure_is_rejected_with_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(FILES);
            then.status(400).json_body(json!({
                "message": "File extension not allowed",
                "code": 400,
                "type": "storage_file_type_unsupported"
            }));
        })
        .await;

    let err = client(&server)
        .upload_file(ImageUpload::new(
            "cover.png",
            Some("image/png"),
            Bytes::from_static(b"png"),
        ))
        .await
        .expect_err("rejected");
    assert_eq!(err.to_string(), "File extension not allowed");
}

#[test]
fn preview_url_includes_project() {
    let settings = AppwriteSettings {
        endpoint: Url::parse("https://cloud.appwrite.io/v1").expect("endpoint"),
        project_id: "megablog".into(),
        api_key: "secret".into(),
        database_id: "blog".into(),
        collection_id: "articles".into(),
        bucket_id: "images".into(),
    };
    let client = AppwriteClient::new(&settings).expect("client builds");
    let url = client.file_preview_url("file-1").expect("preview url");
    assert_eq!(
        url.as_str(),
        "https://cloud.appwrite.io/v1/storage/buckets/images/files/file-1/preview?project=megablog"
    );
}
