use super::*;
use mockito::{Matcher, Server};
use reqwest::Client;
use tempfile::tempdir;

#[test]
fn object_keys_are_content_addressed() {
    let a = object_key("uploads/", b"rice", "jpg");
    let b = object_key("uploads", b"rice", "jpg");
    let c = object_key("uploads", b"soup", "jpg");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("uploads/"));
    assert!(a.ends_with(".jpg"));
    assert_eq!(a.len(), "uploads/".len() + 32 + ".jpg".len());
}

#[tokio::test]
async fn local_store_writes_file_and_returns_public_url() {
    let dir = tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path(), Some("http://localhost:8080/blobs/".into()));
    let url = store
        .put("uploads/abc.png", Bytes::from_static(b"png"), "image/png")
        .await
        .unwrap();

    assert_eq!(url, "http://localhost:8080/blobs/uploads/abc.png");
    assert_eq!(std::fs::read(dir.path().join("uploads/abc.png")).unwrap(), b"png");
}

#[tokio::test]
async fn local_store_without_base_returns_path() {
    let dir = tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path(), None);
    let locator = store
        .put("a.jpg", Bytes::from_static(b"jpg"), "image/jpeg")
        .await
        .unwrap();
    assert_eq!(locator, dir.path().join("a.jpg").display().to_string());
}

#[tokio::test]
async fn supabase_upload_returns_public_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/storage/v1/object/menu-images/uploads/abc.png")
        .match_header("x-upsert", "true")
        .match_header("content-type", "image/png")
        .match_header("authorization", "Bearer service")
        .match_body(Matcher::Exact("png-bytes".into()))
        .with_status(200)
        .with_body(r#"{"Key":"menu-images/uploads/abc.png"}"#)
        .create_async()
        .await;

    let store = SupabaseBlobStore::new(
        Client::new(),
        Some(format!("{}/", server.url())),
        Some("service".into()),
        "menu-images",
    );
    let url = store
        .put("uploads/abc.png", Bytes::from_static(b"png-bytes"), "image/png")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        url,
        format!("{}/storage/v1/object/public/menu-images/uploads/abc.png", server.url())
    );
}

#[tokio::test]
async fn supabase_without_credentials_is_a_config_error() {
    let store = SupabaseBlobStore::new(Client::new(), Some("http://x".into()), None, "b");
    let err = store
        .put("k", Bytes::new(), "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::MissingCredentials));
}

#[tokio::test]
async fn supabase_rejection_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", Matcher::Any)
        .with_status(413)
        .with_body("too large")
        .create_async()
        .await;

    let store = SupabaseBlobStore::new(Client::new(), Some(server.url()), Some("k".into()), "b");
    let err = store
        .put("big.png", Bytes::from_static(b"x"), "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, BlobError::Status { status: 413, .. }));
}
