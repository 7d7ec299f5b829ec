mod common;

use common::{FakeShop, Page, ShopOptions};
use swag_engine::diagnostic::capture_diagnostic;
use swag_engine::driver::Driver;
use tempfile::tempdir;

#[tokio::test]
async fn test_capture_creates_directory_and_png() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("screenshots").join("nested");
    let mut shop = FakeShop::launched_on(Page::Login).await;

    let path = capture_diagnostic(&mut shop, &dir, "test_login_modular[valid_user]", "FAIL")
        .await
        .expect("screenshot should be written");

    assert!(dir.is_dir());
    assert!(path.starts_with(&dir));
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("test_login_modular_valid_user__FAIL_"));
    assert!(file_name.ends_with(".png"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_capture_on_closed_session_returns_none() {
    let tmp = tempdir().unwrap();
    let mut shop = FakeShop::launched_on(Page::Login).await;
    shop.close().await.unwrap();

    let path = capture_diagnostic(&mut shop, tmp.path(), "closed", "TEARDOWN_FAIL").await;

    assert!(path.is_none());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_capture_failure_is_swallowed() {
    let tmp = tempdir().unwrap();
    let mut shop = FakeShop::launched_on(Page::Login).await;
    shop.state().options = ShopOptions {
        screenshot_fails: true,
        ..Default::default()
    };

    assert!(
        capture_diagnostic(&mut shop, tmp.path(), "broken", "FAIL")
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_unwritable_directory_returns_none() {
    let tmp = tempdir().unwrap();
    let blocker = tmp.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let mut shop = FakeShop::launched_on(Page::Login).await;

    let path = capture_diagnostic(&mut shop, &blocker.join("shots"), "x", "FAIL").await;

    assert!(path.is_none());
}

#[tokio::test]
async fn test_repeated_captures_do_not_overwrite() {
    let tmp = tempdir().unwrap();
    let mut shop = FakeShop::launched_on(Page::Inventory).await;

    let first = capture_diagnostic(&mut shop, tmp.path(), "same", "PASS").await;
    let second = capture_diagnostic(&mut shop, tmp.path(), "same", "PASS").await;

    assert_ne!(first.unwrap(), second.unwrap());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
}
