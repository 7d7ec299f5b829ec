mod common;

use common::{FakeShop, Page};
use std::time::Duration;
use swag_engine::Locator;
use swag_engine::data::patterns;
use swag_engine::driver::Driver;
use swag_engine::wait::{
    AllElementsPresent, ElementPresent, UrlContains, WaitConfig, WaitError, WindowCountAbove,
    satisfied_within, wait_until,
};
use tokio::time::Instant;

fn config(timeout_ms: u64) -> WaitConfig {
    WaitConfig::new(Duration::from_millis(timeout_ms), Duration::from_millis(250))
}

#[tokio::test(start_paused = true)]
async fn test_redirect_within_timeout_is_observed() {
    common::init_tracing();
    let mut shop = FakeShop::launched_on(Page::Login).await;
    shop.redirect_after(Duration::from_secs(2), Page::Inventory);

    let start = Instant::now();
    let url = wait_until(
        &mut shop,
        &UrlContains(patterns::INVENTORY_PAGE.to_string()),
        config(10_000),
    )
    .await
    .unwrap();

    let elapsed = start.elapsed();
    assert!(url.ends_with("/inventory.html"));
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed <= Duration::from_millis(2250));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_never_early_and_bounded() {
    let mut shop = FakeShop::launched_on(Page::Login).await;

    let start = Instant::now();
    let result = wait_until(
        &mut shop,
        &ElementPresent(Locator::id("does-not-exist")),
        config(3_000),
    )
    .await;

    let elapsed = start.elapsed();
    let err = result.unwrap_err();
    assert!(err.is_timeout());
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_millis(3_250));

    let WaitError::TimeoutExceeded { last_error, .. } = err;
    assert_eq!(last_error, None);
}

#[tokio::test(start_paused = true)]
async fn test_zero_timeout_evaluates_once() {
    let mut shop = FakeShop::launched_on(Page::Login).await;
    let before = shop.calls("current_url");

    let held = satisfied_within(
        &mut shop,
        &UrlContains("/inventory.html".into()),
        config(0),
    )
    .await;

    assert!(!held);
    assert_eq!(shop.calls("current_url") - before, 1);
}

#[tokio::test(start_paused = true)]
async fn test_driver_errors_count_as_not_yet_and_are_reported() {
    let mut shop = FakeShop::launched_on(Page::Login).await;
    shop.close().await.unwrap();

    let err = wait_until(&mut shop, &UrlContains("saucedemo".into()), config(1_000))
        .await
        .unwrap_err();

    let WaitError::TimeoutExceeded {
        condition,
        timeout,
        last_error,
    } = err;
    assert_eq!(condition, "URL containing 'saucedemo'");
    assert_eq!(timeout, Duration::from_secs(1));
    assert_eq!(last_error.as_deref(), Some("Session closed"));
}

#[tokio::test(start_paused = true)]
async fn test_satisfied_condition_returns_immediately() {
    let mut shop = FakeShop::launched_on(Page::Inventory).await;

    let start = Instant::now();
    let items = wait_until(
        &mut shop,
        &AllElementsPresent(Locator::class_name("inventory_item")),
        config(5_000),
    )
    .await
    .unwrap();

    assert_eq!(items.len(), 6);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_window_count_condition_waits_for_new_window() {
    let mut shop = FakeShop::launched_on(Page::Login).await;
    shop.open_window_after(Duration::from_millis(600));

    let count = wait_until(&mut shop, &WindowCountAbove(1), config(2_000))
        .await
        .unwrap();
    assert_eq!(count, 2);
}
