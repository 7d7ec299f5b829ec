use super::common::url_matches_any;
use crate::driver::{Driver, DriverError};
use std::time::Duration;
use swag_common::data::{patterns, selectors};
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    pub price: String,
}

/// Name and price shown on the product detail page.
pub async fn product_details(driver: &mut dyn Driver) -> Option<ProductDetails> {
    match read_details(driver).await {
        Ok(details) => {
            info!(name = %details.name, price = %details.price, "Product details retrieved");
            Some(details)
        }
        Err(e) => {
            warn!(error = %e, "Could not find product details on current page");
            None
        }
    }
}

async fn read_details(driver: &mut dyn Driver) -> Result<ProductDetails, DriverError> {
    let name = driver.find(&selectors::detail::product_name()).await?;
    let name = driver.text(name).await?;
    let price = driver.find(&selectors::detail::product_price()).await?;
    let price = driver.text(price).await?;
    Ok(ProductDetails { name, price })
}

/// Clicks "Back to products" and waits `settle` for the listing to load.
pub async fn go_back_to_products(driver: &mut dyn Driver, settle: Duration) -> bool {
    let clicked = match driver.find(&selectors::detail::back_button()).await {
        Ok(button) => driver.click(button).await,
        Err(e) => Err(e),
    };

    match clicked {
        Ok(()) => {
            sleep(settle).await;
            info!("Navigated back to products list");
            true
        }
        Err(e) => {
            warn!(error = %e, "Back button not available");
            false
        }
    }
}

pub async fn is_on_product_detail_page(driver: &mut dyn Driver) -> bool {
    url_matches_any(driver, patterns::PRODUCT_DETAIL_PAGE).await
}
