use crate::config::TimeoutsConfig;
use crate::driver::{Driver, DriverError, ElementId};
use crate::retry::{ClickPolicy, ClickTarget, retrying_click};
use crate::wait::{AllElementsPresent, wait_until};
use async_trait::async_trait;
use swag_common::data::{patterns, selectors};
use tokio::time::sleep;
use tracing::{info, warn};

/// One product tile on the inventory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    /// Position in the listing, starting at 1.
    pub index: usize,
    pub name: String,
    pub price: String,
    pub image: ElementId,
    pub add_button: ElementId,
    pub name_link: ElementId,
}

/// Reads every product tile on the inventory page.
///
/// Tiles that cannot be read are skipped. Any other failure, including no
/// tiles appearing within the long wait, yields an empty list.
pub async fn all_products(
    driver: &mut dyn Driver,
    timeouts: &TimeoutsConfig,
) -> Vec<ProductCard> {
    let listing = AllElementsPresent(selectors::inventory::product_items());
    if let Err(e) = wait_until(driver, &listing, timeouts.long_wait()).await {
        warn!(error = %e, "Error getting products");
        return Vec::new();
    }
    sleep(timeouts.short_sleep()).await;

    let items = match driver.find_all(&selectors::inventory::product_items()).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Error getting products");
            return Vec::new();
        }
    };
    info!(count = items.len(), "Found product items");

    let mut products = Vec::with_capacity(items.len());
    for (offset, item) in items.into_iter().enumerate() {
        let index = offset + 1;
        match read_card(driver, item, index).await {
            Ok(card) => products.push(card),
            Err(e) => warn!(index, error = %e, "Could not parse product"),
        }
    }
    products
}

async fn read_card(
    driver: &mut dyn Driver,
    item: ElementId,
    index: usize,
) -> Result<ProductCard, DriverError> {
    let name_link = driver
        .find_within(item, &selectors::inventory::product_name())
        .await?;
    let name = driver.text(name_link).await?;
    let price_element = driver
        .find_within(item, &selectors::inventory::product_price())
        .await?;
    let price = driver.text(price_element).await?;
    let image = driver
        .find_within(item, &selectors::inventory::product_image())
        .await?;
    let add_button = driver
        .find_within(item, &selectors::inventory::add_to_cart_button())
        .await?;

    Ok(ProductCard {
        index,
        name,
        price,
        image,
        add_button,
        name_link,
    })
}

/// True if a product with exactly this name and price is listed.
pub async fn verify_product_exists(
    driver: &mut dyn Driver,
    timeouts: &TimeoutsConfig,
    name: &str,
    price: &str,
) -> bool {
    let found = all_products(driver, timeouts)
        .await
        .iter()
        .any(|p| p.name == name && p.price == price);
    if found {
        info!(name, price, "Product verified");
    } else {
        warn!(name, price, "Product not found");
    }
    found
}

/// The name link of a product, re-read from the listing on every lookup.
pub struct ProductLink<'a> {
    pub name: &'a str,
    pub timeouts: &'a TimeoutsConfig,
}

#[async_trait]
impl ClickTarget for ProductLink<'_> {
    fn describe(&self) -> String {
        format!("product '{}'", self.name)
    }

    async fn locate(&self, driver: &mut dyn Driver) -> Result<ElementId, DriverError> {
        all_products(driver, self.timeouts)
            .await
            .into_iter()
            .find(|p| p.name == self.name)
            .map(|p| p.name_link)
            .ok_or_else(|| DriverError::ElementNotFound {
                locator: self.describe(),
            })
    }
}

/// Opens a product's detail page by clicking its name, with retries.
pub async fn click_product_by_name(
    driver: &mut dyn Driver,
    timeouts: &TimeoutsConfig,
    name: &str,
    policy: ClickPolicy,
) -> bool {
    let target = ProductLink { name, timeouts };
    retrying_click(driver, &target, policy).await
}

pub async fn is_on_inventory_page(driver: &mut dyn Driver) -> bool {
    let url = driver.current_url().await.unwrap_or_default();
    let on_inventory = url.contains(patterns::INVENTORY_PAGE);
    info!(on_inventory, url = %url, "Checked for inventory page");
    on_inventory
}
