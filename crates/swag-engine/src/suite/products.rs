use crate::config::SuiteConfig;
use crate::diagnostic::capture_diagnostic;
use crate::driver::Driver;
use crate::ensure_case;
use crate::pages::{
    ProductCard, all_products, click_product_by_name, go_back_to_products,
    is_on_inventory_page, is_on_product_detail_page, product_details, verify_product_exists,
};
use crate::retry::ClickPolicy;
use crate::runner::{CaseFailure, TestCase};
use crate::wait::{TitleIs, wait_until};
use async_trait::async_trait;
use swag_common::data::{PRODUCTS, Product, titles};
use tokio::time::sleep;
use tracing::info;

/// Inventory checks and detail-page navigation for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductScenario {
    pub product: Product,
    /// Also assert the size of the listing. Set on the first scenario only.
    pub check_count: bool,
}

pub fn product_scenarios() -> Vec<ProductScenario> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, product)| ProductScenario {
            product: *product,
            check_count: i == 0,
        })
        .collect()
}

#[async_trait]
impl TestCase for ProductScenario {
    fn name(&self) -> String {
        format!("test_modular_product_workflow[{}]", self.product.key)
    }

    fn needs_login(&self) -> bool {
        true
    }

    async fn run(&self, driver: &mut dyn Driver, config: &SuiteConfig) -> Result<(), CaseFailure> {
        let timeouts = &config.timeouts;
        let Product { key, name, price } = self.product;

        if !is_on_inventory_page(driver).await {
            driver.navigate(&config.urls.inventory).await?;
            sleep(timeouts.medium_sleep()).await;
        }
        wait_until(
            driver,
            &TitleIs(titles::INVENTORY.to_string()),
            timeouts.short_wait(),
        )
        .await?;

        let products = all_products(driver, timeouts).await;
        if self.check_count {
            let expected = config.execution.product_count;
            ensure_case!(
                products.len() == expected,
                "Product count mismatch. Expected {}, found {}",
                expected,
                products.len()
            );
        }

        ensure_case!(
            verify_product_exists(driver, timeouts, name, price).await,
            "Product not found: {} - {}",
            name,
            price
        );

        let card = products.iter().find(|p| p.name == name);
        let Some(card) = card else {
            return Err(CaseFailure::new(format!("Product element not found: {}", name)));
        };
        check_card_elements(driver, card).await?;

        ensure_case!(
            click_product_by_name(driver, timeouts, name, ClickPolicy::from_config(config)).await,
            "Failed to click product: {}",
            name
        );
        sleep(timeouts.long_sleep()).await;

        ensure_case!(
            is_on_product_detail_page(driver).await,
            "Not on product detail page: {}",
            name
        );

        let Some(details) = product_details(driver).await else {
            return Err(CaseFailure::new(format!("Product details not found: {}", name)));
        };
        ensure_case!(
            details.name == name,
            "Name mismatch. Expected {}, got {}",
            name,
            details.name
        );
        ensure_case!(
            details.price == price,
            "Price mismatch. Expected {}, got {}",
            price,
            details.price
        );

        capture_diagnostic(
            driver,
            &config.execution.screenshot_dir,
            &format!("product_{}", key),
            "PASS",
        )
        .await;

        let back = go_back_to_products(driver, timeouts.medium_sleep()).await;
        ensure_case!(
            back && is_on_inventory_page(driver).await,
            "Failed to return to inventory page from product: {}",
            name
        );

        info!(product = key, "Product workflow verified");
        Ok(())
    }
}

async fn check_card_elements(
    driver: &mut dyn Driver,
    card: &ProductCard,
) -> Result<(), CaseFailure> {
    let image_shown = driver.is_displayed(card.image).await?;
    let image_src = driver.attribute(card.image, "src").await?;
    ensure_case!(
        image_shown && image_src.is_some_and(|src| !src.is_empty()),
        "Product image missing or not visible: {}",
        card.name
    );

    let button_ok =
        driver.is_displayed(card.add_button).await? && driver.is_enabled(card.add_button).await?;
    ensure_case!(
        button_ok,
        "Add to Cart button missing or disabled: {}",
        card.name
    );

    let link_ok =
        driver.is_displayed(card.name_link).await? && driver.is_enabled(card.name_link).await?;
    ensure_case!(
        link_ok,
        "Product name link missing or disabled: {}",
        card.name
    );
    Ok(())
}
