//! Swag Labs page operations built on the polling layer.
//!
//! Every helper takes the session explicitly. Lookups that are expected to
//! miss report `None`/`false` rather than an error.

pub mod common;
pub mod detail;
pub mod inventory;
pub mod login;

pub use common::{
    is_element_present, refresh_page_and_wait, safe_find_element, url_matches_any,
    wait_for_element,
};
pub use detail::{ProductDetails, go_back_to_products, is_on_product_detail_page, product_details};
pub use inventory::{
    ProductCard, ProductLink, all_products, click_product_by_name, is_on_inventory_page,
    verify_product_exists,
};
pub use login::{close_error_message, error_message, is_logged_in, login};
