//! Fixture data for the Swag Labs demo shop: URLs, accounts, expected
//! products, page patterns and element selectors.

// ============================
// Application URLs
// ============================
pub mod urls {
    pub const LOGIN: &str = "https://www.saucedemo.com/";
    pub const INVENTORY: &str = "https://www.saucedemo.com/inventory.html";
    pub const BASE_URL: &str = "https://www.saucedemo.com";
}

// ============================
// Page URL patterns
// ============================
pub mod patterns {
    pub const INVENTORY_PAGE: &str = "/inventory.html";
    /// Any of these in the URL means a product detail page.
    pub const PRODUCT_DETAIL_PAGE: &[&str] = &["inventory-item.html", "?id="];
}

pub mod titles {
    pub const LOGIN: &str = "Swag Labs";
    pub const INVENTORY: &str = "Swag Labs";
    pub const PRODUCT_DETAIL: &str = "Swag Labs";
}

/// Substrings looked for in login error banners.
pub mod error_patterns {
    pub const LOCKED_OUT: &str = "locked out";
    pub const USERNAME_REQUIRED: &str = "username is required";
    pub const PASSWORD_REQUIRED: &str = "password is required";
    pub const NO_MATCH: &str = "do not match any user";
}

// ============================
// Login test data
// ============================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginErrorCase {
    pub case: &'static str,
    pub username: &'static str,
    pub password: &'static str,
    /// Full banner text shown for this input.
    pub expected_error: Option<&'static str>,
    /// Fragment the banner must contain, checked separately from the full text.
    pub error_contains: Option<&'static str>,
    pub should_succeed: bool,
}

pub const LOGIN_ERRORS: &[LoginErrorCase] = &[
    LoginErrorCase {
        case: "empty_username",
        username: "",
        password: "secret_sauce",
        expected_error: Some("Epic sadface: Username is required"),
        error_contains: None,
        should_succeed: false,
    },
    LoginErrorCase {
        case: "empty_password",
        username: "standard_user",
        password: "",
        expected_error: Some("Epic sadface: Password is required"),
        error_contains: None,
        should_succeed: false,
    },
    LoginErrorCase {
        case: "invalid_user",
        username: "wrong_user",
        password: "wrong_pass",
        expected_error: Some(
            "Epic sadface: Username and password do not match any user in this service",
        ),
        error_contains: None,
        should_succeed: false,
    },
    LoginErrorCase {
        case: "locked_out_user",
        username: "locked_out_user",
        password: "secret_sauce",
        expected_error: Some("Epic sadface: Sorry, this user has been locked out."),
        error_contains: Some(error_patterns::LOCKED_OUT),
        should_succeed: false,
    },
    LoginErrorCase {
        case: "special_char_user",
        username: "!@#$%^",
        password: "secret_sauce",
        expected_error: Some(
            "Epic sadface: Username and password do not match any user in this service",
        ),
        error_contains: None,
        should_succeed: false,
    },
    LoginErrorCase {
        case: "valid_user",
        username: "standard_user",
        password: "secret_sauce",
        expected_error: None,
        error_contains: None,
        should_succeed: true,
    },
];

// ============================
// User accounts
// ============================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAccount {
    pub kind: &'static str,
    pub username: &'static str,
    pub password: &'static str,
    pub should_fail: bool,
}

pub const USERS: &[UserAccount] = &[
    UserAccount {
        kind: "standard",
        username: "standard_user",
        password: "secret_sauce",
        should_fail: false,
    },
    UserAccount {
        kind: "locked",
        username: "locked_out_user",
        password: "secret_sauce",
        should_fail: true,
    },
    UserAccount {
        kind: "problem",
        username: "problem_user",
        password: "secret_sauce",
        should_fail: false,
    },
    UserAccount {
        kind: "performance",
        username: "performance_glitch_user",
        password: "secret_sauce",
        should_fail: false,
    },
    UserAccount {
        kind: "error",
        username: "error_user",
        password: "secret_sauce",
        should_fail: false,
    },
    UserAccount {
        kind: "visual",
        username: "visual_user",
        password: "secret_sauce",
        should_fail: false,
    },
];

pub fn user(kind: &str) -> Option<&'static UserAccount> {
    USERS.iter().find(|u| u.kind == kind)
}

/// The account the logged-in fixture signs in with.
pub fn standard_user() -> &'static UserAccount {
    &USERS[0]
}

// ============================
// Products
// ============================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub key: &'static str,
    pub name: &'static str,
    pub price: &'static str,
}

/// Expected inventory, in page order.
pub const PRODUCTS: &[Product] = &[
    Product {
        key: "backpack",
        name: "Sauce Labs Backpack",
        price: "$29.99",
    },
    Product {
        key: "bike_light",
        name: "Sauce Labs Bike Light",
        price: "$9.99",
    },
    Product {
        key: "bolt_tshirt",
        name: "Sauce Labs Bolt T-Shirt",
        price: "$15.99",
    },
    Product {
        key: "fleece_jacket",
        name: "Sauce Labs Fleece Jacket",
        price: "$49.99",
    },
    Product {
        key: "onesie",
        name: "Sauce Labs Onesie",
        price: "$7.99",
    },
    Product {
        key: "red_tshirt",
        name: "Test.allTheThings() T-Shirt (Red)",
        price: "$15.99",
    },
];

pub const NAVIGATION_TEST_PRODUCT: &str = "backpack";
pub const DEFAULT_PRODUCT_COUNT: usize = 6;

pub fn product(key: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.key == key)
}

// ============================
// Element selectors, by page
// ============================
pub mod selectors {
    pub mod login {
        use crate::locator::Locator;

        pub fn username_field() -> Locator {
            Locator::id("user-name")
        }

        pub fn password_field() -> Locator {
            Locator::id("password")
        }

        pub fn login_button() -> Locator {
            Locator::id("login-button")
        }

        pub fn error_message() -> Locator {
            Locator::css("[data-test='error']")
        }

        pub fn error_close_button() -> Locator {
            Locator::class_name("error-button")
        }
    }

    pub mod inventory {
        use crate::locator::Locator;

        pub fn product_items() -> Locator {
            Locator::class_name("inventory_item")
        }

        pub fn product_name() -> Locator {
            Locator::class_name("inventory_item_name")
        }

        pub fn product_price() -> Locator {
            Locator::class_name("inventory_item_price")
        }

        pub fn product_image() -> Locator {
            Locator::css(".inventory_item_img img")
        }

        pub fn add_to_cart_button() -> Locator {
            Locator::css("button.btn_inventory")
        }

        pub fn shopping_cart_badge() -> Locator {
            Locator::class_name("shopping_cart_badge")
        }
    }

    pub mod detail {
        use crate::locator::Locator;

        pub fn product_name() -> Locator {
            Locator::class_name("inventory_details_name")
        }

        pub fn product_price() -> Locator {
            Locator::class_name("inventory_details_price")
        }

        pub fn product_image() -> Locator {
            Locator::css(".inventory_details_img")
        }

        pub fn back_button() -> Locator {
            Locator::id("back-to-products")
        }
    }

    pub mod common {
        use crate::locator::Locator;

        pub fn title() -> Locator {
            Locator::tag_name("title")
        }

        pub fn header() -> Locator {
            Locator::css(".header_container")
        }
    }
}
