pub mod config;
pub mod diagnostic;
pub mod driver;
pub mod fixture;
pub mod keywords;
pub mod pages;
pub mod retry;
pub mod runner;
pub mod suite;
pub mod wait;

pub use swag_common::data;
pub use swag_common::error_mapping;
pub use swag_common::locator::Locator;
