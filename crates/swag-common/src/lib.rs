pub mod data;
pub mod error;
pub mod error_mapping;
pub mod locator;

pub use error::DriverError;
pub use locator::{Locator, LocatorParseError};
