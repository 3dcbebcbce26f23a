pub mod aggregate;
pub mod cart;
pub mod cart_query;
pub mod display;
pub mod drag;
pub mod filter;
pub mod loader;
pub mod notice;
pub mod reconcile;
pub mod session;

pub use crate::domain::model::{CatalogEntry, CourseId, CourseRecord, RatingRecord};
pub use crate::domain::ports::{ConfigProvider, RatingFetcher, Storage};
pub use crate::utils::error::Result;
