pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{http::HttpRatingFetcher, storage::LocalStorage};
pub use config::{AppConfig, FetchMode};
#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use core::{
    cart::Cart, filter::FilterState, loader::RatingLoad, reconcile::Catalog, session::Session,
};
pub use utils::error::{CartError, Result};
