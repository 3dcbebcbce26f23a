// Adapters layer: concrete implementations for external systems (storage, http, catalog file, export).

pub mod catalog;
pub mod export;
pub mod http;
pub mod storage;
