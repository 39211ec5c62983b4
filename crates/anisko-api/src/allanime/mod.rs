pub mod client;
pub mod error;
pub mod types;

pub use client::AllAnimeClient;
pub use error::CatalogError;
