pub mod allanime;
pub mod covers;
pub mod traits;

pub use allanime::{AllAnimeClient, CatalogError};
pub use covers::HttpCoverSource;
pub use traits::{CatalogService, CoverSource};
