mod anime;
mod library;
mod profile;

pub use anime::*;
pub use library::*;
pub use profile::*;
