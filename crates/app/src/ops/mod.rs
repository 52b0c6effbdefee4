pub mod analyze;
pub mod entries;
pub mod remap;

pub use analyze::Analyze;
pub use entries::Entries;
pub use remap::Remap;
