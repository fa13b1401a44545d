pub mod aggregation;
pub mod diversity;
pub mod preferences;
pub mod recommendations;
pub mod stats;
pub mod taxonomy;

pub use taxonomy::Taxonomy;
