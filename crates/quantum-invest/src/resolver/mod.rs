//! Rate resolution and the tier grid view

pub mod conversion;
pub mod engine;
pub mod grid;

pub use engine::RateResolver;
pub use grid::TierGrid;
