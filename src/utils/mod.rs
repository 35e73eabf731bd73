//! Shared utilities.

pub mod cache;
pub mod labels;

pub use cache::AssetCache;
