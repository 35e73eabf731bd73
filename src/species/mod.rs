//! Species information: curated catalog, metadata asset and resolution.

pub mod catalog;
mod metadata;
mod record;
mod resolver;

pub use metadata::{MetadataTable, invalidate_metadata, load_metadata, read_metadata};
pub use record::SpeciesRecord;
pub use resolver::{Resolution, ResolutionSource, SpeciesResolver};
