//! Product descriptors and catalog loading

mod data;
pub mod loader;

pub use data::{ProductDescriptor, ProductKind, RawNumber, SimulationHint, MAX_TERM_MONTHS};
pub use loader::{load_catalog, load_catalog_csv, load_catalog_json, Catalog};
