//! Savings Simulator - accumulation simulation and product selection for deposit/saving comparison
//!
//! This library provides:
//! - Month-by-month simple-interest accumulation for installment savings
//! - Lump-sum projections for time deposits, with interest income tax
//! - A de-duplicated, insertion-ordered selection of products, split by kind
//! - Catalog loading from backend JSON payloads or CSV
//! - JSON blob persistence of the selection between runs

pub mod config;
pub mod error;
pub mod product;
pub mod selection;
pub mod session;
pub mod simulation;

// Re-export commonly used types
pub use config::SimulationConfig;
pub use error::{CatalogError, ConfigError, StoreError};
pub use product::{Catalog, ProductDescriptor, ProductKind};
pub use selection::{BlobStore, FileBlobStore, MemoryBlobStore, SelectionSet};
pub use session::{DepositSimulation, ProductSimulation, Session};
pub use simulation::{accumulate, accumulate_with, AccumulationSeries, MonthPoint, SeriesSummary};
