//! Per-session owner of a selection and its simulation settings
//!
//! Each UI session gets its own `Session`; nothing is shared between them.
//!
//! # Example
//! ```ignore
//! let mut session = Session::new(SimulationConfig::default());
//! session.select(product);
//!
//! for sim in session.simulate_selected(Some(500_000.0)) {
//!     println!("{}: {}", sim.product.code, sim.summary.total);
//! }
//! ```

use crate::config::SimulationConfig;
use crate::error::StoreResult;
use crate::product::{ProductDescriptor, ProductKind};
use crate::selection::{BlobStore, SelectionSet};
use crate::simulation::{accumulate_with, project_deposit, AccumulationSeries, DepositProjection, SeriesSummary};
use rayon::prelude::*;
use serde::Serialize;

/// Series and maturity summary for one saving product
#[derive(Debug, Clone, Serialize)]
pub struct ProductSimulation {
    pub product: ProductDescriptor,
    pub series: AccumulationSeries,
    pub summary: SeriesSummary,
}

/// Lump-sum projection for one deposit product
#[derive(Debug, Clone, Serialize)]
pub struct DepositSimulation {
    pub product: ProductDescriptor,
    pub projection: DepositProjection,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    selection: SelectionSet,
    config: SimulationConfig,
}

impl Session {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            selection: SelectionSet::new(),
            config,
        }
    }

    /// Start from an existing selection (e.g. one restored from storage)
    pub fn with_selection(config: SimulationConfig, selection: SelectionSet) -> Self {
        Self { selection, config }
    }

    /// Restore the selection stored under `key`
    pub fn restore<S: BlobStore + ?Sized>(config: SimulationConfig, store: &S, key: &str) -> StoreResult<Self> {
        Ok(Self::with_selection(config, SelectionSet::load_from(store, key)?))
    }

    /// Mirror the current selection into `store`
    pub fn save<S: BlobStore + ?Sized>(&self, store: &mut S, key: &str) -> StoreResult<()> {
        self.selection.save_to(store, key)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn select(&mut self, product: ProductDescriptor) -> bool {
        self.selection.add(product)
    }

    pub fn deselect(&mut self, code: &str, kind: ProductKind) -> bool {
        self.selection.remove(code, kind)
    }

    pub fn is_selected(&self, code: &str, kind: ProductKind) -> bool {
        self.selection.contains(code, kind)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear()
    }

    pub fn selected_savings(&self) -> Vec<&ProductDescriptor> {
        self.selection.selected_savings()
    }

    pub fn selected_deposits(&self) -> Vec<&ProductDescriptor> {
        self.selection.selected_deposits()
    }

    /// Accumulate one product under this session's settings
    pub fn simulate(&self, product: &ProductDescriptor, monthly_contribution: Option<f64>) -> ProductSimulation {
        let series = accumulate_with(&self.config, product, monthly_contribution);
        let summary = SeriesSummary::from_series(&series, self.config.tax_rate);
        ProductSimulation {
            product: product.clone(),
            series,
            summary,
        }
    }

    /// Accumulate every selected saving product, in selection order
    pub fn simulate_selected(&self, monthly_contribution: Option<f64>) -> Vec<ProductSimulation> {
        self.selected_savings()
            .par_iter()
            .map(|product| self.simulate(product, monthly_contribution))
            .collect()
    }

    /// Project `amount` into every selected deposit, in selection order
    pub fn project_selected_deposits(&self, amount: f64) -> Vec<DepositSimulation> {
        self.selected_deposits()
            .into_iter()
            .filter_map(|product| {
                project_deposit(&self.config, product, amount).map(|projection| DepositSimulation {
                    product: product.clone(),
                    projection,
                })
            })
            .collect()
    }
}
