//! Savings accumulation, deposit projection, and maturity summaries

mod accumulation;
mod deposit;
mod export;
mod summary;

pub use accumulation::{
    accumulate, accumulate_with, resolve_contribution, round_half_up, AccumulationSeries, DatedPoint,
    MonthPoint,
};
pub use deposit::{project_deposit, DepositProjection};
pub use export::SeriesCsvWriter;
pub use summary::{SeriesSummary, TaxBreakdown};
