//! Monthly accumulation of an installment savings product
//!
//! Simple interest on equal monthly contributions: the contribution made in
//! month k has earned interest for every month since, so after month m the
//! accrued interest is `c * m(m+1)/2 * monthly_rate`.

use crate::config::SimulationConfig;
use crate::product::ProductDescriptor;
use chrono::{Months, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

/// One month of an accumulation series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    /// Month index (1-based)
    pub month: u32,

    /// Cumulative contributions through this month
    pub principal: f64,

    /// Simple interest accrued through this month, rounded to whole units
    pub interest: f64,

    /// Principal plus interest
    pub total: f64,
}

/// A month point labelled with the calendar date its month closes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatedPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub point: MonthPoint,
}

/// Month-by-month accumulation, one point per month of the term
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccumulationSeries {
    points: Vec<MonthPoint>,
}

impl AccumulationSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[MonthPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthPoint> {
        self.points.iter()
    }

    /// Point for a 1-based month
    pub fn month(&self, month: u32) -> Option<&MonthPoint> {
        month
            .checked_sub(1)
            .and_then(|idx| self.points.get(idx as usize))
    }

    /// Final point (maturity)
    pub fn last(&self) -> Option<&MonthPoint> {
        self.points.last()
    }

    /// Contribution per month, recovered from the first point
    pub fn monthly_contribution(&self) -> f64 {
        self.points.first().map(|p| p.principal).unwrap_or(0.0)
    }

    /// Label each point with the date its month closes, counting from `start`
    ///
    /// Points whose date would overflow the calendar are dropped.
    pub fn dated_points(&self, start: NaiveDate) -> Vec<DatedPoint> {
        self.points
            .iter()
            .filter_map(|point| {
                start
                    .checked_add_months(Months::new(point.month))
                    .map(|date| DatedPoint { date, point: *point })
            })
            .collect()
    }

    pub fn into_points(self) -> Vec<MonthPoint> {
        self.points
    }
}

impl<'a> IntoIterator for &'a AccumulationSeries {
    type Item = &'a MonthPoint;
    type IntoIter = std::slice::Iter<'a, MonthPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Round half up (toward positive infinity), as browsers round for display
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn usable(amount: Option<f64>) -> Option<f64> {
    amount.filter(|a| a.is_finite() && *a != 0.0)
}

/// Pick the monthly contribution: explicit, then product hint, then config default
///
/// Zero or non-finite amounts count as unspecified.
pub fn resolve_contribution(
    config: &SimulationConfig,
    product: &ProductDescriptor,
    explicit: Option<f64>,
) -> f64 {
    usable(explicit)
        .or_else(|| usable(product.contribution_hint()))
        .unwrap_or_else(|| {
            debug!(
                "Product {}: no contribution given, using default {}",
                product.code, config.default_monthly_contribution
            );
            config.default_monthly_contribution
        })
}

/// Accumulate a saving product under the default configuration
///
/// Products that are not savings yield an empty series.
pub fn accumulate(product: &ProductDescriptor, monthly_contribution: Option<f64>) -> AccumulationSeries {
    accumulate_with(&SimulationConfig::default(), product, monthly_contribution)
}

/// Accumulate a saving product under `config`
pub fn accumulate_with(
    config: &SimulationConfig,
    product: &ProductDescriptor,
    monthly_contribution: Option<f64>,
) -> AccumulationSeries {
    if !product.is_saving() {
        return AccumulationSeries::empty();
    }

    let months = product.term_months_or(config.default_term_months);
    let monthly_rate = product.annual_rate_percent() / 100.0 / 12.0;
    let contribution = resolve_contribution(config, product, monthly_contribution);

    let points = (1..=months)
        .map(|month| {
            let m = month as f64;
            let principal = m * contribution;
            let elapsed_terms = m * (m + 1.0) / 2.0;
            let interest = round_half_up(contribution * elapsed_terms * monthly_rate);
            MonthPoint {
                month,
                principal,
                interest,
                total: principal + interest,
            }
        })
        .collect();

    AccumulationSeries { points }
}
