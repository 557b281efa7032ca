//! End-of-term summaries with interest income tax

use super::accumulation::{round_half_up, AccumulationSeries};
use serde::{Deserialize, Serialize};

/// Interest split into tax and take-home portions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub interest_before_tax: f64,
    pub tax_amount: f64,
    pub interest_after_tax: f64,
}

impl TaxBreakdown {
    /// Withhold `tax_rate` from `interest`; both portions are rounded independently
    pub fn withhold(interest: f64, tax_rate: f64) -> Self {
        Self {
            interest_before_tax: interest,
            tax_amount: round_half_up(interest * tax_rate),
            interest_after_tax: round_half_up(interest * (1.0 - tax_rate)),
        }
    }
}

/// Maturity figures for an accumulation series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub months: u32,
    pub monthly_contribution: f64,
    pub principal: f64,
    #[serde(flatten)]
    pub tax: TaxBreakdown,
    pub total: f64,
    pub total_after_tax: f64,
}

impl SeriesSummary {
    /// Summarise the final point of `series`; an empty series summarises to zeros
    pub fn from_series(series: &AccumulationSeries, tax_rate: f64) -> Self {
        let Some(last) = series.last() else {
            return Self::default();
        };
        let tax = TaxBreakdown::withhold(last.interest, tax_rate);

        Self {
            months: last.month,
            monthly_contribution: series.monthly_contribution(),
            principal: last.principal,
            tax,
            total: last.total,
            total_after_tax: last.principal + tax.interest_after_tax,
        }
    }

    pub fn interest_before_tax(&self) -> f64 {
        self.tax.interest_before_tax
    }

    pub fn interest_after_tax(&self) -> f64 {
        self.tax.interest_after_tax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INTEREST_TAX_RATE;
    use crate::product::{ProductDescriptor, ProductKind};
    use crate::simulation::accumulate;
    use approx::assert_relative_eq;

    #[test]
    fn test_withhold() {
        let tax = TaxBreakdown::withhold(130_000.0, INTEREST_TAX_RATE);
        assert_relative_eq!(tax.tax_amount, 20_020.0);
        assert_relative_eq!(tax.interest_after_tax, 109_980.0);
    }

    #[test]
    fn test_summary_of_series() {
        let product = ProductDescriptor::new("S1", ProductKind::Saving)
            .with_term("12")
            .with_rate("4.0");
        let series = accumulate(&product, Some(500_000.0));
        let summary = SeriesSummary::from_series(&series, INTEREST_TAX_RATE);

        assert_eq!(summary.months, 12);
        assert_eq!(summary.monthly_contribution, 500_000.0);
        assert_eq!(summary.principal, 6_000_000.0);
        assert_relative_eq!(summary.interest_before_tax(), 130_000.0);
        assert_relative_eq!(summary.interest_after_tax(), 109_980.0);
        assert_relative_eq!(summary.total, 6_130_000.0);
        assert_relative_eq!(summary.total_after_tax, 6_109_980.0);
    }

    #[test]
    fn test_empty_series_summary() {
        let summary = SeriesSummary::from_series(&AccumulationSeries::empty(), INTEREST_TAX_RATE);
        assert_eq!(summary, SeriesSummary::default());
    }

    #[test]
    fn test_zero_tax_rate_keeps_interest() {
        let tax = TaxBreakdown::withhold(12_345.0, 0.0);
        assert_eq!(tax.tax_amount, 0.0);
        assert_eq!(tax.interest_after_tax, 12_345.0);
    }
}
