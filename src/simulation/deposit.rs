//! Lump-sum projection for time deposits

use super::summary::TaxBreakdown;
use crate::config::SimulationConfig;
use crate::product::{ProductDescriptor, ProductKind};
use serde::{Deserialize, Serialize};

/// Maturity figures for a lump sum placed in a deposit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositProjection {
    pub months: u32,
    pub principal: f64,
    #[serde(flatten)]
    pub tax: TaxBreakdown,
    pub total: f64,
    pub total_after_tax: f64,
}

/// Project simple interest on `amount` held for the deposit's term
///
/// Interest is truncated to whole currency units. Returns `None` for
/// products that are not deposits.
pub fn project_deposit(
    config: &SimulationConfig,
    product: &ProductDescriptor,
    amount: f64,
) -> Option<DepositProjection> {
    if product.kind != ProductKind::Deposit {
        return None;
    }

    let principal = if amount.is_finite() { amount } else { 0.0 };
    let months = product.term_months_or(config.default_term_months);
    let rate = product.annual_rate_percent() / 100.0;

    let interest = (principal * rate * (months as f64 / 12.0)).trunc();
    let tax = TaxBreakdown::withhold(interest, config.tax_rate);

    Some(DepositProjection {
        months,
        principal,
        tax,
        total: principal + interest,
        total_after_tax: principal + tax.interest_after_tax,
    })
}
