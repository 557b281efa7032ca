//! Product descriptors matching the backend's deposit/saving payloads

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Longest term the simulator will expand into a series (100 years)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Kind of financial product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Lump-sum time deposit
    Deposit,
    /// Installment savings (monthly contributions)
    Saving,
}

impl ProductKind {
    /// Get the string representation used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Deposit => "deposit",
            ProductKind::Saving => "saving",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deposit" => Ok(ProductKind::Deposit),
            "saving" => Ok(ProductKind::Saving),
            other => Err(CatalogError::UnknownKind { kind: other.to_string() }),
        }
    }
}

/// A numeric field as the backend sends it: sometimes a number, sometimes text
///
/// Parsing is lenient and prefix-based, so `"12개월"` reads as 12 and
/// `"3.5%"` as 3.5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Integer value, truncating any fractional part
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawNumber::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            RawNumber::Number(_) => None,
            RawNumber::Text(s) => parse_leading_integer(s),
        }
    }

    /// Decimal value
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) if n.is_finite() => Some(*n),
            RawNumber::Number(_) => None,
            RawNumber::Text(s) => parse_leading_decimal(s),
        }
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        RawNumber::Number(value as f64)
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Split an optional sign off the front of `s`
fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(|b| b.is_ascii_digit()).count()
}

/// Parse the longest integer prefix of `s`, ignoring leading whitespace
fn parse_leading_integer(s: &str) -> Option<i64> {
    let (negative, rest) = split_sign(s.trim_start());
    let len = leading_digits(rest);
    if len == 0 {
        return None;
    }
    let value: i64 = rest[..len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parse the longest decimal prefix of `s` (`[sign] digits [. digits] [e [sign] digits]`)
fn parse_leading_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let (_, unsigned) = split_sign(trimmed);
    let sign_len = trimmed.len() - unsigned.len();

    let int_len = leading_digits(unsigned);
    let mut end = int_len;
    let mut frac_len = 0;
    if unsigned[end..].starts_with('.') {
        frac_len = leading_digits(&unsigned[end + 1..]);
        end += 1 + frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    let exp = &unsigned[end..];
    if exp.starts_with('e') || exp.starts_with('E') {
        let (_, exp_digits) = split_sign(&exp[1..]);
        let exp_len = leading_digits(exp_digits);
        if exp_len > 0 {
            end += exp.len() - exp_digits.len() + exp_len;
        }
    }

    let value: f64 = trimmed[..sign_len + end].parse().ok()?;
    value.is_finite().then_some(value)
}

/// Simulation hints the recommendation payload attaches to a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationHint {
    /// Suggested monthly contribution
    #[serde(rename = "monthlyDeposit", default, skip_serializing_if = "Option::is_none")]
    pub monthly_deposit: Option<f64>,
}

/// A deposit or saving product as supplied by the backend
///
/// Identified by the (code, kind) pair. Term and rate are kept raw and
/// resolved at simulation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// Financial product code
    #[serde(rename = "fin_prdt_cd")]
    pub code: String,

    /// Deposit or saving
    #[serde(rename = "product_type")]
    pub kind: ProductKind,

    /// Nominal term in months
    #[serde(rename = "save_trm", default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<RawNumber>,

    /// Preferential (maximum) annual interest rate, in percent
    #[serde(rename = "intr_rate2", default, skip_serializing_if = "Option::is_none")]
    pub rate_percent: Option<RawNumber>,

    /// Simulation hints (suggested monthly contribution)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationHint>,

    /// Financial company name
    #[serde(rename = "kor_co_nm", default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Product display name
    #[serde(rename = "fin_prdt_nm", default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

impl ProductDescriptor {
    /// Create a bare descriptor with no term, rate, or hints
    pub fn new(code: impl Into<String>, kind: ProductKind) -> Self {
        Self {
            code: code.into(),
            kind,
            term_months: None,
            rate_percent: None,
            simulation: None,
            company_name: None,
            product_name: None,
        }
    }

    pub fn with_term(mut self, term: impl Into<RawNumber>) -> Self {
        self.term_months = Some(term.into());
        self
    }

    pub fn with_rate(mut self, rate_percent: impl Into<RawNumber>) -> Self {
        self.rate_percent = Some(rate_percent.into());
        self
    }

    pub fn with_contribution_hint(mut self, monthly: f64) -> Self {
        self.simulation = Some(SimulationHint { monthly_deposit: Some(monthly) });
        self
    }

    pub fn with_names(mut self, company: impl Into<String>, product: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self.product_name = Some(product.into());
        self
    }

    /// Whether this descriptor has the given (code, kind) identity
    pub fn matches(&self, code: &str, kind: ProductKind) -> bool {
        self.kind == kind && self.code == code
    }

    pub fn is_saving(&self) -> bool {
        self.kind == ProductKind::Saving
    }

    /// Label for display: product name if known, code otherwise
    pub fn label(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.code)
    }

    /// Resolve the term in months
    ///
    /// A missing, unparseable, or zero term falls back to `default`. A
    /// negative term resolves to 0 months. Terms are capped at
    /// [`MAX_TERM_MONTHS`].
    pub fn term_months_or(&self, default: u32) -> u32 {
        match self.term_months.as_ref().and_then(RawNumber::as_integer) {
            Some(0) | None => {
                debug!("Product {}: no usable term, defaulting to {} months", self.code, default);
                default
            }
            Some(n) if n < 0 => 0,
            Some(n) => n.min(MAX_TERM_MONTHS as i64) as u32,
        }
    }

    /// Resolve the annual rate in percent; missing or unparseable reads as 0
    pub fn annual_rate_percent(&self) -> f64 {
        match self.rate_percent.as_ref().and_then(RawNumber::as_decimal) {
            Some(rate) => rate,
            None => {
                debug!("Product {}: no usable rate, simulating at 0%", self.code);
                0.0
            }
        }
    }

    /// Suggested monthly contribution attached to the product, if any
    pub fn contribution_hint(&self) -> Option<f64> {
        self.simulation.as_ref().and_then(|s| s.monthly_deposit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("saving".parse::<ProductKind>().unwrap(), ProductKind::Saving);
        assert_eq!(" deposit ".parse::<ProductKind>().unwrap(), ProductKind::Deposit);
        assert!("fund".parse::<ProductKind>().is_err());
        assert_eq!(ProductKind::Saving.to_string(), "saving");
    }

    #[test]
    fn test_integer_prefix_parsing() {
        assert_eq!(RawNumber::from("12").as_integer(), Some(12));
        assert_eq!(RawNumber::from("  24개월").as_integer(), Some(24));
        assert_eq!(RawNumber::from("12.9").as_integer(), Some(12));
        assert_eq!(RawNumber::from("-3").as_integer(), Some(-3));
        assert_eq!(RawNumber::from("abc").as_integer(), None);
        assert_eq!(RawNumber::from("").as_integer(), None);
        assert_eq!(RawNumber::Number(36.0).as_integer(), Some(36));
        assert_eq!(RawNumber::Number(f64::NAN).as_integer(), None);
    }

    #[test]
    fn test_decimal_prefix_parsing() {
        assert_eq!(RawNumber::from("3.5").as_decimal(), Some(3.5));
        assert_eq!(RawNumber::from("4.25%").as_decimal(), Some(4.25));
        assert_eq!(RawNumber::from(".5").as_decimal(), Some(0.5));
        assert_eq!(RawNumber::from("5.").as_decimal(), Some(5.0));
        assert_eq!(RawNumber::from("1e1x").as_decimal(), Some(10.0));
        assert_eq!(RawNumber::from("2e").as_decimal(), Some(2.0));
        assert_eq!(RawNumber::from("-1.5").as_decimal(), Some(-1.5));
        assert_eq!(RawNumber::from(".").as_decimal(), None);
        assert_eq!(RawNumber::from("n/a").as_decimal(), None);
    }

    #[test]
    fn test_term_resolution() {
        let p = ProductDescriptor::new("A", ProductKind::Saving);
        assert_eq!(p.term_months_or(12), 12);
        assert_eq!(p.clone().with_term("6").term_months_or(12), 6);
        assert_eq!(p.clone().with_term("0").term_months_or(12), 12);
        assert_eq!(p.clone().with_term("forever").term_months_or(12), 12);
        assert_eq!(p.clone().with_term(-5i64).term_months_or(12), 0);
        assert_eq!(p.with_term(1_000_000i64).term_months_or(12), MAX_TERM_MONTHS);
    }

    #[test]
    fn test_rate_resolution() {
        let p = ProductDescriptor::new("A", ProductKind::Saving);
        assert_eq!(p.annual_rate_percent(), 0.0);
        assert_eq!(p.clone().with_rate("4.1").annual_rate_percent(), 4.1);
        assert_eq!(p.with_rate("unknown").annual_rate_percent(), 0.0);
    }

    #[test]
    fn test_backend_payload_deserializes() {
        let json = r#"{
            "fin_prdt_cd": "WR0001B",
            "product_type": "saving",
            "save_trm": "12",
            "intr_rate2": 4.5,
            "kor_co_nm": "우리은행",
            "fin_prdt_nm": "우리 SUPER주거래 적금",
            "simulation": { "monthlyDeposit": 500000 }
        }"#;
        let p: ProductDescriptor = serde_json::from_str(json).unwrap();
        assert!(p.matches("WR0001B", ProductKind::Saving));
        assert_eq!(p.term_months_or(12), 12);
        assert_eq!(p.annual_rate_percent(), 4.5);
        assert_eq!(p.contribution_hint(), Some(500_000.0));
        assert_eq!(p.label(), "우리 SUPER주거래 적금");
    }
}
