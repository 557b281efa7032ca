//! Load product catalogs from backend JSON payloads or CSV exports

use super::{ProductDescriptor, ProductKind, RawNumber, SimulationHint};
use crate::error::{CatalogError, CatalogResult};
use csv::Reader;
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Product record as it appears on the wire, before validation
#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    fin_prdt_cd: Option<String>,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    save_trm: Option<RawNumber>,
    #[serde(default)]
    intr_rate2: Option<RawNumber>,
    #[serde(default)]
    simulation: Option<SimulationHint>,
    #[serde(default)]
    kor_co_nm: Option<String>,
    #[serde(default)]
    fin_prdt_nm: Option<String>,
}

impl RawProduct {
    fn to_descriptor(self, index: usize, list_kind: Option<ProductKind>) -> CatalogResult<ProductDescriptor> {
        let code = match self.fin_prdt_cd.map(|c| c.trim().to_string()) {
            Some(code) if !code.is_empty() => code,
            _ => return Err(CatalogError::MissingCode { index }),
        };

        let kind = match self.product_type.as_deref().map(str::trim) {
            Some(kind) if !kind.is_empty() => kind.parse()?,
            _ => list_kind.ok_or_else(|| CatalogError::MissingKind { code: code.clone() })?,
        };

        Ok(ProductDescriptor {
            code,
            kind,
            term_months: self.save_trm,
            rate_percent: self.intr_rate2,
            simulation: self.simulation,
            company_name: self.kor_co_nm,
            product_name: self.fin_prdt_nm,
        })
    }
}

/// Either a flat product list or the `/products/deposits` + `/products/savings` pair
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    List(Vec<RawProduct>),
    Grouped {
        #[serde(default)]
        deposits: Vec<RawProduct>,
        #[serde(default)]
        savings: Vec<RawProduct>,
    },
}

/// Raw CSV row using the backend's column names
#[derive(Debug, Deserialize)]
struct CsvRow {
    fin_prdt_cd: Option<String>,
    product_type: Option<String>,
    #[serde(default)]
    save_trm: Option<String>,
    #[serde(default)]
    intr_rate2: Option<String>,
    #[serde(default)]
    kor_co_nm: Option<String>,
    #[serde(default)]
    fin_prdt_nm: Option<String>,
    #[serde(default, rename = "monthly_deposit")]
    monthly_deposit: Option<f64>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

impl CsvRow {
    fn into_raw(self) -> RawProduct {
        RawProduct {
            fin_prdt_cd: self.fin_prdt_cd,
            product_type: self.product_type,
            save_trm: non_empty(self.save_trm).map(RawNumber::Text),
            intr_rate2: non_empty(self.intr_rate2).map(RawNumber::Text),
            simulation: self
                .monthly_deposit
                .map(|m| SimulationHint { monthly_deposit: Some(m) }),
            kor_co_nm: non_empty(self.kor_co_nm),
            fin_prdt_nm: non_empty(self.fin_prdt_nm),
        }
    }
}

/// Collection of products loaded from the backend
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<ProductDescriptor>,
}

impl Catalog {
    pub fn from_products(products: Vec<ProductDescriptor>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductDescriptor> {
        self.products.iter()
    }

    /// Look up a product by identity
    ///
    /// The backend lists one row per term option, so a code can repeat;
    /// the first row wins.
    pub fn get(&self, code: &str, kind: ProductKind) -> Option<&ProductDescriptor> {
        self.products.iter().find(|p| p.matches(code, kind))
    }

    /// Look up a product by code alone, preferring savings
    pub fn find_code(&self, code: &str) -> Option<&ProductDescriptor> {
        self.get(code, ProductKind::Saving)
            .or_else(|| self.get(code, ProductKind::Deposit))
    }

    pub fn savings(&self) -> impl Iterator<Item = &ProductDescriptor> {
        self.products.iter().filter(|p| p.kind == ProductKind::Saving)
    }

    pub fn deposits(&self) -> impl Iterator<Item = &ProductDescriptor> {
        self.products.iter().filter(|p| p.kind == ProductKind::Deposit)
    }

    pub fn into_products(self) -> Vec<ProductDescriptor> {
        self.products
    }
}

/// Load a catalog from a JSON payload
pub fn load_catalog_json<R: Read>(reader: R) -> CatalogResult<Catalog> {
    let payload: CatalogPayload = serde_json::from_reader(reader)?;

    let tagged: Vec<(RawProduct, Option<ProductKind>)> = match payload {
        CatalogPayload::List(items) => items.into_iter().map(|p| (p, None)).collect(),
        CatalogPayload::Grouped { deposits, savings } => deposits
            .into_iter()
            .map(|p| (p, Some(ProductKind::Deposit)))
            .chain(savings.into_iter().map(|p| (p, Some(ProductKind::Saving))))
            .collect(),
    };

    let products = tagged
        .into_iter()
        .enumerate()
        .map(|(index, (raw, kind))| raw.to_descriptor(index, kind))
        .collect::<CatalogResult<Vec<_>>>()?;

    Ok(Catalog::from_products(products))
}

/// Load a catalog from CSV with backend column names
pub fn load_catalog_csv<R: Read>(reader: R) -> CatalogResult<Catalog> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut products = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        products.push(row.into_raw().to_descriptor(index, None)?);
    }

    Ok(Catalog::from_products(products))
}

/// Load a catalog file, choosing the format from its extension
pub fn load_catalog<P: AsRef<Path>>(path: P) -> CatalogResult<Catalog> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let catalog = match extension.as_deref() {
        Some("json") => load_catalog_json(BufReader::new(File::open(path)?))?,
        Some("csv") => load_catalog_csv(File::open(path)?)?,
        _ => {
            return Err(CatalogError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    };

    if catalog.is_empty() {
        warn!("Catalog {} contains no products", path.display());
    } else {
        info!(
            "Loaded {} products ({} savings, {} deposits) from {}",
            catalog.len(),
            catalog.savings().count(),
            catalog.deposits().count(),
            path.display()
        );
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_flat_json() {
        let json = r#"[
            {"fin_prdt_cd": "S1", "product_type": "saving", "save_trm": 12, "intr_rate2": "4.0"},
            {"fin_prdt_cd": "D1", "product_type": "deposit", "save_trm": "6", "intr_rate2": 3.2}
        ]"#;
        let catalog = load_catalog_json(json.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.savings().count(), 1);
        assert_eq!(catalog.deposits().count(), 1);

        let s1 = catalog.get("S1", ProductKind::Saving).unwrap();
        assert_eq!(s1.annual_rate_percent(), 4.0);
        assert!(catalog.get("S1", ProductKind::Deposit).is_none());
    }

    #[test]
    fn test_load_grouped_json_fills_kind() {
        let json = r#"{
            "deposits": [{"fin_prdt_cd": "D1", "save_trm": 12, "intr_rate2": 3.0}],
            "savings": [{"fin_prdt_cd": "S1", "save_trm": 24, "intr_rate2": 4.2}]
        }"#;
        let catalog = load_catalog_json(json.as_bytes()).unwrap();
        assert_eq!(catalog.get("D1", ProductKind::Deposit).unwrap().kind, ProductKind::Deposit);
        assert_eq!(catalog.find_code("S1").unwrap().kind, ProductKind::Saving);
    }

    #[test]
    fn test_missing_code_rejected() {
        let json = r#"[{"fin_prdt_cd": "  ", "product_type": "saving"}]"#;
        let err = load_catalog_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingCode { index: 0 }));
    }

    #[test]
    fn test_missing_and_unknown_kind_rejected() {
        let missing = r#"[{"fin_prdt_cd": "X"}]"#;
        assert!(matches!(
            load_catalog_json(missing.as_bytes()).unwrap_err(),
            CatalogError::MissingKind { .. }
        ));

        let unknown = r#"[{"fin_prdt_cd": "X", "product_type": "fund"}]"#;
        assert!(matches!(
            load_catalog_json(unknown.as_bytes()).unwrap_err(),
            CatalogError::UnknownKind { .. }
        ));
    }

    #[test]
    fn test_load_csv() {
        let data = "\
fin_prdt_cd,product_type,save_trm,intr_rate2,kor_co_nm,fin_prdt_nm,monthly_deposit
S1,saving,12,4.5,Bank A,Saver,200000
D1,deposit,,3.1,Bank B,,
";
        let catalog = load_catalog_csv(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let s1 = catalog.get("S1", ProductKind::Saving).unwrap();
        assert_eq!(s1.term_months_or(12), 12);
        assert_eq!(s1.contribution_hint(), Some(200_000.0));
        assert_eq!(s1.company_name.as_deref(), Some("Bank A"));

        let d1 = catalog.get("D1", ProductKind::Deposit).unwrap();
        assert!(d1.term_months.is_none());
        assert!(d1.product_name.is_none());
        assert_eq!(d1.label(), "D1");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_catalog("products.xml").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat { .. }));
    }
}
