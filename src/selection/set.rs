//! Insertion-ordered set of selected products, unique by (code, kind)

use crate::product::{ProductDescriptor, ProductKind};
use log::debug;
use serde::{Deserialize, Serialize};

/// Products the user has picked for comparison
///
/// Serializes as a plain JSON array. Deserializing re-applies [`add`], so a
/// blob containing duplicates still loads as a valid set.
///
/// [`add`]: SelectionSet::add
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ProductDescriptor>", into = "Vec<ProductDescriptor>")]
pub struct SelectionSet {
    products: Vec<ProductDescriptor>,

    /// Bumped on every effective mutation
    revision: u64,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `product` unless one with the same (code, kind) is already selected
    ///
    /// Returns whether the set changed.
    pub fn add(&mut self, product: ProductDescriptor) -> bool {
        if self.contains(&product.code, product.kind) {
            debug!("{} {} already selected", product.kind, product.code);
            return false;
        }
        self.products.push(product);
        self.revision += 1;
        true
    }

    /// Remove the entry matching (code, kind), if any
    ///
    /// Returns whether the set changed.
    pub fn remove(&mut self, code: &str, kind: ProductKind) -> bool {
        match self.products.iter().position(|p| p.matches(code, kind)) {
            Some(idx) => {
                self.products.remove(idx);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, code: &str, kind: ProductKind) -> bool {
        self.products.iter().any(|p| p.matches(code, kind))
    }

    pub fn get(&self, code: &str, kind: ProductKind) -> Option<&ProductDescriptor> {
        self.products.iter().find(|p| p.matches(code, kind))
    }

    pub fn clear(&mut self) {
        if !self.products.is_empty() {
            self.products.clear();
            self.revision += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductDescriptor> {
        self.products.iter()
    }

    /// Selected products of one kind, in selection order
    ///
    /// Recomputed on every call.
    pub fn by_kind(&self, kind: ProductKind) -> Vec<&ProductDescriptor> {
        self.products.iter().filter(|p| p.kind == kind).collect()
    }

    pub fn selected_savings(&self) -> Vec<&ProductDescriptor> {
        self.by_kind(ProductKind::Saving)
    }

    pub fn selected_deposits(&self) -> Vec<&ProductDescriptor> {
        self.by_kind(ProductKind::Deposit)
    }

    /// Mutation counter; unchanged by no-op operations
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Equality compares the selected products only
impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        self.products == other.products
    }
}

impl From<Vec<ProductDescriptor>> for SelectionSet {
    fn from(products: Vec<ProductDescriptor>) -> Self {
        let mut set = Self::new();
        for product in products {
            set.add(product);
        }
        set
    }
}

impl From<SelectionSet> for Vec<ProductDescriptor> {
    fn from(set: SelectionSet) -> Self {
        set.products
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a ProductDescriptor;
    type IntoIter = std::slice::Iter<'a, ProductDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
