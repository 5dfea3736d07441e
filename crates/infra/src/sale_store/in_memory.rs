use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use salesdesk_core::{AggregateRoot, ExpectedVersion, SaleId};
use salesdesk_sales::Sale;

use super::r#trait::{SaleStore, SaleStoreError};

/// In-memory sale store.
///
/// A single `RwLock` guards the map, so `set_if` observes and replaces a
/// record under one write lock.
#[derive(Debug, Default)]
pub struct InMemorySaleStore {
    sales: RwLock<HashMap<SaleId, Sale>>,
}

impl InMemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        // Diagnostics only: count through a poisoned lock rather than report empty.
        self.sales.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> SaleStoreError {
    SaleStoreError::Backend("lock poisoned".to_string())
}

impl SaleStore for InMemorySaleStore {
    fn set(&self, sale: Sale) -> Result<(), SaleStoreError> {
        self.set_if(sale, ExpectedVersion::Any)
    }

    fn set_if(&self, sale: Sale, expected: ExpectedVersion) -> Result<(), SaleStoreError> {
        if sale.id().is_empty() {
            return Err(SaleStoreError::EmptyIdentifier);
        }

        let mut sales = self.sales.write().map_err(|_| poisoned())?;

        if let ExpectedVersion::Exact(_) = expected {
            let actual = sales
                .get(sale.id())
                .map(|current| current.version())
                .ok_or(SaleStoreError::NotFound)?;
            if !expected.matches(actual) {
                return Err(SaleStoreError::Concurrency { expected, actual });
            }
        }

        sales.insert(sale.id().clone(), sale);
        Ok(())
    }

    fn read(&self, id: &SaleId) -> Result<Sale, SaleStoreError> {
        let sales = self.sales.read().map_err(|_| poisoned())?;
        sales.get(id).cloned().ok_or(SaleStoreError::NotFound)
    }

    fn get_all(&self) -> Result<Vec<Sale>, SaleStoreError> {
        let sales = self.sales.read().map_err(|_| poisoned())?;
        Ok(sales.values().cloned().collect())
    }
}
