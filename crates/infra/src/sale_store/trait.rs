use std::sync::Arc;

use thiserror::Error;

use salesdesk_core::{ExpectedVersion, SaleId};
use salesdesk_sales::Sale;

/// Sale store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// business-rule errors raised by the sale aggregate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaleStoreError {
    #[error("empty sale ID")]
    EmptyIdentifier,

    #[error("sale not found")]
    NotFound,

    #[error("optimistic concurrency check failed (expected: {expected:?}, actual: {actual})")]
    Concurrency { expected: ExpectedVersion, actual: u64 },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Key/value persistence contract for sale records, keyed by `Sale::id`.
///
/// The store owns the persisted representation and is the single source of
/// truth for reads. It has no create/update distinction: that belongs to the
/// sales service.
///
/// Implementations must be safe for concurrent use.
pub trait SaleStore: Send + Sync {
    /// Insert or fully replace the record keyed by `sale.id`.
    ///
    /// Fails with `EmptyIdentifier` (leaving the store untouched) if the id is
    /// empty.
    fn set(&self, sale: Sale) -> Result<(), SaleStoreError>;

    /// Atomically replace the record only if the stored version matches.
    ///
    /// `ExpectedVersion::Any` behaves like [`SaleStore::set`]. With `Exact(v)`
    /// the record must exist (`NotFound` otherwise) and currently be at
    /// version `v` (`Concurrency` otherwise).
    fn set_if(&self, sale: Sale, expected: ExpectedVersion) -> Result<(), SaleStoreError>;

    /// Return the record for `id`, or `NotFound`.
    fn read(&self, id: &SaleId) -> Result<Sale, SaleStoreError>;

    /// Return every stored record. Order is unspecified.
    fn get_all(&self) -> Result<Vec<Sale>, SaleStoreError>;
}

impl<S> SaleStore for Arc<S>
where
    S: SaleStore + ?Sized,
{
    fn set(&self, sale: Sale) -> Result<(), SaleStoreError> {
        (**self).set(sale)
    }

    fn set_if(&self, sale: Sale, expected: ExpectedVersion) -> Result<(), SaleStoreError> {
        (**self).set_if(sale, expected)
    }

    fn read(&self, id: &SaleId) -> Result<Sale, SaleStoreError> {
        (**self).read(id)
    }

    fn get_all(&self) -> Result<Vec<Sale>, SaleStoreError> {
        (**self).get_all()
    }
}
