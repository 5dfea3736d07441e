//! Sale lifecycle orchestration (application-level).
//!
//! ```text
//! create_sale:        amount check → user lookup → allocate id + initial status → store.set
//! update_sale_status: store.read → parse target → Sale::transition → store.set_if(version)
//! search_sales:       user lookup (if filtered) → parse status → store.get_all → filter + aggregate
//! ```
//!
//! The service composes the `SaleStore` and `UserDirectory` traits and
//! contains no IO itself. All failures are returned to the immediate caller;
//! nothing is retried here.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use salesdesk_core::{AggregateRoot, DomainError, ExpectedVersion, SaleId, UserId};
use salesdesk_sales::{
    InitialStatusPolicy, RandomInitialStatus, Sale, SaleError, SaleFilter, SaleStatus, SearchResult,
};

use crate::activity::{SalesActivity, SalesEventSink};
use crate::sale_store::{SaleStore, SaleStoreError};
use crate::users::{UserDirectory, UserLookupError};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SalesError {
    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// User existence could not be confirmed (transport failure, unexpected
    /// response, timeout).
    #[error("error validating user: {0}")]
    UserValidation(String),

    #[error("sale not found")]
    NotFound,

    #[error("invalid status value: {0:?}")]
    InvalidStatus(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: SaleStatus, to: SaleStatus },

    /// The sale moved on since the caller (or a concurrent writer) read it.
    #[error("version conflict: {0}")]
    VersionConflict(String),

    #[error("empty sale ID")]
    EmptyIdentifier,

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<SaleError> for SalesError {
    fn from(value: SaleError) -> Self {
        match value {
            SaleError::InvalidAmount(_) => SalesError::InvalidAmount,
            SaleError::InvalidStatus(s) => SalesError::InvalidStatus(s),
            SaleError::InvalidTransition { from, to } => SalesError::InvalidTransition { from, to },
        }
    }
}

impl From<SaleStoreError> for SalesError {
    fn from(value: SaleStoreError) -> Self {
        match value {
            SaleStoreError::EmptyIdentifier => SalesError::EmptyIdentifier,
            SaleStoreError::NotFound => SalesError::NotFound,
            e @ SaleStoreError::Concurrency { .. } => SalesError::VersionConflict(e.to_string()),
            SaleStoreError::Backend(msg) => SalesError::Persistence(msg),
        }
    }
}

impl From<DomainError> for SalesError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Conflict(msg) => SalesError::VersionConflict(msg),
            DomainError::InvalidId(_) => SalesError::EmptyIdentifier,
        }
    }
}

impl From<UserLookupError> for SalesError {
    fn from(value: UserLookupError) -> Self {
        match value {
            UserLookupError::NotFound(id) => SalesError::UserNotFound(id),
            other => SalesError::UserValidation(other.to_string()),
        }
    }
}

/// Owns the sale lifecycle: creation, the one-way status transition, and
/// search/aggregation.
///
/// Only this service writes to the store.
pub struct SalesService<S, U> {
    store: S,
    users: U,
    initial_status: Arc<dyn InitialStatusPolicy>,
    sink: Option<Arc<dyn SalesEventSink>>,
    lookup_timeout: Duration,
}

impl<S, U> core::fmt::Debug for SalesService<S, U> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SalesService")
            .field("initial_status", &self.initial_status)
            .field("has_sink", &self.sink.is_some())
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

impl<S, U> SalesService<S, U> {
    pub fn new(store: S, users: U) -> Self {
        Self {
            store,
            users,
            initial_status: Arc::new(RandomInitialStatus),
            sink: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_initial_status(mut self, policy: Arc<dyn InitialStatusPolicy>) -> Self {
        self.initial_status = policy;
        self
    }

    pub fn with_event_sink(mut self, sink: Option<Arc<dyn SalesEventSink>>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    fn emit(&self, activity: SalesActivity) {
        if let Some(sink) = &self.sink {
            sink.emit(activity);
        }
    }

    fn rejected(&self, operation: &'static str, err: SalesError) -> SalesError {
        self.emit(SalesActivity::OperationRejected {
            operation,
            reason: err.to_string(),
        });
        err
    }
}

impl<S, U> SalesService<S, U>
where
    S: SaleStore,
    U: UserDirectory,
{
    /// Confirm the user exists. A lookup that does not finish within the
    /// configured timeout is a validation failure, never a confirmation.
    async fn ensure_user(&self, user_id: &UserId) -> Result<(), SalesError> {
        match tokio::time::timeout(self.lookup_timeout, self.users.resolve(user_id)).await {
            Ok(Ok(user)) => {
                tracing::debug!(user_id = %user.id, user_name = %user.name, "user validated");
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::error!(user_id = %user_id, error = %e, "failed to validate user with the user service");
                Err(e.into())
            }
            Err(_) => {
                tracing::error!(user_id = %user_id, timeout = ?self.lookup_timeout, "user lookup timed out");
                Err(SalesError::UserValidation(format!(
                    "user lookup timed out after {:?}",
                    self.lookup_timeout
                )))
            }
        }
    }

    /// Create a sale for an existing user.
    pub async fn create_sale(&self, user_id: &UserId, amount: f64) -> Result<Sale, SalesError> {
        const OP: &str = "create_sale";

        if !(amount.is_finite() && amount > 0.0) {
            return Err(self.rejected(OP, SalesError::InvalidAmount));
        }

        if let Err(e) = self.ensure_user(user_id).await {
            return Err(self.rejected(OP, e));
        }

        let sale = Sale::new(
            SaleId::generate(),
            user_id.clone(),
            amount,
            self.initial_status.choose(),
            Utc::now(),
        )
        .map_err(|e| self.rejected(OP, e.into()))?;

        if let Err(e) = self.store.set(sale.clone()) {
            tracing::error!(sale_id = %sale.id(), error = %e, "failed to save sale");
            return Err(self.rejected(OP, SalesError::Persistence(e.to_string())));
        }

        self.emit(SalesActivity::SaleCreated {
            sale_id: sale.id().clone(),
            user_id: sale.user_id().clone(),
            amount: sale.amount(),
            status: sale.status(),
        });
        tracing::info!(sale_id = %sale.id(), status = %sale.status(), "sale created");

        Ok(sale)
    }

    /// Move a pending sale to `approved` or `rejected`.
    pub fn update_sale_status(&self, sale_id: &SaleId, new_status: &str) -> Result<Sale, SalesError> {
        self.update_sale_status_expecting(sale_id, new_status, ExpectedVersion::Any)
    }

    /// Like [`SalesService::update_sale_status`], but fails with
    /// `VersionConflict` unless the sale is still at `expected`.
    ///
    /// The write is a compare-and-set on the version that was read, so two
    /// concurrent transitions of the same sale cannot both succeed.
    pub fn update_sale_status_expecting(
        &self,
        sale_id: &SaleId,
        new_status: &str,
        expected: ExpectedVersion,
    ) -> Result<Sale, SalesError> {
        const OP: &str = "update_sale_status";

        let current = self.store.read(sale_id).map_err(|e| self.rejected(OP, e.into()))?;

        let target: SaleStatus = new_status.parse().map_err(|e: SaleError| self.rejected(OP, e.into()))?;

        expected
            .check(current.version())
            .map_err(|e| self.rejected(OP, e.into()))?;

        let updated = current
            .transition(target, Utc::now())
            .map_err(|e| self.rejected(OP, e.into()))?;

        if let Err(e) = self
            .store
            .set_if(updated.clone(), ExpectedVersion::Exact(current.version()))
        {
            tracing::error!(sale_id = %sale_id, error = %e, "failed to update sale");
            return Err(self.rejected(OP, e.into()));
        }

        self.emit(SalesActivity::SaleStatusChanged {
            sale_id: updated.id().clone(),
            from: current.status(),
            to: updated.status(),
            version: updated.version(),
        });

        Ok(updated)
    }

    /// Plain read of a single sale.
    pub fn get_sale(&self, sale_id: &SaleId) -> Result<Sale, SalesError> {
        Ok(self.store.read(sale_id)?)
    }

    /// Filter sales by owner and/or status and aggregate the result.
    ///
    /// Empty strings mean "no filter"; a whitespace-only user id is still a
    /// filter and gets looked up. A user filter is validated against the user
    /// service first; a status-only search performs no user lookup.
    pub async fn search_sales(
        &self,
        user_id: Option<&UserId>,
        status: Option<&str>,
    ) -> Result<SearchResult, SalesError> {
        const OP: &str = "search_sales";

        let user_id = user_id.filter(|u| !u.as_str().is_empty());
        let status = status.filter(|s| !s.is_empty());

        if let Some(user_id) = user_id {
            if let Err(e) = self.ensure_user(user_id).await {
                return Err(self.rejected(OP, e));
            }
        }

        let status = match status {
            Some(raw) => match raw.parse::<SaleStatus>() {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!(status_filter = raw, "invalid status filter provided");
                    return Err(self.rejected(OP, e.into()));
                }
            },
            None => None,
        };

        let all = self.store.get_all().map_err(|e| {
            tracing::error!(error = %e, "failed to get all sales from storage");
            self.rejected(OP, SalesError::Persistence(e.to_string()))
        })?;

        let filter = SaleFilter {
            user_id: user_id.cloned(),
            status,
        };
        let result = filter.apply(all);

        self.emit(SalesActivity::SalesSearched {
            user_id: filter.user_id,
            status: filter.status,
            metadata: result.metadata.clone(),
        });

        Ok(result)
    }
}
