//! Sale filtering and the derived search metadata.

use serde::{Deserialize, Serialize};

use salesdesk_core::UserId;

use crate::sale::{Sale, SaleStatus};

/// Aggregate over a filtered result set. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesMetadata {
    pub quantity: u64,
    pub approved: u64,
    pub rejected: u64,
    pub pending: u64,
    pub total_amount: f64,
}

impl SalesMetadata {
    /// Account for one retained sale.
    pub fn record(&mut self, sale: &Sale) {
        self.quantity += 1;
        self.total_amount += sale.amount();
        match sale.status() {
            SaleStatus::Approved => self.approved += 1,
            SaleStatus::Rejected => self.rejected += 1,
            SaleStatus::Pending => self.pending += 1,
        }
    }

    pub fn count_for(&self, status: SaleStatus) -> u64 {
        match status {
            SaleStatus::Approved => self.approved,
            SaleStatus::Rejected => self.rejected,
            SaleStatus::Pending => self.pending,
        }
    }
}

/// Filtered sales plus their metadata. Order of `results` is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub results: Vec<Sale>,
    pub metadata: SalesMetadata,
}

/// Search criteria; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub user_id: Option<UserId>,
    pub status: Option<SaleStatus>,
}

impl SaleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, sale: &Sale) -> bool {
        let user_ok = self.user_id.as_ref().is_none_or(|u| sale.user_id() == u);
        let status_ok = self.status.is_none_or(|s| sale.status() == s);
        user_ok && status_ok
    }

    /// Retain matching sales and accumulate metadata in a single pass.
    pub fn apply<I>(&self, sales: I) -> SearchResult
    where
        I: IntoIterator<Item = Sale>,
    {
        let mut result = SearchResult::default();
        for sale in sales {
            if !self.matches(&sale) {
                continue;
            }
            result.metadata.record(&sale);
            result.results.push(sale);
        }
        result
    }
}
