//! Structured activity events emitted by the sales service.
//!
//! The sink is an optional side channel passed in at construction. It must
//! never influence the outcome of an operation.

use std::sync::Mutex;

use serde::Serialize;

use salesdesk_core::{SaleId, UserId};
use salesdesk_sales::{SaleStatus, SalesMetadata};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SalesActivity {
    SaleCreated {
        sale_id: SaleId,
        user_id: UserId,
        amount: f64,
        status: SaleStatus,
    },
    SaleStatusChanged {
        sale_id: SaleId,
        from: SaleStatus,
        to: SaleStatus,
        version: u64,
    },
    SalesSearched {
        user_id: Option<UserId>,
        status: Option<SaleStatus>,
        metadata: SalesMetadata,
    },
    OperationRejected {
        operation: &'static str,
        reason: String,
    },
}

pub trait SalesEventSink: Send + Sync + 'static {
    fn emit(&self, activity: SalesActivity);
}

/// Writes each activity as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSalesEventSink;

impl SalesEventSink for TracingSalesEventSink {
    fn emit(&self, activity: SalesActivity) {
        match &activity {
            SalesActivity::SaleCreated {
                sale_id,
                user_id,
                amount,
                status,
            } => tracing::info!(
                sale_id = %sale_id,
                user_id = %user_id,
                amount,
                status = %status,
                "sale created"
            ),
            SalesActivity::SaleStatusChanged {
                sale_id,
                from,
                to,
                version,
            } => tracing::info!(
                sale_id = %sale_id,
                from = %from,
                to = %to,
                version,
                "sale status changed"
            ),
            SalesActivity::SalesSearched {
                user_id,
                status,
                metadata,
            } => tracing::info!(
                user_id_filter = user_id.as_ref().map(UserId::as_str).unwrap_or(""),
                status_filter = status.map(|s| s.as_str()).unwrap_or(""),
                results_count = metadata.quantity,
                total_amount = metadata.total_amount,
                "sales search completed"
            ),
            SalesActivity::OperationRejected { operation, reason } => {
                tracing::warn!(operation, reason = %reason, "sales operation rejected")
            }
        }
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySalesEventSink {
    inner: Mutex<Vec<SalesActivity>>,
}

impl InMemorySalesEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<SalesActivity> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl SalesEventSink for InMemorySalesEventSink {
    fn emit(&self, activity: SalesActivity) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.push(activity);
        }
    }
}
