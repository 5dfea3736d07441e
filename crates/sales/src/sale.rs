use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use salesdesk_core::{AggregateRoot, SaleId, UserId};

use crate::error::SaleError;

/// Sale status lifecycle.
///
/// `Pending` is the only non-terminal state; a sale leaves it at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Approved,
    Rejected,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 3] = [SaleStatus::Pending, SaleStatus::Approved, SaleStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Approved => "approved",
            SaleStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SaleStatus::Pending)
    }
}

impl core::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for SaleStatus {
    type Err = SaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SaleStatus::Pending),
            "approved" => Ok(SaleStatus::Approved),
            "rejected" => Ok(SaleStatus::Rejected),
            other => Err(SaleError::InvalidStatus(other.to_string())),
        }
    }
}

/// Aggregate root: Sale.
///
/// `id`, `user_id`, `amount` and `created_at` are fixed at creation. Status,
/// `updated_at` and `version` only move through [`Sale::transition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,
    user_id: UserId,
    amount: f64,
    status: SaleStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Sale {
    /// Build a freshly created sale at version 1.
    pub fn new(
        id: SaleId,
        user_id: UserId,
        amount: f64,
        status: SaleStatus,
        now: DateTime<Utc>,
    ) -> Result<Self, SaleError> {
        ensure_positive_amount(amount)?;

        Ok(Self {
            id,
            user_id,
            amount,
            status,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_modifiable(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Decide the next state for a status change.
    ///
    /// This must not mutate state; the caller persists the returned sale.
    pub fn transition(&self, target: SaleStatus, now: DateTime<Utc>) -> Result<Sale, SaleError> {
        if target == SaleStatus::Pending {
            return Err(SaleError::InvalidStatus(target.to_string()));
        }

        if !self.is_modifiable() {
            return Err(SaleError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }

        // Wall clocks may repeat or step back; updated_at must still advance.
        let floor = self.updated_at.max(self.created_at) + Duration::microseconds(1);

        Ok(Sale {
            status: target,
            updated_at: now.max(floor),
            version: self.version + 1,
            ..self.clone()
        })
    }
}

impl AggregateRoot for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

fn ensure_positive_amount(amount: f64) -> Result<(), SaleError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(SaleError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_sale(status: SaleStatus) -> Sale {
        Sale::new(SaleId::generate(), UserId::new("u1"), 150.75, status, Utc::now()).unwrap()
    }

    #[test]
    fn new_sale_starts_at_version_one() {
        let sale = test_sale(SaleStatus::Pending);
        assert_eq!(sale.version(), 1);
        assert_eq!(sale.created_at(), sale.updated_at());
        assert_eq!(sale.amount(), 150.75);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in [0.0, -0.01, -100.0, f64::NAN, f64::INFINITY] {
            let err = Sale::new(SaleId::generate(), UserId::new("u1"), amount, SaleStatus::Pending, Utc::now())
                .unwrap_err();
            assert!(matches!(err, SaleError::InvalidAmount(_)), "amount {amount} accepted");
        }
    }

    #[test]
    fn pending_sale_can_be_approved_once() {
        let sale = test_sale(SaleStatus::Pending);
        let approved = sale.transition(SaleStatus::Approved, Utc::now()).unwrap();

        assert_eq!(approved.status(), SaleStatus::Approved);
        assert_eq!(approved.version(), 2);
        assert!(approved.updated_at() > approved.created_at());
        assert_eq!(approved.id(), sale.id());

        let err = approved.transition(SaleStatus::Rejected, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            SaleError::InvalidTransition {
                from: SaleStatus::Approved,
                to: SaleStatus::Rejected,
            }
        );
    }

    #[test]
    fn transition_does_not_mutate_state() {
        let sale = test_sale(SaleStatus::Pending);
        let before = sale.clone();
        let _ = sale.transition(SaleStatus::Rejected, Utc::now()).unwrap();
        assert_eq!(sale, before);
    }

    #[test]
    fn transition_to_pending_is_never_allowed() {
        for status in SaleStatus::ALL {
            let err = test_sale(status).transition(SaleStatus::Pending, Utc::now()).unwrap_err();
            assert_eq!(err, SaleError::InvalidStatus("pending".to_string()));
        }
    }

    #[test]
    fn updated_at_advances_even_when_clock_goes_backwards() {
        let sale = test_sale(SaleStatus::Pending);
        let earlier = sale.created_at() - Duration::seconds(30);
        let approved = sale.transition(SaleStatus::Approved, earlier).unwrap();
        assert!(approved.updated_at() > sale.updated_at());
    }

    #[test]
    fn status_parses_exact_wire_values() {
        assert_eq!("approved".parse::<SaleStatus>().unwrap(), SaleStatus::Approved);
        assert!("Approved".parse::<SaleStatus>().is_err());
        assert_eq!(
            "unknown".parse::<SaleStatus>().unwrap_err(),
            SaleError::InvalidStatus("unknown".to_string())
        );
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let sale = test_sale(SaleStatus::Pending);
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["version"], 1);
        assert!(json["created_at"].is_string());
    }

    fn any_status() -> impl Strategy<Value = SaleStatus> {
        prop::sample::select(SaleStatus::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: however many transitions are attempted, at most one is
        /// accepted and version == 1 + accepted transitions.
        #[test]
        fn at_most_one_transition_is_accepted(
            initial in any_status(),
            attempts in prop::collection::vec(any_status(), 0..8)
        ) {
            let mut sale = test_sale(initial);
            let mut accepted = 0u64;

            for target in attempts {
                if let Ok(next) = sale.transition(target, Utc::now()) {
                    prop_assert!(next.updated_at() > sale.updated_at());
                    sale = next;
                    accepted += 1;
                }
            }

            prop_assert!(accepted <= 1);
            prop_assert_eq!(sale.version(), 1 + accepted);
            if initial.is_terminal() {
                prop_assert_eq!(accepted, 0);
                prop_assert_eq!(sale.status(), initial);
            }
        }
    }
}
