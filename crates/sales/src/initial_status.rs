//! Initial status selection for newly created sales.
//!
//! The production default draws the status uniformly at random, so a sale can
//! be born already approved or rejected. Tests (and deployments that want the
//! full transition path) pin it with [`FixedInitialStatus`].

use rand::seq::SliceRandom;

use crate::sale::SaleStatus;

/// Chooses the status a sale starts with.
pub trait InitialStatusPolicy: Send + Sync + core::fmt::Debug {
    fn choose(&self) -> SaleStatus;
}

/// Uniform choice over every [`SaleStatus`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomInitialStatus;

impl InitialStatusPolicy for RandomInitialStatus {
    fn choose(&self) -> SaleStatus {
        SaleStatus::ALL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(SaleStatus::Pending)
    }
}

/// Always the same status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInitialStatus(pub SaleStatus);

impl FixedInitialStatus {
    pub fn pending() -> Self {
        Self(SaleStatus::Pending)
    }
}

impl InitialStatusPolicy for FixedInitialStatus {
    fn choose(&self) -> SaleStatus {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fixed_policy_is_deterministic() {
        let policy = FixedInitialStatus::pending();
        assert!((0..50).all(|_| policy.choose() == SaleStatus::Pending));
    }

    #[test]
    fn random_policy_covers_every_status() {
        let policy = RandomInitialStatus;
        let seen: HashSet<SaleStatus> = (0..1_000).map(|_| policy.choose()).collect();
        assert_eq!(seen.len(), SaleStatus::ALL.len());
    }
}
