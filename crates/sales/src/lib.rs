//! Sales domain module.
//!
//! This crate contains business rules for sales, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod error;
pub mod initial_status;
pub mod sale;
pub mod search;

pub use error::SaleError;
pub use initial_status::{FixedInitialStatus, InitialStatusPolicy, RandomInitialStatus};
pub use sale::{Sale, SaleStatus};
pub use search::{SaleFilter, SalesMetadata, SearchResult};
