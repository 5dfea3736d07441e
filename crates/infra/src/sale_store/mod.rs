//! Sale persistence: storage contract + implementations.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemorySaleStore;
pub use r#trait::{SaleStore, SaleStoreError};
