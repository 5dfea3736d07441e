//! Infrastructure layer: sale storage, user service client, and the sales
//! service that orchestrates them.

pub mod activity;
pub mod sale_store;
pub mod sales_service;
pub mod users;


pub use activity::{InMemorySalesEventSink, SalesActivity, SalesEventSink, TracingSalesEventSink};
pub use sale_store::{InMemorySaleStore, SaleStore, SaleStoreError};
pub use sales_service::{SalesError, SalesService, DEFAULT_LOOKUP_TIMEOUT};
pub use users::{HttpUserDirectory, InMemoryUserDirectory, User, UserDirectory, UserLookupError};
