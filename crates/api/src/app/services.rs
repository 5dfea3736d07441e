use std::sync::Arc;

use salesdesk_infra::{
    HttpUserDirectory, InMemorySaleStore, SalesEventSink, SalesService, TracingSalesEventSink, UserDirectory,
};

use crate::config::ApiConfig;

pub type AppSalesService = SalesService<Arc<InMemorySaleStore>, Arc<dyn UserDirectory>>;

/// Everything the handlers need, shared behind one `Arc`.
#[derive(Debug)]
pub struct AppServices {
    pub sales: AppSalesService,
}

impl AppServices {
    pub fn new(sales: AppSalesService) -> Self {
        Self { sales }
    }
}

/// Wire the in-memory store, the HTTP user directory, and the tracing sink.
pub fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let store = Arc::new(InMemorySaleStore::new());

    let users: Arc<dyn UserDirectory> = Arc::new(HttpUserDirectory::new(
        config.user_service_url.clone(),
        config.user_lookup_timeout,
    )?);

    let sink: Arc<dyn SalesEventSink> = Arc::new(TracingSalesEventSink);

    let sales = SalesService::new(store, users)
        .with_initial_status(config.initial_status.policy())
        .with_event_sink(Some(sink))
        .with_lookup_timeout(config.user_lookup_timeout);

    tracing::info!(
        user_service_url = %config.user_service_url,
        lookup_timeout = ?config.user_lookup_timeout,
        initial_status = ?config.initial_status,
        "sales services wired"
    );

    Ok(AppServices::new(sales))
}
