use serde::{Deserialize, Serialize};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub user_id: String,
    pub amount: f64,
}

/// `version`, when present, must equal the sale's current version or the
/// update is refused with a conflict.
#[derive(Debug, Deserialize)]
pub struct UpdateSaleStatusRequest {
    pub status: String,
    #[serde(default)]
    pub version: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchSalesQuery {
    pub user_id: Option<String>,
    pub status: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
