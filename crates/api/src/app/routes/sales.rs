use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use salesdesk_core::{SaleId, UserId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/sales", post(create_sale).get(search_sales))
        .route("/sales/:id", get(get_sale).patch(update_sale_status))
}

pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateSaleRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let user_id: UserId = match body.user_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_user_id", "user_id must not be empty");
        }
    };

    match services.sales.create_sale(&user_id, body.amount).await {
        Ok(sale) => (StatusCode::CREATED, Json(sale)).into_response(),
        Err(e) => errors::sales_error_to_response(e),
    }
}

pub async fn update_sale_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateSaleStatusRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let sale_id = SaleId::new(id);
    match services
        .sales
        .update_sale_status_expecting(&sale_id, &body.status, body.version.into())
    {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => errors::sales_error_to_response(e),
    }
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.sales.get_sale(&SaleId::new(id)) {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => errors::sales_error_to_response(e),
    }
}

/// `GET /sales?user_id=..&status=..`; both parameters optional, empty means
/// "no filter".
pub async fn search_sales(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::SearchSalesQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };

    let user_id = query.user_id.map(UserId::new);
    match services
        .sales
        .search_sales(user_id.as_ref(), query.status.as_deref())
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => errors::sales_error_to_response(e),
    }
}
