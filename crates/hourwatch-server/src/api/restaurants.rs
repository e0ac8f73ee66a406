use axum::{
    extract::{Query, State},
    Extension, Json,
};
use hourwatch_db::{StatusRecordRow, StatusSummaryRow};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct RestaurantsQuery {
    /// When true, only rows whose expected and actual status disagree.
    pub mismatched: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupQuery {
    pub name: String,
    pub address: String,
}

pub(super) async fn list_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RestaurantsQuery>,
) -> Result<Json<ApiResponse<Vec<StatusRecordRow>>>, ApiError> {
    let mut rows = hourwatch_db::list_status_records(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if query.mismatched == Some(true) {
        rows.retain(|row| row.mismatch);
    }

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn restaurants_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<StatusSummaryRow>>, ApiError> {
    let summary = hourwatch_db::status_summary(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn lookup_restaurant(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ApiResponse<StatusRecordRow>>, ApiError> {
    let row = hourwatch_db::get_status_record(&state.pool, &query.name, &query.address)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: row,
        meta: ResponseMeta::new(req_id.0),
    }))
}
