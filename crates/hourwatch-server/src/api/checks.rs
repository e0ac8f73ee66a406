use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use hourwatch_core::StatusRecord;
use hourwatch_pipeline::{CycleReport, LocationFailure};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CheckRunData {
    started_at: DateTime<Utc>,
    locations: usize,
    checked: usize,
    mismatches: usize,
    alerts_sent: usize,
    alerts_failed: usize,
    records: Vec<StatusRecord>,
    failures: Vec<LocationFailure>,
}

impl CheckRunData {
    fn from_report(locations: usize, report: CycleReport) -> Self {
        Self {
            started_at: report.started_at,
            locations,
            checked: report.records.len(),
            mismatches: report.mismatches(),
            alerts_sent: report.alerts_sent,
            alerts_failed: report.alerts_failed,
            records: report.records,
            failures: report.failures,
        }
    }
}

/// Runs one check cycle immediately and returns its report.
///
/// Per-location failures are part of the report; the request itself succeeds.
pub(super) async fn run_check(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<CheckRunData>> {
    tracing::info!(request_id = %req_id.0, "api: manual check cycle requested");
    let locations = state.monitor.settings().locations.len();
    let report = state.monitor.run_cycle(Utc::now()).await;

    Json(ApiResponse {
        data: CheckRunData::from_report(locations, report),
        meta: ResponseMeta::new(req_id.0),
    })
}
