//! Claims handlers

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Reads the submission form
///
/// Text fields: `claim_id`, `vin`, `policy_number`, `claim_date`. File field:
/// `damage_photo`. An empty file part counts as no photo. Unknown fields are
/// ignored.
async fn read_claim_form(mut multipart: Multipart) -> Result<ClaimForm, ApiError> {
    let mut form = ClaimForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "claim_id" => form.claim_id = field.text().await?,
            "vin" => form.vin = field.text().await?,
            "policy_number" => form.policy_number = field.text().await?,
            "claim_date" => form.claim_date = Some(field.text().await?),
            "damage_photo" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !(filename.is_empty() && bytes.is_empty()) {
                    form.damage_photo = Some(UploadedPhoto {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// Submits a claim
///
/// Returns 201 once the claim is accepted, even when some side effects
/// failed; the body lists what succeeded and the warnings.
pub async fn submit_claim(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let form = read_claim_form(multipart).await?;
    let claim = form.into_claim(state.clock.today())?;

    let outcome = state.intake.submit(claim).await?;
    info!(
        submission_id = %outcome.submission_id,
        claim_id = %outcome.report.claim_id,
        warnings = outcome.warnings.len(),
        "Claim accepted"
    );

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Lists report rows matching the filter
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let filter = query.into_filter()?;
    let view = state.queries.dashboard(&filter).await?;
    Ok(Json(view.into()))
}

/// Dashboard aggregates over the filtered rows
pub async fn report_summary(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let filter = query.into_filter()?;
    let view = state.queries.dashboard(&filter).await?;
    Ok(Json(view.into()))
}
