use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{conflict_on_unique, AppError};
use crate::experts::repository;
use crate::experts::validation::{describe_errors, validate_expert, ExpertInput};
use crate::models::expert::ExpertRow;
use crate::state::AppState;

const MAX_BULK_EXPERTS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ListExpertsQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkExpertsRequest {
    pub experts: Vec<ExpertInput>,
}

#[derive(Debug, Serialize)]
pub struct BulkExpertsResponse {
    pub inserted: usize,
    pub experts: Vec<ExpertRow>,
}

/// GET /api/v1/experts
pub async fn handle_list_experts(
    State(state): State<AppState>,
    Query(params): Query<ListExpertsQuery>,
) -> Result<Json<Vec<ExpertRow>>, AppError> {
    let experts = repository::list_experts(&state.db, params.active_only).await?;
    Ok(Json(experts))
}

/// GET /api/v1/experts/:id
pub async fn handle_get_expert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpertRow>, AppError> {
    let expert = repository::get_expert(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expert {id} not found")))?;
    Ok(Json(expert))
}

/// POST /api/v1/admin/experts
pub async fn handle_create_expert(
    State(state): State<AppState>,
    Json(input): Json<ExpertInput>,
) -> Result<(StatusCode, Json<ExpertRow>), AppError> {
    let input = validate_expert(input).map_err(|e| AppError::Validation(describe_errors(&e)))?;

    let expert = repository::insert_expert(&state.db, &input)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                format!("An expert with email {} already exists", input.email),
            )
        })?;

    info!("Created expert {} ({})", expert.id, expert.email);
    Ok((StatusCode::CREATED, Json(expert)))
}

/// PUT /api/v1/admin/experts/:id
pub async fn handle_update_expert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ExpertInput>,
) -> Result<Json<ExpertRow>, AppError> {
    let input = validate_expert(input).map_err(|e| AppError::Validation(describe_errors(&e)))?;

    let expert = repository::update_expert(&state.db, id, &input)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                format!("An expert with email {} already exists", input.email),
            )
        })?
        .ok_or_else(|| AppError::NotFound(format!("Expert {id} not found")))?;

    info!("Updated expert {id}");
    Ok(Json(expert))
}

/// DELETE /api/v1/admin/experts/:id
pub async fn handle_delete_expert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repository::delete_expert(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Expert {id} not found")));
    }
    info!("Deleted expert {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/experts/bulk
///
/// Loads a batch of experts atomically. Used by the `seed` binary.
pub async fn handle_bulk_create_experts(
    State(state): State<AppState>,
    Json(request): Json<BulkExpertsRequest>,
) -> Result<(StatusCode, Json<BulkExpertsResponse>), AppError> {
    let inputs = validate_batch(request.experts)?;

    let experts = repository::insert_experts(&state.db, &inputs)
        .await
        .map_err(|e| conflict_on_unique(e, "One or more experts already exist"))?;

    info!("Bulk-inserted {} experts", experts.len());
    Ok((
        StatusCode::CREATED,
        Json(BulkExpertsResponse {
            inserted: experts.len(),
            experts,
        }),
    ))
}

/// Validates every record, reporting failures by position. Duplicate emails within
/// the batch are rejected up front.
fn validate_batch(experts: Vec<ExpertInput>) -> Result<Vec<ExpertInput>, AppError> {
    if experts.is_empty() {
        return Err(AppError::Validation("experts cannot be empty".to_string()));
    }
    if experts.len() > MAX_BULK_EXPERTS {
        return Err(AppError::Validation(format!(
            "at most {MAX_BULK_EXPERTS} experts per batch"
        )));
    }

    let mut cleaned: Vec<ExpertInput> = Vec::with_capacity(experts.len());
    let mut failures = Vec::new();
    for (i, input) in experts.into_iter().enumerate() {
        match validate_expert(input) {
            Ok(input) => {
                if cleaned.iter().any(|c| c.email == input.email) {
                    failures.push(format!("[{i}] email: duplicate {} in batch", input.email));
                } else {
                    cleaned.push(input);
                }
            }
            Err(errors) => failures.push(format!("[{i}] {}", describe_errors(&errors))),
        }
    }

    if !failures.is_empty() {
        return Err(AppError::Validation(failures.join("; ")));
    }
    Ok(cleaned)
}
