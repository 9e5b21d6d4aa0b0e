use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    domain::group::{CreateGroupCommand, Group, UpdateGroupCommand},
    interfaces::http::extractors::ValidatedJson,
    shared::errors::ApiError,
    state::SharedState,
};

use super::parse_id;

#[derive(Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub parent_id: Option<i64>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub parent_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct ListGroupsParams {
    pub query: Option<String>,
}

pub async fn create_group(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = state
        .group_service
        .create_group(CreateGroupCommand {
            name: payload.name,
            parent_id: payload.parent_id,
        })
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(group)))
}

/// Without `query`: the full forest, subtrees expanded. With `query`: flat
/// name matches, no expansion.
pub async fn list_groups(
    State(state): State<SharedState>,
    Query(params): Query<ListGroupsParams>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = match params.query.as_deref() {
        Some(query) if !query.is_empty() => state.group_service.search_groups(query).await,
        _ => state.group_service.list_groups().await,
    }
    .map_err(ApiError::from)?;

    Ok(Json(groups))
}

pub async fn get_group(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let id = parse_id(&id)?;

    let group = state
        .group_service
        .get_group(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(group))
}

pub async fn update_group(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let id = parse_id(&id)?;

    let group = state
        .group_service
        .update_group(
            id,
            UpdateGroupCommand {
                name: payload.name,
                parent_id: payload.parent_id,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Json(group))
}

pub async fn delete_group(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    state
        .group_service
        .delete_group(id)
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
