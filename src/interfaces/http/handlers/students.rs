use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    domain::student::{CreateStudentCommand, Student, UpdateStudentCommand},
    interfaces::http::extractors::ValidatedJson,
    shared::errors::ApiError,
    state::SharedState,
};

use super::parse_id;

#[derive(Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub group_id: i64,
}

#[derive(Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub group_id: i64,
}

#[derive(Deserialize)]
pub struct ListStudentsParams {
    pub query: Option<String>,
}

// The created student is echoed without the email: the entity never carries
// it, so no response can.
pub async fn create_student(
    State(state): State<SharedState>,
    ValidatedJson(payload): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let student = state
        .student_service
        .create_student(CreateStudentCommand {
            name: payload.name,
            email: payload.email,
            group_id: payload.group_id,
        })
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn list_students(
    State(state): State<SharedState>,
    Query(params): Query<ListStudentsParams>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = match params.query.as_deref() {
        Some(query) if !query.is_empty() => state.student_service.search_students(query).await,
        _ => state.student_service.list_students().await,
    }
    .map_err(ApiError::from)?;

    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id)?;

    let student = state
        .student_service
        .get_student(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(student))
}

pub async fn update_student(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    let id = parse_id(&id)?;

    let student = state
        .student_service
        .update_student(
            id,
            UpdateStudentCommand {
                name: payload.name,
                group_id: payload.group_id,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;

    state
        .student_service
        .delete_student(id)
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
