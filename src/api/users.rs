use crate::api::AppState;
use crate::api::extract::Payload;
use crate::api::schemas::users::{User as UserSchema, UserPayload};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Only the canonical decimal form names a record, so `01` and `+1` are unknown ids.
fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>().ok().filter(|id| id.to_string() == raw).ok_or(AppError::NotFound)
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.user_service.list().await?;
    Ok(Json(users.into_iter().map(UserSchema::from).collect::<Vec<_>>()))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let user = state.user_service.get(parse_id(&id)?).await?;
    Ok(Json(UserSchema::from(user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Payload(payload): Payload<UserPayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(UserSchema::from(user))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Payload<UserPayload>, AppError>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let Payload(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            // An unknown id wins over a body that could not be decoded.
            state.user_service.get(id).await?;
            return Err(rejection);
        }
    };

    let user = state.user_service.update(id, payload.into()).await?;
    Ok(Json(UserSchema::from(user)))
}

pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    state.user_service.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
