use axum::{extract::State, Json};
use tracing::{info, instrument, warn};

use super::{
    dto::{PostUser, PutUser},
    repo_types::{NewUser, Role, User, UserChanges},
};
use crate::{
    auth::{
        password::{hash_if_present, hash_password},
        AuthUser,
    },
    error::{AppError, AppResult, MessageResponse},
    extract::{JsonBody, ValidId, ValidatedJson},
    state::AppState,
};

#[instrument(skip(state))]
pub async fn user_list_get(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.list_all().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn user_get(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> AppResult<Json<User>> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, body))]
pub async fn user_post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PostUser>,
) -> AppResult<Json<MessageResponse>> {
    let password_hash = hash_password(&body.password)?;
    let id = state
        .users
        .create(NewUser {
            user_name: body.user_name,
            email: body.email.trim().to_lowercase(),
            password_hash,
            role: Role::User,
        })
        .await?;
    info!(user_id = id, "user added");
    Ok(Json(MessageResponse::with_id("user added", id)))
}

/// Admin path. The body is deliberately taken as-is, without validation rules.
#[instrument(skip(state, body))]
pub async fn user_put(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidId(id): ValidId,
    JsonBody(body): JsonBody<PutUser>,
) -> AppResult<Json<MessageResponse>> {
    caller.require_admin()?;
    state.users.update(into_changes(body)?, id).await?;
    info!(user_id = id, by = caller.user_id, "user modified by admin");
    Ok(Json(MessageResponse::new("user modified")))
}

#[instrument(skip(state, body))]
pub async fn user_put_current(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidatedJson(body): ValidatedJson<PutUser>,
) -> AppResult<Json<MessageResponse>> {
    if body.role.is_some() && !caller.is_admin() {
        warn!(user_id = caller.user_id, "non-admin tried to change own role");
        return Err(AppError::admin_only());
    }
    state
        .users
        .update(into_changes(body)?, caller.user_id)
        .await?;
    info!(user_id = caller.user_id, "user modified");
    Ok(Json(MessageResponse::new("user modified")))
}

#[instrument(skip(state))]
pub async fn user_delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidId(id): ValidId,
) -> AppResult<Json<MessageResponse>> {
    caller.require_admin()?;
    state.users.delete(id).await?;
    info!(user_id = id, by = caller.user_id, "user deleted by admin");
    Ok(Json(MessageResponse::new("user deleted")))
}

#[instrument(skip(state))]
pub async fn user_delete_current(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    state.users.delete(caller.user_id).await?;
    info!(user_id = caller.user_id, "user deleted");
    Ok(Json(MessageResponse::new("user deleted")))
}

/// Echoes the identity carried by the bearer token.
pub async fn check_token(caller: Option<AuthUser>) -> AppResult<Json<AuthUser>> {
    caller
        .map(Json)
        .ok_or_else(|| AppError::Forbidden("token not valid".into()))
}

fn into_changes(body: PutUser) -> AppResult<UserChanges> {
    let password_hash = hash_if_present(body.password.as_deref())?;
    Ok(UserChanges {
        user_name: body.user_name,
        email: body.email.map(|e| e.trim().to_lowercase()),
        password_hash,
        role: body.role,
    })
}
