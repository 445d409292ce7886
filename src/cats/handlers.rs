use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{CatForm, PutCat},
    repo_types::{Cat, CatChanges, NewCat},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult, MessageResponse},
    extract::{ValidId, ValidatedJson},
    state::AppState,
};

#[instrument(skip(state))]
pub async fn cat_list_get(State(state): State<AppState>) -> AppResult<Json<Vec<Cat>>> {
    let cats = state.cats.list_all().await?;
    Ok(Json(cats))
}

#[instrument(skip(state))]
pub async fn cat_get(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> AppResult<Json<Cat>> {
    let cat = state.cats.get_by_id(id).await?;
    Ok(Json(cat))
}

/// POST /cats (multipart): text fields `cat_name`, `weight`, `birthdate`,
/// optional `location`, picture in part `cat`.
#[instrument(skip(state, mp))]
pub async fn cat_post(
    State(state): State<AppState>,
    caller: AuthUser,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    let mp = mp.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = CatForm::read(mp).await?;

    let cat = form.post_cat().map_err(|e| {
        warn!(error = %e, "cat_post validation");
        e
    })?;
    let Some(file) = form.file.as_ref() else {
        return Err(AppError::BadRequest("No file uploaded".into()));
    };

    let filename = state
        .uploads
        .store(&file.file_name, &file.content_type, file.body.clone())
        .await?;
    let coords = state.geocoder.locate(form.location()).await;

    let new_cat = NewCat {
        cat_name: cat.cat_name,
        weight: cat.weight,
        birthdate: cat.birthdate,
        filename: filename.clone(),
        lat: coords.lat,
        lng: coords.lng,
        owner: caller.user_id,
    };
    let id = match state.cats.create(new_cat).await {
        Ok(id) => id,
        Err(e) => {
            if let Err(cleanup) = state.uploads.remove(&filename).await {
                warn!(error = %cleanup, %filename, "failed to remove orphaned upload");
            }
            return Err(e);
        }
    };

    info!(cat_id = id, owner = caller.user_id, %filename, "cat added");
    Ok(Json(MessageResponse::with_id("cat added", id)))
}

#[instrument(skip(state, body))]
pub async fn cat_put(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidId(id): ValidId,
    ValidatedJson(body): ValidatedJson<PutCat>,
) -> AppResult<Json<MessageResponse>> {
    let changes = CatChanges {
        cat_name: body.cat_name,
        weight: body.weight,
        birthdate: body.birthdate,
    };
    state
        .cats
        .update(changes, id, caller.user_id, caller.role)
        .await?;
    info!(cat_id = id, by = caller.user_id, "cat updated");
    Ok(Json(MessageResponse::with_id("cat updated", id)))
}

/// Any caller may delete any cat: there is no owner or role check here.
#[instrument(skip(state))]
pub async fn cat_delete(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> AppResult<Json<MessageResponse>> {
    state.cats.delete(id).await?;
    info!(cat_id = id, "cat deleted");
    Ok(Json(MessageResponse::with_id("cat deleted", id)))
}
