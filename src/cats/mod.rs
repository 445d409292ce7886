use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;

pub use repo::{CatStore, PgCatStore};
pub use repo_types::{Cat, CatChanges, NewCat};

// `YYYY-MM-DD` on the wire, matching the DATE column.
time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/cats", get(handlers::cat_list_get).post(handlers::cat_post))
        .route(
            "/cats/:id",
            get(handlers::cat_get)
                .put(handlers::cat_put)
                .delete(handlers::cat_delete),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
