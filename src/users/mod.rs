use axum::{routing::get, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;

pub use repo::{PgUserStore, UserStore};
pub use repo_types::{NewUser, Role, User, UserChanges, UserCredentials};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::user_list_get)
                .post(handlers::user_post)
                .put(handlers::user_put_current)
                .delete(handlers::user_delete_current),
        )
        .route("/users/token", get(handlers::check_token))
        .route(
            "/users/:id",
            get(handlers::user_get)
                .put(handlers::user_put)
                .delete(handlers::user_delete),
        )
}
