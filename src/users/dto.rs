use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use super::repo_types::Role;

lazy_static! {
    pub(crate) static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct PostUser {
    #[validate(length(min = 3, message = "user_name must be at least 3 characters"))]
    pub user_name: String,
    #[validate(regex(path = "EMAIL_RE", message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for updating a user; every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PutUser {
    #[validate(length(min = 3, message = "user_name must be at least 3 characters"))]
    pub user_name: Option<String>,
    #[validate(regex(path = "EMAIL_RE", message = "email must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}
