use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

/// Cat record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Cat {
    pub cat_id: i32,
    pub cat_name: String,
    pub weight: f64,
    #[serde(with = "super::iso_date")]
    pub birthdate: Date,
    pub filename: String, // stored upload, never taken from the request body
    pub lat: f64,
    pub lng: f64,
    pub owner: i32, // users.user_id of the uploader
}

/// Insert shape; `filename`, `lat`, `lng` and `owner` come from the request context.
#[derive(Debug, Clone)]
pub struct NewCat {
    pub cat_name: String,
    pub weight: f64,
    pub birthdate: Date,
    pub filename: String,
    pub lat: f64,
    pub lng: f64,
    pub owner: i32,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct CatChanges {
    pub cat_name: Option<String>,
    pub weight: Option<f64>,
    pub birthdate: Option<Date>,
}
