use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    cats::{CatStore, PgCatStore},
    config::AppConfig,
    geocode::{self, Geocoder},
    storage::{S3UploadStore, UploadStore},
    users::{PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cats: Arc<dyn CatStore>,
    pub users: Arc<dyn UserStore>,
    pub uploads: Arc<dyn UploadStore>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        let uploads = Arc::new(S3UploadStore::new(&config.storage, "us-east-1").await?)
            as Arc<dyn UploadStore>;
        let geocoder = geocode::from_config(&config.geo)?;

        Ok(Self {
            cats: Arc::new(PgCatStore::new(db.clone())),
            users: Arc::new(PgUserStore::new(db)),
            config,
            uploads,
            geocoder,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        crate::testing::Fakes::new().state
    }
}
