use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeoConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Turns the free-text location of an upload into coordinates.
/// Never fails: anything unresolvable yields the configured default point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, query: Option<&str>) -> Coordinates;
}

pub struct FixedGeocoder(pub Coordinates);

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn locate(&self, _query: Option<&str>) -> Coordinates {
        self.0
    }
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    fallback: Coordinates,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, fallback: Coordinates) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cat-registry/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .context("build geocoder http client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fallback,
        })
    }

    async fn search(&self, query: &str) -> anyhow::Result<Option<Coordinates>> {
        let places: Vec<Place> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .context("geocoder request")?
            .error_for_status()
            .context("geocoder status")?
            .json()
            .await
            .context("geocoder body")?;
        places.into_iter().next().map(parse_place).transpose()
    }
}

fn parse_place(place: Place) -> anyhow::Result<Coordinates> {
    Ok(Coordinates {
        lat: place.lat.parse().context("lat")?,
        lng: place.lon.parse().context("lon")?,
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn locate(&self, query: Option<&str>) -> Coordinates {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return self.fallback;
        };
        match self.search(query).await {
            Ok(Some(coords)) => {
                debug!(%query, lat = coords.lat, lng = coords.lng, "geocoded");
                coords
            }
            Ok(None) => {
                warn!(%query, "no geocoding match; using default point");
                self.fallback
            }
            Err(e) => {
                warn!(error = %e, %query, "geocoding failed; using default point");
                self.fallback
            }
        }
    }
}

pub fn from_config(cfg: &GeoConfig) -> anyhow::Result<Arc<dyn Geocoder>> {
    let fallback = Coordinates {
        lat: cfg.default_lat,
        lng: cfg.default_lng,
    };
    let geocoder: Arc<dyn Geocoder> = match &cfg.url {
        Some(url) => Arc::new(NominatimGeocoder::new(url.clone(), fallback)?),
        None => Arc::new(FixedGeocoder(fallback)),
    };
    Ok(geocoder)
}
