use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use super::{GeocodeError, Geocoder};
use crate::config::GeocoderConfig;
use crate::gps::Coordinate;

/// OpenStreetMap Nominatim search.
pub struct NominatimGeocoder {
    endpoint: String,
    client: Client,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "Nominatim"
    }

    async fn lookup(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        let text = resp.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(GeocodeError::Service(format!("HTTP {status}: {text}")));
        }

        parse_places(&text)
    }
}

fn classify(e: reqwest::Error) -> GeocodeError {
    if e.is_timeout() {
        GeocodeError::Timeout
    } else {
        GeocodeError::Service(e.to_string())
    }
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Parse a Nominatim search response, returning the first hit.
pub fn parse_places(body: &str) -> Result<Option<Coordinate>, GeocodeError> {
    let places: Vec<Place> = serde_json::from_str(body)
        .map_err(|e| GeocodeError::Service(format!("unexpected response: {e}")))?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|e| GeocodeError::Service(format!("invalid coordinate {value:?}: {e}")))
    };

    Coordinate::new(parse(&place.lat)?, parse(&place.lon)?)
        .map(Some)
        .map_err(|e| GeocodeError::Service(e.to_string()))
}
