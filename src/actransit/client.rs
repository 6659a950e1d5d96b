//! HTTP client for the AC Transit API.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;
use tracing::{Instrument, info, info_span};

use crate::model::actransit_api_model::{Predictions, Stop};

const DEFAULT_STOPS_URL: &str = "https://api.actransit.org/transit/stops";

/// Environment variable holding the API token. Read only by
/// [`TransitClient::from_env`], which should only be called from the
/// composition point; everything else takes the token explicitly.
pub const TOKEN_ENV_VAR: &str = "ACTRANSIT_TOKEN";

static STOP_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[0-9]+").unwrap());

#[derive(thiserror::Error, Debug)]
pub enum TransitError {
    #[error("Invalid stop ID: {0}")]
    InvalidStopId(String),

    #[error("invalid request URL: {url}")]
    InvalidUrl { url: String },

    #[error("Request failed, status code {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("error sending request")]
    Transport(#[from] reqwest::Error),

    #[error("error decoding response body")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    token: String,
}

impl TransitClient {
    pub fn new(token: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("default reqwest client options are valid");

        Self { http, token }
    }

    /// Builds a client with the token from `ACTRANSIT_TOKEN`, empty if unset
    pub fn from_env() -> Self {
        Self::new(std::env::var(TOKEN_ENV_VAR).unwrap_or_default())
    }

    /// Retrieves all available stops
    #[tracing::instrument(err, skip(self))]
    pub async fn fetch_stops(&self, url_override: Option<&str>) -> Result<Vec<Stop>, TransitError> {
        let base_url = url_override.unwrap_or(DEFAULT_STOPS_URL);

        let stops_url = self.append_token_to_url(base_url)?;
        let response_body = self.http_request(stops_url).await?;
        let stops: Vec<Stop> = serde_json::from_str(&response_body)?;

        info!("got {} stops", stops.len());

        Ok(stops)
    }

    /// Retrieves the raw predictions for a stop by ID, in upstream order.
    /// Non-numeric stop IDs are rejected before any network activity.
    #[tracing::instrument(err, skip(self))]
    pub async fn fetch_predictions(
        &self,
        stop_id: &str,
        url_override: Option<&str>,
    ) -> Result<Predictions, TransitError> {
        if !STOP_ID_REGEX.is_match(stop_id) {
            return Err(TransitError::InvalidStopId(stop_id.to_string()));
        }

        let base_url = match url_override {
            Some(url) => url.to_string(),
            None => format!("{DEFAULT_STOPS_URL}/{stop_id}/predictions"),
        };

        let predictions_url = self.append_token_to_url(&base_url)?;
        let response_body = self.http_request(predictions_url).await?;
        let predictions: Predictions = serde_json::from_str(&response_body)?;

        info!("got {} predictions", predictions.len());

        Ok(predictions)
    }

    fn append_token_to_url(&self, base_url: &str) -> Result<Url, TransitError> {
        let url = format!("{}?token={}", base_url, self.token);

        Url::parse(&url).map_err(|_| TransitError::InvalidUrl { url })
    }

    async fn http_request(&self, url: Url) -> Result<String, TransitError> {
        let response = self
            .http
            .get(url)
            .send()
            .instrument(info_span!("Sending request"))
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response
                .text()
                .instrument(info_span!("Reading body of response"))
                .await
                .unwrap_or_default();

            return Err(TransitError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response
            .text()
            .instrument(info_span!("Reading body of response"))
            .await?)
    }
}
