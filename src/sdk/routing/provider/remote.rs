use super::types::{DirectionsRequest, DirectionsResponse, DirectionsSummary};
use crate::sdk::config::RoutingConfig;
use crate::sdk::routing::coord::Coord;
use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::service::RoutingProvider;
use crate::sdk::util::rate_limit::{ors_limiter, Limiter};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;

const DIRECTIONS_PATH: &str = "/v2/directions/driving-hgv/json";
const ORS_ACCEPT: &str =
    "application/json, application/geo+json, application/gpx+xml, img/png; charset=utf-8";

/// OpenRouteService directions client. One instance owns one HTTP client and
/// one limiter and is meant to be shared for the life of the process.
pub struct RemoteOrsProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    limiter: Limiter,
}

impl RemoteOrsProvider {
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            limiter: ors_limiter(config.requests_per_minute),
        })
    }

    pub fn directions_url(&self) -> String {
        format!("{}{}", self.base_url, DIRECTIONS_PATH)
    }
}

#[async_trait]
impl RoutingProvider for RemoteOrsProvider {
    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_directions(
        &self,
        start: Coord,
        end: Coord,
    ) -> Result<DirectionsSummary, RoutingError> {
        // Never send a request without a key.
        let api_key = self.api_key.as_deref().ok_or(RoutingError::MissingApiKey)?;

        self.limiter.until_ready().await;
        let url = self.directions_url();
        let body = DirectionsRequest::lorry(start, end);
        log::debug!(
            "[PROVIDER] Calling remote get_directions for {} -> {}",
            start,
            end
        );

        let response = match self
            .client
            .post(&url)
            .header(AUTHORIZATION, api_key)
            .header(ACCEPT, ORS_ACCEPT)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::debug!(
                    "Failed to send POST request. URL: {}\nBody: {}\nError: {}",
                    url,
                    serde_json::to_string_pretty(&body).unwrap_or_default(),
                    e
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RoutingError::from_status(status.as_u16(), text));
        }

        let route_response: DirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse DirectionsResponse. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        route_response
            .routes
            .first()
            .map(|route| route.summary)
            .ok_or(RoutingError::NoRoute)
    }
}
