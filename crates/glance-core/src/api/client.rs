//! HTTP client for the realtime telemetry service.
//!
//! The service exposes a single endpoint that multiplexes on a `method`
//! form field: requests are form-encoded POST bodies of the shape
//! `method=<name>&<param>=<value>&...`, responses are one JSON body.
//! A response that does not parse as JSON is treated as malformed; callers
//! keep their previous state in that case.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::errors::ApiError;
use crate::api::types::{
    ActiveSessions, SessionFeatures, SessionPredictions, parse_name_list,
};
use crate::config::ServiceConfig;

/// Typed client for the telemetry service.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl TelemetryClient {
    /// Build a client from the `[service]` config section.
    pub fn new(service: &ServiceConfig) -> Result<Self, ApiError> {
        let endpoint = Url::parse(&service.base_url).map_err(|e| ApiError::InvalidUrl {
            url: service.base_url.clone(),
            message: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(service.timeout_secs()))
            .build()?;
        Ok(Self { http, endpoint })
    }

    /// Greeting/connectivity probe. Returns the raw response text.
    pub async fn say_hello(&self) -> Result<String, ApiError> {
        let body = self.call("say_hello", Vec::new()).await?;
        Ok(body.trim().to_string())
    }

    /// All sessions currently live for `game_id`.
    pub async fn get_all_active_sessions(
        &self,
        game_id: &str,
        require_player_id: bool,
    ) -> Result<ActiveSessions, ApiError> {
        let method = "get_all_active_sessions";
        let raw = self
            .call_decoded(
                method,
                vec![
                    ("gameID", game_id.to_string()),
                    ("require_player_id", require_player_id.to_string()),
                ],
            )
            .await?;
        ActiveSessions::parse(raw).map_err(|e| ApiError::from_payload(method, e))
    }

    /// Sessions currently live for `game_id` in one state/city.
    pub async fn get_active_sessions_by_loc(
        &self,
        game_id: &str,
        state: &str,
        city: &str,
    ) -> Result<ActiveSessions, ApiError> {
        let method = "get_active_sessions_by_loc";
        let raw = self
            .call_decoded(
                method,
                vec![
                    ("gameID", game_id.to_string()),
                    ("state", state.to_string()),
                    ("city", city.to_string()),
                ],
            )
            .await?;
        ActiveSessions::parse(raw).map_err(|e| ApiError::from_payload(method, e))
    }

    /// Model predictions for one session.
    ///
    /// `predictions` optionally narrows the result to the named models.
    pub async fn get_predictions_by_sess_id(
        &self,
        session_id: &str,
        game_id: &str,
        predictions: Option<&[String]>,
    ) -> Result<SessionPredictions, ApiError> {
        let method = "get_predictions_by_sessID";
        let mut params = vec![
            ("sessID", session_id.to_string()),
            ("gameID", game_id.to_string()),
        ];
        if let Some(names) = predictions {
            params.push(("predictions", names.join(",")));
        }
        let raw = self.call_decoded(method, params).await?;
        SessionPredictions::parse(session_id, raw).map_err(|e| ApiError::from_payload(method, e))
    }

    /// Names of the prediction models the service runs for `game_id`.
    pub async fn get_prediction_names_by_game(
        &self,
        game_id: &str,
    ) -> Result<Vec<String>, ApiError> {
        let method = "get_prediction_names_by_game";
        let value: Value = self
            .call_decoded(method, vec![("gameID", game_id.to_string())])
            .await?;
        parse_name_list(value).map_err(|e| ApiError::from_payload(method, e))
    }

    /// Extracted feature values for one session.
    ///
    /// `features` optionally narrows the result to the named features.
    pub async fn get_features_by_sess_id(
        &self,
        session_id: &str,
        game_id: &str,
        features: Option<&[String]>,
    ) -> Result<SessionFeatures, ApiError> {
        let method = "get_features_by_sessID";
        let mut params = vec![
            ("sessID", session_id.to_string()),
            ("gameID", game_id.to_string()),
        ];
        if let Some(names) = features {
            params.push(("features", names.join(",")));
        }
        let raw = self.call_decoded(method, params).await?;
        SessionFeatures::parse(session_id, raw).map_err(|e| ApiError::from_payload(method, e))
    }

    /// Names of the features extracted for `game_id`.
    pub async fn get_feature_names_by_game(&self, game_id: &str) -> Result<Vec<String>, ApiError> {
        let method = "get_feature_names_by_game";
        let value: Value = self
            .call_decoded(method, vec![("gameID", game_id.to_string())])
            .await?;
        parse_name_list(value).map_err(|e| ApiError::from_payload(method, e))
    }

    /// Issue one `method=...` call and return the response body.
    async fn call(
        &self,
        method: &'static str,
        params: Vec<(&'static str, String)>,
    ) -> Result<String, ApiError> {
        debug!(event = "core.api.request_started", method = method);

        let mut form: Vec<(&'static str, String)> = Vec::with_capacity(params.len() + 1);
        form.push(("method", method.to_string()));
        form.extend(params);

        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event = "core.api.request_rejected",
                method = method,
                status = status.as_u16()
            );
            return Err(ApiError::ServiceStatus {
                method,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            event = "core.api.request_completed",
            method = method,
            bytes = body.len()
        );
        Ok(body)
    }

    /// Issue one call and decode the JSON body into `T`.
    async fn call_decoded<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, ApiError> {
        let body = self.call(method, params).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            method,
            message: e.to_string(),
        })
    }
}
