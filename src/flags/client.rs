//! Harness Feature Flags client.
//!
//! # Responsibilities
//! - Authenticate with the SDK key and cache the session token
//! - Evaluate a single boolean flag for a target
//! - Re-authenticate once when the token is rejected
//!
//! # Protocol
//! ```text
//! POST {base}/client/auth                 {"apiKey": "..."} → {"authToken": "<jwt>"}
//! GET  {base}/client/env/{env}/target/{id}/evaluations/{flag}?cluster={cluster}
//!                                         → {"kind": "boolean", "value": "true"}
//! ```
//! The environment and cluster come from the JWT claims.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use crate::config::FlagConfig;
use crate::flags::types::{FlagError, FlagOracle, FlagResult, Target};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    api_key: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    auth_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenClaims {
    environment: String,
    cluster_identifier: Option<String>,
}

#[derive(Deserialize)]
struct Evaluation {
    kind: String,
    value: String,
}

/// Authenticated session with the flag service.
#[derive(Debug, Clone)]
struct Session {
    token: String,
    environment: String,
    cluster: String,
}

/// Feature flag client for the Harness client API.
pub struct HarnessClient {
    http: reqwest::Client,
    base_url: Url,
    sdk_key: String,
    session: Mutex<Option<Session>>,
}

impl HarnessClient {
    /// Create a client. No network traffic happens until the first evaluation.
    pub fn new(sdk_key: impl Into<String>, config: &FlagConfig) -> FlagResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FlagError::Config(format!("invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FlagError::Config(format!("base URL '{}' cannot carry a path", base_url)));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            sdk_key: sdk_key.into(),
            session: Mutex::new(None),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn authenticate(&self) -> FlagResult<Session> {
        let response = self
            .http
            .post(self.endpoint(&["client", "auth"]))
            .json(&AuthRequest { api_key: &self.sdk_key })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FlagError::Auth(format!("SDK key rejected ({})", status.as_u16())));
        }
        if !status.is_success() {
            return Err(FlagError::Status {
                endpoint: "auth",
                status: status.as_u16(),
            });
        }

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| FlagError::Decode(format!("auth response: {}", e)))?;
        let claims = decode_claims(&body.auth_token)?;

        tracing::info!(environment = %claims.environment, "Authenticated with flag service");

        Ok(Session {
            token: body.auth_token,
            environment: claims.environment,
            cluster: claims.cluster_identifier.unwrap_or_else(|| "1".to_string()),
        })
    }

    async fn session(&self) -> FlagResult<Session> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }
        let session = self.authenticate().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    async fn invalidate(&self) {
        *self.session.lock().await = None;
    }

    /// One evaluation call. `Ok(None)` means the token was rejected.
    async fn evaluate_once(&self, session: &Session, flag: &str, target: &Target) -> FlagResult<Option<bool>> {
        let mut url = self.endpoint(&[
            "client",
            "env",
            session.environment.as_str(),
            "target",
            target.identifier.as_str(),
            "evaluations",
            flag,
        ]);
        url.query_pairs_mut().append_pair("cluster", &session.cluster);

        let response = self.http.get(url).bearer_auth(&session.token).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FlagError::Status {
                endpoint: "evaluations",
                status: status.as_u16(),
            });
        }

        let evaluation: Evaluation = response
            .json()
            .await
            .map_err(|e| FlagError::Decode(format!("evaluation response: {}", e)))?;
        parse_bool_evaluation(flag, evaluation).map(Some)
    }
}

#[async_trait]
impl FlagOracle for HarnessClient {
    async fn bool_variation(&self, flag: &str, target: &Target) -> FlagResult<bool> {
        let session = self.session().await?;
        if let Some(value) = self.evaluate_once(&session, flag, target).await? {
            return Ok(value);
        }

        tracing::info!("Flag service token rejected, re-authenticating");
        self.invalidate().await;
        let session = self.session().await?;
        match self.evaluate_once(&session, flag, target).await? {
            Some(value) => Ok(value),
            None => Err(FlagError::Auth("token rejected after re-authentication".to_string())),
        }
    }
}

fn decode_claims(token: &str) -> FlagResult<TokenClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| FlagError::Auth("auth token is not a JWT".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| FlagError::Auth(format!("auth token payload: {}", e)))?;
    serde_json::from_slice(&bytes).map_err(|e| FlagError::Auth(format!("auth token claims: {}", e)))
}

fn parse_bool_evaluation(flag: &str, evaluation: Evaluation) -> FlagResult<bool> {
    if evaluation.kind != "boolean" {
        return Err(FlagError::NotBoolean {
            flag: flag.to_string(),
            kind: evaluation.kind,
        });
    }
    match evaluation.value.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(FlagError::Decode(format!("boolean flag '{}' has value '{}'", flag, other))),
    }
}
