//! Typed client for the Hivera HTTP API.
//!
//! Every operation takes the opaque per-account `auth_data` credential;
//! the base URL and the (optionally proxy-bound) client are injected at
//! construction. Response schemas are fully optional; the accessors
//! substitute the service's conventional defaults (0 for balances,
//! "Unknown" for the username) instead of propagating absence.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use core_logic::NetworkError;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const REFERRAL_CODE: &str = "2b6a4dfc8";
pub const UNKNOWN_USER: &str = "Unknown";

const QUALITY_MIN: i64 = 65;
const QUALITY_MAX: i64 = 93;
const CONTRIBUTE_TIMES: u32 = 10;

/// Body of one mining contribution. Freshly generated per call.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionPayload {
    pub from_date: i64,
    pub quality_connection: i64,
    pub times: u32,
}

impl ContributionPayload {
    pub fn generate() -> Self {
        Self {
            from_date: Utc::now().timestamp_millis(),
            quality_connection: rand::thread_rng().gen_range(QUALITY_MIN..=QUALITY_MAX),
            times: CONTRIBUTE_TIMES,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    pub result: Option<AuthResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResult {
    pub username: Option<String>,
}

impl AuthResponse {
    pub fn username(&self) -> String {
        self.result
            .as_ref()
            .and_then(|r| r.username.clone())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineResponse {
    pub result: Option<EngineResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineResult {
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(rename = "HIVERA")]
    pub hivera: Option<f64>,
    #[serde(rename = "POWER")]
    pub power: Option<f64>,
}

impl EngineResponse {
    pub fn profile(&self) -> Option<&Profile> {
        self.result.as_ref().and_then(|r| r.profile.as_ref())
    }

    pub fn power(&self) -> f64 {
        self.profile().and_then(|p| p.power).unwrap_or(0.0)
    }

    pub fn hivera(&self) -> f64 {
        self.profile().and_then(|p| p.hivera).unwrap_or(0.0)
    }
}

/// Seam between the mining loop and the remote service, so the loop can
/// be driven by a scripted double in tests.
#[async_trait]
pub trait MiningApi: Send + Sync {
    /// `GET auth` - resolves the display username.
    async fn authenticate(&self, auth_data: &str) -> Result<AuthResponse>;

    /// `GET referral` - the body is never read; only transport failures
    /// are errors here. Non-2xx statuses are reported through the
    /// returned code, mirroring the service's own tooling.
    async fn fetch_referral(&self, auth_data: &str) -> Result<StatusCode>;

    /// `GET engine/info` - fetches the HIVERA/POWER balances.
    async fn fetch_power(&self, auth_data: &str) -> Result<EngineResponse>;

    /// `POST v2/engine/contribute` - submits one mining contribution.
    async fn contribute(&self, auth_data: &str) -> Result<EngineResponse>;
}

pub struct HiveraApi {
    base_url: String,
    client: Client,
}

impl HiveraApi {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status_code: status.as_u16(),
                endpoint: path.to_string(),
            }
            .into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("invalid JSON from {}", path))
    }
}

#[async_trait]
impl MiningApi for HiveraApi {
    async fn authenticate(&self, auth_data: &str) -> Result<AuthResponse> {
        self.get_json("auth", &[("auth_data", auth_data)]).await
    }

    async fn fetch_referral(&self, auth_data: &str) -> Result<StatusCode> {
        let response = self
            .client
            .get(self.endpoint("referral"))
            .query(&[("referral_code", REFERRAL_CODE), ("auth_data", auth_data)])
            .send()
            .await
            .context("request to referral failed")?;

        Ok(response.status())
    }

    async fn fetch_power(&self, auth_data: &str) -> Result<EngineResponse> {
        self.get_json("engine/info", &[("auth_data", auth_data)])
            .await
    }

    async fn contribute(&self, auth_data: &str) -> Result<EngineResponse> {
        let payload = ContributionPayload::generate();
        let response = self
            .client
            .post(self.endpoint("v2/engine/contribute"))
            .query(&[("auth_data", auth_data)])
            .json(&payload)
            .send()
            .await
            .context("request to contribute failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status_code: status.as_u16(),
                endpoint: "v2/engine/contribute".to_string(),
            }
            .into());
        }

        response
            .json::<EngineResponse>()
            .await
            .context("invalid JSON from contribute")
    }
}
