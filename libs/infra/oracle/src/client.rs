// [libs/infra/oracle/src/client.rs]
/*!
 * =================================================================
 * APARATO: ORACLE UPLINK (FIRE-AND-FORGET)
 * CLASIFICACION: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: NEGOCIACION DE ANALYZE/REPORT/SYNC/STATS CONTRA EL
 * SERVICIO ORACULO REMOTO, CON TIMEOUTS AJUSTADOS Y SIN REINTENTOS
 * =================================================================
 */

use std::time::Duration;

use guardian_domain_models::{
    OracleAnalyzeRequest, OracleAnalyzeResponse, OracleReportRequest, OracleStatsRequest,
    OracleSyncRequest, OracleSyncResponse,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, instrument, warn};

use crate::errors::OracleError;

const ANALYZE_TIMEOUT: Duration = Duration::from_secs(4);
const REPORT_TIMEOUT: Duration = Duration::from_secs(5);
const SYNC_TIMEOUT: Duration = Duration::from_secs(5);
const STATS_TIMEOUT: Duration = Duration::from_secs(30);

/// A proxied, non-deserialized response from `/report`: the sidecar passes
/// the oracle's status and body straight through to its own caller.
pub struct ProxiedResponse {
    /// The oracle's HTTP status code.
    pub status: StatusCode,
    /// The oracle's raw response body.
    pub body: String,
}

/// Thin HTTP client to the remote oracle. Every call is a single POST with
/// no retries; callers are expected to fall back to a local decision on
/// any [`OracleError`].
#[derive(Clone)]
pub struct OracleClient {
    http: Client,
    base_url: String,
}

impl OracleClient {
    /// Builds a client pointed at `base_url` (e.g.
    /// `https://oracle.mailuminati.com`).
    pub fn new(base_url: String) -> Self {
        OracleClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self, request))]
    pub async fn analyze(
        &self,
        request: &OracleAnalyzeRequest,
    ) -> Result<OracleAnalyzeResponse, OracleError> {
        let response = self
            .post_json(&format!("{}/analyze", self.base_url), request, ANALYZE_TIMEOUT)
            .await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, request))]
    pub async fn report(&self, request: &OracleReportRequest) -> Result<ProxiedResponse, OracleError> {
        // /report proxies whatever status the oracle returns (including
        // its own 4xx/5xx), so this bypasses post_json's 2xx enforcement.
        let result = self
            .http
            .post(format!("{}/report", self.base_url))
            .json(request)
            .timeout(REPORT_TIMEOUT)
            .send()
            .await;
        let response = match result {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!("oracle /report call timed out");
                return Err(OracleError::Timeout);
            }
            Err(e) => return Err(OracleError::Transport(e)),
        };
        let status = response.status();
        let body = response.text().await?;
        Ok(ProxiedResponse { status, body })
    }

    #[instrument(skip(self, request))]
    pub async fn sync(&self, request: &OracleSyncRequest) -> Result<OracleSyncResponse, OracleError> {
        let response = self
            .post_json(&format!("{}/sync", self.base_url), request, SYNC_TIMEOUT)
            .await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, request))]
    pub async fn stats(&self, request: &OracleStatsRequest) -> Result<(), OracleError> {
        self.post_json(&format!("{}/stats", self.base_url), request, STATS_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        timeout: Duration,
    ) -> Result<reqwest::Response, OracleError> {
        let result = self.http.post(url).json(body).timeout(timeout).send().await;
        let response = match result {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                error!(%url, "oracle call timed out");
                return Err(OracleError::Timeout);
            }
            Err(e) => return Err(OracleError::Transport(e)),
        };
        if !response.status().is_success() {
            return Err(OracleError::NonSuccess(response.status().as_u16()));
        }
        Ok(response)
    }
}
