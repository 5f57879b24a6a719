/*!
 * Backend Gateway
 *
 * The only seam through which the console talks to the backend service.
 * Implementations hold no session state; they translate calls into requests
 * and responses into typed payloads. Deciding whether a payload means success
 * is left to the caller.
 */

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::GatewayResult;
use crate::core::models::{AdapterEntry, NetworkEntry, ScanSummary};

/// `GET /` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendStatus {
    pub status: String,
    pub tool: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdapterListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub adapters: Vec<AdapterEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdapterInfoResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub info: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorModeResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub interface: String,
    pub duration: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub scan_id: Option<String>,
    #[serde(default)]
    pub networks: Vec<NetworkEntry>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanHistoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub scans: Vec<ScanSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeauthRequest {
    pub interface: String,
    pub target_bssid: String,
    /// Serialised as `null` when absent (broadcast)
    pub target_client: Option<String>,
    pub packets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRequest {
    pub interface: String,
    pub target_bssid: String,
    pub channel: u32,
    pub duration: u32,
    #[serde(skip_serializing_if = "is_false")]
    pub use_deauth: bool,
}

/// Operation report nested under `result` by attack and capture endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AttackReport {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub capture_file: Option<String>,
}

/// Response of the deauth and handshake capture endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AttackResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<AttackReport>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AttackResponse {
    /// The backend declares success at the top level and, when it nests a
    /// report carrying its own flag, there as well.
    pub fn succeeded(&self) -> bool {
        self.success
            && self
                .result
                .as_ref()
                .and_then(|r| r.success)
                .unwrap_or(true)
    }

    /// Most specific human-readable text the backend supplied
    pub fn message(&self) -> Option<&str> {
        let report = self.result.as_ref();
        report
            .and_then(|r| r.message.as_deref())
            .or_else(|| report.and_then(|r| r.error.as_deref()))
            .or(self.message.as_deref())
            .filter(|m| !m.trim().is_empty())
    }

    pub fn capture_file(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.capture_file.as_deref())
    }
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Request/response contract with the backend service
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn status(&self) -> GatewayResult<BackendStatus>;

    async fn list_adapters(&self) -> GatewayResult<AdapterListResponse>;

    async fn adapter_info(&self, interface: &str) -> GatewayResult<AdapterInfoResponse>;

    async fn set_monitor_mode(
        &self,
        interface: &str,
        enabled: bool,
    ) -> GatewayResult<MonitorModeResponse>;

    async fn start_scan(&self, request: &ScanRequest) -> GatewayResult<ScanResponse>;

    async fn scan_history(&self, limit: u32) -> GatewayResult<ScanHistoryResponse>;

    async fn deauth(&self, request: &DeauthRequest) -> GatewayResult<AttackResponse>;

    async fn capture_handshake(&self, request: &CaptureRequest) -> GatewayResult<AttackResponse>;
}
