/*!
 * HTTP Backend Gateway
 *
 * `reqwest` implementation of the backend contract. The client is built
 * without a request timeout: the backend's own scan and capture durations
 * bound how long a call can take.
 */

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::core::error::{GatewayError, GatewayResult};
use crate::core::gateway::{
    AdapterInfoResponse, AdapterListResponse, AttackResponse, BackendGateway, BackendStatus,
    CaptureRequest, DeauthRequest, MonitorModeResponse, ScanHistoryResponse, ScanRequest,
    ScanResponse,
};

/// Backend reached over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    client: Client,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Request(format!("invalid backend URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Request(format!(
                "backend URL {} cannot carry a path",
                base_url
            )));
        }
        let client = Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Request("backend URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> GatewayResult<T> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

/// Turn a response into `T`, mapping non-2xx statuses to `GatewayError::Status`
/// with the backend's `detail` text when present.
async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            detail: error_detail(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Extract the error text from a FastAPI-style `{"detail": ...}` body.
pub fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| {
                        item.get("msg")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| item.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Some(other) => Some(other.to_string()),
            None => Some(trimmed.to_string()),
        },
        _ => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn status(&self) -> GatewayResult<BackendStatus> {
        self.get(self.endpoint(&[])?).await
    }

    async fn list_adapters(&self) -> GatewayResult<AdapterListResponse> {
        self.get(self.endpoint(&["api", "adapter", "list"])?).await
    }

    async fn adapter_info(&self, interface: &str) -> GatewayResult<AdapterInfoResponse> {
        self.get(self.endpoint(&["api", "adapter", "info", interface])?)
            .await
    }

    async fn set_monitor_mode(
        &self,
        interface: &str,
        enabled: bool,
    ) -> GatewayResult<MonitorModeResponse> {
        let action = if enabled { "enable" } else { "disable" };
        let url = self.endpoint(&["api", "adapter", "monitor", action, interface])?;
        debug!(%url, "POST");
        let response = self.client.post(url).send().await?;
        decode(response).await
    }

    async fn start_scan(&self, request: &ScanRequest) -> GatewayResult<ScanResponse> {
        let url = self.endpoint(&["api", "scan", "start"])?;
        debug!(%url, interface = %request.interface, duration = request.duration, "POST");
        let response = self.client.post(url).json(request).send().await?;
        decode(response).await
    }

    async fn scan_history(&self, limit: u32) -> GatewayResult<ScanHistoryResponse> {
        let url = self.endpoint(&["api", "scan", "history"])?;
        debug!(%url, limit, "GET");
        let response = self
            .client
            .get(url)
            .query(&[("limit", limit)])
            .send()
            .await?;
        decode(response).await
    }

    async fn deauth(&self, request: &DeauthRequest) -> GatewayResult<AttackResponse> {
        let url = self.endpoint(&["api", "attack", "deauth"])?;
        debug!(%url, target = %request.target_bssid, packets = request.packets, "POST");
        let response = self.client.post(url).json(request).send().await?;
        decode(response).await
    }

    async fn capture_handshake(&self, request: &CaptureRequest) -> GatewayResult<AttackResponse> {
        let url = self.endpoint(&["api", "capture", "handshake"])?;
        debug!(%url, target = %request.target_bssid, channel = request.channel, "POST");
        let response = self.client.post(url).json(request).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let gateway = HttpGateway::new("http://localhost:8001").unwrap();
        let url = gateway
            .endpoint(&["api", "adapter", "monitor", "enable", "wlan0"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8001/api/adapter/monitor/enable/wlan0"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let gateway = HttpGateway::new("http://10.0.0.2:8001/backend/").unwrap();
        let url = gateway.endpoint(&["api", "scan", "start"]).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2:8001/backend/api/scan/start");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpGateway::new("not a url"),
            Err(GatewayError::Request(_))
        ));
    }

    #[test]
    fn test_error_detail_variants() {
        assert_eq!(
            error_detail(r#"{"detail": "Interface wlan9 not found"}"#).as_deref(),
            Some("Interface wlan9 not found")
        );
        assert_eq!(
            error_detail(r#"{"detail": [{"loc": ["body", "channel"], "msg": "value is not a valid integer"}]}"#)
                .as_deref(),
            Some("value is not a valid integer")
        );
        assert_eq!(error_detail("Internal Server Error").as_deref(), Some("Internal Server Error"));
        assert_eq!(error_detail("   "), None);
    }
}
