//! Scripted backend shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{broadcast, Semaphore};

use redwifi::{
    Adapter, AdapterEntry, AdapterInfoResponse, AdapterListResponse, AdapterMode, AdapterStatus,
    AttackReport, AttackResponse, BackendGateway, BackendStatus, CaptureRequest, ConsoleConfig,
    ConsoleSession, DeauthRequest, GatewayError, GatewayResult, MonitorModeResponse,
    NetworkEntry, Notification, ScanHistoryResponse, ScanRequest, ScanResponse, WirelessNetwork,
};

/// Replies for one endpoint. The last scripted reply repeats.
pub struct Script<T> {
    replies: Mutex<VecDeque<Result<T, String>>>,
}

impl<T: Clone + Default> Script<T> {
    fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
        }
    }

    pub fn reply(&self, response: T) {
        self.replies.lock().push_back(Ok(response));
    }

    /// Fail with a connection error carrying `message`
    pub fn fail(&self, message: &str) {
        self.replies.lock().push_back(Err(message.to_string()));
    }

    fn next(&self) -> GatewayResult<T> {
        let mut replies = self.replies.lock();
        let reply = if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap_or_else(|| Ok(T::default()))
        };
        reply.map_err(GatewayError::Connection)
    }
}

/// A request the mock received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status,
    ListAdapters,
    AdapterInfo(String),
    SetMonitorMode(String, bool),
    StartScan(ScanRequest),
    ScanHistory(u32),
    Deauth(DeauthRequest),
    Capture(CaptureRequest),
}

pub struct MockGateway {
    pub adapters: Script<AdapterListResponse>,
    pub info: Script<AdapterInfoResponse>,
    pub monitor: Script<MonitorModeResponse>,
    pub scans: Script<ScanResponse>,
    pub history: Script<ScanHistoryResponse>,
    pub deauth: Script<AttackResponse>,
    pub capture: Script<AttackResponse>,
    calls: Mutex<Vec<Call>>,
    /// Holds monitor, scan and attack requests until a permit is added
    gate: Option<Arc<Semaphore>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(None))
    }

    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (Arc::new(Self::build(Some(Arc::clone(&gate)))), gate)
    }

    fn build(gate: Option<Arc<Semaphore>>) -> Self {
        Self {
            adapters: Script::new(),
            info: Script::new(),
            monitor: Script::new(),
            scans: Script::new(),
            history: Script::new(),
            deauth: Script::new(),
            capture: Script::new(),
            calls: Mutex::new(Vec::new()),
            gate,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| matches(c)).count()
    }

    pub fn scan_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::StartScan(_)))
    }

    pub fn attack_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Deauth(_) | Call::Capture(_)))
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn status(&self) -> GatewayResult<BackendStatus> {
        self.record(Call::Status);
        Ok(BackendStatus {
            status: "online".to_string(),
            tool: "Mock backend".to_string(),
            version: "0.0.1".to_string(),
        })
    }

    async fn list_adapters(&self) -> GatewayResult<AdapterListResponse> {
        self.record(Call::ListAdapters);
        self.adapters.next()
    }

    async fn adapter_info(&self, interface: &str) -> GatewayResult<AdapterInfoResponse> {
        self.record(Call::AdapterInfo(interface.to_string()));
        self.info.next()
    }

    async fn set_monitor_mode(
        &self,
        interface: &str,
        enable: bool,
    ) -> GatewayResult<MonitorModeResponse> {
        self.record(Call::SetMonitorMode(interface.to_string(), enable));
        self.pass_gate().await;
        self.monitor.next()
    }

    async fn start_scan(&self, request: &ScanRequest) -> GatewayResult<ScanResponse> {
        self.record(Call::StartScan(request.clone()));
        self.pass_gate().await;
        self.scans.next()
    }

    async fn scan_history(&self, limit: u32) -> GatewayResult<ScanHistoryResponse> {
        self.record(Call::ScanHistory(limit));
        self.history.next()
    }

    async fn deauth(&self, request: &DeauthRequest) -> GatewayResult<AttackResponse> {
        self.record(Call::Deauth(request.clone()));
        self.pass_gate().await;
        self.deauth.next()
    }

    async fn capture_handshake(&self, request: &CaptureRequest) -> GatewayResult<AttackResponse> {
        self.record(Call::Capture(request.clone()));
        self.pass_gate().await;
        self.capture.next()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn session(gateway: &Arc<MockGateway>) -> ConsoleSession {
    let gateway: Arc<dyn BackendGateway> = gateway.clone();
    ConsoleSession::new(ConsoleConfig::default(), gateway)
}

pub fn adapter_list(adapters: &[(&str, AdapterMode)]) -> AdapterListResponse {
    AdapterListResponse {
        success: true,
        adapters: adapters
            .iter()
            .map(|(name, mode)| AdapterEntry::Adapter(Adapter::new(*name, *mode, AdapterStatus::Up)))
            .collect(),
    }
}

pub fn network(bssid: &str, essid: &str, channel: &str) -> WirelessNetwork {
    WirelessNetwork::new(bssid, essid, channel)
}

pub fn scan_ok(networks: &[WirelessNetwork]) -> ScanResponse {
    ScanResponse {
        success: true,
        scan_id: Some("scan_20261018_101500".to_string()),
        networks: networks.iter().cloned().map(NetworkEntry::Network).collect(),
        total: Some(networks.len() as u32),
        message: None,
    }
}

pub fn attack_ok(capture_file: Option<&str>) -> AttackResponse {
    AttackResponse {
        success: true,
        result: Some(AttackReport {
            success: Some(true),
            message: Some("done".to_string()),
            error: None,
            capture_file: capture_file.map(str::to_string),
        }),
        message: None,
    }
}

/// Session with `wlan0mon` listed and selected
pub async fn ready_session(gateway: &Arc<MockGateway>) -> ConsoleSession {
    gateway
        .adapters
        .reply(adapter_list(&[("wlan0mon", AdapterMode::Monitor)]));
    let session = session(gateway);
    session.adapters().refresh().await;
    session
}

/// Every notification received so far
pub fn drain(events: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut notifications = Vec::new();
    while let Ok(notification) = events.try_recv() {
        notifications.push(notification);
    }
    notifications
}

/// Yield until `condition` holds
pub async fn until(condition: impl Fn() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
