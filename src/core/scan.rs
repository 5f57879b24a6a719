/*!
 * Scan Session Controller
 *
 * Drives one scan at a time: Idle -> Scanning -> Idle. A successful scan
 * replaces the result list and triggers a best-effort history refresh that
 * never affects the scan's own outcome.
 */

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::adapters::AdapterRegistry;
use crate::core::config::ScanConfig;
use crate::core::flight::{FlightGuard, Outcome};
use crate::core::gateway::{BackendGateway, ScanRequest};
use crate::core::models::{NetworkEntry, ScanSession, ScanSummary, WirelessNetwork};
use crate::core::notifications::NotificationQueue;

/// Observable scan state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanState {
    pub scanning: bool,
    pub networks: Vec<WirelessNetwork>,
    pub last_scan: Option<ScanSession>,
    /// Most recent first, at most `history_limit` entries
    pub history: Vec<ScanSummary>,
}

fn scanning_flag(state: &mut ScanState) -> &mut bool {
    &mut state.scanning
}

#[derive(Clone)]
pub struct ScanController {
    gateway: Arc<dyn BackendGateway>,
    notifications: NotificationQueue,
    adapters: AdapterRegistry,
    settings: ScanConfig,
    state: Arc<watch::Sender<ScanState>>,
    history_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ScanController {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        notifications: NotificationQueue,
        adapters: AdapterRegistry,
        settings: ScanConfig,
    ) -> Self {
        let (state, _) = watch::channel(ScanState::default());
        Self {
            gateway,
            notifications,
            adapters,
            settings,
            state: Arc::new(state),
            history_task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn snapshot(&self) -> ScanState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state.subscribe()
    }

    pub fn is_scanning(&self) -> bool {
        self.state.borrow().scanning
    }

    pub fn networks(&self) -> Vec<WirelessNetwork> {
        self.state.borrow().networks.clone()
    }

    pub fn network(&self, index: usize) -> Option<WirelessNetwork> {
        self.state.borrow().networks.get(index).cloned()
    }

    pub fn history(&self) -> Vec<ScanSummary> {
        self.state.borrow().history.clone()
    }

    /// Run one scan against the currently selected adapter.
    pub async fn start(&self) -> Outcome {
        let Some(_guard) = FlightGuard::acquire(&self.state, scanning_flag) else {
            debug!("scan already in flight, ignoring start");
            return Outcome::Busy;
        };

        let Some(interface) = self.adapters.selected_interface() else {
            let text = "Please select an adapter".to_string();
            self.notifications.error(text.clone());
            return Outcome::Rejected(text);
        };

        self.state.send_modify(|s| s.networks.clear());
        self.notifications.info("Scanning for networks...");

        let request = ScanRequest {
            interface: interface.clone(),
            duration: self.settings.duration_secs,
        };
        info!(interface = %interface, duration = request.duration, "starting scan");

        match self.gateway.start_scan(&request).await {
            Ok(response) if response.success => {
                let mut networks = Vec::with_capacity(response.networks.len());
                let mut errors = Vec::new();
                for entry in response.networks {
                    match entry {
                        NetworkEntry::Network(network) => networks.push(network),
                        NetworkEntry::Error(error) => errors.push(error),
                    }
                }

                if networks.is_empty() && !errors.is_empty() {
                    let text = format!("Scan failed: {}", errors.join("; "));
                    self.notifications.error(text.clone());
                    return Outcome::SoftFailure(text);
                }
                for error in &errors {
                    warn!(%error, "scan result entry reported an error");
                }

                let total = response.total.unwrap_or(networks.len() as u32);
                let session = ScanSession {
                    scan_id: response.scan_id,
                    interface_name: interface,
                    duration_secs: request.duration,
                    total_networks: total,
                    networks: networks.clone(),
                };
                self.state.send_modify(|s| {
                    s.networks = networks;
                    s.last_scan = Some(session);
                });

                info!(total, "scan completed");
                self.notifications.success(format!("Found {} networks", total));
                self.spawn_history_refresh();
                Outcome::Completed
            }
            Ok(response) => {
                let detail = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "backend reported failure".to_string());
                let text = format!("Scan failed: {}", detail);
                self.notifications.error(text.clone());
                Outcome::SoftFailure(text)
            }
            Err(e) => {
                warn!(error = %e, "scan request failed");
                let text = format!("Scan failed: {}", e);
                self.notifications.error(text.clone());
                Outcome::HardFailure(text)
            }
        }
    }

    /// Reload the scan history page. Failures are logged only.
    pub async fn refresh_history(&self) -> Outcome {
        let limit = self.settings.history_limit;
        match self.gateway.scan_history(limit).await {
            Ok(response) if response.success => {
                let mut scans = response.scans;
                scans.truncate(limit as usize);
                debug!(count = scans.len(), "scan history refreshed");
                self.state.send_modify(|s| s.history = scans);
                Outcome::Completed
            }
            Ok(_) => {
                warn!("scan history request reported failure");
                Outcome::SoftFailure("scan history unavailable".to_string())
            }
            Err(e) => {
                warn!(error = %e, "failed to load scan history");
                Outcome::HardFailure(e.to_string())
            }
        }
    }

    /// Wait for the history refresh spawned by the last successful scan.
    pub async fn history_settled(&self) {
        let handle = self.history_task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn spawn_history_refresh(&self) {
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            controller.refresh_history().await;
        });
        if let Some(previous) = self.history_task.lock().replace(handle) {
            debug!(finished = previous.is_finished(), "superseding previous history refresh");
        }
    }
}
