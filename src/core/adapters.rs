/*!
 * Adapter Registry
 *
 * Known adapters and the operator's current selection. The collection is
 * only ever replaced wholesale from the backend listing; mode changes are
 * requested and then re-read from that listing.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::core::flight::{FlightGuard, Outcome};
use crate::core::gateway::BackendGateway;
use crate::core::models::{Adapter, AdapterEntry};
use crate::core::notifications::NotificationQueue;

/// Observable registry state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterState {
    pub adapters: Vec<Adapter>,
    pub selected: Option<String>,
    pub mode_change_in_flight: bool,
}

impl AdapterState {
    pub fn contains(&self, interface_name: &str) -> bool {
        self.adapters
            .iter()
            .any(|a| a.interface_name == interface_name)
    }

    /// The selected adapter, if it is still part of the collection
    pub fn selected_adapter(&self) -> Option<&Adapter> {
        let selected = self.selected.as_deref()?;
        self.adapters
            .iter()
            .find(|a| a.interface_name == selected)
    }

    /// Keep the selection if it survived the refresh, else fall back to the
    /// first adapter (or none).
    fn reconcile_selection(&mut self) {
        let keep = self
            .selected
            .as_deref()
            .is_some_and(|name| self.contains(name));
        if !keep {
            self.selected = self.adapters.first().map(|a| a.interface_name.clone());
        }
    }
}

fn mode_change_flag(state: &mut AdapterState) -> &mut bool {
    &mut state.mode_change_in_flight
}

/// Monitor-mode results are free text; the backend signals failures by
/// embedding "error" in it.
fn reports_error(message: &str) -> bool {
    message.to_ascii_lowercase().contains("error")
}

#[derive(Clone)]
pub struct AdapterRegistry {
    gateway: Arc<dyn BackendGateway>,
    notifications: NotificationQueue,
    state: Arc<watch::Sender<AdapterState>>,
}

impl AdapterRegistry {
    pub fn new(gateway: Arc<dyn BackendGateway>, notifications: NotificationQueue) -> Self {
        let (state, _) = watch::channel(AdapterState::default());
        Self {
            gateway,
            notifications,
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> AdapterState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdapterState> {
        self.state.subscribe()
    }

    pub fn adapters(&self) -> Vec<Adapter> {
        self.state.borrow().adapters.clone()
    }

    /// Current selection, read at call time and validated against the
    /// current collection.
    pub fn selected_interface(&self) -> Option<String> {
        self.state
            .borrow()
            .selected_adapter()
            .map(|a| a.interface_name.clone())
    }

    pub fn mode_change_in_flight(&self) -> bool {
        self.state.borrow().mode_change_in_flight
    }

    /// Re-read the adapter listing and reconcile the selection.
    pub async fn refresh(&self) -> Outcome {
        match self.gateway.list_adapters().await {
            Ok(response) if response.success => {
                let mut adapters = Vec::with_capacity(response.adapters.len());
                let mut errors = Vec::new();
                for entry in response.adapters {
                    match entry {
                        AdapterEntry::Adapter(adapter) => adapters.push(adapter),
                        AdapterEntry::Error(error) => {
                            warn!(%error, "adapter listing entry reported an error");
                            errors.push(error);
                        }
                    }
                }

                self.state.send_modify(|s| {
                    s.adapters = adapters;
                    s.reconcile_selection();
                });

                let state = self.state.borrow().clone();
                info!(
                    count = state.adapters.len(),
                    selected = ?state.selected,
                    "adapters refreshed"
                );

                if !errors.is_empty() {
                    self.notifications
                        .warning(format!("Adapter listing reported: {}", errors.join("; ")));
                }
                Outcome::Completed
            }
            Ok(_) => {
                let text = "Failed to load adapters".to_string();
                self.notifications.warning(text.clone());
                Outcome::SoftFailure(text)
            }
            Err(e) => {
                warn!(error = %e, "adapter listing failed");
                let text = format!("Failed to load adapters: {}", e);
                self.notifications.error(text.clone());
                Outcome::HardFailure(text)
            }
        }
    }

    /// Select an adapter by interface name. No I/O.
    ///
    /// Names missing from the current collection leave the selection
    /// unchanged and post an error notification.
    pub fn select(&self, interface_name: &str) -> bool {
        let accepted = self.state.send_if_modified(|s| {
            if s.contains(interface_name) {
                s.selected = Some(interface_name.to_string());
                true
            } else {
                false
            }
        });

        if !accepted {
            self.notifications
                .error(format!("Adapter {} not found", interface_name));
        }
        accepted
    }

    /// Request monitor mode on or off, report the backend's answer, then
    /// refresh the listing regardless of the result.
    pub async fn set_monitor_mode(&self, interface_name: &str, enabled: bool) -> Outcome {
        if interface_name.trim().is_empty() {
            let text = "Please select an adapter".to_string();
            self.notifications.error(text.clone());
            return Outcome::Rejected(text);
        }

        let Some(_guard) = FlightGuard::acquire(&self.state, mode_change_flag) else {
            return Outcome::Busy;
        };

        let verb = if enabled { "enable" } else { "disable" };
        let outcome = match self.gateway.set_monitor_mode(interface_name, enabled).await {
            Ok(response) => {
                let text = if response.message.trim().is_empty() {
                    format!("Monitor mode {}d on {}", verb, interface_name)
                } else {
                    response.message
                };

                if !response.success || reports_error(&text) {
                    self.notifications.error(text.clone());
                    Outcome::SoftFailure(text)
                } else {
                    self.notifications.success(text);
                    Outcome::Completed
                }
            }
            Err(e) => {
                warn!(interface = interface_name, error = %e, "monitor mode {} failed", verb);
                let text = format!("Failed to {} monitor mode: {}", verb, e);
                self.notifications.error(text.clone());
                Outcome::HardFailure(text)
            }
        };

        // The listing is the only source of truth for the resulting mode
        self.refresh().await;
        outcome
    }

    /// Detailed description of one interface as the backend reports it
    pub async fn info(&self, interface_name: &str) -> Option<BTreeMap<String, Value>> {
        match self.gateway.adapter_info(interface_name).await {
            Ok(response) if response.success => Some(response.info),
            Ok(_) => {
                self.notifications
                    .warning(format!("No information available for {}", interface_name));
                None
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to load adapter info: {}", e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AdapterMode, AdapterStatus};

    fn adapter(name: &str) -> Adapter {
        Adapter::new(name, AdapterMode::Managed, AdapterStatus::Up)
    }

    #[test]
    fn test_reconcile_selects_first_when_empty() {
        let mut state = AdapterState {
            adapters: vec![adapter("wlan0"), adapter("wlan1")],
            ..Default::default()
        };
        state.reconcile_selection();
        assert_eq!(state.selected.as_deref(), Some("wlan0"));
    }

    #[test]
    fn test_reconcile_keeps_surviving_selection() {
        let mut state = AdapterState {
            adapters: vec![adapter("wlan0"), adapter("wlan1")],
            selected: Some("wlan1".to_string()),
            ..Default::default()
        };
        state.reconcile_selection();
        assert_eq!(state.selected.as_deref(), Some("wlan1"));
    }

    #[test]
    fn test_reconcile_resets_stale_selection() {
        let mut state = AdapterState {
            adapters: vec![adapter("wlan0mon")],
            selected: Some("wlan0".to_string()),
            ..Default::default()
        };
        state.reconcile_selection();
        assert_eq!(state.selected.as_deref(), Some("wlan0mon"));

        state.adapters.clear();
        state.reconcile_selection();
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_selected_adapter_ignores_absent_name() {
        let state = AdapterState {
            adapters: vec![adapter("wlan0")],
            selected: Some("wlan7".to_string()),
            ..Default::default()
        };
        assert!(state.selected_adapter().is_none());
    }

    #[test]
    fn test_reports_error() {
        assert!(reports_error("Error: wlan0 does not support monitor mode"));
        assert!(!reports_error("Monitor mode enabled on wlan0mon"));
    }
}
