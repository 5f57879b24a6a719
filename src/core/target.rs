/*!
 * Target Binder
 *
 * Copies the identity of a chosen network into every attack form that needs
 * a target. The binding is a synchronous copy: the forms never hold on to the
 * scan result itself.
 */

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::core::attack::{CaptureOrchestrator, DeauthOrchestrator};
use crate::core::models::{parse_channel, WirelessNetwork};
use crate::core::notifications::NotificationQueue;
use crate::core::scan::ScanController;

/// Fields copied from the network at the moment it was selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSelection {
    pub bssid: String,
    pub essid: String,
    pub channel: String,
}

impl TargetSelection {
    pub fn channel_number(&self) -> Option<u32> {
        parse_channel(&self.channel)
    }
}

impl From<&WirelessNetwork> for TargetSelection {
    fn from(network: &WirelessNetwork) -> Self {
        Self {
            bssid: network.bssid.clone(),
            essid: network.essid.clone(),
            channel: network.channel.clone(),
        }
    }
}

#[derive(Clone)]
pub struct TargetBinder {
    deauth: DeauthOrchestrator,
    capture: CaptureOrchestrator,
    scan: ScanController,
    notifications: NotificationQueue,
    selection: Arc<watch::Sender<Option<TargetSelection>>>,
}

impl TargetBinder {
    pub fn new(
        deauth: DeauthOrchestrator,
        capture: CaptureOrchestrator,
        scan: ScanController,
        notifications: NotificationQueue,
    ) -> Self {
        let (selection, _) = watch::channel(None);
        Self {
            deauth,
            capture,
            scan,
            notifications,
            selection: Arc::new(selection),
        }
    }

    pub fn selection(&self) -> Option<TargetSelection> {
        self.selection.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TargetSelection>> {
        self.selection.subscribe()
    }

    /// Bind `network` as the active target.
    ///
    /// Both forms receive the BSSID; the capture form receives the channel
    /// only when it parses, otherwise it keeps its previous channel.
    pub fn select_target(&self, network: &WirelessNetwork) -> TargetSelection {
        let selection = TargetSelection::from(network);
        let channel = selection.channel_number();

        self.selection.send_replace(Some(selection.clone()));
        self.deauth
            .update_params(|p| p.target_bssid = selection.bssid.clone());
        self.capture.update_params(|p| {
            p.target_bssid = selection.bssid.clone();
            if let Some(channel) = channel {
                p.channel = channel;
            }
        });

        info!(
            bssid = %selection.bssid,
            essid = %selection.essid,
            channel = ?channel,
            "target selected"
        );
        selection
    }

    /// Bind the network at `index` of the current scan results.
    pub fn select_index(&self, index: usize) -> Option<TargetSelection> {
        match self.scan.network(index) {
            Some(network) => Some(self.select_target(&network)),
            None => {
                self.notifications
                    .warning(format!("No network at position {}", index + 1));
                None
            }
        }
    }

    /// Forget the selection; the forms keep what was copied into them.
    pub fn clear(&self) {
        self.selection.send_replace(None);
    }
}
