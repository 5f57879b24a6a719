/*!
 * Console session
 *
 * Builds every state container exactly once and wires them to one gateway
 * and one notification queue. Consumers borrow the containers from here.
 */

use std::sync::Arc;

use tracing::info;

use crate::core::adapters::AdapterRegistry;
use crate::core::attack::{CaptureOrchestrator, CaptureParams, DeauthOrchestrator, DeauthParams};
use crate::core::config::ConsoleConfig;
use crate::core::error::GatewayResult;
use crate::core::gateway::{BackendGateway, BackendStatus};
use crate::core::http::HttpGateway;
use crate::core::notifications::NotificationQueue;
use crate::core::scan::ScanController;
use crate::core::target::TargetBinder;

#[derive(Clone)]
pub struct ConsoleSession {
    config: ConsoleConfig,
    gateway: Arc<dyn BackendGateway>,
    notifications: NotificationQueue,
    adapters: AdapterRegistry,
    scan: ScanController,
    deauth: DeauthOrchestrator,
    capture: CaptureOrchestrator,
    target: TargetBinder,
}

impl ConsoleSession {
    pub fn new(config: ConsoleConfig, gateway: Arc<dyn BackendGateway>) -> Self {
        let notifications = NotificationQueue::new(config.notifications.ttl());
        let adapters = AdapterRegistry::new(Arc::clone(&gateway), notifications.clone());
        let scan = ScanController::new(
            Arc::clone(&gateway),
            notifications.clone(),
            adapters.clone(),
            config.scan.clone(),
        );
        let deauth = DeauthOrchestrator::new(
            Arc::clone(&gateway),
            notifications.clone(),
            adapters.clone(),
            DeauthParams {
                packet_count: config.deauth.packets,
                ..DeauthParams::default()
            },
        );
        let capture = CaptureOrchestrator::new(
            Arc::clone(&gateway),
            notifications.clone(),
            adapters.clone(),
            CaptureParams {
                channel: config.capture.channel,
                duration_secs: config.capture.duration_secs,
                ..CaptureParams::default()
            },
        );
        let target = TargetBinder::new(
            deauth.clone(),
            capture.clone(),
            scan.clone(),
            notifications.clone(),
        );

        Self {
            config,
            gateway,
            notifications,
            adapters,
            scan,
            deauth,
            capture,
            target,
        }
    }

    /// Session backed by the HTTP gateway at `config.backend.url`
    pub fn connect(config: ConsoleConfig) -> GatewayResult<Self> {
        let gateway = HttpGateway::new(&config.backend.url)?;
        info!(backend = %gateway.base_url(), "console session created");
        Ok(Self::new(config, Arc::new(gateway)))
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    pub fn scan(&self) -> &ScanController {
        &self.scan
    }

    pub fn deauth(&self) -> &DeauthOrchestrator {
        &self.deauth
    }

    pub fn capture(&self) -> &CaptureOrchestrator {
        &self.capture
    }

    pub fn target(&self) -> &TargetBinder {
        &self.target
    }

    /// Backend identification (`GET /`)
    pub async fn backend_status(&self) -> GatewayResult<BackendStatus> {
        self.gateway.status().await
    }
}
