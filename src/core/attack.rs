/*!
 * Attack Request Orchestrators
 *
 * Deauthentication and handshake capture share one contract: validate the
 * form, submit a single request, track it with an in-flight flag and turn the
 * backend's answer into exactly one notification. What differs (payload,
 * endpoint, wording, soft-failure severity) is described by an `AttackKind`.
 */

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::adapters::AdapterRegistry;
use crate::core::error::GatewayResult;
use crate::core::flight::{FlightGuard, Outcome};
use crate::core::gateway::{AttackResponse, BackendGateway, CaptureRequest, DeauthRequest};
use crate::core::notifications::{NotificationKind, NotificationQueue};

/// Accepts `AA:BB:CC:DD:EE:FF` and `AA-BB-CC-DD-EE-FF`, any case
pub fn is_mac_address(value: &str) -> bool {
    let separator = if value.contains('-') { '-' } else { ':' };
    let octets: Vec<&str> = value.split(separator).collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}

/// A request payload that knows which endpoint carries it
#[async_trait]
pub trait AttackRequest: Debug + Send + Sync {
    async fn send(&self, gateway: &dyn BackendGateway) -> GatewayResult<AttackResponse>;
}

#[async_trait]
impl AttackRequest for DeauthRequest {
    async fn send(&self, gateway: &dyn BackendGateway) -> GatewayResult<AttackResponse> {
        gateway.deauth(self).await
    }
}

#[async_trait]
impl AttackRequest for CaptureRequest {
    async fn send(&self, gateway: &dyn BackendGateway) -> GatewayResult<AttackResponse> {
        gateway.capture_handshake(self).await
    }
}

/// Per-attack payload shape and wording
pub trait AttackKind: Send + Sync + 'static {
    type Params: Clone + Debug + PartialEq + Send + Sync + 'static;
    type Request: AttackRequest;

    /// Short name used in logs
    const NAME: &'static str;
    const PROGRESS_TEXT: &'static str;
    const SUCCESS_TEXT: &'static str;
    /// Fallback when a soft failure carries no backend message
    const FAILURE_TEXT: &'static str;
    const ERROR_PREFIX: &'static str;
    const SOFT_FAILURE_KIND: NotificationKind;

    fn target(params: &Self::Params) -> &str;

    /// Checks beyond the required adapter and target
    fn check(params: &Self::Params) -> Result<(), String>;

    fn request(interface: String, params: &Self::Params) -> Self::Request;
}

/// Deauthentication form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeauthParams {
    pub target_bssid: String,
    /// Broadcast when absent
    pub target_client: Option<String>,
    pub packet_count: u32,
}

impl Default for DeauthParams {
    fn default() -> Self {
        Self {
            target_bssid: String::new(),
            target_client: None,
            packet_count: 50,
        }
    }
}

impl DeauthParams {
    fn client(&self) -> Option<&str> {
        self.target_client
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Handshake capture form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureParams {
    pub target_bssid: String,
    pub channel: u32,
    pub duration_secs: u32,
    pub use_deauth: bool,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            target_bssid: String::new(),
            channel: 6,
            duration_secs: 60,
            use_deauth: false,
        }
    }
}

pub struct Deauth;

impl AttackKind for Deauth {
    type Params = DeauthParams;
    type Request = DeauthRequest;

    const NAME: &'static str = "deauth";
    const PROGRESS_TEXT: &'static str = "Executing deauth attack...";
    const SUCCESS_TEXT: &'static str = "Deauth attack completed successfully";
    const FAILURE_TEXT: &'static str = "Deauth attack failed";
    const ERROR_PREFIX: &'static str = "Deauth attack error";
    const SOFT_FAILURE_KIND: NotificationKind = NotificationKind::Error;

    fn target(params: &DeauthParams) -> &str {
        &params.target_bssid
    }

    fn check(params: &DeauthParams) -> Result<(), String> {
        let bssid = params.target_bssid.trim();
        if !is_mac_address(bssid) {
            return Err(format!("Invalid MAC address: {}", bssid));
        }
        if let Some(client) = params.client() {
            if !is_mac_address(client) {
                return Err(format!("Invalid MAC address: {}", client));
            }
        }
        Ok(())
    }

    fn request(interface: String, params: &DeauthParams) -> DeauthRequest {
        DeauthRequest {
            interface,
            target_bssid: params.target_bssid.trim().to_string(),
            target_client: params.client().map(str::to_string),
            packets: params.packet_count,
        }
    }
}

pub struct HandshakeCapture;

impl AttackKind for HandshakeCapture {
    type Params = CaptureParams;
    type Request = CaptureRequest;

    const NAME: &'static str = "handshake capture";
    const PROGRESS_TEXT: &'static str = "Capturing handshake...";
    const SUCCESS_TEXT: &'static str = "Handshake captured successfully!";
    const FAILURE_TEXT: &'static str = "Handshake capture failed";
    const ERROR_PREFIX: &'static str = "Handshake capture error";
    const SOFT_FAILURE_KIND: NotificationKind = NotificationKind::Warning;

    fn target(params: &CaptureParams) -> &str {
        &params.target_bssid
    }

    fn check(params: &CaptureParams) -> Result<(), String> {
        let bssid = params.target_bssid.trim();
        if is_mac_address(bssid) {
            Ok(())
        } else {
            Err(format!("Invalid MAC address: {}", bssid))
        }
    }

    fn request(interface: String, params: &CaptureParams) -> CaptureRequest {
        CaptureRequest {
            interface,
            target_bssid: params.target_bssid.trim().to_string(),
            channel: params.channel,
            duration: params.duration_secs,
            use_deauth: params.use_deauth,
        }
    }
}

/// Observable orchestrator state
#[derive(Debug, Clone, PartialEq)]
pub struct AttackState<P> {
    pub params: P,
    pub in_flight: bool,
    pub last_outcome: Option<Outcome>,
    /// Capture file reported by the last successful operation, if any
    pub last_capture_file: Option<String>,
}

fn in_flight_flag<P>(state: &mut AttackState<P>) -> &mut bool {
    &mut state.in_flight
}

pub struct AttackOrchestrator<K: AttackKind> {
    gateway: Arc<dyn BackendGateway>,
    notifications: NotificationQueue,
    adapters: AdapterRegistry,
    state: Arc<watch::Sender<AttackState<K::Params>>>,
    kind: PhantomData<fn() -> K>,
}

impl<K: AttackKind> Clone for AttackOrchestrator<K> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            notifications: self.notifications.clone(),
            adapters: self.adapters.clone(),
            state: Arc::clone(&self.state),
            kind: PhantomData,
        }
    }
}

pub type DeauthOrchestrator = AttackOrchestrator<Deauth>;
pub type CaptureOrchestrator = AttackOrchestrator<HandshakeCapture>;

impl<K: AttackKind> AttackOrchestrator<K> {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        notifications: NotificationQueue,
        adapters: AdapterRegistry,
        params: K::Params,
    ) -> Self {
        let (state, _) = watch::channel(AttackState {
            params,
            in_flight: false,
            last_outcome: None,
            last_capture_file: None,
        });
        Self {
            gateway,
            notifications,
            adapters,
            state: Arc::new(state),
            kind: PhantomData,
        }
    }

    pub fn snapshot(&self) -> AttackState<K::Params> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AttackState<K::Params>> {
        self.state.subscribe()
    }

    pub fn params(&self) -> K::Params {
        self.state.borrow().params.clone()
    }

    pub fn in_flight(&self) -> bool {
        self.state.borrow().in_flight
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.state.borrow().last_outcome.clone()
    }

    /// Edit the form. Never touches the in-flight flag.
    pub fn update_params(&self, edit: impl FnOnce(&mut K::Params)) {
        self.state.send_modify(|s| edit(&mut s.params));
    }

    pub fn set_params(&self, params: K::Params) {
        self.update_params(|p| *p = params);
    }

    /// Validate the form and submit it against the adapter selected now.
    pub async fn submit(&self) -> Outcome {
        let Some(_guard) = FlightGuard::acquire(&self.state, in_flight_flag::<K::Params>) else {
            debug!(attack = K::NAME, "submission already in flight");
            return Outcome::Busy;
        };

        let params = self.params();
        let interface = self.adapters.selected_interface();

        let outcome = match interface {
            Some(interface) if !K::target(&params).trim().is_empty() => {
                match K::check(&params) {
                    Ok(()) => self.issue(interface, &params).await,
                    Err(text) => {
                        self.notifications.error(text.clone());
                        Outcome::Rejected(text)
                    }
                }
            }
            _ => {
                let text = "Please provide required parameters".to_string();
                self.notifications.error(text.clone());
                Outcome::Rejected(text)
            }
        };

        self.state
            .send_modify(|s| s.last_outcome = Some(outcome.clone()));
        outcome
    }

    async fn issue(&self, interface: String, params: &K::Params) -> Outcome {
        self.notifications.info(K::PROGRESS_TEXT);

        let request = K::request(interface, params);
        info!(attack = K::NAME, ?request, "submitting");

        match request.send(self.gateway.as_ref()).await {
            Ok(response) if response.succeeded() => {
                let capture_file = response.capture_file().map(str::to_string);
                if let Some(file) = &capture_file {
                    info!(attack = K::NAME, file = %file, "capture file written");
                }
                self.state
                    .send_modify(|s| s.last_capture_file = capture_file);
                self.notifications.success(K::SUCCESS_TEXT);
                Outcome::Completed
            }
            Ok(response) => {
                let text = response
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| K::FAILURE_TEXT.to_string());
                warn!(attack = K::NAME, %text, "backend reported failure");
                self.notifications.post(text.clone(), K::SOFT_FAILURE_KIND);
                Outcome::SoftFailure(text)
            }
            Err(e) => {
                warn!(attack = K::NAME, error = %e, "request failed");
                let text = format!("{}: {}", K::ERROR_PREFIX, e);
                self.notifications.error(text.clone());
                Outcome::HardFailure(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mac_address() {
        assert!(is_mac_address("AA:BB:CC:DD:EE:FF"));
        assert!(is_mac_address("aa:bb:cc:dd:ee:ff"));
        assert!(is_mac_address("00-11-22-33-44-55"));
        assert!(!is_mac_address(""));
        assert!(!is_mac_address("AA:BB:CC:DD:EE"));
        assert!(!is_mac_address("AA:BB:CC:DD:EE:GG"));
        assert!(!is_mac_address("AA:BB:CC-DD:EE:FF"));
    }

    #[test]
    fn test_deauth_request_normalises_fields() {
        let params = DeauthParams {
            target_bssid: " AA:BB:CC:DD:EE:FF ".to_string(),
            target_client: Some("   ".to_string()),
            packet_count: 10,
        };
        let request = Deauth::request("wlan0mon".to_string(), &params);
        assert_eq!(request.target_bssid, "AA:BB:CC:DD:EE:FF");
        assert_eq!(request.target_client, None);
        assert_eq!(request.packets, 10);
    }

    #[test]
    fn test_deauth_check_rejects_bad_client() {
        let params = DeauthParams {
            target_bssid: "AA:BB:CC:DD:EE:FF".to_string(),
            target_client: Some("phone".to_string()),
            packet_count: 50,
        };
        assert_eq!(
            Deauth::check(&params),
            Err("Invalid MAC address: phone".to_string())
        );
    }

    #[test]
    fn test_capture_request_carries_form() {
        let params = CaptureParams {
            target_bssid: "11:22:33:44:55:66".to_string(),
            channel: 11,
            duration_secs: 120,
            use_deauth: true,
        };
        assert!(HandshakeCapture::check(&params).is_ok());

        let request = HandshakeCapture::request("wlan1mon".to_string(), &params);
        assert_eq!(request.interface, "wlan1mon");
        assert_eq!(request.channel, 11);
        assert_eq!(request.duration, 120);
        assert!(request.use_deauth);
    }

    #[test]
    fn test_soft_failure_severity_per_kind() {
        assert_eq!(Deauth::SOFT_FAILURE_KIND, NotificationKind::Error);
        assert_eq!(HandshakeCapture::SOFT_FAILURE_KIND, NotificationKind::Warning);
    }

    #[test]
    fn test_default_forms() {
        assert_eq!(DeauthParams::default().packet_count, 50);
        let capture = CaptureParams::default();
        assert_eq!(capture.channel, 6);
        assert_eq!(capture.duration_secs, 60);
        assert!(!capture.use_deauth);
    }
}
