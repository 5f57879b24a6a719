// Core library modules
pub mod adapters;
pub mod attack;
pub mod config;
pub mod error;
pub mod flight;
pub mod gateway;
pub mod http;
pub mod models;
pub mod notifications;
pub mod scan;
pub mod session;
pub mod target;

// Re-exports
pub use adapters::{AdapterRegistry, AdapterState};
pub use attack::{
    is_mac_address, AttackKind, AttackOrchestrator, AttackRequest, AttackState, CaptureOrchestrator,
    CaptureParams, Deauth, DeauthOrchestrator, DeauthParams, HandshakeCapture,
};
pub use config::{
    BackendConfig, CaptureConfig, ConsoleConfig, DeauthConfig, NotificationConfig, ScanConfig,
    BACKEND_URL_ENV,
};
pub use error::{GatewayError, GatewayResult};
pub use flight::{FlightGuard, Outcome};
pub use gateway::{
    AdapterInfoResponse, AdapterListResponse, AttackReport, AttackResponse, BackendGateway,
    BackendStatus, CaptureRequest, DeauthRequest, MonitorModeResponse, ScanHistoryResponse,
    ScanRequest, ScanResponse,
};
pub use http::HttpGateway;
pub use models::{
    parse_channel, Adapter, AdapterEntry, AdapterMode, AdapterStatus, NetworkEntry, ScanSession,
    ScanSummary, WirelessNetwork,
};
pub use notifications::{Notification, NotificationKind, NotificationQueue};
pub use scan::{ScanController, ScanState};
pub use session::ConsoleSession;
pub use target::{TargetBinder, TargetSelection};
