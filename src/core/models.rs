/*!
 * Data model
 *
 * Adapters, discovered networks and scan summaries as the console sees them.
 * The backend is loose about JSON types (channels and signal power arrive as
 * numbers or strings, encryption as `privacy` or `encryption`), so wire
 * entries are normalised here.
 */

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Adapter operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdapterMode {
    Managed,
    Monitor,
    #[default]
    Unknown,
}

impl From<String> for AdapterMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "managed" => Self::Managed,
            "monitor" => Self::Monitor,
            _ => Self::Unknown,
        }
    }
}

impl From<AdapterMode> for String {
    fn from(mode: AdapterMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for AdapterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed => write!(f, "managed"),
            Self::Monitor => write!(f, "monitor"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Adapter link status
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdapterStatus {
    Up,
    Down,
    Error,
    #[default]
    Unknown,
    Other(String),
}

impl From<String> for AdapterStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Self::Up,
            "down" => Self::Down,
            "error" => Self::Error,
            "" | "unknown" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<AdapterStatus> for String {
    fn from(status: AdapterStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for AdapterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Error => write!(f, "error"),
            Self::Unknown => write!(f, "unknown"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// A wireless adapter known to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapter {
    #[serde(rename = "interface")]
    pub interface_name: String,
    #[serde(default)]
    pub mode: AdapterMode,
    #[serde(default)]
    pub status: AdapterStatus,
}

impl Adapter {
    pub fn new(interface_name: impl Into<String>, mode: AdapterMode, status: AdapterStatus) -> Self {
        Self {
            interface_name: interface_name.into(),
            mode,
            status,
        }
    }

    pub fn is_monitor(&self) -> bool {
        self.mode == AdapterMode::Monitor
    }
}

/// One entry of the adapter listing.
///
/// The backend reports per-interface probing failures inline as
/// `{"error": "..."}` objects instead of adapters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAdapter")]
pub enum AdapterEntry {
    Adapter(Adapter),
    Error(String),
}

#[derive(Deserialize)]
struct RawAdapter {
    interface: Option<String>,
    #[serde(default)]
    mode: AdapterMode,
    #[serde(default)]
    status: AdapterStatus,
    error: Option<String>,
}

impl From<RawAdapter> for AdapterEntry {
    fn from(raw: RawAdapter) -> Self {
        match (raw.interface, raw.error) {
            (Some(interface_name), None) => Self::Adapter(Adapter {
                interface_name,
                mode: raw.mode,
                status: raw.status,
            }),
            (Some(interface_name), Some(error)) => {
                Self::Error(format!("{}: {}", interface_name, error))
            }
            (None, Some(error)) => Self::Error(error),
            (None, None) => Self::Error("adapter entry without interface".to_string()),
        }
    }
}

/// A network discovered by a scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WirelessNetwork {
    pub bssid: String,
    pub essid: String,
    /// Channel as reported by the backend; may be empty or non-numeric
    pub channel: String,
    pub signal_power: Option<f64>,
    pub encryption: Option<String>,
}

impl WirelessNetwork {
    pub fn new(bssid: impl Into<String>, essid: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            bssid: bssid.into(),
            essid: essid.into(),
            channel: channel.into(),
            signal_power: None,
            encryption: None,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.essid.is_empty() {
            "Hidden Network"
        } else {
            &self.essid
        }
    }

    /// Channel as an integer, taking the first token of multi-channel reports
    pub fn channel_number(&self) -> Option<u32> {
        parse_channel(&self.channel)
    }
}

/// Parse a backend channel field such as `"6"`, `" 11 "` or `"1,6"`.
///
/// Zero and non-numeric values yield `None`.
pub fn parse_channel(raw: &str) -> Option<u32> {
    raw.split(',')
        .next()
        .map(str::trim)
        .and_then(|token| token.parse::<u32>().ok())
        .filter(|channel| *channel > 0)
}

/// One entry of a scan result list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNetwork")]
pub enum NetworkEntry {
    Network(WirelessNetwork),
    Error(String),
}

#[derive(Deserialize)]
struct RawNetwork {
    bssid: Option<String>,
    essid: Option<String>,
    channel: Option<Value>,
    power: Option<Value>,
    privacy: Option<String>,
    encryption: Option<String>,
    error: Option<String>,
}

impl From<RawNetwork> for NetworkEntry {
    fn from(raw: RawNetwork) -> Self {
        let Some(bssid) = raw.bssid.filter(|b| !b.trim().is_empty()) else {
            return Self::Error(
                raw.error
                    .unwrap_or_else(|| "network entry without bssid".to_string()),
            );
        };

        Self::Network(WirelessNetwork {
            bssid,
            essid: raw.essid.unwrap_or_default(),
            channel: raw.channel.as_ref().map(value_text).unwrap_or_default(),
            signal_power: raw.power.as_ref().and_then(value_number),
            encryption: raw
                .privacy
                .or(raw.encryption)
                .filter(|e| !e.trim().is_empty()),
        })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Summary row of the backend's scan history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: String,
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub total_networks: u32,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// The most recent completed scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSession {
    pub scan_id: Option<String>,
    pub interface_name: String,
    pub duration_secs: u32,
    pub total_networks: u32,
    pub networks: Vec<WirelessNetwork>,
}
