/*!
 * Console messages
 *
 * Every operator action the interactive console understands, and the parser
 * that turns one input line into one message.
 */

/// Fields of the deauthentication form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeauthField {
    Bssid(String),
    /// `None` means broadcast
    Client(Option<String>),
    /// Raw operator text, coerced by the handler
    Packets(String),
}

/// Fields of the handshake capture form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureField {
    Bssid(String),
    Channel(String),
    Duration(String),
    UseDeauth(bool),
}

/// Console messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // General
    Status,
    Help,
    Notification,
    Quit,

    // Adapters
    RefreshAdapters,
    SelectAdapter(String),
    AdapterInfo(Option<String>),
    SetMonitorMode {
        interface: Option<String>,
        enabled: bool,
    },

    // Scan
    StartScan,
    ShowNetworks,
    ShowHistory,
    SelectNetwork(usize),
    ClearTarget,

    // Attacks
    ShowDeauth,
    EditDeauth(DeauthField),
    RunDeauth,
    ShowCapture,
    EditCapture(CaptureField),
    RunCapture,
}

impl Message {
    /// Parse one console line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Message>, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(None);
        };

        let message = match (command.to_ascii_lowercase().as_str(), args) {
            ("status", []) => Message::Status,
            ("help" | "?", []) => Message::Help,
            ("notification" | "last", []) => Message::Notification,
            ("quit" | "exit", []) => Message::Quit,

            ("adapters", []) | ("adapters", ["refresh"]) => Message::RefreshAdapters,
            ("select", [name]) => Message::SelectAdapter(name.to_string()),
            ("info", []) => Message::AdapterInfo(None),
            ("info", [name]) => Message::AdapterInfo(Some(name.to_string())),
            ("monitor", [switch, rest @ ..]) if rest.len() <= 1 => Message::SetMonitorMode {
                interface: rest.first().map(|s| s.to_string()),
                enabled: parse_switch(switch)?,
            },

            ("scan", []) => Message::StartScan,
            ("networks", []) => Message::ShowNetworks,
            ("history", []) => Message::ShowHistory,
            ("target", ["clear"]) => Message::ClearTarget,
            ("target", [position]) => Message::SelectNetwork(parse_position(position)?),

            ("deauth", []) => Message::ShowDeauth,
            ("deauth", ["run"]) => Message::RunDeauth,
            ("deauth", ["bssid", value]) => Message::EditDeauth(DeauthField::Bssid(value.to_string())),
            ("deauth", ["client", "broadcast" | "none"]) => {
                Message::EditDeauth(DeauthField::Client(None))
            }
            ("deauth", ["client", value]) => {
                Message::EditDeauth(DeauthField::Client(Some(value.to_string())))
            }
            ("deauth", ["packets", value]) => {
                Message::EditDeauth(DeauthField::Packets(value.to_string()))
            }

            ("capture", []) => Message::ShowCapture,
            ("capture", ["run"]) => Message::RunCapture,
            ("capture", ["bssid", value]) => {
                Message::EditCapture(CaptureField::Bssid(value.to_string()))
            }
            ("capture", ["channel", value]) => {
                Message::EditCapture(CaptureField::Channel(value.to_string()))
            }
            ("capture", ["duration", value]) => {
                Message::EditCapture(CaptureField::Duration(value.to_string()))
            }
            ("capture", ["deauth", switch]) => {
                Message::EditCapture(CaptureField::UseDeauth(parse_switch(switch)?))
            }

            _ => return Err(format!("Unknown command: {} (try 'help')", line.trim())),
        };

        Ok(Some(message))
    }

    /// Messages whose backend request may take as long as a scan or capture
    pub fn is_long_running(&self) -> bool {
        matches!(
            self,
            Message::StartScan
                | Message::RunDeauth
                | Message::RunCapture
                | Message::SetMonitorMode { .. }
        )
    }
}

fn parse_switch(word: &str) -> Result<bool, String> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "enable" | "yes" | "true" => Ok(true),
        "off" | "disable" | "no" | "false" => Ok(false),
        other => Err(format!("Expected on or off, got {}", other)),
    }
}

/// Networks are listed from 1
fn parse_position(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(format!("Invalid network position: {}", word)),
    }
}
