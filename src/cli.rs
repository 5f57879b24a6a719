use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use redwifi::{ConsoleConfig, ConsoleSession, Outcome};

use crate::app::ConsoleApp;
use crate::messages::Message;

#[derive(Parser)]
#[command(name = "redwifi")]
#[command(author, version, about = "Operator console for a WiFi red team backend")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides configuration and environment)
    #[arg(short, long, global = true)]
    pub backend: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show backend identification
    Status,

    /// Manage wireless adapters
    Adapters {
        #[command(subcommand)]
        action: AdapterAction,
    },

    /// Scan for networks
    Scan {
        /// Adapter to scan with (defaults to the first listed)
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Show recent scans
    History,

    /// Send deauthentication frames to a target
    Deauth {
        /// Target access point BSSID
        bssid: String,

        /// Client MAC (broadcast when omitted)
        #[arg(long)]
        client: Option<String>,

        /// Number of packets (defaults to configuration)
        #[arg(short, long)]
        packets: Option<u32>,

        /// Adapter to use (defaults to the first listed)
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Capture a WPA handshake from a target
    Capture {
        /// Target access point BSSID
        bssid: String,

        /// Channel (defaults to configuration)
        #[arg(long)]
        channel: Option<u32>,

        /// Capture duration in seconds (defaults to configuration)
        #[arg(long)]
        duration: Option<u32>,

        /// Deauthenticate clients during the capture
        #[arg(long)]
        deauth: bool,

        /// Adapter to use (defaults to the first listed)
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Interactive console
    Console,
}

#[derive(Subcommand)]
pub enum AdapterAction {
    /// List adapters
    List,

    /// Show adapter details
    Info { interface: String },

    /// Put an adapter into monitor mode
    MonitorEnable { interface: String },

    /// Return an adapter to managed mode
    MonitorDisable { interface: String },
}

pub async fn run_command(cli: Cli) -> Result<()> {
    let mut config = ConsoleConfig::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.backend {
        config.backend.url = url;
    }
    debug!(backend = %config.backend.url, "configuration resolved");

    let mut app = ConsoleApp::new(ConsoleSession::connect(config)?);

    match cli.command {
        Commands::Status => finish(app.update(Message::Status).await),
        Commands::Adapters { action } => cmd_adapters(&mut app, action).await,
        Commands::Scan { interface } => {
            prepare_adapter(&mut app, interface).await?;
            finish(app.update(Message::StartScan).await)
        }
        Commands::History => finish(app.update(Message::ShowHistory).await),
        Commands::Deauth {
            bssid,
            client,
            packets,
            interface,
        } => {
            prepare_adapter(&mut app, interface).await?;
            app.session().deauth().update_params(|p| {
                p.target_bssid = bssid;
                p.target_client = client;
                if let Some(packets) = packets {
                    p.packet_count = packets;
                }
            });
            finish(app.update(Message::RunDeauth).await)
        }
        Commands::Capture {
            bssid,
            channel,
            duration,
            deauth,
            interface,
        } => {
            prepare_adapter(&mut app, interface).await?;
            app.session().capture().update_params(|p| {
                p.target_bssid = bssid;
                p.use_deauth = deauth;
                if let Some(channel) = channel {
                    p.channel = channel;
                }
                if let Some(duration) = duration {
                    p.duration_secs = duration;
                }
            });
            finish(app.update(Message::RunCapture).await)
        }
        Commands::Console => app.run_console().await,
    }
}

async fn cmd_adapters(app: &mut ConsoleApp, action: AdapterAction) -> Result<()> {
    let message = match action {
        AdapterAction::List => Message::RefreshAdapters,
        AdapterAction::Info { interface } => Message::AdapterInfo(Some(interface)),
        AdapterAction::MonitorEnable { interface } => Message::SetMonitorMode {
            interface: Some(interface),
            enabled: true,
        },
        AdapterAction::MonitorDisable { interface } => Message::SetMonitorMode {
            interface: Some(interface),
            enabled: false,
        },
    };
    finish(app.update(message).await)
}

/// Load the adapter listing and apply an explicit selection
async fn prepare_adapter(app: &mut ConsoleApp, interface: Option<String>) -> Result<()> {
    finish(app.update(Message::RefreshAdapters).await)?;
    if let Some(interface) = interface {
        finish(app.update(Message::SelectAdapter(interface)).await)?;
    }
    Ok(())
}

/// A command whose failure was already shown to the operator as a notification
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ReportedFailure(pub String);

fn finish(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Completed => Ok(()),
        Outcome::Busy => Err(ReportedFailure("operation already in progress".to_string()).into()),
        Outcome::Rejected(text) | Outcome::SoftFailure(text) | Outcome::HardFailure(text) => {
            Err(ReportedFailure(text).into())
        }
    }
}
