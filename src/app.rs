/*!
 * Console application
 *
 * Owns the session and the operator's view of its notifications. Long
 * operations run while notifications are printed as they are posted, so
 * progress messages appear before the backend answers. In the interactive
 * console those operations run as background tasks and the prompt stays
 * available.
 */

use std::future::Future;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use redwifi::{ConsoleSession, Notification, Outcome};

use crate::messages::Message;

pub struct ConsoleApp {
    session: ConsoleSession,
    /// Present when this app prints notifications itself
    events: Option<broadcast::Receiver<Notification>>,
}

impl ConsoleApp {
    pub fn new(session: ConsoleSession) -> Self {
        let events = session.notifications().events();
        Self {
            session,
            events: Some(events),
        }
    }

    /// Same session, leaving notification output to the printer task
    fn detached(&self) -> Self {
        Self {
            session: self.session.clone(),
            events: None,
        }
    }

    pub fn session(&self) -> &ConsoleSession {
        &self.session
    }

    /// Dispatch one message to its handler
    pub async fn update(&mut self, message: Message) -> Outcome {
        let outcome = match message {
            // General
            Message::Status => self.handle_status().await,
            Message::Help => self.handle_help(),
            Message::Notification => self.handle_show_notification(),
            Message::Quit => Outcome::Completed,

            // Adapters
            Message::RefreshAdapters => self.handle_refresh_adapters().await,
            Message::SelectAdapter(name) => self.handle_select_adapter(&name),
            Message::AdapterInfo(name) => self.handle_adapter_info(name).await,
            Message::SetMonitorMode { interface, enabled } => {
                self.handle_monitor_mode(interface, enabled).await
            }

            // Scan
            Message::StartScan => self.handle_start_scan().await,
            Message::ShowNetworks => self.handle_show_networks(),
            Message::ShowHistory => self.handle_show_history().await,
            Message::SelectNetwork(index) => self.handle_select_network(index),
            Message::ClearTarget => self.handle_clear_target(),

            // Attacks
            Message::ShowDeauth => self.handle_show_deauth(),
            Message::EditDeauth(field) => self.handle_edit_deauth(field),
            Message::RunDeauth => self.handle_run_deauth().await,
            Message::ShowCapture => self.handle_show_capture(),
            Message::EditCapture(field) => self.handle_edit_capture(field),
            Message::RunCapture => self.handle_run_capture().await,
        };

        if outcome == Outcome::Busy {
            println!("Operation already in progress");
        }
        self.drain_notifications();
        outcome
    }

    /// Drive `operation` to completion, printing notifications as they arrive.
    pub(crate) async fn watch<F>(&mut self, operation: F) -> Outcome
    where
        F: Future<Output = Outcome>,
    {
        tokio::pin!(operation);
        let Some(events) = self.events.as_mut() else {
            return operation.await;
        };

        loop {
            tokio::select! {
                outcome = &mut operation => return outcome,
                event = events.recv() => match event {
                    Ok(notification) => print_notification(&notification),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "notification output fell behind");
                    }
                    Err(RecvError::Closed) => return operation.await,
                },
            }
        }
    }

    /// Print every notification posted since the last drain
    pub fn drain_notifications(&mut self) {
        let Some(events) = self.events.as_mut() else {
            return;
        };

        loop {
            match events.try_recv() {
                Ok(notification) => print_notification(&notification),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification output fell behind");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    /// Interactive read-eval loop over stdin
    pub async fn run_console(&mut self) -> Result<()> {
        println!("redwifi console. Type 'help' for commands.");
        self.update(Message::RefreshAdapters).await;

        let printer = self.events.take().map(spawn_printer);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"redwifi> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match Message::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Message::Quit)) => break,
                Ok(Some(message)) if message.is_long_running() => {
                    debug!(?message, "starting background operation");
                    let mut worker = self.detached();
                    tokio::spawn(async move {
                        worker.update(message).await;
                    });
                }
                Ok(Some(message)) => {
                    debug!(?message, "console command");
                    self.update(message).await;
                }
                Err(error) => println!("{}", error),
            }
        }

        if let Some(printer) = printer {
            printer.abort();
        }
        Ok(())
    }
}

fn spawn_printer(mut events: broadcast::Receiver<Notification>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(notification) => print_notification(&notification),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification output fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn print_notification(notification: &Notification) {
    println!(
        "[{}] {}",
        notification.kind.label().to_uppercase(),
        notification.text
    );
}
