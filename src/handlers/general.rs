/*!
 * General handlers
 *
 * Backend status, help text and the current notification.
 */

use redwifi::Outcome;

use crate::app::ConsoleApp;

const HELP: &str = "\
Commands:
  status                          backend identification
  adapters [refresh]              reload and list adapters
  select <iface>                  select an adapter
  info [iface]                    adapter details
  monitor on|off [iface]          toggle monitor mode
  scan                            scan with the selected adapter
  networks                        list the last scan results
  history                         recent scans
  target <n> | target clear       bind network n to the attack forms
  deauth [run]                    show or submit the deauth form
  deauth bssid|client|packets <v> edit the deauth form (client broadcast)
  capture [run]                   show or submit the capture form
  capture bssid|channel|duration <v>
  capture deauth on|off
  notification                    show the current notification
  quit";

impl ConsoleApp {
    /// Query `GET /` and print the backend identification
    pub async fn handle_status(&mut self) -> Outcome {
        match self.session().backend_status().await {
            Ok(status) => {
                println!(
                    "{} {} ({})",
                    if status.tool.is_empty() { "backend" } else { status.tool.as_str() },
                    status.version,
                    status.status
                );
                Outcome::Completed
            }
            Err(e) => {
                let text = format!("Backend unreachable: {}", e);
                self.session().notifications().error(text.clone());
                Outcome::HardFailure(text)
            }
        }
    }

    pub fn handle_help(&mut self) -> Outcome {
        println!("{}", HELP);
        Outcome::Completed
    }

    pub fn handle_show_notification(&mut self) -> Outcome {
        match self.session().notifications().current() {
            Some(notification) => println!(
                "{} [{}] {}",
                notification.created_at.format("%H:%M:%S"),
                notification.kind.label(),
                notification.text
            ),
            None => println!("No notification"),
        }
        Outcome::Completed
    }
}
