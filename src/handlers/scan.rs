/*!
 * Scan handlers
 *
 * Scanning, result listing and target selection.
 */

use redwifi::{Outcome, WirelessNetwork};

use crate::app::ConsoleApp;

impl ConsoleApp {
    /// Run one scan and print the results
    pub async fn handle_start_scan(&mut self) -> Outcome {
        let scan = self.session().scan().clone();
        let outcome = self.watch(async move { scan.start().await }).await;
        if outcome.is_completed() {
            self.handle_show_networks();
        }
        outcome
    }

    pub fn handle_show_networks(&mut self) -> Outcome {
        let networks = self.session().scan().networks();
        if networks.is_empty() {
            println!("No networks");
        } else {
            print_networks(&networks);
        }
        Outcome::Completed
    }

    /// Reload and print the recent scan history
    pub async fn handle_show_history(&mut self) -> Outcome {
        let outcome = self.session().scan().refresh_history().await;
        if !outcome.is_completed() {
            println!("Scan history unavailable");
        }
        let history = self.session().scan().history();
        if history.is_empty() {
            println!("No scans recorded");
        }
        for summary in history {
            println!(
                "{:<24} {:<12} {:>4} networks  {}",
                summary.scan_id,
                summary.interface,
                summary.total_networks,
                summary.timestamp.as_deref().unwrap_or("-")
            );
        }
        outcome
    }

    pub fn handle_select_network(&mut self, index: usize) -> Outcome {
        match self.session().target().select_index(index) {
            Some(selection) => {
                println!(
                    "Target {} ({}) channel {}",
                    selection.bssid,
                    if selection.essid.is_empty() { "hidden" } else { selection.essid.as_str() },
                    if selection.channel.is_empty() { "?" } else { selection.channel.as_str() }
                );
                Outcome::Completed
            }
            None => Outcome::Rejected(format!("No network at position {}", index + 1)),
        }
    }

    pub fn handle_clear_target(&mut self) -> Outcome {
        self.session().target().clear();
        Outcome::Completed
    }
}

fn print_networks(networks: &[WirelessNetwork]) {
    println!(
        "{:>3}  {:<17}  {:<32}  {:>7}  {:>6}  {}",
        "#", "BSSID", "ESSID", "CHANNEL", "POWER", "ENCRYPTION"
    );
    for (position, network) in networks.iter().enumerate() {
        let power = network
            .signal_power
            .map(|p| format!("{:.0}", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}  {:<17}  {:<32}  {:>7}  {:>6}  {}",
            position + 1,
            network.bssid,
            network.display_name(),
            network.channel,
            power,
            network.encryption.as_deref().unwrap_or("-")
        );
    }
}
