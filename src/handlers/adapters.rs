/*!
 * Adapter handlers
 *
 * Listing, selection and monitor mode.
 */

use serde_json::Value;

use redwifi::Outcome;

use crate::app::ConsoleApp;

impl ConsoleApp {
    /// Reload the adapter listing and print it
    pub async fn handle_refresh_adapters(&mut self) -> Outcome {
        let registry = self.session().adapters().clone();
        let outcome = self.watch(async move { registry.refresh().await }).await;
        self.print_adapters();
        outcome
    }

    pub fn handle_select_adapter(&mut self, name: &str) -> Outcome {
        if self.session().adapters().select(name) {
            println!("Selected {}", name);
            Outcome::Completed
        } else {
            Outcome::Rejected(format!("Adapter {} not found", name))
        }
    }

    /// Print backend details for `name`, or for the selected adapter
    pub async fn handle_adapter_info(&mut self, name: Option<String>) -> Outcome {
        let Some(name) = name.or_else(|| self.session().adapters().selected_interface()) else {
            let text = "Please select an adapter".to_string();
            self.session().notifications().error(text.clone());
            return Outcome::Rejected(text);
        };

        match self.session().adapters().info(&name).await {
            Some(info) => {
                println!("{}", name);
                for (key, value) in info {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    println!("  {:<16} {}", key, value);
                }
                Outcome::Completed
            }
            None => Outcome::SoftFailure(format!("No information for {}", name)),
        }
    }

    /// Toggle monitor mode on `interface`, or on the selected adapter
    pub async fn handle_monitor_mode(&mut self, interface: Option<String>, enabled: bool) -> Outcome {
        let registry = self.session().adapters().clone();
        let interface = interface
            .or_else(|| registry.selected_interface())
            .unwrap_or_default();

        let outcome = self
            .watch(async move { registry.set_monitor_mode(&interface, enabled).await })
            .await;
        self.print_adapters();
        outcome
    }

    fn print_adapters(&self) {
        let state = self.session().adapters().snapshot();
        if state.adapters.is_empty() {
            println!("No adapters");
            return;
        }

        for adapter in &state.adapters {
            let marker = if state.selected.as_deref() == Some(adapter.interface_name.as_str()) {
                '*'
            } else {
                ' '
            };
            println!(
                "{} {:<12} {:<8} {}",
                marker,
                adapter.interface_name,
                adapter.mode.to_string(),
                adapter.status
            );
        }
    }
}
