/*!
 * Attack handlers
 *
 * Editing and submitting the deauthentication and handshake capture forms.
 */

use redwifi::{CaptureParams, DeauthParams, Outcome};

use crate::app::ConsoleApp;
use crate::messages::{CaptureField, DeauthField};

/// Integer prefix of operator text: `"20"`, `" 20 "` and `"20x"` all give 20.
pub fn leading_integer(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

impl ConsoleApp {
    pub fn handle_show_deauth(&mut self) -> Outcome {
        print_deauth(&self.session().deauth().params());
        Outcome::Completed
    }

    pub fn handle_edit_deauth(&mut self, field: DeauthField) -> Outcome {
        let deauth = self.session().deauth();
        match field {
            DeauthField::Bssid(bssid) => deauth.update_params(|p| p.target_bssid = bssid),
            DeauthField::Client(client) => deauth.update_params(|p| p.target_client = client),
            DeauthField::Packets(text) => match leading_integer(&text) {
                Some(packets) => deauth.update_params(|p| p.packet_count = packets),
                None => return self.reject_number(&text),
            },
        }
        self.handle_show_deauth()
    }

    pub async fn handle_run_deauth(&mut self) -> Outcome {
        let deauth = self.session().deauth().clone();
        self.watch(async move { deauth.submit().await }).await
    }

    pub fn handle_show_capture(&mut self) -> Outcome {
        let capture = self.session().capture().snapshot();
        print_capture(&capture.params);
        if let Some(file) = capture.last_capture_file {
            println!("  last capture      {}", file);
        }
        Outcome::Completed
    }

    pub fn handle_edit_capture(&mut self, field: CaptureField) -> Outcome {
        let capture = self.session().capture();
        match field {
            CaptureField::Bssid(bssid) => capture.update_params(|p| p.target_bssid = bssid),
            CaptureField::Channel(text) => match leading_integer(&text).filter(|c| *c > 0) {
                Some(channel) => capture.update_params(|p| p.channel = channel),
                None => return self.reject_number(&text),
            },
            CaptureField::Duration(text) => match leading_integer(&text) {
                Some(duration) => capture.update_params(|p| p.duration_secs = duration),
                None => return self.reject_number(&text),
            },
            CaptureField::UseDeauth(enabled) => capture.update_params(|p| p.use_deauth = enabled),
        }
        self.handle_show_capture()
    }

    pub async fn handle_run_capture(&mut self) -> Outcome {
        let capture = self.session().capture().clone();
        self.watch(async move { capture.submit().await }).await
    }

    fn reject_number(&self, text: &str) -> Outcome {
        let text = format!("Invalid number: {}", text);
        self.session().notifications().warning(text.clone());
        Outcome::Rejected(text)
    }
}

fn print_deauth(params: &DeauthParams) {
    println!("Deauth");
    println!("  target bssid      {}", blank_as_dash(&params.target_bssid));
    println!(
        "  target client     {}",
        params.target_client.as_deref().unwrap_or("broadcast")
    );
    println!("  packets           {}", params.packet_count);
}

fn print_capture(params: &CaptureParams) {
    println!("Handshake capture");
    println!("  target bssid      {}", blank_as_dash(&params.target_bssid));
    println!("  channel           {}", params.channel);
    println!("  duration          {}s", params.duration_secs);
    println!(
        "  deauth assist     {}",
        if params.use_deauth { "on" } else { "off" }
    );
}

fn blank_as_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("20"), Some(20));
        assert_eq!(leading_integer("  120s"), Some(120));
        assert_eq!(leading_integer("7,11"), Some(7));
        assert_eq!(leading_integer("abc"), None);
        assert_eq!(leading_integer(""), None);
        assert_eq!(leading_integer("-5"), None);
    }
}
