/*!
 * redwifi
 *
 * Client-side orchestration for a WiFi red team backend: adapter selection
 * and monitor mode, scans, target binding, deauthentication and handshake
 * capture requests, and the notifications that report their outcome.
 */

pub mod core;

pub use crate::core::*;
