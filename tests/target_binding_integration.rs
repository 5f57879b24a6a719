//! Target Binding Integration Tests
//!
//! Selecting a scanned network copies its identity into both attack forms.

mod common;

use common::{drain, network, ready_session, scan_ok, MockGateway};
use redwifi::NotificationKind;

const BSSID: &str = "AA:BB:CC:DD:EE:FF";

#[tokio::test]
async fn test_select_sets_both_forms() {
    let gateway = MockGateway::new();
    let session = ready_session(&gateway).await;

    let selection = session
        .target()
        .select_target(&network(BSSID, "HomeNet", "6"));

    assert_eq!(selection.bssid, BSSID);
    assert_eq!(session.deauth().params().target_bssid, BSSID);
    let capture = session.capture().params();
    assert_eq!(capture.target_bssid, BSSID);
    assert_eq!(capture.channel, 6);
    assert_eq!(session.target().selection(), Some(selection));
}

#[tokio::test]
async fn test_non_numeric_channel_keeps_prior_value() {
    let gateway = MockGateway::new();
    let session = ready_session(&gateway).await;
    session.capture().update_params(|p| p.channel = 11);

    session
        .target()
        .select_target(&network(BSSID, "HomeNet", "auto"));

    let capture = session.capture().params();
    assert_eq!(capture.target_bssid, BSSID);
    assert_eq!(capture.channel, 11);
}

#[tokio::test]
async fn test_multi_channel_report_uses_first_channel() {
    let gateway = MockGateway::new();
    let session = ready_session(&gateway).await;

    session
        .target()
        .select_target(&network(BSSID, "HomeNet", " 1, 6"));

    assert_eq!(session.capture().params().channel, 1);
}

#[tokio::test]
async fn test_selection_keeps_other_form_fields() {
    let gateway = MockGateway::new();
    let session = ready_session(&gateway).await;
    session.deauth().update_params(|p| {
        p.packet_count = 5;
        p.target_client = Some("11:22:33:44:55:66".to_string());
    });
    session.capture().update_params(|p| p.use_deauth = true);

    session.target().select_target(&network(BSSID, "HomeNet", "6"));

    let deauth = session.deauth().params();
    assert_eq!(deauth.packet_count, 5);
    assert_eq!(deauth.target_client.as_deref(), Some("11:22:33:44:55:66"));
    assert!(session.capture().params().use_deauth);
}

#[tokio::test]
async fn test_forms_do_not_alias_scan_results() {
    let gateway = MockGateway::new();
    gateway
        .scans
        .reply(scan_ok(&[network(BSSID, "HomeNet", "6")]));
    gateway.scans.reply(scan_ok(&[network(
        "11:22:33:44:55:66",
        "Other",
        "1",
    )]));
    let session = ready_session(&gateway).await;

    session.scan().start().await;
    session.scan().history_settled().await;
    session.target().select_index(0).unwrap();

    session.scan().start().await;
    session.scan().history_settled().await;

    assert_eq!(session.deauth().params().target_bssid, BSSID);
    assert_eq!(session.capture().params().channel, 6);
    assert_eq!(session.target().selection().unwrap().essid, "HomeNet");
}

#[tokio::test]
async fn test_select_index_out_of_range_warns() {
    let gateway = MockGateway::new();
    let session = ready_session(&gateway).await;
    let mut events = session.notifications().events();

    assert!(session.target().select_index(3).is_none());

    let posted = drain(&mut events);
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].kind, NotificationKind::Warning);
    assert_eq!(posted[0].text, "No network at position 4");
    assert!(session.deauth().params().target_bssid.is_empty());
}

#[tokio::test]
async fn test_clear_keeps_form_contents() {
    let gateway = MockGateway::new();
    let session = ready_session(&gateway).await;
    session.target().select_target(&network(BSSID, "HomeNet", "6"));

    session.target().clear();

    assert_eq!(session.target().selection(), None);
    assert_eq!(session.deauth().params().target_bssid, BSSID);
}
