mod common;

use std::time::Duration;

use serde_json::json;

use map_server::Options;

const LONG_PING: Duration = Duration::from_secs(30);

#[tokio::test]
async fn stream_opens_with_connected_frame() {
    let (mut server, addr) = common::start_server(LONG_PING).await;

    let mut client = common::SseClient::connect(addr).await;
    let id = client.expect_connected().await;

    assert!(server.state().registry.contains(id));
    assert_eq!(server.client_count(), 1);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn marker_reaches_subscriber() {
    let (mut server, addr) = common::start_server(LONG_PING).await;
    let mut client = common::SseClient::connect(addr).await;
    client.expect_connected().await;

    let report = server
        .show_marker([37.80, -122.40], Some("X"), Some(Options::new()))
        .unwrap();
    assert_eq!(report.delivered, 1);

    assert_eq!(
        client.next_json().await,
        json!({
            "type": "SHOW_MARKER",
            "data": { "coordinates": [37.80, -122.40], "text": "X", "options": {} }
        })
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn set_view_frame_carries_only_center() {
    let (mut server, addr) = common::start_server(LONG_PING).await;
    let mut client = common::SseClient::connect(addr).await;
    client.expect_connected().await;

    server.set_view(None, Some([1.0, 2.0]), None).unwrap();

    let frame = client.next_json().await;
    assert_eq!(frame["type"], "SET_VIEW");
    assert_eq!(frame["data"], json!({ "center": [1.0, 2.0] }));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn all_subscribers_get_identical_payloads_in_order() {
    let (mut server, addr) = common::start_server(LONG_PING).await;
    let mut a = common::SseClient::connect(addr).await;
    let mut b = common::SseClient::connect(addr).await;
    let id_a = a.expect_connected().await;
    let id_b = b.expect_connected().await;
    assert_ne!(id_a, id_b);

    server.set_title("One", None).unwrap();
    server
        .show_polygon(vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]], None)
        .unwrap();
    server
        .show_line(vec![[0.0, 0.0], [2.0, 2.0]], None)
        .unwrap();

    let mut seen_a = Vec::new();
    let mut seen_b = Vec::new();
    for _ in 0..3 {
        seen_a.push(a.next_raw().await.unwrap());
        seen_b.push(b.next_raw().await.unwrap());
    }
    assert_eq!(seen_a, seen_b);

    let types: Vec<String> = seen_a
        .iter()
        .map(|raw| serde_json::from_str::<serde_json::Value>(raw).unwrap()["type"].to_string())
        .collect();
    assert_eq!(types, vec!["\"SET_TITLE\"", "\"SHOW_POLYGON\"", "\"SHOW_LINE\""]);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn idle_stream_sends_ping() {
    let (mut server, addr) = common::start_server(Duration::from_millis(200)).await;
    let mut client = common::SseClient::connect(addr).await;
    client.expect_connected().await;

    assert_eq!(client.next_json().await, json!({ "type": "ping" }));

    // Traffic after a ping is still delivered.
    server.set_title("after ping", None).unwrap();
    loop {
        let frame = client.next_json().await;
        if frame["type"] == "ping" {
            continue;
        }
        assert_eq!(frame["type"], "SET_TITLE");
        break;
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn disconnect_removes_subscriber() {
    let (mut server, addr) = common::start_server(Duration::from_millis(100)).await;
    let mut keep = common::SseClient::connect(addr).await;
    let keep_id = keep.expect_connected().await;
    let mut leave = common::SseClient::connect(addr).await;
    let leave_id = leave.expect_connected().await;
    assert_eq!(server.client_count(), 2);

    drop(leave);

    // Noticed on the next emit, at the latest the next ping.
    let registry = server.state().registry.clone();
    assert!(common::eventually(|| !registry.contains(leave_id)).await);
    assert!(registry.contains(keep_id));

    // The remaining subscriber is unaffected.
    server.set_title("still here", None).unwrap();
    loop {
        let frame = keep.next_json().await;
        if frame["type"] != "ping" {
            assert_eq!(frame["data"]["title"], "still here");
            break;
        }
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn reconnect_gets_fresh_identity_and_no_backlog() {
    let (mut server, addr) = common::start_server(Duration::from_millis(100)).await;
    let mut first = common::SseClient::connect(addr).await;
    let first_id = first.expect_connected().await;
    drop(first);

    let registry = server.state().registry.clone();
    assert!(common::eventually(|| registry.is_empty()).await);

    // Nobody to deliver to.
    assert!(server.set_title("missed", None).unwrap().no_clients());

    let mut second = common::SseClient::connect(addr).await;
    let second_id = second.expect_connected().await;
    assert_ne!(first_id, second_id);

    server.set_title("fresh", None).unwrap();
    loop {
        let frame = second.next_json().await;
        if frame["type"] != "ping" {
            assert_eq!(frame["data"]["title"], "fresh");
            break;
        }
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn stop_ends_open_streams() {
    let (mut server, addr) = common::start_server(LONG_PING).await;
    let mut client = common::SseClient::connect(addr).await;
    client.expect_connected().await;

    server.stop().await.unwrap();

    assert_eq!(client.next_raw().await, None);
    assert_eq!(server.client_count(), 0);
}

#[tokio::test]
async fn view_report_round_trip_over_http() {
    let (mut server, addr) = common::start_server(LONG_PING).await;

    let http = reqwest::Client::new();
    let resp = http
        .post(format!("http://{addr}/api/viewChanged"))
        .json(&json!({ "zoom": 9, "center": [51.5, -0.12] }))
        .send()
        .await
        .expect("report request");
    assert!(resp.status().is_success());
    let ack: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(ack, json!({ "status": "success" }));

    let view = server.get_current_view();
    assert_eq!(view.zoom, 9.0);
    assert_eq!(view.center, [51.5, -0.12]);
    assert_eq!(view.bounds, None);

    server.stop().await.unwrap();
}
