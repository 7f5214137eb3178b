//! Tests for the in-process broadcast hub.

use crate::chat::{adapters::BroadcastHub, ports::Broadcaster};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subscribers_receive_channel_payloads() {
    let hub = BroadcastHub::new();
    let mut first = hub.subscribe("task:a").expect("subscribe should succeed");
    let mut second = hub.subscribe("task:a").expect("subscribe should succeed");

    hub.broadcast("task:a", json!({ "n": 1 }))
        .await
        .expect("broadcast should succeed");

    assert_eq!(first.recv().await.expect("payload"), json!({ "n": 1 }));
    assert_eq!(second.recv().await.expect("payload"), json!({ "n": 1 }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn channels_are_isolated() {
    let hub = BroadcastHub::new();
    let mut other = hub.subscribe("task:b").expect("subscribe should succeed");

    hub.broadcast("task:a", json!("ignored"))
        .await
        .expect("broadcast should succeed");

    assert!(other.try_recv().is_err());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn broadcast_without_subscribers_is_a_no_op() {
    let hub = BroadcastHub::with_capacity(4);
    let dropped = hub.subscribe("task:c").expect("subscribe should succeed");
    drop(dropped);

    hub.broadcast("task:c", json!("first"))
        .await
        .expect("broadcast should succeed");
    hub.broadcast("task:nobody", json!("second"))
        .await
        .expect("broadcast should succeed");

    let mut late = hub.subscribe("task:c").expect("subscribe should succeed");
    assert!(late.try_recv().is_err(), "late subscribers see no history");
}

#[rstest]
fn abandoned_channels_are_pruned_on_subscribe() {
    let hub = BroadcastHub::new();
    let abandoned = hub.subscribe("task:gone").expect("subscribe should succeed");
    let _kept = hub.subscribe("task:live").expect("subscribe should succeed");
    drop(abandoned);

    let _fresh = hub.subscribe("task:new").expect("subscribe should succeed");

    assert_eq!(hub.channel_count(), 2);
}
