// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hub_core::ChannelId;

fn sample_event(channel_id: Option<ChannelId>) -> Event {
    Event {
        event_id: 1,
        ts: 0,
        name: "message.created".to_string(),
        scope_channel_id: channel_id,
        scope_topic_id: None,
        scope_topic_id2: None,
        entity_type: "message".to_string(),
        entity_id: "msg-1".to_string(),
        data_json: serde_json::json!({}),
    }
}

#[test]
fn wildcard_filter_matches_everything() {
    let filter = Filter::from_subscriptions(None);
    assert!(filter.matches(&sample_event(None)));
}

#[test]
fn empty_subscriptions_matches_nothing() {
    let filter = Filter::from_subscriptions(Some(Subscriptions { channels: Some(vec![]), topics: Some(vec![]) }));
    assert!(matches!(filter, Filter::None));
    assert!(!filter.matches(&sample_event(None)));
}

#[test]
fn scoped_filter_matches_by_channel() {
    let channel = ChannelId::new();
    let filter = Filter::from_subscriptions(Some(Subscriptions {
        channels: Some(vec![channel.clone()]),
        topics: None,
    }));
    assert!(filter.matches(&sample_event(Some(channel))));
    assert!(!filter.matches(&sample_event(Some(ChannelId::new()))));
}

#[tokio::test]
async fn publish_delivers_to_matching_connection_only() {
    let fanout = Fanout::new();
    let mut reg_all = fanout.register(Filter::All);
    let mut reg_none = fanout.register(Filter::None);

    fanout.publish(&sample_event(None));

    assert!(reg_all.receiver.try_recv().is_ok());
    assert!(reg_none.receiver.try_recv().is_err());
    fanout.unregister(reg_all.id);
    fanout.unregister(reg_none.id);
    assert_eq!(fanout.connection_count(), 0);
}
