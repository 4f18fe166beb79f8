use super::*;
use crate::db;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute("PRAGMA foreign_keys=ON;", []).unwrap();
    db::bootstrap(&conn, || "db-1".to_string(), 0).unwrap();
    conn
}

#[test]
fn latest_event_id_is_zero_when_empty() {
    let conn = setup();
    assert_eq!(latest_event_id(&conn).unwrap(), 0);
}

#[test]
fn append_assigns_strictly_increasing_ids() {
    let conn = setup();
    let a = append_event(&conn, 1, "test.a", None, None, None, "test", "x", &Json::Null).unwrap();
    let b = append_event(&conn, 2, "test.b", None, None, None, "test", "y", &Json::Null).unwrap();
    assert!(b > a);
    assert_eq!(latest_event_id(&conn).unwrap(), b);
}

#[test]
fn replay_is_deterministic_and_bounded_by_until() {
    let conn = setup();
    for i in 0..10 {
        append_event(&conn, i, "test.seed", Some("ch1"), None, None, "test", "x", &Json::Null)
            .unwrap();
    }
    let run1 = replay(&conn, 0, 5, &[], &[], 1000).unwrap();
    let run2 = replay(&conn, 0, 5, &[], &[], 1000).unwrap();
    assert_eq!(run1.len(), 5);
    assert_eq!(
        run1.iter().map(|e| e.event_id).collect::<Vec<_>>(),
        run2.iter().map(|e| e.event_id).collect::<Vec<_>>()
    );
}

#[test]
fn replay_filters_by_channel_or_topic_scope() {
    let conn = setup();
    append_event(&conn, 0, "a", Some("ch1"), None, None, "test", "x", &Json::Null).unwrap();
    append_event(&conn, 0, "b", Some("ch2"), None, None, "test", "x", &Json::Null).unwrap();
    append_event(&conn, 0, "c", None, Some("top1"), None, "test", "x", &Json::Null).unwrap();
    append_event(&conn, 0, "d", None, None, Some("top1"), "test", "x", &Json::Null).unwrap();

    let filtered = replay(
        &conn,
        0,
        10,
        &[ChannelId::from_string("ch1")],
        &[TopicId::from_string("top1")],
        1000,
    )
    .unwrap();
    let names: Vec<_> = filtered.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c", "d"]);
}

#[test]
fn replay_with_empty_subscription_lists_is_wildcard_only_when_both_empty() {
    let conn = setup();
    append_event(&conn, 0, "a", Some("ch1"), None, None, "test", "x", &Json::Null).unwrap();

    // Both empty -> wildcard, everything matches.
    let all = replay(&conn, 0, 10, &[], &[], 1000).unwrap();
    assert_eq!(all.len(), 1);

    // Non-empty channel list with no match -> nothing, even though topic
    // list is empty (OR semantics, not AND-with-wildcard-fallback).
    let none = replay(&conn, 0, 10, &[ChannelId::from_string("ch2")], &[], 1000).unwrap();
    assert!(none.is_empty());
}
