use super::*;
use crate::db;
use crate::store::{channels, messages, topics};

fn setup() -> (Connection, MessageId) {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute("PRAGMA foreign_keys=ON;", []).unwrap();
    db::bootstrap(&conn, || "db-1".to_string(), 0).unwrap();
    let channel = channels::create(&mut conn, "general", None, 0).unwrap().row;
    let topic = topics::create(&mut conn, &channel.id, "t", 0).unwrap().row;
    let msg = messages::create(&mut conn, &topic.id, "a", "see https://example.com", 0)
        .unwrap()
        .row;
    (conn, msg.id)
}

#[test]
fn insert_and_list_round_trips() {
    let (mut conn, message_id) = setup();
    {
        let tx = conn.transaction().unwrap();
        insert_tx(&tx, &message_id, "url", 4, 23, &serde_json::json!({"url": "https://example.com"}), 1)
            .unwrap();
        tx.commit().unwrap();
    }
    let found = list_by_message(&conn, &message_id).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, "url");
}

#[test]
fn invalid_span_is_rejected() {
    let (mut conn, message_id) = setup();
    let tx = conn.transaction().unwrap();
    let err = insert_tx(&tx, &message_id, "url", 5, 5, &serde_json::json!({}), 1).unwrap_err();
    assert!(matches!(err, HubError::InvalidInput(_)));
}
