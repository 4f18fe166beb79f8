use super::*;
use hub_core::FakeClock;

fn open_store() -> (tempfile::TempDir, Store<FakeClock>) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open_with_clock(&dir.path().join("hub.db"), FakeClock::new()).unwrap();
    (dir, store)
}

#[test]
fn open_bootstraps_meta_once() {
    let (_dir, store) = open_store();
    let meta = store.meta().unwrap();
    assert!(!meta.db_id.is_empty());
}

#[test]
fn end_to_end_create_flow_appends_events_in_order() {
    let (_dir, store) = open_store();
    let channel = store.create_channel("general", None).unwrap().row;
    let topic = store.create_topic(&channel.id, "t").unwrap().row;
    let message = store.create_message(&topic.id, "a", "hello").unwrap().row;

    assert_eq!(store.latest_event_id().unwrap(), 3);
    let events = store.list_events(0, 10).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].entity_id, message.id.as_str());
}

#[test]
fn checkpoint_is_callable_after_writes() {
    let (_dir, store) = open_store();
    store.create_channel("general", None).unwrap();
    store.checkpoint().unwrap();
}
