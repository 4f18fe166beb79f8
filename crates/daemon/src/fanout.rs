// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WebSocket connection set and event publication.
//!
//! `Fanout` owns every open connection's outbound channel and subscription
//! filter; `ws.rs` owns socket I/O and only ever talks to `Fanout` through
//! `register`/`unregister`/`publish`. This keeps the fanout-socket cycle
//! from becoming a literal `Rc` cycle: connections are looked up by id, not
//! held as back-references.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use hub_core::{ChannelId, Event, TopicId};
use hub_wire::{EventScope, ServerFrame, Subscriptions};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};

pub type ConnId = u64;

#[derive(Debug, Clone)]
pub enum Filter {
    All,
    None,
    Scoped { channels: HashSet<ChannelId>, topics: HashSet<TopicId> },
}

impl Filter {
    pub fn from_subscriptions(subs: Option<Subscriptions>) -> Self {
        match subs {
            None => Filter::All,
            Some(Subscriptions { channels, topics }) => {
                let channels: HashSet<_> = channels.unwrap_or_default().into_iter().collect();
                let topics: HashSet<_> = topics.unwrap_or_default().into_iter().collect();
                if channels.is_empty() && topics.is_empty() {
                    Filter::None
                } else {
                    Filter::Scoped { channels, topics }
                }
            }
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Filter::All => true,
            Filter::None => false,
            Filter::Scoped { channels, topics } => {
                event.scope_channel_id.as_ref().is_some_and(|c| channels.contains(c))
                    || event.scope_topic_id.as_ref().is_some_and(|t| topics.contains(t))
                    || event.scope_topic_id2.as_ref().is_some_and(|t| topics.contains(t))
            }
        }
    }
}

struct Connection {
    sender: mpsc::Sender<ServerFrame>,
    filter: Filter,
}

/// Capacity of each connection's outbound channel. A full channel on
/// `try_send` is treated as backpressure (close 1008) per spec §4.4 — the
/// server never buffers beyond what the socket itself accepts.
const CHANNEL_CAPACITY: usize = 64;

pub struct Fanout {
    connections: Mutex<HashMap<ConnId, Connection>>,
    next_id: AtomicU64,
    shutdown: broadcast::Sender<()>,
}

impl Default for Fanout {
    fn default() -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self { connections: Mutex::new(HashMap::new()), next_id: AtomicU64::new(0), shutdown }
    }
}

/// Returned to a newly-registered connection so it can read published
/// frames and know its own id for `unregister`.
pub struct Registration {
    pub id: ConnId,
    pub receiver: mpsc::Receiver<ServerFrame>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, filter: Filter) -> Registration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        self.connections.lock().insert(id, Connection { sender, filter });
        Registration { id, receiver }
    }

    pub fn unregister(&self, id: ConnId) {
        self.connections.lock().remove(&id);
    }

    /// Send `event` to every matching connection. Returns the ids of
    /// connections whose channel was full or closed, so the caller can
    /// close those sockets with code 1008.
    pub fn publish(&self, event: &Event) -> Vec<ConnId> {
        let frame = to_server_frame(event);
        let mut backpressured = Vec::new();
        let connections = self.connections.lock();
        for (id, conn) in connections.iter() {
            if conn.filter.matches(event) {
                if conn.sender.try_send(frame.clone()).is_err() {
                    backpressured.push(*id);
                }
            }
        }
        backpressured
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// A receiver that fires once when [`Fanout::shutdown`] is called.
    /// `ws.rs` holds one per connection and closes with code 1001 on receipt.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }

    /// Signals every live connection to close with code 1001. Does not wait
    /// for sockets to actually close; callers that need that should drain
    /// `connection_count()` afterward with a timeout.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(());
    }
}

pub fn to_server_frame(event: &Event) -> ServerFrame {
    ServerFrame::Event {
        event_id: event.event_id,
        ts: event.ts,
        name: event.name.clone(),
        scope: EventScope {
            channel_id: event.scope_channel_id.clone(),
            topic_id: event.scope_topic_id.clone(),
            topic_id2: event.scope_topic_id2.clone(),
        },
        data: event.data_json.clone(),
    }
}

#[cfg(test)]
#[path = "fanout_tests.rs"]
mod tests;
