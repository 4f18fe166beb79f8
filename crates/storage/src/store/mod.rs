// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single writable connection and every mutation/read operation that
//! touches it. [`Store`] is the one type the daemon and plugin pipeline
//! hold; everything in the submodules below is `pub(crate)`-reachable
//! plumbing, exercised directly by their own `*_tests.rs`.

pub mod attachments;
pub mod channels;
pub mod enrichments;
pub mod events;
pub mod messages;
pub mod plugin_commit;
pub mod topics;
pub mod types;

use std::path::Path;

use hub_core::{
    Attachment, AttachmentId, Channel, ChannelId, Clock, Enrichment, Event, HubError, Message,
    MessageId, SystemClock, Topic, TopicId, WorkspaceMeta,
};
use parking_lot::Mutex;
use rusqlite::Connection;

use crate::db;
pub use messages::MessageFilter;
pub use plugin_commit::{ExtractorItem, LinkifierItem, Snapshot, StalenessReason};
pub use types::{Mutation, RetopicMode};

/// Serializes every mutation and read behind one connection and one clock.
///
/// A single writable SQLite connection is the store's whole concurrency
/// story (spec §2): the daemon's many async handlers all funnel through
/// this mutex rather than opening their own connections.
pub struct Store<C: Clock = SystemClock> {
    conn: Mutex<Connection>,
    clock: C,
}

impl Store<SystemClock> {
    /// Open (creating if absent) the database at `db_path` with the real
    /// wall clock.
    pub fn open(db_path: &Path) -> Result<Self, HubError> {
        Self::open_with_clock(db_path, SystemClock)
    }
}

impl<C: Clock> Store<C> {
    pub fn open_with_clock(db_path: &Path, clock: C) -> Result<Self, HubError> {
        let conn = db::connect(db_path)?;
        let now_ms = clock.epoch_ms() as i64;
        db::bootstrap(&conn, || uuid::Uuid::new_v4().to_string(), now_ms)?;
        Ok(Self { conn: Mutex::new(conn), clock })
    }

    fn now_ms(&self) -> i64 {
        self.clock.epoch_ms() as i64
    }

    pub fn meta(&self) -> Result<WorkspaceMeta, HubError> {
        db::read_meta(&self.conn.lock())
    }

    /// Truncating WAL checkpoint, called once on graceful shutdown.
    pub fn checkpoint(&self) -> Result<(), HubError> {
        db::checkpoint(&self.conn.lock())
    }

    // -- channels ---------------------------------------------------------

    pub fn create_channel(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Mutation<Channel>, HubError> {
        let now_ms = self.now_ms();
        channels::create(&mut self.conn.lock(), name, description, now_ms)
    }

    pub fn list_channels(&self) -> Result<Vec<Channel>, HubError> {
        channels::list(&self.conn.lock())
    }

    pub fn get_channel(&self, id: &ChannelId) -> Result<Option<Channel>, HubError> {
        channels::get(&self.conn.lock(), id)
    }

    // -- topics -------------------------------------------------------------

    pub fn create_topic(&self, channel_id: &ChannelId, title: &str) -> Result<Mutation<Topic>, HubError> {
        let now_ms = self.now_ms();
        topics::create(&mut self.conn.lock(), channel_id, title, now_ms)
    }

    pub fn list_topics(&self, channel_id: &ChannelId) -> Result<Vec<Topic>, HubError> {
        topics::list_by_channel(&self.conn.lock(), channel_id)
    }

    pub fn get_topic(&self, id: &TopicId) -> Result<Option<Topic>, HubError> {
        topics::get(&self.conn.lock(), id)
    }

    pub fn rename_topic(&self, id: &TopicId, title: &str) -> Result<Mutation<Topic>, HubError> {
        let now_ms = self.now_ms();
        topics::rename(&mut self.conn.lock(), id, title, now_ms)
    }

    // -- messages -----------------------------------------------------------

    pub fn create_message(
        &self,
        topic_id: &TopicId,
        sender: &str,
        content_raw: &str,
    ) -> Result<Mutation<Message>, HubError> {
        let now_ms = self.now_ms();
        messages::create(&mut self.conn.lock(), topic_id, sender, content_raw, now_ms)
    }

    pub fn get_message(&self, id: &MessageId) -> Result<Option<Message>, HubError> {
        messages::get(&self.conn.lock(), id)
    }

    pub fn list_messages(&self, filter: &MessageFilter<'_>) -> Result<Vec<Message>, HubError> {
        messages::list(&self.conn.lock(), filter)
    }

    pub fn edit_message(
        &self,
        message_id: &MessageId,
        new_content_raw: &str,
        expected_version: Option<i64>,
    ) -> Result<Mutation<Message>, HubError> {
        let now_ms = self.now_ms();
        messages::edit(&mut self.conn.lock(), message_id, new_content_raw, expected_version, now_ms)
    }

    pub fn delete_message(
        &self,
        message_id: &MessageId,
        actor: &str,
        expected_version: Option<i64>,
    ) -> Result<Mutation<Message>, HubError> {
        let now_ms = self.now_ms();
        messages::delete(&mut self.conn.lock(), message_id, actor, expected_version, now_ms)
    }

    pub fn move_topic(
        &self,
        message_id: &MessageId,
        to_topic_id: &TopicId,
        mode: RetopicMode,
        expected_version: Option<i64>,
    ) -> Result<Vec<Mutation<Message>>, HubError> {
        let now_ms = self.now_ms();
        messages::move_topic(&mut self.conn.lock(), message_id, to_topic_id, mode, expected_version, now_ms)
    }

    // -- attachments ----------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    pub fn create_attachment(
        &self,
        topic_id: &TopicId,
        kind: &str,
        key: Option<&str>,
        value_json: &serde_json::Value,
        dedupe_key: &str,
        source_message_id: Option<&MessageId>,
    ) -> Result<Mutation<Attachment>, HubError> {
        let now_ms = self.now_ms();
        attachments::create(
            &mut self.conn.lock(),
            topic_id,
            kind,
            key,
            value_json,
            dedupe_key,
            source_message_id,
            now_ms,
        )
    }

    pub fn list_attachments(
        &self,
        topic_id: &TopicId,
        kind: Option<&str>,
    ) -> Result<Vec<Attachment>, HubError> {
        attachments::list(&self.conn.lock(), topic_id, kind)
    }

    // -- enrichments ------------------------------------------------------------

    pub fn list_enrichments(&self, message_id: &MessageId) -> Result<Vec<Enrichment>, HubError> {
        enrichments::list_by_message(&self.conn.lock(), message_id)
    }

    // -- plugin derived commits ---------------------------------------------------

    pub fn commit_linkifier_output(
        &self,
        snapshot: &Snapshot,
        plugin_name: &str,
        items: Vec<LinkifierItem>,
    ) -> Result<Result<Vec<hub_core::EnrichmentId>, StalenessReason>, HubError> {
        let now_ms = self.now_ms();
        plugin_commit::commit_linkifier_output(&mut self.conn.lock(), snapshot, plugin_name, items, now_ms)
    }

    pub fn commit_extractor_output(
        &self,
        snapshot: &Snapshot,
        items: Vec<ExtractorItem>,
    ) -> Result<Result<Vec<AttachmentId>, StalenessReason>, HubError> {
        let now_ms = self.now_ms();
        plugin_commit::commit_extractor_output(&mut self.conn.lock(), snapshot, items, now_ms)
    }

    // -- event log ------------------------------------------------------------------

    pub fn latest_event_id(&self) -> Result<i64, HubError> {
        events::latest_event_id(&self.conn.lock())
    }

    pub fn list_events(&self, after: i64, limit: i64) -> Result<Vec<Event>, HubError> {
        events::list_events(&self.conn.lock(), after, limit)
    }

    pub fn replay(
        &self,
        after_event_id: i64,
        replay_until: i64,
        channel_ids: &[ChannelId],
        topic_ids: &[TopicId],
        limit: i64,
    ) -> Result<Vec<Event>, HubError> {
        events::replay(&self.conn.lock(), after_event_id, replay_until, channel_ids, topic_ids, limit)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
