// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized schema definitions for the workspace database.

pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA_META: &str = "
    CREATE TABLE IF NOT EXISTS workspace_meta (
        schema_version INTEGER NOT NULL,
        db_id TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
";

pub const SCHEMA_CHANNELS: &str = "
    CREATE TABLE IF NOT EXISTS channels (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at INTEGER NOT NULL
    )
";

pub const SCHEMA_TOPICS: &str = "
    CREATE TABLE IF NOT EXISTS topics (
        id TEXT PRIMARY KEY,
        channel_id TEXT NOT NULL REFERENCES channels(id),
        title TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
";

pub const SCHEMA_TOPICS_CHANNEL_IDX: &str =
    "CREATE INDEX IF NOT EXISTS idx_topics_channel ON topics(channel_id)";

pub const SCHEMA_MESSAGES: &str = "
    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        topic_id TEXT NOT NULL REFERENCES topics(id),
        channel_id TEXT NOT NULL REFERENCES channels(id),
        sender TEXT NOT NULL,
        content_raw TEXT NOT NULL,
        version INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL,
        edited_at INTEGER,
        deleted_at INTEGER,
        deleted_by TEXT
    )
";

pub const SCHEMA_MESSAGES_TOPIC_IDX: &str =
    "CREATE INDEX IF NOT EXISTS idx_messages_topic ON messages(topic_id, created_at)";

pub const SCHEMA_ATTACHMENTS: &str = "
    CREATE TABLE IF NOT EXISTS attachments (
        id TEXT PRIMARY KEY,
        topic_id TEXT NOT NULL REFERENCES topics(id),
        kind TEXT NOT NULL,
        key TEXT,
        value_json TEXT NOT NULL,
        dedupe_key TEXT NOT NULL,
        source_message_id TEXT REFERENCES messages(id),
        created_at INTEGER NOT NULL
    )
";

/// Enforces idempotent upsert-by-identity: a second attachment with the same
/// `(topic_id, kind, key, dedupe_key)` is a no-op rather than a duplicate row.
pub const SCHEMA_ATTACHMENTS_IDENTITY_IDX: &str = "
    CREATE UNIQUE INDEX IF NOT EXISTS idx_attachments_identity
    ON attachments(topic_id, kind, COALESCE(key, ''), dedupe_key)
";

pub const SCHEMA_ENRICHMENTS: &str = "
    CREATE TABLE IF NOT EXISTS enrichments (
        id TEXT PRIMARY KEY,
        message_id TEXT NOT NULL REFERENCES messages(id),
        kind TEXT NOT NULL,
        span_start INTEGER NOT NULL,
        span_end INTEGER NOT NULL,
        data_json TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
";

pub const SCHEMA_ENRICHMENTS_MESSAGE_IDX: &str =
    "CREATE INDEX IF NOT EXISTS idx_enrichments_message ON enrichments(message_id)";

pub const SCHEMA_EVENTS: &str = "
    CREATE TABLE IF NOT EXISTS events (
        event_id INTEGER PRIMARY KEY AUTOINCREMENT,
        ts INTEGER NOT NULL,
        name TEXT NOT NULL,
        scope_channel_id TEXT,
        scope_topic_id TEXT,
        scope_topic_id2 TEXT,
        entity_type TEXT NOT NULL,
        entity_id TEXT NOT NULL,
        data_json TEXT NOT NULL
    )
";

pub const SCHEMA_EVENTS_SCOPE_IDX: &str =
    "CREATE INDEX IF NOT EXISTS idx_events_scope ON events(scope_channel_id, scope_topic_id, event_id)";

/// All statements to run, in order, against a fresh or existing database.
/// Every `CREATE` is `IF NOT EXISTS`, so this is safe to re-run on every
/// daemon startup.
pub const ALL_STATEMENTS: &[&str] = &[
    SCHEMA_META,
    SCHEMA_CHANNELS,
    SCHEMA_TOPICS,
    SCHEMA_TOPICS_CHANNEL_IDX,
    SCHEMA_MESSAGES,
    SCHEMA_MESSAGES_TOPIC_IDX,
    SCHEMA_ATTACHMENTS,
    SCHEMA_ATTACHMENTS_IDENTITY_IDX,
    SCHEMA_ENRICHMENTS,
    SCHEMA_ENRICHMENTS_MESSAGE_IDX,
    SCHEMA_EVENTS,
    SCHEMA_EVENTS_SCOPE_IDX,
];
