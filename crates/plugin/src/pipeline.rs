// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ties a worker invocation to a staleness-guarded commit: capture a
//! snapshot, run every configured plugin against it, commit whatever
//! output survives the re-check, and hand the daemon the events that
//! landed so it can publish them to the fanout.
//!
//! Deliberately holds no reference to the daemon's connection set: it
//! takes a plain event callback at construction instead, so the
//! dependency graph stays one-directional (daemon depends on plugin,
//! never the reverse).

use std::sync::Arc;

use hub_core::{Event, HubError, SystemClock};
use hub_storage::store::{ExtractorItem, LinkifierItem, Snapshot, StalenessReason};
use hub_storage::Store;
use tracing::warn;

use crate::circuit_breaker::CircuitBreakers;
use crate::config::PipelineConfig;
use crate::protocol::{PluginKind, WorkerRequest, WorkerResponse};
use crate::worker;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] HubError),
}

/// What happened when one plugin ran against one snapshot. Never surfaced
/// to an HTTP caller; the daemon logs these and moves on.
#[derive(Debug)]
pub enum PluginOutcome {
    Committed { plugin_name: String, events: Vec<Event> },
    Stale { plugin_name: String, reason: StalenessReason },
    CircuitOpen { plugin_name: String },
    WorkerFailed { plugin_name: String, error: String },
}

pub type EventSink = Arc<dyn Fn(Event) + Send + Sync>;

pub struct Pipeline {
    store: Arc<Store<SystemClock>>,
    config: PipelineConfig,
    circuit_breakers: CircuitBreakers,
    on_event: EventSink,
}

impl Pipeline {
    pub fn new(store: Arc<Store<SystemClock>>, config: PipelineConfig, on_event: EventSink) -> Self {
        let circuit_breakers = CircuitBreakers::new(config.circuit_breaker_threshold, config.circuit_breaker_cooldown);
        Self { store, config, circuit_breakers, on_event }
    }

    /// Run every configured plugin against `snapshot`, committing whatever
    /// survives the staleness check and publishing the events that land.
    pub async fn run_for_message(&self, snapshot: Snapshot) -> Result<Vec<PluginOutcome>, PipelineError> {
        let mut outcomes = Vec::with_capacity(self.config.plugins.len());
        for spec in &self.config.plugins {
            outcomes.push(self.run_one(&snapshot, spec).await?);
        }
        Ok(outcomes)
    }

    async fn run_one(&self, snapshot: &Snapshot, spec: &crate::config::PluginSpec) -> Result<PluginOutcome, PipelineError> {
        if self.circuit_breakers.is_open(&spec.name) {
            return Ok(PluginOutcome::CircuitOpen { plugin_name: spec.name.clone() });
        }

        let request = WorkerRequest {
            plugin_name: spec.name.clone(),
            kind: spec.kind,
            message_id: snapshot.message_id.to_string(),
            content_raw: snapshot.content_raw.clone(),
            config: spec.config.clone(),
        };

        let response = match worker::run(request, self.config.timeout).await {
            Ok(response) => response,
            Err(err) => {
                self.circuit_breakers.record_failure(&spec.name);
                warn!(plugin = %spec.name, error = %err, "plugin worker invocation failed");
                return Ok(PluginOutcome::WorkerFailed { plugin_name: spec.name.clone(), error: err.to_string() });
            }
        };

        match response {
            WorkerResponse::Error { message } => {
                self.circuit_breakers.record_failure(&spec.name);
                warn!(plugin = %spec.name, error = %message, "plugin reported an execution error");
                Ok(PluginOutcome::WorkerFailed { plugin_name: spec.name.clone(), error: message })
            }
            WorkerResponse::Linkifier { items } => {
                self.commit_linkifier(snapshot, spec, items)
            }
            WorkerResponse::Extractor { items } => {
                self.commit_extractor(snapshot, spec, items)
            }
        }
    }

    fn commit_linkifier(
        &self,
        snapshot: &Snapshot,
        spec: &crate::config::PluginSpec,
        items: Vec<crate::protocol::LinkifierOutputItem>,
    ) -> Result<PluginOutcome, PipelineError> {
        if let Some(item) = items.iter().find(|item| !item.data.is_object()) {
            self.circuit_breakers.record_failure(&spec.name);
            warn!(plugin = %spec.name, kind = %item.kind, "linkifier item data is not a JSON object");
            return Ok(PluginOutcome::WorkerFailed {
                plugin_name: spec.name.clone(),
                error: "linkifier item data must be a JSON object".to_string(),
            });
        }

        let items: Vec<LinkifierItem> = items
            .into_iter()
            .map(|item| LinkifierItem {
                kind: item.kind,
                span_start: item.span.start,
                span_end: item.span.end,
                data_json: item.data,
            })
            .collect();

        let before = self.store.latest_event_id()?;
        match self.store.commit_linkifier_output(snapshot, &spec.name, items) {
            Err(err) => {
                self.circuit_breakers.record_failure(&spec.name);
                warn!(plugin = %spec.name, error = %err, "plugin output rejected by storage");
                Ok(PluginOutcome::WorkerFailed { plugin_name: spec.name.clone(), error: err.to_string() })
            }
            Ok(Err(reason)) => Ok(PluginOutcome::Stale { plugin_name: spec.name.clone(), reason }),
            Ok(Ok(_ids)) => {
                self.circuit_breakers.record_success(&spec.name);
                let events = self.drain_new_events(before)?;
                Ok(PluginOutcome::Committed { plugin_name: spec.name.clone(), events })
            }
        }
    }

    fn commit_extractor(
        &self,
        snapshot: &Snapshot,
        spec: &crate::config::PluginSpec,
        items: Vec<crate::protocol::ExtractorOutputItem>,
    ) -> Result<PluginOutcome, PipelineError> {
        if let Some(item) = items.iter().find(|item| !item.value_json.is_object()) {
            self.circuit_breakers.record_failure(&spec.name);
            warn!(plugin = %spec.name, kind = %item.kind, "extractor item value_json is not a JSON object");
            return Ok(PluginOutcome::WorkerFailed {
                plugin_name: spec.name.clone(),
                error: "extractor item value_json must be a JSON object".to_string(),
            });
        }

        let items: Vec<ExtractorItem> = items
            .into_iter()
            .map(|item| ExtractorItem { kind: item.kind, key: item.key, value_json: item.value_json, dedupe_key: item.dedupe_key })
            .collect();

        let before = self.store.latest_event_id()?;
        match self.store.commit_extractor_output(snapshot, items) {
            Err(err) => {
                self.circuit_breakers.record_failure(&spec.name);
                warn!(plugin = %spec.name, error = %err, "plugin output rejected by storage");
                Ok(PluginOutcome::WorkerFailed { plugin_name: spec.name.clone(), error: err.to_string() })
            }
            Ok(Err(reason)) => Ok(PluginOutcome::Stale { plugin_name: spec.name.clone(), reason }),
            Ok(Ok(_ids)) => {
                self.circuit_breakers.record_success(&spec.name);
                let events = self.drain_new_events(before)?;
                Ok(PluginOutcome::Committed { plugin_name: spec.name.clone(), events })
            }
        }
    }

    fn drain_new_events(&self, before: i64) -> Result<Vec<Event>, HubError> {
        let after = self.store.latest_event_id()?;
        if after <= before {
            return Ok(Vec::new());
        }
        let events = self.store.list_events(before, after - before)?;
        for event in &events {
            (self.on_event)(event.clone());
        }
        Ok(events)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
