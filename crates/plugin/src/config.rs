// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-plugin configuration: which built-in plugin to run, under what name,
//! with what wall-clock timeout.

use std::time::Duration;

use crate::protocol::PluginKind;

#[derive(Debug, Clone)]
pub struct PluginSpec {
    pub name: String,
    pub kind: PluginKind,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub plugins: Vec<PluginSpec>,
    pub timeout: Duration,
    pub circuit_breaker_threshold: u32,
    pub circuit_breaker_cooldown: Duration,
    pub marker_dir_name: String,
}

impl Default for PipelineConfig {
    /// The two built-in plugins (url-linkifier, value-extractor), the
    /// spec's default timeout/circuit-breaker knobs.
    fn default() -> Self {
        Self {
            plugins: vec![
                PluginSpec {
                    name: "url-linkifier".to_string(),
                    kind: PluginKind::Linkifier,
                    config: serde_json::json!({}),
                },
                PluginSpec {
                    name: "value-extractor".to_string(),
                    kind: PluginKind::Extractor,
                    config: serde_json::json!({}),
                },
            ],
            timeout: Duration::from_secs(5),
            circuit_breaker_threshold: 3,
            circuit_breaker_cooldown: Duration::from_secs(60),
            marker_dir_name: ".agentlip".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
