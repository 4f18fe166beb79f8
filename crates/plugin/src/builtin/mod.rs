// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static registry of compiled-in plugins, hosted by the worker binary.
//! No dynamic loading (`unsafe_code` is forbidden workspace-wide); adding a
//! plugin means adding a module here and a match arm in `dispatch`.

mod url_linkifier;
mod value_extractor;

use crate::protocol::{PluginKind, WorkerRequest, WorkerResponse};

pub fn dispatch(request: &WorkerRequest) -> WorkerResponse {
    match (request.plugin_name.as_str(), request.kind) {
        ("url-linkifier", PluginKind::Linkifier) => url_linkifier::run(request),
        ("value-extractor", PluginKind::Extractor) => value_extractor::run(request),
        (name, _) => WorkerResponse::Error { message: format!("unknown plugin: {name}") },
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
