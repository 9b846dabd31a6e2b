//! Composite summaries, memoized per unit name.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::port::infer_port;
use crate::runner::{CommandRunner, capture_text};
use crate::scope::resolve_scope;
use crate::systemctl;
use crate::unit::{NO_DESCRIPTION, NOT_FOUND_STATE, ServiceSummary};

/// Caches one [`ServiceSummary`] per unit name until explicitly dropped.
///
/// A full computation costs up to six sequential process spawns, which is
/// the dominant latency of a dashboard refresh. Entries never expire on a
/// timer: the action dispatcher drops the key it mutated, a bulk reload
/// drops everything, and nothing else writes the map.
pub struct SummaryCache {
    runner: Arc<dyn CommandRunner>,
    entries: BTreeMap<String, ServiceSummary>,
}

impl SummaryCache {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            entries: BTreeMap::new(),
        }
    }

    /// Cached summary for `unit`, computed on first request.
    pub async fn get_summary(&mut self, unit: &str) -> ServiceSummary {
        if let Some(summary) = self.entries.get(unit) {
            return summary.clone();
        }
        let summary = self.compute(unit).await;
        self.entries.insert(unit.to_string(), summary.clone());
        summary
    }

    /// The stored record, if any, without triggering a computation.
    pub fn cached(&self, unit: &str) -> Option<&ServiceSummary> {
        self.entries.get(unit)
    }

    pub fn invalidate(&mut self, unit: &str) {
        self.entries.remove(unit);
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// One full pass: resolve scope, then issue the four follow-up queries
    /// with that same scope's flag.
    async fn compute(&self, unit: &str) -> ServiceSummary {
        let runner = self.runner.as_ref();

        let scope = resolve_scope(runner, unit).await;
        if scope.is_none() {
            return ServiceSummary::not_found();
        }

        let active = capture_text(runner, &systemctl::is_active(scope, unit)).await;
        let enabled = capture_text(runner, &systemctl::is_enabled(scope, unit)).await;
        let description =
            capture_text(runner, &systemctl::show_value(scope, unit, "Description")).await;
        let port = infer_port(runner, unit, scope).await;

        ServiceSummary {
            scope,
            active: fallback_if_empty(active, NOT_FOUND_STATE),
            enabled: fallback_if_empty(enabled, NOT_FOUND_STATE),
            description: fallback_if_empty(description, NO_DESCRIPTION),
            port,
        }
    }
}

fn fallback_if_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
