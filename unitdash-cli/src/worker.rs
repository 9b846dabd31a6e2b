//! Background introspection worker.
//!
//! Owns the summary cache and performs every external call off the render
//! loop: the TUI sends [`WorkerCommand`]s over one channel and drains
//! [`WorkerEvent`]s from another between frames. Single writer: nothing
//! else touches the cache, so mutating actions and reloads invalidate
//! exactly the keys they must.

use std::sync::Arc;

use tokio::sync::mpsc;

use unitdash_core::cache::SummaryCache;
use unitdash_core::discover::UnitDirs;
use unitdash_core::runner::{CommandRunner, capture_text};
use unitdash_core::systemctl;
use unitdash_core::unit::{ServiceSummary, UnitAction};

use crate::sampler::{PidMetrics, PidSampler};

/// Journal lines fetched for the detail view.
const JOURNAL_LINES: usize = 20;

#[derive(Clone, Debug)]
pub enum WorkerCommand {
    /// Compute (or serve cached) summaries for these units, in order.
    Summaries { units: Vec<String> },
    /// Drop one key and recompute it.
    Refresh { unit: String },
    /// Drop every key, then recompute the given units.
    RefreshAll { units: Vec<String> },
    /// Rebuild the browse list from the unit directories.
    Enumerate,
    /// Dispatch a mutating verb, then refresh the acted-on unit.
    Action { unit: String, action: UnitAction },
    /// Fetch journal tail, dependency tree, and process metrics.
    Inspect { unit: String },
    /// Fire the browser at a known port.
    OpenBrowser { port: String },
    Shutdown,
}

#[derive(Clone, Debug)]
pub enum WorkerEvent {
    Summary {
        unit: String,
        summary: ServiceSummary,
    },
    Units {
        names: Vec<String>,
    },
    ActionDone {
        unit: String,
        action: UnitAction,
        ok: bool,
    },
    Inspect {
        unit: String,
        journal: String,
        dependencies: String,
        metrics: Option<PidMetrics>,
    },
    Message {
        text: String,
    },
}

pub struct Worker {
    runner: Arc<dyn CommandRunner>,
    cache: SummaryCache,
    dirs: UnitDirs,
    sampler: PidSampler,
    /// Prefix system-scope actions with sudo (running unprivileged).
    use_sudo: bool,
}

impl Worker {
    pub fn new(runner: Arc<dyn CommandRunner>, dirs: UnitDirs, use_sudo: bool) -> Self {
        Self {
            cache: SummaryCache::new(runner.clone()),
            runner,
            dirs,
            sampler: PidSampler::new(),
            use_sudo,
        }
    }

    pub async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<WorkerCommand>,
        event_tx: mpsc::Sender<WorkerEvent>,
    ) {
        while let Some(command) = command_rx.recv().await {
            match command {
                WorkerCommand::Shutdown => break,

                WorkerCommand::Summaries { units } => {
                    self.send_summaries(units, &event_tx).await;
                }

                WorkerCommand::Refresh { unit } => {
                    self.cache.invalidate(&unit);
                    let summary = self.cache.get_summary(&unit).await;
                    let _ = event_tx.send(WorkerEvent::Summary { unit, summary }).await;
                }

                WorkerCommand::RefreshAll { units } => {
                    self.cache.invalidate_all();
                    self.send_summaries(units, &event_tx).await;
                }

                WorkerCommand::Enumerate => {
                    let names = self.dirs.enumerate_all().into_iter().collect();
                    let _ = event_tx.send(WorkerEvent::Units { names }).await;
                }

                WorkerCommand::Action { unit, action } => {
                    self.dispatch_action(unit, action, &event_tx).await;
                }

                WorkerCommand::Inspect { unit } => {
                    self.inspect(unit, &event_tx).await;
                }

                WorkerCommand::OpenBrowser { port } => {
                    let command = systemctl::open_browser(&port);
                    let ok = matches!(self.runner.run_status(&command).await, Ok(0));
                    let text = if ok {
                        format!("opening http://localhost:{port}")
                    } else {
                        "failed to launch a browser".to_string()
                    };
                    let _ = event_tx.send(WorkerEvent::Message { text }).await;
                }
            }
        }
    }

    async fn send_summaries(&mut self, units: Vec<String>, event_tx: &mpsc::Sender<WorkerEvent>) {
        for unit in units {
            let summary = self.cache.get_summary(&unit).await;
            if event_tx
                .send(WorkerEvent::Summary { unit, summary })
                .await
                .is_err()
            {
                return;
            }
        }
    }

    async fn dispatch_action(
        &mut self,
        unit: String,
        action: UnitAction,
        event_tx: &mpsc::Sender<WorkerEvent>,
    ) {
        let scope = self.cache.get_summary(&unit).await.scope;
        if scope.is_none() {
            let text = format!("{unit}: not found, nothing to {action}");
            let _ = event_tx.send(WorkerEvent::Message { text }).await;
            return;
        }

        let command = systemctl::action(scope, action, &unit, self.use_sudo);
        let ok = matches!(self.runner.run_status(&command).await, Ok(0));

        // The acted-on unit's record is stale now; recompute before the
        // next frame reads it.
        self.cache.invalidate(&unit);
        let summary = self.cache.get_summary(&unit).await;

        let _ = event_tx
            .send(WorkerEvent::ActionDone {
                unit: unit.clone(),
                action,
                ok,
            })
            .await;
        let _ = event_tx.send(WorkerEvent::Summary { unit, summary }).await;
    }

    async fn inspect(&mut self, unit: String, event_tx: &mpsc::Sender<WorkerEvent>) {
        let scope = self.cache.get_summary(&unit).await.scope;

        let (journal, dependencies, metrics) = if scope.is_none() {
            (String::new(), String::new(), None)
        } else {
            let runner = self.runner.as_ref();
            let journal =
                capture_text(runner, &systemctl::journal_tail(scope, &unit, JOURNAL_LINES)).await;
            let dependencies =
                capture_text(runner, &systemctl::list_dependencies(scope, &unit)).await;

            let pid_text =
                capture_text(runner, &systemctl::show_value(scope, &unit, "MainPID")).await;
            let metrics = pid_text
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|pid| *pid > 0)
                .and_then(|pid| self.sampler.sample(pid));

            (journal, dependencies, metrics)
        };

        let _ = event_tx
            .send(WorkerEvent::Inspect {
                unit,
                journal,
                dependencies,
                metrics,
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use unitdash_core::runner::{Captured, RunError};
    use unitdash_core::unit::Scope;

    /// Minimal scripted runner mirroring the one the core tests use.
    #[derive(Default)]
    struct FakeRunner {
        outputs: Vec<(String, String)>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRunner {
        fn on(mut self, needle: &str, output: &str) -> Self {
            self.outputs.push((needle.into(), output.into()));
            self
        }

        fn calls_matching(&self, needle: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.contains(needle))
                .count()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run_capturing(&self, command: &str) -> Result<Captured, RunError> {
            self.calls.lock().unwrap().push(command.to_string());
            for (needle, output) in &self.outputs {
                if command.contains(needle.as_str()) {
                    return Ok(Captured {
                        text: output.clone(),
                        status: Some(0),
                    });
                }
            }
            Ok(Captured::default())
        }

        async fn run_status(&self, command: &str) -> Result<i32, RunError> {
            self.calls.lock().unwrap().push(command.to_string());
            Ok(0)
        }
    }

    fn scratch_dirs() -> UnitDirs {
        let dir = std::env::temp_dir().join("unitdash-worker-tests-empty");
        UnitDirs::at(dir.clone(), dir)
    }

    #[tokio::test]
    async fn action_invalidates_and_republishes_the_summary() {
        let runner = Arc::new(
            FakeRunner::default()
                .on("systemctl list-unit-files", "web.service enabled enabled")
                .on("is-active", "active")
                .on("is-enabled", "enabled"),
        );
        let worker = Worker::new(runner.clone(), scratch_dirs(), false);

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let handle = tokio::spawn(worker.run(cmd_rx, event_tx));

        cmd_tx
            .send(WorkerCommand::Summaries {
                units: vec!["web.service".into()],
            })
            .await
            .unwrap();
        let Some(WorkerEvent::Summary { summary, .. }) = event_rx.recv().await else {
            panic!("expected a summary event");
        };
        assert_eq!(summary.scope, Scope::System);
        let queries_before = runner.calls_matching("is-active");

        cmd_tx
            .send(WorkerCommand::Action {
                unit: "web.service".into(),
                action: UnitAction::Restart,
            })
            .await
            .unwrap();

        let Some(WorkerEvent::ActionDone { action, ok, .. }) = event_rx.recv().await else {
            panic!("expected an action event");
        };
        assert_eq!(action, UnitAction::Restart);
        assert!(ok);

        // The follow-up summary was recomputed, not served from cache.
        let Some(WorkerEvent::Summary { .. }) = event_rx.recv().await else {
            panic!("expected a refreshed summary");
        };
        assert!(runner.calls_matching("is-active") > queries_before);
        assert_eq!(runner.calls_matching("systemctl restart"), 1);

        cmd_tx.send(WorkerCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn action_on_an_unknown_unit_only_reports() {
        let runner = Arc::new(FakeRunner::default());
        let worker = Worker::new(runner.clone(), scratch_dirs(), false);

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let handle = tokio::spawn(worker.run(cmd_rx, event_tx));

        cmd_tx
            .send(WorkerCommand::Action {
                unit: "ghost.service".into(),
                action: UnitAction::Start,
            })
            .await
            .unwrap();

        let Some(WorkerEvent::Message { text }) = event_rx.recv().await else {
            panic!("expected a message event");
        };
        assert!(text.contains("ghost.service"));
        assert_eq!(runner.calls_matching("systemctl start"), 0);

        cmd_tx.send(WorkerCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }
}
