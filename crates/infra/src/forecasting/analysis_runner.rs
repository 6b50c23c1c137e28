use std::io;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use tracing::{info, warn};

use stockcast_forecast::{
    AnalysisRequest, ForecastError, ForecastOrchestrator, ForecastReport, InventorySnapshot,
};

/// Sink for published forecast reports (presentation layer, cache, notifier).
pub trait ReportSink: Send + Sync + 'static {
    fn emit(&self, report: Arc<ForecastReport>);
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryReportSink {
    inner: Mutex<Vec<Arc<ForecastReport>>>,
}

impl InMemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Arc<ForecastReport>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ReportSink for InMemoryReportSink {
    fn emit(&self, report: Arc<ForecastReport>) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(report);
    }
}

type CycleResult = Result<Arc<ForecastReport>, ForecastError>;

/// Completion handle for one background analysis cycle.
#[derive(Debug)]
pub struct AnalysisHandle {
    done: mpsc::Receiver<CycleResult>,
    join: Option<thread::JoinHandle<()>>,
}

impl AnalysisHandle {
    /// Block until the cycle finishes.
    pub fn wait(mut self) -> CycleResult {
        let result = self.done.recv().unwrap_or(Err(ForecastError::WorkerLost));
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
        result
    }

    /// Non-blocking poll; `None` while the cycle is still running.
    pub fn try_result(&self) -> Option<CycleResult> {
        match self.done.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(ForecastError::WorkerLost)),
        }
    }
}

/// Runs analysis cycles on named background threads.
///
/// Concurrency follows the orchestrator's reject policy: a cycle started while
/// another one is in flight completes immediately with
/// [`ForecastError::AnalysisInProgress`] and emits nothing.
#[derive(Clone)]
pub struct AnalysisRunner {
    name: String,
    orchestrator: Arc<ForecastOrchestrator>,
    sink: Option<Arc<dyn ReportSink>>,
}

impl core::fmt::Debug for AnalysisRunner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnalysisRunner")
            .field("name", &self.name)
            .field("state", &self.orchestrator.state())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl AnalysisRunner {
    pub fn new(orchestrator: Arc<ForecastOrchestrator>) -> Self {
        Self {
            name: "stockcast-analysis".to_string(),
            orchestrator,
            sink: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn orchestrator(&self) -> &Arc<ForecastOrchestrator> {
        &self.orchestrator
    }

    /// Start one analysis cycle in the background.
    pub fn spawn(
        &self,
        snapshot: InventorySnapshot,
        request: AnalysisRequest,
    ) -> io::Result<AnalysisHandle> {
        let (done_tx, done_rx) = mpsc::channel::<CycleResult>();
        let name = self.name.clone();
        let orchestrator = Arc::clone(&self.orchestrator);
        let sink = self.sink.clone();

        let join = thread::Builder::new().name(name.clone()).spawn(move || {
            info!(runner = %name, tenant = %snapshot.tenant_id, snapshot = %snapshot.id, "analysis cycle requested");

            let result = orchestrator.analyze(&snapshot, request);
            match &result {
                Ok(report) => {
                    if let Some(sink) = &sink {
                        sink.emit(Arc::clone(report));
                    }
                }
                Err(e) => {
                    warn!(runner = %name, tenant = %snapshot.tenant_id, error = %e, "analysis cycle not published");
                }
            }

            // The caller may have dropped the handle; nothing to notify then.
            let _ = done_tx.send(result);
        })?;

        Ok(AnalysisHandle {
            done: done_rx,
            join: Some(join),
        })
    }
}
