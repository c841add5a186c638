//! Pipeline orchestrator: construction and the public run API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::{watch, OnceCell};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use super::config::{PipelineConfig, PipelineConfigError};
use super::error::AnalysisError;
use super::outcome::{AnalysisOutcome, RunOutcome};
use super::report::{ErrorReporter, TracingErrorReporter};
use crate::assets::{AssetSource, AssetVersionCache, AssetVersionRecord};
use crate::camera::{focus_on, focus_on_at_scale, CameraState, WorldPoint};
use crate::engine::{GameKind, InitGate, ParsingEngine, SaveSlot, TypeDetector};
use crate::input::{AnalysisInput, InputAcquirer, InputError, RemoteFetcher, ReqwestFetcher};
use crate::lifecycle::{AnalysisLifecycle, AnalysisState, LifecycleProgressSink, Presentation};
use crate::progress::{PollTicker, ProgressReporter, ProgressSink, TracingProgressSink};
use crate::render::RenderSurface;

/// Drives a save from raw bytes to a rendered, interactive map.
///
/// One orchestrator serves one map surface. A run started while another is
/// in flight returns [`RunOutcome::AlreadyRunning`] without side effects.
///
/// # Stages
///
/// ```text
/// acquire ─► classify ─► handshake ─┬─ prepare assets ─┬─► coarse pass ─┬─ full pass ────┬─► finalize
///                                   └─ game data ──────┘                └─ render setup ─┘
/// ```
///
/// Failures at any stage are captured by the [`ErrorReporter`] and returned
/// to [`AnalysisState::Initial`] with the error message.
pub struct PipelineOrchestrator<E, A, R>
where
    E: ParsingEngine,
{
    pub(super) engine: Arc<E>,
    pub(super) detector: Arc<dyn TypeDetector>,
    pub(super) assets: Arc<A>,
    pub(super) renderer: Arc<R>,
    pub(super) config: PipelineConfig,
    pub(super) acquirer: InputAcquirer,
    pub(super) lifecycle: Arc<AnalysisLifecycle>,
    pub(super) sinks: Vec<Arc<dyn ProgressSink>>,
    pub(super) error_reporter: Arc<dyn ErrorReporter>,
    pub(super) engine_init: InitGate<GameKind>,
    pub(super) detector_init: OnceCell<()>,
    pub(super) saves: SaveSlot<E::Handle>,
    pub(super) asset_cache: AssetVersionCache,
    pub(super) sidebar_offset: Mutex<Option<f64>>,
    input_cancel: Mutex<CancellationToken>,
    latest: Mutex<Option<Arc<AnalysisOutcome<E::Meta>>>>,
    runs: AtomicU64,
}

impl<E, A, R> PipelineOrchestrator<E, A, R>
where
    E: ParsingEngine + 'static,
    A: AssetSource + 'static,
    R: RenderSurface + 'static,
{
    /// Create an orchestrator over the given collaborators.
    ///
    /// Remote inputs are rejected until a fetcher is configured with
    /// [`with_remote_fetcher`](Self::with_remote_fetcher) or
    /// [`with_http_remote`](Self::with_http_remote).
    ///
    /// # Errors
    ///
    /// Fails if `config` does not pass [`PipelineConfig::validate`].
    pub fn new(
        engine: Arc<E>,
        detector: Arc<dyn TypeDetector>,
        assets: Arc<A>,
        renderer: Arc<R>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineConfigError> {
        config.validate()?;

        let lifecycle = AnalysisLifecycle::new();
        let ticker = PollTicker::new(config.progress.tick_interval, config.progress.tick_step);
        let lifecycle_sink = LifecycleProgressSink::new(Arc::clone(&lifecycle), ticker);

        let sinks: Vec<Arc<dyn ProgressSink>> =
            vec![Arc::new(lifecycle_sink), Arc::new(TracingProgressSink)];

        Ok(Self {
            engine,
            detector,
            assets,
            renderer,
            acquirer: InputAcquirer::new(config.max_input_bytes),
            config,
            lifecycle,
            sinks,
            error_reporter: Arc::new(TracingErrorReporter),
            engine_init: InitGate::new(),
            detector_init: OnceCell::new(),
            saves: SaveSlot::new(),
            asset_cache: AssetVersionCache::new(),
            sidebar_offset: Mutex::new(None),
            input_cancel: Mutex::new(CancellationToken::new()),
            latest: Mutex::new(None),
            runs: AtomicU64::new(0),
        })
    }

    /// Accept remote inputs through `fetcher`.
    pub fn with_remote_fetcher(mut self, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        self.acquirer = self.acquirer.with_remote(fetcher);
        self
    }

    /// Accept remote inputs over HTTP using the configured timeout.
    pub fn with_http_remote(self) -> Result<Self, InputError> {
        let fetcher = ReqwestFetcher::new(self.config.remote_timeout)?;
        Ok(self.with_remote_fetcher(Arc::new(fetcher)))
    }

    /// Add a progress sink after the built-in ones.
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replace the default tracing error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Analyze `input` with a fresh input cancellation token.
    ///
    /// The token can be triggered with [`cancel_input`](Self::cancel_input).
    pub async fn run_analysis(&self, input: AnalysisInput) -> RunOutcome<E::Meta> {
        self.run_analysis_with(input, CancellationToken::new()).await
    }

    /// Analyze `input`; cancelling `token` aborts input acquisition.
    pub async fn run_analysis_with(
        &self,
        input: AnalysisInput,
        token: CancellationToken,
    ) -> RunOutcome<E::Meta> {
        if !self.lifecycle.start_analyze() {
            debug!(input = %input.describe(), "Analysis already in flight, ignoring");
            return RunOutcome::AlreadyRunning;
        }

        *self.input_cancel.lock() = token.clone();
        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        let span = info_span!("analysis", run, input = %input.describe());

        let mut guard = RunGuard::new(&self.lifecycle);
        let reporter = ProgressReporter::new(self.sinks.clone());
        let started = Instant::now();

        let result = self
            .execute(input, &token, &reporter, started)
            .instrument(span)
            .await;
        guard.disarm();

        match result {
            Ok(outcome) => {
                let outcome = Arc::new(outcome);
                info!(
                    run,
                    kind = %outcome.kind,
                    version = %outcome.version,
                    assets_reused = outcome.assets_reused,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "Save analyzed"
                );
                *self.latest.lock() = Some(Arc::clone(&outcome));
                RunOutcome::Completed(outcome)
            }
            Err(err) => {
                self.error_reporter.capture(&err);
                self.lifecycle.fail(err.to_string());
                RunOutcome::Failed(err)
            }
        }
    }

    /// Cancel input acquisition of the current run.
    ///
    /// Only acquisition is cancellable; later stages run to completion.
    pub fn cancel_input(&self) {
        self.input_cancel.lock().cancel();
    }

    pub fn state(&self) -> AnalysisState {
        self.lifecycle.state()
    }

    pub fn presentation(&self) -> Presentation {
        self.lifecycle.presentation()
    }

    /// Receiver notified on every lifecycle change.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.lifecycle.subscribe()
    }

    /// Current renderer camera.
    pub fn camera(&self) -> CameraState {
        self.renderer.camera_state()
    }

    /// Result of the most recent successful run.
    pub fn latest(&self) -> Option<Arc<AnalysisOutcome<E::Meta>>> {
        self.latest.lock().clone()
    }

    /// Width in canvas pixels hidden behind a docked side panel.
    pub fn set_sidebar_offset(&self, offset: Option<f64>) {
        *self.sidebar_offset.lock() = offset;
    }

    /// Re-center the camera on `point`, keeping the current zoom.
    ///
    /// A camera without a usable zoom falls back to the initial zoom for the
    /// viewport. Fails without touching the camera when the viewport has no
    /// area.
    pub fn focus_location(&self, point: WorldPoint) -> Result<CameraState, AnalysisError> {
        let viewport = self.drawable_viewport()?;
        let sidebar = *self.sidebar_offset.lock();

        let scale = self.renderer.camera_state().scale;
        let camera = if scale.is_finite() && scale > 0.0 {
            focus_on_at_scale(point, viewport, scale, sidebar)
        } else {
            debug!(scale, "Camera zoom unusable, resetting to initial zoom");
            focus_on(point, viewport, sidebar)
        };

        self.renderer.set_camera_state(camera);
        self.renderer.redraw();
        Ok(camera)
    }

    /// Plaintext form of the currently loaded save.
    pub async fn melt_current(&self) -> Result<Bytes, AnalysisError> {
        let handle = self.saves.current().ok_or(AnalysisError::NoSaveLoaded)?;
        Ok(self.engine.melt(&handle).await?)
    }

    /// Version of the map assets installed on the renderer.
    pub fn installed_assets(&self) -> Option<AssetVersionRecord> {
        self.asset_cache.record()
    }
}

/// Fails the lifecycle if a run is dropped before it finishes.
struct RunGuard<'a> {
    lifecycle: &'a AnalysisLifecycle,
    armed: bool,
}

impl<'a> RunGuard<'a> {
    fn new(lifecycle: &'a AnalysisLifecycle) -> Self {
        Self {
            lifecycle,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.lifecycle.fail("analysis interrupted");
        }
    }
}
