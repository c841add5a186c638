//! Integration tests for the save analysis pipeline.
//!
//! These tests drive `PipelineOrchestrator` end to end against mock
//! collaborators:
//! - Cold-start success with a slow, polled parse and a fresh asset build
//! - Engine rejection and the ticker it leaves behind
//! - Re-analysis with reused, allow-listed and incompatible assets
//! - Classification fallback, input limits and input cancellation
//! - Overlap of the concurrent fetch and setup stages on virtual time
//!
//! Run with: `cargo test --test pipeline_integration`

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;

use savemap::assets::{
    AssetBundle, AssetError, AssetSource, AssetVersionRecord, GameVersion, ProvinceIndex,
    ShaderSources, TextureBlobs,
};
use savemap::camera::{focus_on, CameraState, Viewport, WorldPoint};
use savemap::engine::{
    EngineError, FullAnalysis, GameKind, ParsingEngine, ProvinceColors, TypeDetector,
};
use savemap::input::{AnalysisInput, InputError, RemoteFetcher};
use savemap::lifecycle::{AnalysisFailure, AnalysisState, Presentation};
use savemap::pipeline::{
    AnalysisError, ErrorReporter, PipelineConfig, PipelineConfigError, PipelineOrchestrator,
    RunOutcome,
};
use savemap::progress::{ProgressEvent, ProgressKind, ProgressPlan, ProgressSink, SinkError};
use savemap::render::{FrameCallback, RenderError, RenderSurface};

// ============================================================================
// Mock collaborators
// ============================================================================

/// Named instants recorded by a mock, in call order.
#[derive(Default)]
struct Timeline {
    marks: Mutex<Vec<(&'static str, Instant)>>,
}

impl Timeline {
    fn mark(&self, name: &'static str) {
        self.marks.lock().push((name, Instant::now()));
    }

    /// Most recent instant recorded under `name`.
    fn at(&self, name: &'static str) -> Instant {
        self.marks
            .lock()
            .iter()
            .rev()
            .find(|(mark, _)| *mark == name)
            .map(|(_, at)| *at)
            .unwrap_or_else(|| panic!("no '{name}' mark recorded"))
    }
}

/// Parsing engine with a configurable parse delay and outcome.
struct MockEngine {
    parse_delay: Duration,
    full_pass_delay: Mutex<Duration>,
    timeline: Timeline,
    reject_with: Mutex<Option<String>>,
    versions: Mutex<Vec<GameVersion>>,
    focus: Option<WorldPoint>,
    next_handle: AtomicUsize,
    calls: Mutex<Vec<String>>,
    released: Mutex<Vec<u32>>,
    /// Lifecycle receiver sampled when the parse resolves.
    probe: Mutex<Option<watch::Receiver<AnalysisState>>>,
    percent_at_parse_end: Mutex<Option<f64>>,
}

impl MockEngine {
    fn new(version: GameVersion) -> Self {
        Self {
            parse_delay: Duration::from_secs(2),
            full_pass_delay: Mutex::new(Duration::from_millis(300)),
            timeline: Timeline::default(),
            reject_with: Mutex::new(None),
            versions: Mutex::new(vec![version]),
            focus: Some(WorldPoint::new(2930.0, 610.0)),
            next_handle: AtomicUsize::new(1),
            calls: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
            probe: Mutex::new(None),
            percent_at_parse_end: Mutex::new(None),
        }
    }

    fn with_parse_delay(mut self, delay: Duration) -> Self {
        self.parse_delay = delay;
        self
    }

    fn without_focus(mut self) -> Self {
        self.focus = None;
        self
    }

    /// Versions returned by successive parses; the last one repeats.
    fn then_versions(&self, versions: &[GameVersion]) {
        self.versions.lock().extend_from_slice(versions);
    }

    fn reject(&self, message: &str) {
        *self.reject_with.lock() = Some(message.to_string());
    }

    fn accept(&self) {
        *self.reject_with.lock() = None;
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl ParsingEngine for MockEngine {
    type Handle = u32;
    type Meta = String;

    async fn initialize(&self, kind: GameKind) -> Result<(), EngineError> {
        self.record(format!("init {kind}"));
        Ok(())
    }

    async fn parse(&self, kind: GameKind, data: Bytes) -> Result<u32, EngineError> {
        self.record(format!("parse {kind} {}", data.len()));
        tokio::time::sleep(self.parse_delay).await;

        let percent = self
            .probe
            .lock()
            .as_ref()
            .and_then(|rx| rx.borrow().percent());
        *self.percent_at_parse_end.lock() = percent;

        if let Some(message) = self.reject_with.lock().clone() {
            return Err(EngineError::Rejected(message));
        }
        Ok(self.next_handle.fetch_add(1, Ordering::SeqCst) as u32)
    }

    async fn query_version(&self, handle: &u32) -> Result<GameVersion, EngineError> {
        self.record(format!("version {handle}"));
        self.timeline.mark("version");
        let mut versions = self.versions.lock();
        let version = versions[0];
        if versions.len() > 1 {
            versions.remove(0);
        }
        Ok(version)
    }

    async fn coarse_pass(
        &self,
        handle: &u32,
        game_data: Bytes,
        index: &ProvinceIndex,
    ) -> Result<ProvinceColors, EngineError> {
        self.record(format!("coarse {handle} {}", game_data.len()));
        self.timeline.mark("coarse");
        let texels = vec![0xAAu8; index.len() * 4];
        Ok(ProvinceColors::new(texels.clone(), texels))
    }

    async fn full_pass(&self, handle: &u32) -> Result<FullAnalysis<String>, EngineError> {
        self.record(format!("full {handle}"));
        self.timeline.mark("full start");
        let delay = *self.full_pass_delay.lock();
        tokio::time::sleep(delay).await;
        self.timeline.mark("full end");
        Ok(FullAnalysis {
            meta: format!("save #{handle}"),
            achievements: vec![12, 45],
            focus: self.focus,
        })
    }

    async fn melt(&self, handle: &u32) -> Result<Bytes, EngineError> {
        Ok(Bytes::from(format!("melted #{handle}")))
    }

    async fn release(&self, handle: u32) {
        self.released.lock().push(handle);
    }
}

/// Content detector returning a fixed answer.
struct MockDetector {
    answer: Option<GameKind>,
    inits: AtomicUsize,
}

impl MockDetector {
    fn new(answer: Option<GameKind>) -> Self {
        Self {
            answer,
            inits: AtomicUsize::new(0),
        }
    }
}

impl TypeDetector for MockDetector {
    fn initialize(&self) -> Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + '_>> {
        Box::pin(async move {
            self.inits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn detect<'a>(
        &'a self,
        _data: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Option<GameKind>> + Send + 'a>> {
        Box::pin(async move { self.answer })
    }
}

/// Asset source counting fetches per kind.
#[derive(Default)]
struct MockAssets {
    fetches: Mutex<HashMap<&'static str, usize>>,
    fail_textures: Mutex<bool>,
    /// Overrides the per-kind fetch latency when set.
    fetch_delay: Mutex<Option<Duration>>,
}

impl MockAssets {
    fn fetched(&self, what: &'static str) -> usize {
        self.fetches.lock().get(what).copied().unwrap_or(0)
    }

    fn bump(&self, what: &'static str) {
        *self.fetches.lock().entry(what).or_default() += 1;
    }

    async fn latency(&self, default: Duration) {
        let delay = self.fetch_delay.lock().unwrap_or(default);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl AssetSource for MockAssets {
    async fn fetch_shaders(&self, version: GameVersion) -> Result<ShaderSources, AssetError> {
        self.bump("shaders");
        self.latency(Duration::from_millis(40)).await;
        let mut sources = HashMap::new();
        sources.insert("map.vert".to_string(), format!("// {version}"));
        Ok(ShaderSources { sources })
    }

    async fn fetch_textures(&self, _version: GameVersion) -> Result<TextureBlobs, AssetError> {
        self.bump("textures");
        self.latency(Duration::from_millis(120)).await;
        if *self.fail_textures.lock() {
            return Err(AssetError::fetch("textures", "HTTP 503"));
        }
        let mut blobs = HashMap::new();
        blobs.insert("provinces1".to_string(), Bytes::from_static(&[1; 64]));
        Ok(TextureBlobs { blobs })
    }

    async fn fetch_province_index(
        &self,
        _version: GameVersion,
    ) -> Result<ProvinceIndex, AssetError> {
        self.bump("index");
        self.latency(Duration::ZERO).await;
        Ok(ProvinceIndex::new((0..16).collect()))
    }

    async fn fetch_game_data(&self, _version: GameVersion) -> Result<Bytes, AssetError> {
        self.bump("game_data");
        self.latency(Duration::from_millis(80)).await;
        Ok(Bytes::from_static(b"game-data"))
    }
}

/// Rendering surface recording every call.
struct MockSurface {
    viewport: Mutex<Viewport>,
    compile_delay: Mutex<Duration>,
    timeline: Timeline,
    camera: Mutex<CameraState>,
    next_program: AtomicUsize,
    installed: Mutex<Option<u32>>,
    released: Mutex<Vec<u32>>,
    compiles: AtomicUsize,
    uploads: AtomicUsize,
    redraws: AtomicUsize,
    pending_frames: Mutex<Vec<FrameCallback>>,
}

impl MockSurface {
    fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Mutex::new(viewport),
            compile_delay: Mutex::new(Duration::from_millis(150)),
            timeline: Timeline::default(),
            camera: Mutex::new(CameraState::default()),
            next_program: AtomicUsize::new(1),
            installed: Mutex::new(None),
            released: Mutex::new(Vec::new()),
            compiles: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
            redraws: AtomicUsize::new(0),
            pending_frames: Mutex::new(Vec::new()),
        }
    }

    /// Paint a frame, firing registered callbacks.
    fn draw_frame(&self) {
        let callbacks: Vec<FrameCallback> = self.pending_frames.lock().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl RenderSurface for MockSurface {
    type Programs = u32;

    fn viewport(&self) -> Viewport {
        *self.viewport.lock()
    }

    fn camera_state(&self) -> CameraState {
        *self.camera.lock()
    }

    async fn compile(&self, bundle: &AssetBundle) -> Result<u32, RenderError> {
        if bundle.shaders.sources.is_empty() {
            return Err(RenderError::Compile("no shaders".into()));
        }
        self.compiles.fetch_add(1, Ordering::SeqCst);
        self.timeline.mark("compile start");
        let delay = *self.compile_delay.lock();
        tokio::time::sleep(delay).await;
        self.timeline.mark("compile end");
        Ok(self.next_program.fetch_add(1, Ordering::SeqCst) as u32)
    }

    fn install(&self, programs: u32) -> Option<u32> {
        self.installed.lock().replace(programs)
    }

    fn release(&self, programs: u32) {
        self.released.lock().push(programs);
    }

    async fn upload_province_colors(&self, colors: &ProvinceColors) -> Result<(), RenderError> {
        if self.installed.lock().is_none() {
            return Err(RenderError::Upload {
                what: "province colors",
                message: "no program set installed".into(),
            });
        }
        assert_eq!(colors.province_count(), 16);
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.timeline.mark("upload");
        Ok(())
    }

    fn resize(&self, _viewport: Viewport) {}

    fn set_camera_state(&self, camera: CameraState) {
        *self.camera.lock() = camera;
    }

    fn redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn on_frame_drawn(&self, callback: FrameCallback) {
        self.pending_frames.lock().push(callback);
    }
}

/// Remote fetcher that never completes.
struct StalledFetcher;

impl RemoteFetcher for StalledFetcher {
    fn fetch<'a>(
        &'a self,
        _url: &'a str,
        _max_bytes: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, InputError>> + Send + 'a>> {
        Box::pin(std::future::pending())
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    fn kinds(&self) -> Vec<ProgressKind> {
        self.events.lock().iter().map(|e| e.kind.clone()).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: &ProgressEvent) -> Result<(), SinkError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingReporter {
    captured: Mutex<Vec<AnalysisError>>,
}

impl ErrorReporter for RecordingReporter {
    fn capture(&self, error: &AnalysisError) {
        self.captured.lock().push(error.clone());
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

type Pipeline = PipelineOrchestrator<MockEngine, MockAssets, MockSurface>;

struct Harness {
    pipeline: Pipeline,
    engine: Arc<MockEngine>,
    detector: Arc<MockDetector>,
    assets: Arc<MockAssets>,
    surface: Arc<MockSurface>,
    sink: Arc<RecordingSink>,
    errors: Arc<RecordingReporter>,
}

/// Plan with the parse polled from 20% to 90%.
fn scenario_plan() -> ProgressPlan {
    ProgressPlan {
        parse_start: 20.0,
        parse_end: 90.0,
        coarse_pass: 50.0,
        ..ProgressPlan::default()
    }
}

fn viewport() -> Viewport {
    Viewport::new(1600.0, 900.0)
}

fn harness_with(engine: MockEngine, detector: MockDetector) -> Harness {
    let engine = Arc::new(engine);
    let detector = Arc::new(detector);
    let assets = Arc::new(MockAssets::default());
    let surface = Arc::new(MockSurface::new(viewport()));
    let sink = Arc::new(RecordingSink::default());
    let errors = Arc::new(RecordingReporter::default());

    let config = PipelineConfig::default()
        .with_max_input_bytes(10_000_000)
        .with_progress(scenario_plan());

    let pipeline = PipelineOrchestrator::new(
        Arc::clone(&engine),
        detector.clone(),
        Arc::clone(&assets),
        Arc::clone(&surface),
        config,
    )
    .expect("scenario config is valid")
    .with_progress_sink(sink.clone())
    .with_error_reporter(errors.clone())
    .with_remote_fetcher(Arc::new(StalledFetcher));

    *engine.probe.lock() = Some(pipeline.subscribe());

    Harness {
        pipeline,
        engine,
        detector,
        assets,
        surface,
        sink,
        errors,
    }
}

fn harness() -> Harness {
    harness_with(
        MockEngine::new(GameVersion::new(1, 34, 2)),
        MockDetector::new(None),
    )
}

fn eu4_save() -> AnalysisInput {
    AnalysisInput::bytes("campaign.eu4", vec![7u8; 5_000_000])
}

/// Run to `Analyzed` and paint the first frame.
async fn analyze_and_draw(h: &Harness, input: AnalysisInput) -> RunOutcome<String> {
    let outcome = h.pipeline.run_analysis(input).await;
    h.surface.draw_frame();
    outcome
}

// ============================================================================
// Cold start
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_cold_start_success() {
    let h = harness();

    let outcome = h.pipeline.run_analysis(eu4_save()).await;

    let outcome = outcome.outcome().expect("run should complete").clone();
    assert_eq!(outcome.kind, GameKind::Eu4);
    assert_eq!(outcome.version, GameVersion::new(1, 34, 2));
    assert_eq!(outcome.meta, "save #1");
    assert_eq!(outcome.achievements, vec![12, 45]);
    assert_eq!(outcome.input_bytes, 5_000_000);
    assert!(!outcome.assets_reused);

    // Parsed and rendered, but no frame painted yet.
    assert_eq!(
        h.pipeline.state(),
        AnalysisState::Analyzed {
            recur: false,
            drawn: false
        }
    );
    assert_eq!(h.pipeline.presentation(), Presentation::Backdrop);

    h.surface.draw_frame();
    assert_eq!(
        h.pipeline.state(),
        AnalysisState::Analyzed {
            recur: false,
            drawn: true
        }
    );
    assert_eq!(h.pipeline.presentation(), Presentation::Map { error: None });
}

#[tokio::test(start_paused = true)]
async fn test_cold_start_engine_call_order() {
    let h = harness();
    h.pipeline.run_analysis(eu4_save()).await;

    assert_eq!(
        h.engine.calls(),
        vec![
            "init eu4".to_string(),
            "parse eu4 5000000".to_string(),
            "version 1".to_string(),
            "coarse 1 9".to_string(),
            "full 1".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_cold_start_builds_assets() {
    let h = harness();
    h.pipeline.run_analysis(eu4_save()).await;

    for what in ["shaders", "textures", "index", "game_data"] {
        assert_eq!(h.assets.fetched(what), 1, "{what} fetched once");
    }
    assert_eq!(h.surface.compiles.load(Ordering::SeqCst), 1);
    assert_eq!(*h.surface.installed.lock(), Some(1));
    assert!(h.surface.released.lock().is_empty());
    assert_eq!(h.surface.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(h.surface.redraws.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.pipeline.installed_assets(),
        Some(AssetVersionRecord {
            major: 1,
            minor: 34
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_ticker_stays_below_poll_end() {
    let h = harness();
    h.pipeline.run_analysis(eu4_save()).await;

    // 2s parse at +3 every 33ms from 20: the ticker stops at 89.
    assert_eq!(*h.engine.percent_at_parse_end.lock(), Some(89.0));
}

#[tokio::test(start_paused = true)]
async fn test_progress_event_sequence() {
    let h = harness();
    h.pipeline.run_analysis(eu4_save()).await;

    let kinds = h.sink.kinds();
    assert_eq!(
        kinds[0],
        ProgressKind::BytesRead {
            bytes: 5_000_000
        }
    );
    assert_eq!(
        kinds[1],
        ProgressKind::TypeDetected {
            kind: GameKind::Eu4
        }
    );
    assert_eq!(kinds[2], ProgressKind::StartPoll { end_percent: 90.0 });
    assert_eq!(kinds[3], ProgressKind::EndPoll);

    // Four fetch slices in any order, then the coarse checkpoint.
    let fetches = &kinds[4..8];
    assert!(fetches
        .iter()
        .all(|k| matches!(k, ProgressKind::IncrementalProgress { .. })));
    assert_eq!(
        kinds[8],
        ProgressKind::Progress {
            label: "coarse pass"
        }
    );

    // Full pass and render setup, in either order.
    let mut tail: Vec<_> = kinds[9..]
        .iter()
        .map(|k| match k {
            ProgressKind::IncrementalProgress { label } => *label,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    tail.sort();
    assert_eq!(tail, vec!["full pass", "render setup"]);

    let events = h.sink.events.lock();
    assert_eq!(events[2].percent, 20.0);
    assert_eq!(events[8].percent, 50.0);
    assert!(events.iter().all(|e| e.percent >= 0.0 && e.percent <= 100.0));
}

#[tokio::test(start_paused = true)]
async fn test_camera_targets_default_location() {
    let h = harness();
    let outcome = h.pipeline.run_analysis(eu4_save()).await;

    let expected = focus_on(WorldPoint::new(2930.0, 610.0), viewport(), None);
    assert_eq!(h.pipeline.camera(), expected);
    assert_eq!(outcome.outcome().unwrap().camera, expected);
    assert_eq!(expected.scale, 10000.0 / 1600.0);
}

#[tokio::test(start_paused = true)]
async fn test_camera_defaults_to_map_center() {
    let h = harness_with(
        MockEngine::new(GameVersion::new(1, 34, 2)).without_focus(),
        MockDetector::new(None),
    );
    h.pipeline.run_analysis(eu4_save()).await;

    let camera = h.pipeline.camera();
    assert_eq!(camera.focus_point(), (0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn test_sidebar_offset_shifts_camera() {
    let h = harness();
    h.pipeline.set_sidebar_offset(Some(500.0));
    h.pipeline.run_analysis(eu4_save()).await;

    let expected = focus_on(WorldPoint::new(2930.0, 610.0), viewport(), Some(500.0));
    assert_eq!(h.pipeline.camera(), expected);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_engine_rejection_returns_to_initial() {
    let h = harness_with(
        MockEngine::new(GameVersion::new(1, 34, 2)).with_parse_delay(Duration::from_millis(500)),
        MockDetector::new(None),
    );
    h.engine.reject("save uses an unsupported compression");

    let outcome = h.pipeline.run_analysis(eu4_save()).await;

    assert!(matches!(
        outcome.error(),
        Some(AnalysisError::Engine(EngineError::Rejected(_)))
    ));
    assert_eq!(
        h.pipeline.state(),
        AnalysisState::Initial {
            error: Some(AnalysisFailure {
                message: "save uses an unsupported compression".into(),
                recur: false,
            })
        }
    );
    assert_eq!(
        h.pipeline.presentation(),
        Presentation::Empty {
            error: Some("save uses an unsupported compression".into())
        }
    );
    assert_eq!(h.errors.captured.lock().len(), 1);

    // The poll was closed even though the parse failed.
    let kinds = h.sink.kinds();
    assert_eq!(kinds.last(), Some(&ProgressKind::EndPoll));
}

#[tokio::test(start_paused = true)]
async fn test_no_updates_after_rejection() {
    let h = harness_with(
        MockEngine::new(GameVersion::new(1, 34, 2)).with_parse_delay(Duration::from_millis(500)),
        MockDetector::new(None),
    );
    h.engine.reject("bad header");

    let mut rx = h.pipeline.subscribe();
    h.pipeline.run_analysis(eu4_save()).await;
    rx.mark_unchanged();

    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(!rx.has_changed().unwrap());
    assert_eq!(h.pipeline.state().error(), Some("bad header"));
}

#[tokio::test(start_paused = true)]
async fn test_asset_failure_keeps_record_and_retries() {
    let h = harness();
    *h.assets.fail_textures.lock() = true;

    let outcome = h.pipeline.run_analysis(eu4_save()).await;
    assert!(matches!(outcome.error(), Some(AnalysisError::Asset(_))));
    assert_eq!(
        h.pipeline.state().error(),
        Some("failed to fetch textures: HTTP 503")
    );
    assert_eq!(h.pipeline.installed_assets(), None);
    assert_eq!(h.surface.compiles.load(Ordering::SeqCst), 0);

    *h.assets.fail_textures.lock() = false;
    let outcome = h.pipeline.run_analysis(eu4_save()).await;

    assert!(outcome.is_completed());
    assert_eq!(h.assets.fetched("textures"), 2);
    assert_eq!(h.surface.compiles.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recur_failure_keeps_previous_map() {
    let h = harness();
    analyze_and_draw(&h, eu4_save()).await;

    h.engine.reject("truncated save");
    h.pipeline.run_analysis(eu4_save()).await;

    assert_eq!(
        h.pipeline.presentation(),
        Presentation::Map {
            error: Some("truncated save".into())
        }
    );
    // The first save is still the resident one.
    assert_eq!(h.pipeline.melt_current().await.unwrap(), "melted #1");
}

#[tokio::test]
async fn test_oversized_input_rejected() {
    let h = harness();

    let outcome = h
        .pipeline
        .run_analysis(AnalysisInput::bytes("huge.eu4", vec![0u8; 10_000_001]))
        .await;

    assert_eq!(
        outcome.error(),
        Some(&AnalysisError::Input(InputError::Oversized {
            size: 10_000_001,
            limit: 10_000_000
        }))
    );
    assert!(h.engine.calls().is_empty());
}

#[tokio::test]
async fn test_unrecognized_save() {
    let h = harness();

    h.pipeline
        .run_analysis(AnalysisInput::bytes("notes.txt", vec![1u8; 32]))
        .await;

    assert_eq!(
        h.pipeline.state().error(),
        Some("unrecognized save file 'notes.txt'")
    );
    assert_eq!(h.detector.inits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_input_aborts_remote_fetch() {
    let h = harness();

    let (outcome, ()) = tokio::join!(
        h.pipeline
            .run_analysis(AnalysisInput::remote("https://saves.example/a.eu4")),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            h.pipeline.cancel_input();
        }
    );

    assert!(outcome.error().is_some_and(AnalysisError::is_cancelled));
    assert_eq!(h.pipeline.state().error(), Some("save upload cancelled"));
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_content_detection_fallback_is_memoized() {
    let h = harness_with(
        MockEngine::new(GameVersion::new(1, 9, 0)).with_parse_delay(Duration::from_millis(100)),
        MockDetector::new(Some(GameKind::Ck3)),
    );

    for _ in 0..2 {
        let outcome = h
            .pipeline
            .run_analysis(AnalysisInput::Bytes {
                name: None,
                data: Bytes::from(vec![3u8; 1024]),
            })
            .await;
        assert_eq!(outcome.outcome().unwrap().kind, GameKind::Ck3);
    }

    assert_eq!(h.detector.inits.load(Ordering::SeqCst), 1);
    assert_eq!(h.engine.count("init ck3"), 1);
}

// ============================================================================
// Re-analysis
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reanalysis_reuses_assets() {
    let h = harness();
    analyze_and_draw(&h, eu4_save()).await;

    let mut rx = h.pipeline.subscribe();
    let outcome = h.pipeline.run_analysis(eu4_save()).await;

    assert!(outcome.outcome().unwrap().assets_reused);
    assert_eq!(
        h.pipeline.state(),
        AnalysisState::Analyzed {
            recur: true,
            drawn: false
        }
    );
    assert!(rx.has_changed().unwrap());

    // Assets fetched and compiled once; colors uploaded per save.
    assert_eq!(h.assets.fetched("shaders"), 1);
    assert_eq!(h.assets.fetched("index"), 1);
    assert_eq!(h.assets.fetched("game_data"), 2);
    assert_eq!(h.surface.compiles.load(Ordering::SeqCst), 1);
    assert_eq!(h.surface.uploads.load(Ordering::SeqCst), 2);

    // Engine initialized once; first save released when the second landed.
    assert_eq!(h.engine.count("init"), 1);
    assert_eq!(*h.engine.released.lock(), vec![1]);
    assert_eq!(h.pipeline.melt_current().await.unwrap(), "melted #2");
}

#[tokio::test(start_paused = true)]
async fn test_allow_listed_versions_reuse_assets() {
    let h = harness_with(
        MockEngine::new(GameVersion::new(1, 31, 4)),
        MockDetector::new(None),
    );
    h.engine.then_versions(&[GameVersion::new(1, 32, 0)]);

    analyze_and_draw(&h, eu4_save()).await;
    let outcome = analyze_and_draw(&h, eu4_save()).await;

    assert!(outcome.outcome().unwrap().assets_reused);
    assert_eq!(h.surface.compiles.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.pipeline.installed_assets(),
        Some(AssetVersionRecord {
            major: 1,
            minor: 31
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_incompatible_version_rebuilds_and_releases_programs() {
    let h = harness();
    h.engine.then_versions(&[GameVersion::new(1, 35, 0)]);

    analyze_and_draw(&h, eu4_save()).await;
    let outcome = analyze_and_draw(&h, eu4_save()).await;

    assert!(!outcome.outcome().unwrap().assets_reused);
    assert_eq!(h.surface.compiles.load(Ordering::SeqCst), 2);
    assert_eq!(*h.surface.installed.lock(), Some(2));
    assert_eq!(*h.surface.released.lock(), vec![1]);
    assert_eq!(
        h.pipeline.installed_assets(),
        Some(AssetVersionRecord {
            major: 1,
            minor: 35
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_start_is_ignored() {
    let h = harness();

    let (first, second) = tokio::join!(
        h.pipeline.run_analysis(eu4_save()),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            h.pipeline.run_analysis(eu4_save()).await
        }
    );

    assert!(first.is_completed());
    assert!(matches!(second, RunOutcome::AlreadyRunning));
    assert_eq!(h.engine.count("parse"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recovered_after_failure() {
    let h = harness();
    h.engine.reject("corrupt");
    h.pipeline.run_analysis(eu4_save()).await;
    assert!(h.pipeline.state().error().is_some());

    h.engine.accept();
    let outcome = analyze_and_draw(&h, eu4_save()).await;

    assert!(outcome.is_completed());
    assert_eq!(
        h.pipeline.state(),
        AnalysisState::Analyzed {
            recur: false,
            drawn: true
        }
    );
}

// ============================================================================
// Concurrent stages
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_asset_and_game_data_fetches_overlap() {
    let h = harness();
    *h.assets.fetch_delay.lock() = Some(Duration::from_secs(1));

    let outcome = h.pipeline.run_analysis(eu4_save()).await;
    assert!(outcome.is_completed());

    // Four one-second fetches between the version query and the coarse pass.
    let stage = h.engine.timeline.at("coarse") - h.engine.timeline.at("version");
    assert!(
        stage >= Duration::from_secs(1) && stage < Duration::from_millis(1500),
        "fetch stage took {stage:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_full_pass_and_render_setup_overlap() {
    let h = harness();
    *h.engine.full_pass_delay.lock() = Duration::from_secs(1);
    *h.surface.compile_delay.lock() = Duration::from_secs(1);

    let outcome = h.pipeline.run_analysis(eu4_save()).await;
    assert!(outcome.is_completed());

    let stage = Instant::now() - h.engine.timeline.at("coarse");
    assert!(
        stage >= Duration::from_secs(1) && stage < Duration::from_millis(1500),
        "setup stage took {stage:?}"
    );

    // Each branch started before the other finished.
    assert!(h.surface.timeline.at("compile start") < h.engine.timeline.at("full end"));
    assert!(h.engine.timeline.at("full start") < h.surface.timeline.at("compile end"));
}

#[tokio::test(start_paused = true)]
async fn test_reused_assets_upload_colors_during_full_pass() {
    let h = harness();
    analyze_and_draw(&h, eu4_save()).await;
    *h.engine.full_pass_delay.lock() = Duration::from_secs(1);

    let outcome = h.pipeline.run_analysis(eu4_save()).await;
    assert!(outcome.outcome().unwrap().assets_reused);

    let upload = h.surface.timeline.at("upload");
    let full_end = h.engine.timeline.at("full end");
    assert!(upload < full_end);
    assert!(full_end - upload >= Duration::from_secs(1));
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_melt_without_save() {
    let h = harness();
    assert_eq!(
        h.pipeline.melt_current().await,
        Err(AnalysisError::NoSaveLoaded)
    );
}

#[tokio::test(start_paused = true)]
async fn test_focus_location_keeps_zoom() {
    let h = harness();
    analyze_and_draw(&h, eu4_save()).await;

    let zoomed = CameraState {
        scale: 3.0,
        ..h.pipeline.camera()
    };
    h.surface.set_camera_state(zoomed);

    let camera = h.pipeline.focus_location(WorldPoint::map_center()).unwrap();

    assert_eq!(camera.scale, 3.0);
    assert_eq!(camera.focus_point(), (0.0, 0.0));
    assert_eq!(h.pipeline.camera(), camera);
}

#[tokio::test(start_paused = true)]
async fn test_latest_outcome_tracks_last_success() {
    let h = harness();
    assert!(h.pipeline.latest().is_none());

    analyze_and_draw(&h, eu4_save()).await;
    h.engine.reject("nope");
    h.pipeline.run_analysis(eu4_save()).await;

    assert_eq!(h.pipeline.latest().unwrap().meta, "save #1");
}

#[tokio::test(start_paused = true)]
async fn test_focus_location_rejects_empty_viewport() {
    let h = harness();
    analyze_and_draw(&h, eu4_save()).await;
    let before = h.pipeline.camera();
    let redraws = h.surface.redraws.load(Ordering::SeqCst);

    *h.surface.viewport.lock() = Viewport::new(800.0, 0.0);
    let result = h.pipeline.focus_location(WorldPoint::new(1000.0, 500.0));

    assert_eq!(
        result,
        Err(AnalysisError::RenderSetup(RenderError::InvalidViewport {
            width: 800.0,
            height: 0.0
        }))
    );
    assert_eq!(h.pipeline.camera(), before);
    assert_eq!(h.surface.redraws.load(Ordering::SeqCst), redraws);
}

#[tokio::test(start_paused = true)]
async fn test_focus_location_resets_unusable_zoom() {
    let h = harness();
    analyze_and_draw(&h, eu4_save()).await;

    h.surface.set_camera_state(CameraState {
        scale: 0.0,
        ..h.pipeline.camera()
    });
    let camera = h.pipeline.focus_location(WorldPoint::new(1000.0, 500.0)).unwrap();

    assert_eq!(camera, focus_on(WorldPoint::new(1000.0, 500.0), viewport(), None));
    assert!(camera.focus_point_x.is_finite() && camera.focus_point_y.is_finite());
}

#[tokio::test(start_paused = true)]
async fn test_empty_viewport_fails_run() {
    let h = harness();
    *h.surface.viewport.lock() = Viewport::new(0.0, 900.0);

    let outcome = h.pipeline.run_analysis(eu4_save()).await;

    assert!(matches!(
        outcome.error(),
        Some(AnalysisError::RenderSetup(RenderError::InvalidViewport { .. }))
    ));
    assert!(h.pipeline.state().error().is_some());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_invalid_progress_plan_rejected_at_construction() {
    let config = PipelineConfig::default().with_progress(ProgressPlan {
        tick_interval: Duration::ZERO,
        ..ProgressPlan::default()
    });

    let err = PipelineOrchestrator::new(
        Arc::new(MockEngine::new(GameVersion::new(1, 34, 2))),
        Arc::new(MockDetector::new(None)),
        Arc::new(MockAssets::default()),
        Arc::new(MockSurface::new(viewport())),
        config,
    )
    .err()
    .expect("zero tick interval must be rejected");

    assert!(matches!(err, PipelineConfigError::Progress(_)));
}
