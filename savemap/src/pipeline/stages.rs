//! The individual pipeline stages.

use std::sync::Arc;

use bytes::Bytes;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::error::{AnalysisError, ClassificationError};
use super::orchestrator::PipelineOrchestrator;
use super::outcome::AnalysisOutcome;
use crate::assets::{AssetBundle, AssetDecision, AssetSource, GameVersion, ProvinceIndex};
use crate::camera::{focus_on, CameraState, Viewport, WorldPoint};
use crate::engine::{FullAnalysis, GameKind, ParsingEngine, ProvinceColors};
use crate::input::{AcquiredInput, AnalysisInput};
use crate::progress::ProgressReporter;
use crate::render::{RenderError, RenderSurface};

/// Assets ready for render setup.
pub(super) enum PreparedAssets {
    /// The installed program set stays; only colors change.
    Reused { province_index: Arc<ProvinceIndex> },
    /// A new program set must be compiled and installed.
    Fresh {
        bundle: AssetBundle,
        province_index: Arc<ProvinceIndex>,
    },
}

impl PreparedAssets {
    fn province_index(&self) -> &ProvinceIndex {
        match self {
            Self::Reused { province_index } | Self::Fresh { province_index, .. } => province_index,
        }
    }

    fn is_reused(&self) -> bool {
        matches!(self, Self::Reused { .. })
    }
}

impl<E, A, R> PipelineOrchestrator<E, A, R>
where
    E: ParsingEngine + 'static,
    A: AssetSource + 'static,
    R: RenderSurface + 'static,
{
    pub(super) async fn execute(
        &self,
        input: AnalysisInput,
        token: &CancellationToken,
        reporter: &ProgressReporter,
        started: Instant,
    ) -> Result<AnalysisOutcome<E::Meta>, AnalysisError> {
        let plan = &self.config.progress;

        let acquired = self.acquirer.acquire(input, token).await?;
        reporter.bytes_read(acquired.len() as u64, plan.bytes_read);

        let kind = self.classify(&acquired).await?;
        reporter.type_detected(kind, plan.type_detected);

        let input_bytes = acquired.len();
        let (handle, version) = self.handshake(kind, acquired.data, reporter).await?;

        let (prepared, game_data) = tokio::try_join!(
            self.prepare_assets(version, reporter),
            self.fetch_game_data(version, reporter),
        )?;

        let colors = self
            .engine
            .coarse_pass(&handle, game_data, prepared.province_index())
            .await?;
        reporter.checkpoint("coarse pass", plan.coarse_pass);

        let assets_reused = prepared.is_reused();
        let (analysis, ()) = tokio::try_join!(
            self.full_pass(&handle, reporter),
            self.setup_renderer(version, prepared, &colors, reporter),
        )?;

        let FullAnalysis {
            meta,
            achievements,
            focus,
        } = analysis;
        let focus = focus.unwrap_or_else(WorldPoint::map_center);
        let camera = self.finalize(focus)?;

        Ok(AnalysisOutcome {
            kind,
            version,
            meta,
            achievements,
            focus,
            camera,
            assets_reused,
            input_bytes,
            elapsed: started.elapsed(),
        })
    }

    /// Extension first, then content detection.
    #[instrument(skip_all, fields(name = ?input.name))]
    async fn classify(&self, input: &AcquiredInput) -> Result<GameKind, AnalysisError> {
        if let Some(kind) = input.name.as_deref().and_then(GameKind::from_file_name) {
            debug!(%kind, "Save type from file extension");
            return Ok(kind);
        }

        self.detector_init
            .get_or_try_init(|| self.detector.initialize())
            .await
            .map_err(ClassificationError::DetectorUnavailable)?;

        match self.detector.detect(&input.data).await {
            Some(kind) => {
                debug!(%kind, "Save type from content");
                Ok(kind)
            }
            None => Err(ClassificationError::Unrecognized {
                name: input.name.clone(),
            }
            .into()),
        }
    }

    /// Initialize the engine for `kind`, parse, and install the new save.
    #[instrument(skip(self, data, reporter), fields(bytes = data.len()))]
    async fn handshake(
        &self,
        kind: GameKind,
        data: Bytes,
        reporter: &ProgressReporter,
    ) -> Result<(E::Handle, GameVersion), AnalysisError> {
        let plan = &self.config.progress;

        self.engine_init
            .ensure(kind, || self.engine.initialize(kind))
            .await?;

        let handle = {
            let _poll = reporter.poll(plan.parse_start, plan.parse_end);
            self.engine.parse(kind, data).await?
        };

        self.saves.install(self.engine.as_ref(), handle.clone()).await;

        let version = self.engine.query_version(&handle).await?;
        debug!(%version, "Save parsed");
        Ok((handle, version))
    }

    async fn prepare_assets(
        &self,
        version: GameVersion,
        reporter: &ProgressReporter,
    ) -> Result<PreparedAssets, AnalysisError> {
        let slice = self.config.progress.fetch_slice;

        match self.asset_cache.decide(version) {
            AssetDecision::Reuse { province_index, .. } => {
                // Shaders, textures and index all count as done.
                reporter.increment("map assets reused", slice * 3.0);
                Ok(PreparedAssets::Reused { province_index })
            }
            AssetDecision::Prepare { .. } => {
                let (shaders, textures, index) = tokio::try_join!(
                    async {
                        let shaders = self.assets.fetch_shaders(version).await?;
                        reporter.increment("shaders", slice);
                        Ok::<_, AnalysisError>(shaders)
                    },
                    async {
                        let textures = self.assets.fetch_textures(version).await?;
                        reporter.increment("textures", slice);
                        Ok::<_, AnalysisError>(textures)
                    },
                    async {
                        let index = self.assets.fetch_province_index(version).await?;
                        reporter.increment("province index", slice);
                        Ok::<_, AnalysisError>(index)
                    },
                )?;

                debug!(
                    %version,
                    texture_bytes = textures.total_bytes(),
                    provinces = index.len(),
                    "Map assets fetched"
                );
                Ok(PreparedAssets::Fresh {
                    bundle: AssetBundle { shaders, textures },
                    province_index: Arc::new(index),
                })
            }
        }
    }

    async fn fetch_game_data(
        &self,
        version: GameVersion,
        reporter: &ProgressReporter,
    ) -> Result<Bytes, AnalysisError> {
        let data = self.assets.fetch_game_data(version).await?;
        reporter.increment("game data", self.config.progress.fetch_slice);
        Ok(data)
    }

    async fn full_pass(
        &self,
        handle: &E::Handle,
        reporter: &ProgressReporter,
    ) -> Result<FullAnalysis<E::Meta>, AnalysisError> {
        let analysis = self.engine.full_pass(handle).await?;
        reporter.increment("full pass", self.config.progress.full_pass_slice);
        Ok(analysis)
    }

    /// Install programs for a new asset version, or just recolor.
    async fn setup_renderer(
        &self,
        version: GameVersion,
        prepared: PreparedAssets,
        colors: &ProvinceColors,
        reporter: &ProgressReporter,
    ) -> Result<(), AnalysisError> {
        match prepared {
            PreparedAssets::Reused { .. } => {
                self.renderer.upload_province_colors(colors).await?;
            }
            PreparedAssets::Fresh {
                bundle,
                province_index,
            } => {
                let programs = self.renderer.compile(&bundle).await?;
                if let Some(previous) = self.renderer.install(programs) {
                    self.renderer.release(previous);
                }
                // The installed programs now match `version`, whatever happens next.
                self.asset_cache.commit(version, province_index);
                self.renderer.upload_province_colors(colors).await?;
            }
        }

        reporter.increment("render setup", self.config.progress.render_slice);
        Ok(())
    }

    /// Place the camera, enter `Analyzed`, and wait for the first frame.
    fn finalize(&self, focus: WorldPoint) -> Result<CameraState, AnalysisError> {
        let viewport = self.drawable_viewport()?;

        self.renderer.resize(viewport);
        let camera = focus_on(focus, viewport, *self.sidebar_offset.lock());
        self.renderer.set_camera_state(camera);

        self.lifecycle.module_loaded();

        let lifecycle = Arc::clone(&self.lifecycle);
        self.renderer
            .on_frame_drawn(Box::new(move || lifecycle.mark_drawn()));
        self.renderer.redraw();

        Ok(camera)
    }

    /// Current renderer viewport, rejected when it has no area.
    pub(super) fn drawable_viewport(&self) -> Result<Viewport, RenderError> {
        let viewport = self.renderer.viewport();
        if !viewport.is_drawable() {
            return Err(RenderError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(viewport)
    }
}
