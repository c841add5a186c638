//! Rendering surface collaborator.
//!
//! The GPU drawing implementation is external. The pipeline drives it
//! through [`RenderSurface`]: compiling and swapping the program set built
//! from version-specific assets, uploading per-save province colors, and
//! placing the camera.

use std::future::Future;

use thiserror::Error;

use crate::assets::AssetBundle;
use crate::camera::{CameraState, Viewport};
use crate::engine::ProvinceColors;

/// Errors creating GPU resources.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    /// Shader compilation or program linking failed.
    #[error("failed to compile map shaders: {0}")]
    Compile(String),

    /// A texture could not be created or uploaded.
    #[error("failed to upload {what}: {message}")]
    Upload { what: &'static str, message: String },

    /// The surface has no drawable area.
    #[error("viewport {width}x{height} cannot be drawn")]
    InvalidViewport { width: f64, height: f64 },

    /// The GPU context went away.
    #[error("rendering context lost")]
    ContextLost,
}

/// Callback fired once after the next frame is painted.
pub type FrameCallback = Box<dyn FnOnce() + Send + 'static>;

/// GPU-backed map surface.
///
/// Compilation and uploads need the GPU context, so they live here rather
/// than on the asset source. Implementations marshal calls onto the thread
/// owning the context.
pub trait RenderSurface: Send + Sync {
    /// Compiled shader programs and textures for one map version.
    type Programs: Send + 'static;

    /// Current drawable size.
    fn viewport(&self) -> Viewport;

    /// Current camera, including any user pan/zoom.
    fn camera_state(&self) -> CameraState;

    /// Build a program set from fetched assets.
    fn compile(
        &self,
        bundle: &AssetBundle,
    ) -> impl Future<Output = Result<Self::Programs, RenderError>> + Send;

    /// Make `programs` current, returning the set it replaced.
    fn install(&self, programs: Self::Programs) -> Option<Self::Programs>;

    /// Free a program set that is no longer installed.
    fn release(&self, programs: Self::Programs);

    /// Recolor provinces on the installed program set.
    fn upload_province_colors(
        &self,
        colors: &ProvinceColors,
    ) -> impl Future<Output = Result<(), RenderError>> + Send;

    fn resize(&self, viewport: Viewport);

    /// Overwrite the camera. Always an absolute write.
    fn set_camera_state(&self, camera: CameraState);

    /// Request a frame.
    fn redraw(&self);

    /// Register a one-shot callback for the next painted frame.
    fn on_frame_drawn(&self, callback: FrameCallback);
}
