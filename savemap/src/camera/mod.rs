//! Camera placement
//!
//! Converts a pixel position on the equirectangular world map image into
//! renderer camera state. Every function here is pure and produces an
//! absolute camera; user pan/zoom is the renderer's business.

mod types;

pub use types::{
    CameraState, Viewport, WorldPoint, IMG_ASPECT, IMG_HEIGHT, IMG_WIDTH, INITIAL_SCALE_REFERENCE,
};

/// Initial zoom for a viewport of the given width.
#[inline]
pub fn initial_scale(viewport_width: f64) -> f64 {
    INITIAL_SCALE_REFERENCE / viewport_width
}

/// Camera centered on `point` at the initial zoom for `viewport`.
///
/// # Arguments
///
/// * `point` - Location on the map image, in image pixels
/// * `viewport` - Size of the rendering surface
/// * `sidebar_offset_x` - Canvas pixels hidden behind a docked side panel
pub fn focus_on(point: WorldPoint, viewport: Viewport, sidebar_offset_x: Option<f64>) -> CameraState {
    focus_on_at_scale(point, viewport, initial_scale(viewport.width), sidebar_offset_x)
}

/// Camera centered on `point` at an explicit zoom.
///
/// Used to re-center on a location without resetting the user's zoom.
pub fn focus_on_at_scale(
    point: WorldPoint,
    viewport: Viewport,
    scale: f64,
    sidebar_offset_x: Option<f64>,
) -> CameraState {
    let half_w = IMG_WIDTH / 2.0;
    let half_h = IMG_HEIGHT / 2.0;

    let init_x = (point.x - half_w) / half_w * (viewport.width / 2.0);

    // Correct for the image aspect differing from the canvas aspect so the
    // vertical position doesn't drift.
    let init_y = ((point.y - half_h) / half_h * (viewport.height / 2.0))
        / (IMG_ASPECT / viewport.aspect());

    let focus_point_x = match sidebar_offset_x {
        Some(offset) => init_x + offset / 2.0 / scale,
        None => init_x,
    };

    CameraState {
        focus_point_x,
        focus_point_y: init_y,
        scale,
    }
}
