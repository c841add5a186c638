//! Camera type definitions

/// Width of the world map image in pixels.
pub const IMG_WIDTH: f64 = 5632.0;
/// Height of the world map image in pixels.
pub const IMG_HEIGHT: f64 = 2048.0;
/// Native aspect ratio of the world map image.
pub const IMG_ASPECT: f64 = IMG_WIDTH / IMG_HEIGHT;

/// Reference constant for the initial zoom: `scale = INITIAL_SCALE_REFERENCE / viewport width`.
pub const INITIAL_SCALE_REFERENCE: f64 = 10000.0;

/// A pixel position on the world map image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    /// Column, 0 at the western edge
    pub x: f64,
    /// Row, 0 at the northern edge
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of the map image.
    pub fn map_center() -> Self {
        Self {
            x: IMG_WIDTH / 2.0,
            y: IMG_HEIGHT / 2.0,
        }
    }
}

/// Drawable size of the rendering surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Whether both dimensions are positive and finite.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Renderer camera: the world-space point centered in the viewport and the zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub focus_point_x: f64,
    pub focus_point_y: f64,
    pub scale: f64,
}

impl CameraState {
    pub fn focus_point(&self) -> (f64, f64) {
        (self.focus_point_x, self.focus_point_y)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            focus_point_x: 0.0,
            focus_point_y: 0.0,
            scale: 1.0,
        }
    }
}
