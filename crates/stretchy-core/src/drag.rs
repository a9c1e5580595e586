#![forbid(unsafe_code)]

//! Drag interaction: pointer displacement → per-cell deformation.
//!
//! # State Machine
//!
//! ```text
//! idle --press--> pressed --release--> idle
//!                 pressed --leave (outside viewport)--> idle
//! ```
//!
//! While pressed, every move recomputes the drag scale and writes the
//! deformation of every cell directly (no easing).
//!
//! # Invariants
//!
//! 1. Drag scale is always within `[-0.5, max_y_scale - 1]`.
//! 2. The grabbed cell's dispersion equals the drag scale.
//! 3. Dispersion falls linearly with index distance and turns negative past
//!    `count · drop_off`, inverting the deformation at the periphery.
//! 4. The mapping is a pure function of pointer coordinates: the same move
//!    twice writes the same values.
//!
//! # Failure Modes
//!
//! - Zero cells (`count · drop_off == 0`): dispersion is `0`.
//! - Non-positive normalisation height (layout not measured yet): the scale
//!   saturates by the sign of the distance.

use crate::cell::{Cell, CellStyle, DirtySet};
use crate::config::StageConfig;

/// Lower saturation bound of the drag scale.
pub const MIN_DRAG_SCALE: f64 = -0.5;

/// Normalised, clamped drag magnitude.
///
/// `distance` is `initial_y - current_y` (positive when dragging up).
#[must_use]
pub fn drag_scale(distance: f64, char_height: f64, max_y_scale: f64) -> f64 {
    let max = max_y_scale - 1.0;
    let span = char_height * max;
    if distance.is_nan() {
        return 0.0;
    }
    let raw = if span > 0.0 && span.is_finite() {
        distance / span
    } else if distance > 0.0 {
        max
    } else if distance < 0.0 {
        MIN_DRAG_SCALE
    } else {
        0.0
    };
    raw.clamp(MIN_DRAG_SCALE, max.max(MIN_DRAG_SCALE))
}

/// Dispersion fraction of cell `index` while `selected` is grabbed.
#[must_use]
pub fn dispersion(index: usize, selected: usize, count: usize, drop_off: f64, scale: f64) -> f64 {
    let reach = count as f64 * drop_off;
    if reach <= 0.0 || !reach.is_finite() {
        return 0.0;
    }
    let distance = index.abs_diff(selected) as f64;
    (1.0 - distance / reach) * scale
}

/// Style of a cell at dispersion `fraction`.
#[must_use]
pub fn deformation(fraction: f64, config: &StageConfig) -> CellStyle {
    let weight_span = config.rest_weight - config.target_weight;
    let stretch_span = config.rest_stretch - config.target_stretch;
    CellStyle {
        offset_y: fraction * -config.lift_px,
        scale_y: (1.0 + fraction).max(config.min_scale_y),
        weight: config.rest_weight - fraction * weight_span,
        stretch: config.rest_stretch - fraction * stretch_span,
    }
}

/// Write the deformation for the current drag into every cell.
pub fn apply_drag(
    cells: &mut [Cell],
    selected: usize,
    scale: f64,
    config: &StageConfig,
    dirty: &mut DirtySet,
) {
    let count = cells.len();
    for cell in cells.iter_mut() {
        let fraction = dispersion(cell.index(), selected, count, config.elastic_drop_off, scale);
        cell.style = deformation(fraction, config);
        dirty.mark(cell.index());
    }
}

/// Host viewport size in CSS px.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a pointer at `(x, y)` has left the viewport. Edges count as
    /// outside.
    #[must_use]
    pub fn is_outside(&self, x: f64, y: f64) -> bool {
        y <= 0.0 || x <= 0.0 || x >= self.width || y >= self.height
    }
}

/// Interaction state of one press-drag-release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DragState {
    pressed: bool,
    selected: usize,
    initial_y: f64,
    current_y: f64,
    distance: f64,
    scale: f64,
}

impl DragState {
    /// Begin a new cycle on cell `selected` at pointer `y`.
    pub fn press(&mut self, selected: usize, y: f64) {
        *self = Self {
            pressed: true,
            selected,
            initial_y: y,
            current_y: y,
            distance: 0.0,
            scale: 0.0,
        };
    }

    /// Record a move and return the new drag scale. Ignored when idle.
    pub fn move_to(&mut self, y: f64, char_height: f64, max_y_scale: f64) -> Option<f64> {
        if !self.pressed {
            return None;
        }
        self.current_y = y;
        self.distance = self.initial_y - y;
        self.scale = drag_scale(self.distance, char_height, max_y_scale);
        Some(self.scale)
    }

    /// End the cycle. Returns whether a press was active.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.pressed, false)
    }

    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Index of the grabbed cell (last press, kept after release).
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }
}
