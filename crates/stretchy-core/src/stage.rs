#![forbid(unsafe_code)]

//! Stage: the controller owning cells, interaction state and animations.
//!
//! The host drives a [`Stage`] with three kinds of calls:
//!
//! - lifecycle: [`start`](Stage::start), [`resize`](Stage::resize);
//! - input: [`press`](Stage::press), [`pointer_move`](Stage::pointer_move),
//!   [`release`](Stage::release), [`leave`](Stage::leave);
//! - time: [`tick`](Stage::tick) once per display frame.
//!
//! Every call returns [`StageEffects`] telling the host what to do next
//! (show the stage, toggle the grab cursor, flush dirty cells, request
//! another frame). Cells that changed are collected with
//! [`take_dirty`](Stage::take_dirty).
//!
//! # Overlap rules
//!
//! Each animation runs in a [`TaskSlot`], so overlapping triggers resolve
//! deterministically by cancel-and-restart:
//!
//! 1. Input before arming is ignored.
//! 2. A press cancels a still-running entrance tween and any snap-back; the
//!    drag mapping takes over from the cells' current state.
//! 3. A release while a snap-back runs restarts it from the current state.
//! 4. Resize never cancels anything; it only updates the cached height.

use std::time::Duration;

use bitflags::bitflags;

use crate::cell::{Cell, DirtySet, DisplayStyle};
use crate::config::StageConfig;
use crate::drag::{DragState, Viewport, apply_drag};
use crate::entrance::EntranceSession;
use crate::snap_back::SnapBack;
use crate::split::split_text;
use crate::task::TaskSlot;

bitflags! {
    /// Host-side work requested by a stage call.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StageEffects: u8 {
        /// Make the stage container visible.
        const SHOW_STAGE    = 0b0000_0001;
        /// Add the grabbing cursor class to the document body.
        const GRAB_ON       = 0b0000_0010;
        /// Remove the grabbing cursor class.
        const GRAB_OFF      = 0b0000_0100;
        /// Dirty cells are waiting to be written.
        const REDRAW        = 0b0000_1000;
        /// An animation is running; schedule another frame.
        const REQUEST_FRAME = 0b0001_0000;
    }
}

/// Lifecycle phase of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    /// Text split; entrance not started.
    #[default]
    Split,
    /// Entrance running, input not yet armed.
    Entering,
    /// Input armed.
    Interactive,
}

/// Controller for one text element.
#[derive(Debug)]
pub struct Stage {
    config: StageConfig,
    cells: Vec<Cell>,
    dirty: DirtySet,
    container_height: f64,
    phase: Phase,
    drag: DragState,
    entrance: TaskSlot<EntranceSession>,
    snap_back: TaskSlot<SnapBack>,
}

impl Stage {
    /// Split `text` into resting cells.
    #[must_use]
    pub fn new(text: &str, config: StageConfig) -> Self {
        let cells = split_text(text, config.rest_style());
        let dirty = DirtySet::with_len(cells.len());
        Self {
            config,
            cells,
            dirty,
            container_height: 0.0,
            phase: Phase::Split,
            drag: DragState::default(),
            entrance: TaskSlot::new(),
            snap_back: TaskSlot::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StageConfig {
        &self.config
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.phase == Phase::Interactive
    }

    #[must_use]
    pub const fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Cached text container height in px.
    #[must_use]
    pub const fn container_height(&self) -> f64 {
        self.container_height
    }

    /// Whether an entrance or snap-back still needs frames.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.entrance.is_running() || self.snap_back.is_running()
    }

    /// Indices of cells changed since the last call, ascending.
    pub fn take_dirty(&mut self) -> Vec<usize> {
        self.dirty.drain()
    }

    /// Cache a new container height. Non-finite or negative values are
    /// stored as `0`, which makes drags saturate.
    pub fn resize(&mut self, height: f64) {
        self.container_height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        tracing::trace!(height = self.container_height, "stage resized");
    }

    /// Begin the entrance. Only the first call has an effect.
    pub fn start(&mut self, now: Duration) -> StageEffects {
        if self.phase != Phase::Split {
            return StageEffects::empty();
        }
        let session = EntranceSession::begin(
            &mut self.cells,
            &self.config,
            self.container_height,
            now,
            &mut self.dirty,
        );
        tracing::debug!(
            cells = self.cells.len(),
            arm_at_ms = session.arm_at().as_millis() as u64,
            "entrance start"
        );
        self.entrance.start(session);
        self.phase = Phase::Entering;
        StageEffects::SHOW_STAGE | self.frame_effects()
    }

    /// Advance running animations to `now`.
    pub fn tick(&mut self, now: Duration) -> StageEffects {
        let mut entrance_done = false;
        if let Some(session) = self.entrance.get_mut() {
            let tick = session.tick(now, &mut self.cells, &mut self.dirty);
            if tick.armed {
                self.phase = Phase::Interactive;
                tracing::debug!(now_ms = now.as_millis() as u64, "input armed");
            }
            entrance_done = tick.finished;
        }
        if entrance_done {
            self.entrance.clear();
            tracing::debug!("entrance finished");
        }

        let snap_done = self
            .snap_back
            .get()
            .is_some_and(|snap| snap.tick(now, &mut self.cells, &mut self.dirty).is_finished());
        if snap_done {
            self.snap_back.clear();
        }

        self.frame_effects()
    }

    /// Pointer pressed on cell `index` at vertical coordinate `y`.
    pub fn press(&mut self, index: usize, y: f64) -> StageEffects {
        if !self.is_armed() {
            tracing::trace!(index, "press ignored before arming");
            return StageEffects::empty();
        }
        if index >= self.cells.len() {
            return StageEffects::empty();
        }
        if self.entrance.clear().is_some() {
            tracing::debug!(index, "entrance cancelled by press");
        }
        if self.snap_back.clear().is_some() {
            tracing::debug!(index, "snap-back cancelled by press");
        }
        self.drag.press(index, y);
        tracing::debug!(index, y, "press");
        StageEffects::GRAB_ON
    }

    /// Pointer moved to vertical coordinate `y`. Ignored unless pressed.
    pub fn pointer_move(&mut self, y: f64) -> StageEffects {
        let Some(scale) = self
            .drag
            .move_to(y, self.container_height, self.config.max_y_scale)
        else {
            return StageEffects::empty();
        };
        apply_drag(
            &mut self.cells,
            self.drag.selected(),
            scale,
            &self.config,
            &mut self.dirty,
        );
        self.frame_effects()
    }

    /// Pointer released. Starts the snap-back when a press was active.
    pub fn release(&mut self, now: Duration) -> StageEffects {
        if !self.drag.release() {
            return StageEffects::empty();
        }
        let snap = SnapBack::capture(&self.cells, self.drag.selected(), &self.config, now);
        tracing::debug!(
            selected = snap.selected(),
            window_ms = snap.window().as_millis() as u64,
            "release"
        );
        if self.snap_back.start(snap).is_some() {
            tracing::debug!("snap-back restarted");
        }
        StageEffects::GRAB_OFF | self.frame_effects()
    }

    /// Pointer left the document at `(x, y)`. Treated as a release when the
    /// point lies outside `viewport` while pressed.
    pub fn leave(&mut self, x: f64, y: f64, viewport: Viewport, now: Duration) -> StageEffects {
        if !self.drag.is_pressed() || !viewport.is_outside(x, y) {
            return StageEffects::empty();
        }
        tracing::debug!(x, y, "pointer left viewport while pressed");
        self.release(now)
    }

    /// Stop every running animation, leaving cells where they are.
    /// Returns whether anything was running.
    pub fn cancel_animations(&mut self) -> bool {
        let entrance = self.entrance.clear().is_some();
        let snap = self.snap_back.clear().is_some();
        if entrance || snap {
            tracing::debug!(entrance, snap, "animations cancelled");
        }
        entrance || snap
    }

    /// Point-in-time view for debugging and tests.
    #[must_use]
    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            phase: self.phase,
            armed: self.is_armed(),
            pressed: self.drag.is_pressed(),
            selected: self.drag.selected(),
            drag_scale: self.drag.scale(),
            container_height: self.container_height,
            entrance_running: self.entrance.is_running(),
            snap_back_running: self.snap_back.is_running(),
            cells: self
                .cells
                .iter()
                .map(|cell| CellSnapshot {
                    index: cell.index(),
                    glyph: cell.glyph().to_owned(),
                    style: cell.style.display(),
                })
                .collect(),
        }
    }

    fn frame_effects(&self) -> StageEffects {
        let mut effects = StageEffects::empty();
        if !self.dirty.is_empty() {
            effects |= StageEffects::REDRAW;
        }
        if self.wants_frame() {
            effects |= StageEffects::REQUEST_FRAME;
        }
        effects
    }
}

/// Serializable view of a [`Stage`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StageSnapshot {
    pub phase: Phase,
    pub armed: bool,
    pub pressed: bool,
    pub selected: usize,
    pub drag_scale: f64,
    pub container_height: f64,
    pub entrance_running: bool,
    pub snap_back_running: bool,
    pub cells: Vec<CellSnapshot>,
}

/// One cell as displayed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CellSnapshot {
    pub index: usize,
    pub glyph: String,
    pub style: DisplayStyle,
}
