#![forbid(unsafe_code)]

//! Entrance sequencer: staggered left-to-right reveal, then arming.
//!
//! On [`EntranceSession::begin`] every cell jumps above the container at
//! double height with the deformation-target axes. Cell `i` then tweens to
//! rest starting at `base + i · stagger`. Pointer input is armed at
//! `base + n · stagger`, after the last cell's start.
//!
//! # Invariants
//!
//! 1. Start offsets are strictly increasing with index when `stagger > 0`.
//! 2. The session is finished only once every lane is done *and* the
//!    arming instant has been reported.
//! 3. A cell is written only by its own lane, and only while running.

use std::time::Duration;

use crate::cell::{Cell, CellStyle, DirtySet};
use crate::config::StageConfig;
use crate::easing::Easing;
use crate::tween::{FrameAnimator, Tween};

/// Timing of the reveal, in host milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceSchedule {
    pub base_delay: Duration,
    pub stagger: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl EntranceSchedule {
    #[must_use]
    pub fn from_config(config: &StageConfig) -> Self {
        Self {
            base_delay: config.entrance_base_delay(),
            stagger: config.entrance_stagger(),
            duration: config.entrance_duration(),
            easing: Easing::elastic(config.entrance_elastic_period),
        }
    }

    /// When cell `index` starts, relative to the session start.
    #[must_use]
    pub fn start_offset(&self, index: usize) -> Duration {
        self.base_delay + scale(self.stagger, index)
    }

    /// When pointer input is armed for `count` cells, relative to the
    /// session start.
    #[must_use]
    pub fn arm_offset(&self, count: usize) -> Duration {
        self.base_delay + scale(self.stagger, count)
    }
}

fn scale(step: Duration, times: usize) -> Duration {
    step.saturating_mul(u32::try_from(times).unwrap_or(u32::MAX))
}

/// Pre-animation style: above the container, stretched, at target axes.
#[must_use]
pub fn offscreen_style(config: &StageConfig, container_height: f64) -> CellStyle {
    CellStyle::new(
        -(container_height + config.entrance_margin_px),
        config.entrance_scale_y,
        config.target_weight,
        config.target_stretch,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Lane {
    Pending,
    Running(FrameAnimator),
    Done,
}

/// Result of one entrance frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntranceTick {
    /// The arming instant was crossed during this tick.
    pub armed: bool,
    /// Nothing left to drive.
    pub finished: bool,
}

/// A running reveal.
#[derive(Debug, Clone)]
pub struct EntranceSession {
    started_at: Duration,
    schedule: EntranceSchedule,
    rest: CellStyle,
    lanes: Vec<Lane>,
    armed: bool,
}

impl EntranceSession {
    /// Put every cell in its pre-animation state and start the clock.
    pub fn begin(
        cells: &mut [Cell],
        config: &StageConfig,
        container_height: f64,
        now: Duration,
        dirty: &mut DirtySet,
    ) -> Self {
        let offscreen = offscreen_style(config, container_height);
        for cell in cells.iter_mut() {
            cell.style = offscreen;
            dirty.mark(cell.index());
        }
        Self {
            started_at: now,
            schedule: EntranceSchedule::from_config(config),
            rest: config.rest_style(),
            lanes: vec![Lane::Pending; cells.len()],
            armed: false,
        }
    }

    #[must_use]
    pub const fn schedule(&self) -> &EntranceSchedule {
        &self.schedule
    }

    /// Absolute time input is armed.
    #[must_use]
    pub fn arm_at(&self) -> Duration {
        self.started_at + self.schedule.arm_offset(self.lanes.len())
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance every lane to `now`.
    pub fn tick(
        &mut self,
        now: Duration,
        cells: &mut [Cell],
        dirty: &mut DirtySet,
    ) -> EntranceTick {
        let elapsed = now.saturating_sub(self.started_at);
        let mut all_done = true;

        for (index, (lane, cell)) in self.lanes.iter_mut().zip(cells.iter_mut()).enumerate() {
            if *lane == Lane::Pending {
                let offset = self.schedule.start_offset(index);
                if elapsed < offset {
                    all_done = false;
                    continue;
                }
                let tween = Tween::new(
                    cell.style,
                    self.rest,
                    self.schedule.duration,
                    self.schedule.easing,
                );
                *lane = Lane::Running(FrameAnimator::start(tween, self.started_at + offset));
                tracing::trace!(
                    index,
                    offset_ms = offset.as_millis() as u64,
                    "entrance lane start"
                );
            }
            if let Lane::Running(animator) = lane {
                let status = animator.step(now, &mut cell.style);
                dirty.mark(index);
                if status.is_finished() {
                    *lane = Lane::Done;
                } else {
                    all_done = false;
                }
            }
        }

        let mut out = EntranceTick::default();
        if !self.armed && now >= self.arm_at() {
            self.armed = true;
            out.armed = true;
        }
        out.finished = all_done && self.armed;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::split_text;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup(text: &str) -> (Vec<Cell>, StageConfig, DirtySet) {
        let config = StageConfig::default();
        let cells = split_text(text, config.rest_style());
        let dirty = DirtySet::with_len(cells.len());
        (cells, config, dirty)
    }

    #[test]
    fn schedule_matches_stagger() {
        let schedule = EntranceSchedule::from_config(&StageConfig::default());
        assert_eq!(schedule.start_offset(0), ms(500));
        assert_eq!(schedule.start_offset(1), ms(550));
        assert_eq!(schedule.start_offset(10), ms(1000));
        assert_eq!(schedule.arm_offset(0), ms(500));
        assert_eq!(schedule.arm_offset(4), ms(700));
    }

    #[test]
    fn begin_moves_cells_offscreen() {
        let (mut cells, config, mut dirty) = setup("hey");
        let _session = EntranceSession::begin(&mut cells, &config, 100.0, ms(0), &mut dirty);
        for cell in &cells {
            assert_eq!(cell.style, CellStyle::new(-600.0, 2.0, 400.0, 80.0));
        }
        assert_eq!(dirty.drain(), vec![0, 1, 2]);
    }

    #[test]
    fn lanes_start_in_order() {
        let (mut cells, config, mut dirty) = setup("abc");
        let mut session = EntranceSession::begin(&mut cells, &config, 100.0, ms(1000), &mut dirty);
        dirty.drain();

        session.tick(ms(1499), &mut cells, &mut dirty);
        assert!(dirty.is_empty(), "nothing starts before 500ms");

        session.tick(ms(1520), &mut cells, &mut dirty);
        assert_eq!(dirty.drain(), vec![0]);
        assert!(cells[0].style.offset_y > -600.0);
        assert_eq!(cells[1].style.offset_y, -600.0);

        session.tick(ms(1560), &mut cells, &mut dirty);
        assert_eq!(dirty.drain(), vec![0, 1]);
    }

    #[test]
    fn arms_then_finishes_at_rest() {
        let (mut cells, config, mut dirty) = setup("ab");
        let mut session = EntranceSession::begin(&mut cells, &config, 80.0, ms(0), &mut dirty);

        let tick = session.tick(ms(599), &mut cells, &mut dirty);
        assert!(!tick.armed);
        let tick = session.tick(ms(600), &mut cells, &mut dirty);
        assert!(tick.armed && !tick.finished);
        let tick = session.tick(ms(700), &mut cells, &mut dirty);
        assert!(!tick.armed, "arming is reported once");

        let tick = session.tick(ms(550 + 1500), &mut cells, &mut dirty);
        assert!(tick.finished);
        for cell in &cells {
            assert_eq!(cell.style, config.rest_style());
        }
    }

    #[test]
    fn empty_text_arms_at_base_delay() {
        let (mut cells, config, mut dirty) = setup("");
        let mut session = EntranceSession::begin(&mut cells, &config, 0.0, ms(0), &mut dirty);
        assert_eq!(session.arm_at(), ms(500));
        let tick = session.tick(ms(500), &mut cells, &mut dirty);
        assert!(tick.armed && tick.finished);
    }

    #[test]
    fn lane_skipped_frames_catch_up() {
        let (mut cells, config, mut dirty) = setup("a");
        let mut session = EntranceSession::begin(&mut cells, &config, 0.0, ms(0), &mut dirty);
        // First frame arrives long after the lane should have finished.
        let tick = session.tick(ms(5000), &mut cells, &mut dirty);
        assert!(tick.finished);
        assert_eq!(cells[0].style, config.rest_style());
    }
}
