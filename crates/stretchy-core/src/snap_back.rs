#![forbid(unsafe_code)]

//! Snap-back: staggered elastic return to rest after a release.
//!
//! One shared session drives every cell. Cell `i` waits
//! `|i - selected| · stagger` and then settles over `base - delay`, so the
//! wave starts at the grabbed cell, spreads outward, and every cell within
//! reach is at rest once `base` has elapsed. The session keeps running until
//! `base + count · stagger`.
//!
//! # Invariants
//!
//! 1. The grabbed cell has zero delay; delay grows by `stagger` per cell of
//!    distance.
//! 2. Cells whose progress is still `<= 0` are not written.
//! 3. Cells with `delay < base` are exactly at rest at `elapsed = base`.
//! 4. Cells with `delay >= base` settle over what is left of the window
//!    instead.
//! 5. The frame at `elapsed >= window` writes every cell exactly at rest and
//!    reports [`FrameStatus::Finished`].

use std::time::Duration;

use crate::cell::{Cell, CellStyle, DirtySet};
use crate::config::StageConfig;
use crate::easing::Easing;
use crate::tween::FrameStatus;

/// A running snap-back wave.
#[derive(Debug, Clone)]
pub struct SnapBack {
    started_at: Duration,
    selected: usize,
    initial: Vec<CellStyle>,
    rest: CellStyle,
    base: Duration,
    window: Duration,
    stagger: Duration,
    easing: Easing,
}

impl SnapBack {
    /// Capture every cell's current (deformed) style and start the wave.
    #[must_use]
    pub fn capture(cells: &[Cell], selected: usize, config: &StageConfig, now: Duration) -> Self {
        let stagger = config.snap_back_stagger();
        let count = u32::try_from(cells.len()).unwrap_or(u32::MAX);
        let base = config.snap_back_base();
        Self {
            started_at: now,
            selected,
            initial: cells.iter().map(|cell| cell.style).collect(),
            rest: config.rest_style(),
            base,
            window: base + stagger.saturating_mul(count),
            stagger,
            easing: Easing::elastic(config.snap_back_elastic_period),
        }
    }

    /// Total length of the wave.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Start delay of cell `index`.
    #[must_use]
    pub fn delay(&self, index: usize) -> Duration {
        let distance = u32::try_from(index.abs_diff(self.selected)).unwrap_or(u32::MAX);
        self.stagger.saturating_mul(distance)
    }

    /// Time cell `index` takes to settle once its delay has passed.
    #[must_use]
    pub fn settle_span(&self, index: usize) -> Duration {
        let delay = self.delay(index);
        if delay < self.base {
            self.base - delay
        } else {
            self.window.saturating_sub(delay)
        }
    }

    /// Linear progress of cell `index` at `elapsed`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, index: usize, elapsed: Duration) -> f64 {
        let delay = self.delay(index);
        let ahead = elapsed.saturating_sub(delay);
        let span = self.settle_span(index);
        if ahead >= span {
            return if elapsed >= delay { 1.0 } else { 0.0 };
        }
        ahead.as_secs_f64() / span.as_secs_f64()
    }

    /// Write the wave at `now` into `cells`.
    pub fn tick(&self, now: Duration, cells: &mut [Cell], dirty: &mut DirtySet) -> FrameStatus {
        let elapsed = now.saturating_sub(self.started_at);
        for (cell, initial) in cells.iter_mut().zip(&self.initial) {
            let index = cell.index();
            let progress = self.progress(index, elapsed);
            if progress <= 0.0 {
                continue;
            }
            let eased = self.easing.apply(progress);
            // Deformation shrinks as eased progress approaches 1.
            cell.style = initial.lerp(self.rest, eased);
            dirty.mark(index);
        }
        if elapsed >= self.window {
            tracing::debug!(
                selected = self.selected,
                window_ms = self.window.as_millis() as u64,
                "snap-back settled"
            );
            FrameStatus::Finished
        } else {
            FrameStatus::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::apply_drag;
    use crate::split::split_text;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn dragged(text: &str, selected: usize, scale: f64) -> (Vec<Cell>, StageConfig, DirtySet) {
        let config = StageConfig::default();
        let mut cells = split_text(text, config.rest_style());
        let mut dirty = DirtySet::with_len(cells.len());
        apply_drag(&mut cells, selected, scale, &config, &mut dirty);
        dirty.drain();
        (cells, config, dirty)
    }

    #[test]
    fn window_and_delays() {
        let (cells, config, _) = dragged("stretch", 2, 1.0);
        let snap = SnapBack::capture(&cells, 2, &config, ms(0));
        assert_eq!(snap.window(), ms(1000 + 7 * 20));
        assert_eq!(snap.delay(2), Duration::ZERO);
        assert_eq!(snap.delay(0), ms(40));
        assert_eq!(snap.delay(6), ms(80));
    }

    #[test]
    fn distant_cells_wait() {
        let (mut cells, config, mut dirty) = dragged("abcde", 0, 1.2);
        let before = cells[4].style;
        let snap = SnapBack::capture(&cells, 0, &config, ms(100));
        assert_eq!(snap.tick(ms(150), &mut cells, &mut dirty), FrameStatus::Running);
        assert!(dirty.drain().contains(&0));
        assert_eq!(cells[4].style, before, "cell 4 has an 80ms delay");
    }

    #[test]
    fn final_frame_is_exact_rest() {
        let (mut cells, config, mut dirty) = dragged("snap back", 4, 1.5);
        let snap = SnapBack::capture(&cells, 4, &config, ms(0));
        assert_eq!(snap.tick(snap.window(), &mut cells, &mut dirty), FrameStatus::Finished);
        for cell in &cells {
            assert_eq!(cell.style, config.rest_style());
        }
    }

    #[test]
    fn grabbed_cell_leads_the_wave() {
        let (cells, config, _) = dragged("wave", 0, 1.0);
        let snap = SnapBack::capture(&cells, 0, &config, ms(0));
        for t in [10, 100, 500, 900] {
            let near = snap.progress(0, ms(t));
            let far = snap.progress(3, ms(t));
            assert!(near > far, "t={t}: {near} <= {far}");
        }
    }

    #[test]
    fn cells_within_reach_rest_at_base() {
        let text = "x".repeat(40);
        let (mut cells, config, mut dirty) = dragged(&text, 0, 1.5);
        let snap = SnapBack::capture(&cells, 0, &config, ms(0));
        assert_eq!(snap.settle_span(0), ms(1000));
        assert_eq!(snap.settle_span(39), ms(1000 - 39 * 20));

        assert_eq!(snap.tick(ms(1000), &mut cells, &mut dirty), FrameStatus::Running);
        for cell in &cells {
            assert_eq!(cell.style, config.rest_style(), "cell {}", cell.index());
        }
    }

    #[test]
    fn cells_beyond_base_use_rest_of_window() {
        let text = "x".repeat(60);
        let (cells, config, _) = dragged(&text, 0, 1.0);
        let snap = SnapBack::capture(&cells, 0, &config, ms(0));
        // window = 1000 + 60·20, cell 59 waits 1180
        assert_eq!(snap.window(), ms(2200));
        assert_eq!(snap.settle_span(49), ms(20));
        assert_eq!(snap.settle_span(50), ms(1200));
        assert_eq!(snap.settle_span(59), ms(1020));
        assert_eq!(snap.progress(59, ms(1180)), 0.0);
        assert_eq!(snap.progress(59, ms(2200)), 1.0);
    }

    #[test]
    fn zero_cells_finish_after_base() {
        let config = StageConfig::default();
        let snap = SnapBack::capture(&[], 0, &config, ms(0));
        let mut dirty = DirtySet::default();
        assert_eq!(snap.tick(ms(999), &mut [], &mut dirty), FrameStatus::Running);
        assert_eq!(snap.tick(ms(1000), &mut [], &mut dirty), FrameStatus::Finished);
    }
}
