#![forbid(unsafe_code)]

//! Frame animator: eased interpolation of a cell style over time.
//!
//! A [`Tween`] is the pure description (from, to, duration, easing);
//! [`FrameAnimator`] binds it to a start timestamp and is stepped once per
//! display frame by its owning session.
//!
//! # Invariants
//!
//! 1. `t = min(elapsed / duration, 1)`; a zero duration is complete at once.
//! 2. The frame where `t` reaches `1` writes exactly the target and reports
//!    [`FrameStatus::Finished`]; the animator is not stepped afterwards.
//! 3. Timestamps earlier than the start are treated as elapsed `0`.

use std::time::Duration;

use crate::cell::CellStyle;
use crate::easing::Easing;

/// Whether an animation wants more frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    Finished,
}

impl FrameStatus {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Interpolation between two styles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: CellStyle,
    pub to: CellStyle,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    #[must_use]
    pub const fn new(from: CellStyle, to: CellStyle, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
        }
    }

    /// Linear progress at `elapsed`, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Style at `elapsed`.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> CellStyle {
        let eased = self.easing.apply(self.progress(elapsed));
        self.from.lerp(self.to, eased)
    }
}

/// A tween bound to its start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAnimator {
    tween: Tween,
    started_at: Duration,
}

impl FrameAnimator {
    #[must_use]
    pub const fn start(tween: Tween, now: Duration) -> Self {
        Self {
            tween,
            started_at: now,
        }
    }

    #[must_use]
    pub const fn tween(&self) -> &Tween {
        &self.tween
    }

    /// Write the style for `now` into `style`.
    pub fn step(&self, now: Duration, style: &mut CellStyle) -> FrameStatus {
        let elapsed = now.saturating_sub(self.started_at);
        *style = self.tween.sample(elapsed);
        if self.tween.progress(elapsed) >= 1.0 {
            FrameStatus::Finished
        } else {
            FrameStatus::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::ENTRANCE_ELASTIC_PERIOD;

    const FROM: CellStyle = CellStyle::new(-600.0, 2.0, 400.0, 80.0);
    const TO: CellStyle = CellStyle::rest(600.0, 150.0);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn ease_out_cubic_halfway() {
        let tween = Tween::new(FROM, TO, ms(1000), Easing::EaseOutCubic);
        let mid = tween.sample(ms(500));
        assert!((mid.weight - (400.0 + 200.0 * 0.875)).abs() < 1e-9);
        assert!((mid.offset_y - (-600.0 + 600.0 * 0.875)).abs() < 1e-9);
    }

    #[test]
    fn animator_finishes_on_target() {
        let anim = FrameAnimator::start(
            Tween::new(FROM, TO, ms(1500), Easing::elastic(ENTRANCE_ELASTIC_PERIOD)),
            ms(100),
        );
        let mut style = FROM;
        assert_eq!(anim.step(ms(100), &mut style), FrameStatus::Running);
        assert_eq!(style, FROM);
        assert_eq!(anim.step(ms(900), &mut style), FrameStatus::Running);
        assert_eq!(anim.step(ms(1600), &mut style), FrameStatus::Finished);
        assert_eq!(style, TO);
        assert_eq!(style.display().weight, 600);
    }

    #[test]
    fn timestamp_before_start_is_zero_elapsed() {
        let anim =
            FrameAnimator::start(Tween::new(FROM, TO, ms(100), Easing::EaseOutCubic), ms(50));
        let mut style = TO;
        assert_eq!(anim.step(ms(10), &mut style), FrameStatus::Running);
        assert_eq!(style, FROM);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let anim = FrameAnimator::start(
            Tween::new(FROM, TO, Duration::ZERO, Easing::EaseOutCubic),
            ms(0),
        );
        let mut style = FROM;
        assert!(anim.step(ms(0), &mut style).is_finished());
        assert_eq!(style, TO);
    }

    #[test]
    fn elastic_overshoots_target_mid_flight() {
        let tween = Tween::new(FROM, TO, ms(1500), Easing::elastic(ENTRANCE_ELASTIC_PERIOD));
        let overshoot = (1..150)
            .map(|i| tween.sample(ms(i * 10)).offset_y)
            .any(|y| y > 0.0);
        assert!(overshoot, "elastic entrance should pass below rest");
    }
}
