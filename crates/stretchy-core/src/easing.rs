#![forbid(unsafe_code)]

//! Progress curves mapping linear time `t ∈ [0, 1]` to eased progress.
//!
//! # Invariants
//!
//! 1. Every curve returns exactly `0.0` at `t <= 0` and exactly `1.0` at
//!    `t >= 1`, so a finished animation lands on its target with no residue.
//! 2. Inputs are clamped to `[0, 1]`; NaN is treated as `0`.
//! 3. [`Easing::Elastic`] overshoots `1.0` and oscillates before settling.

use std::f64::consts::TAU;

/// Elastic period used by the entrance reveal.
pub const ENTRANCE_ELASTIC_PERIOD: f64 = 0.3;

/// Elastic period used by the snap-back wave. Looser than the entrance.
pub const SNAP_BACK_ELASTIC_PERIOD: f64 = 0.35;

/// Selectable easing mode for a [`Tween`](crate::tween::Tween).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// `2^(-10t) · sin((t - p/4) · 2π / p) + 1`.
    Elastic {
        /// Oscillation period `p`. Non-positive periods fall back to
        /// [`ENTRANCE_ELASTIC_PERIOD`].
        period: f64,
    },
    /// `1 - (1 - t)^3`.
    #[default]
    EaseOutCubic,
}

impl Easing {
    /// Elastic easing with the given period.
    #[must_use]
    pub const fn elastic(period: f64) -> Self {
        Self::Elastic { period }
    }

    /// Evaluate the curve at `t`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Elastic { period } => elastic_out(t, period),
            Self::EaseOutCubic => ease_out_cubic(t),
        }
    }

    /// Whether the curve can exceed `1.0` before settling.
    #[must_use]
    pub const fn can_overshoot(self) -> bool {
        matches!(self, Self::Elastic { .. })
    }
}

/// Raw elastic-out curve, unclamped.
#[must_use]
pub fn elastic_out(t: f64, period: f64) -> f64 {
    let p = if period > 0.0 && period.is_finite() {
        period
    } else {
        ENTRANCE_ELASTIC_PERIOD
    };
    2f64.powf(-10.0 * t) * ((t - p / 4.0) * TAU / p).sin() + 1.0
}

/// Raw cubic ease-out curve, unclamped.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
