#![forbid(unsafe_code)]

//! Core: the deterministic model behind the Stretchy text effect.
//!
//! # Role in Stretchy
//! `stretchy-core` owns everything that is not DOM plumbing: splitting text
//! into cells, easing curves, the per-cell frame animator, the staged
//! entrance, the drag-to-deform mapping and the staggered elastic snap-back.
//! Time is pushed in by the host as a monotonic [`Duration`](std::time::Duration)
//! so every behavior can be replayed exactly in tests.
//!
//! # Primary responsibilities
//! - **[`Stage`](stage::Stage)**: the controller owning cells, interaction
//!   state and the running animation tasks.
//! - **[`Tween`](tween::Tween)** / **[`FrameAnimator`](tween::FrameAnimator)**:
//!   eased interpolation between two [`CellStyle`](cell::CellStyle)s.
//! - **[`EntranceSession`](entrance::EntranceSession)**: left-to-right reveal
//!   followed by arming of pointer input.
//! - **[`drag`]**: drag scale, dispersion and deformation mapping.
//! - **[`SnapBack`](snap_back::SnapBack)**: wave back to rest on release.
//!
//! # How it fits in the system
//! `stretchy-web` reads the host document, forwards pointer events and
//! animation-frame timestamps into a [`Stage`](stage::Stage), then writes the
//! cells reported dirty back to the DOM.

pub mod cell;
pub mod config;
pub mod drag;
pub mod easing;
pub mod entrance;
pub mod snap_back;
pub mod split;
pub mod stage;
pub mod task;
pub mod tween;

pub use cell::{Cell, CellStyle, DirtySet, DisplayStyle};
pub use config::{ConfigError, StageConfig};
pub use easing::Easing;
pub use stage::{Phase, Stage, StageEffects, StageSnapshot};
