#![forbid(unsafe_code)]

//! `stretchy-web` binds the Stretchy model to a browser document.
//!
//! Design goals:
//! - **Model in Rust, DOM at the edge**: every decision is made by
//!   [`stretchy_core::Stage`]; this crate only reads the document, forwards
//!   pointer events and frame timestamps, and writes the styles of cells the
//!   stage reports dirty.
//! - **Single-threaded**: listeners and the `requestAnimationFrame` loop share
//!   one `Rc<RefCell<_>>`; each callback borrows it for one event.
//! - **Clean teardown**: `destroy()` removes every listener and cancels the
//!   pending frame.
//!
//! The DOM-facing modules only exist on `wasm32`; option parsing, CSS value
//! formatting and the host clock are platform-independent and tested natively.

pub mod clock;
pub mod css;
pub mod error;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{StretchyText, api_contract, api_version, mount};

/// Semver of the JS-facing API, independent of the crate version.
pub const STRETCHY_JS_API_VERSION: &str = "1.0.0";

/// Methods exposed on the `StretchyText` handle.
pub const STRETCHY_JS_PUBLIC_METHODS: &[&str] =
    &["destroy", "snapshotJson", "cellCount", "isArmed"];
