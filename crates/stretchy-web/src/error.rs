#![forbid(unsafe_code)]

//! Errors raised while mounting onto a document.

use crate::options::OptionsError;

/// Mount error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// No global `window` (not running in a browser main thread).
    NoWindow,
    NoDocument,
    NoBody,
    /// A selector matched nothing.
    MissingElement { selector: String },
    /// A selector matched a non-HTML element (e.g. SVG).
    NotHtmlElement { selector: String },
    Options(OptionsError),
    /// A DOM call threw.
    Js(String),
}

impl core::fmt::Display for MountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoWindow => f.write_str("no global window"),
            Self::NoDocument => f.write_str("window has no document"),
            Self::NoBody => f.write_str("document has no body"),
            Self::MissingElement { selector } => write!(f, "no element matches {selector:?}"),
            Self::NotHtmlElement { selector } => {
                write!(f, "element matching {selector:?} is not an HTML element")
            }
            Self::Options(err) => core::fmt::Display::fmt(err, f),
            Self::Js(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Options(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OptionsError> for MountError {
    fn from(err: OptionsError) -> Self {
        Self::Options(err)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for MountError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<MountError> for wasm_bindgen::JsValue {
    fn from(err: MountError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
