#![forbid(unsafe_code)]

//! Thin DOM helpers used by the wasm frontend.

use stretchy_core::drag::Viewport;
use stretchy_core::{Cell, DisplayStyle};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Window};

use crate::css::{self, CHAR_CLASS, CHAR_SELECTOR, CellCss, INDEX_ATTR};
use crate::error::MountError;

/// First element matching `selector`, as an [`HtmlElement`].
pub(crate) fn select(document: &Document, selector: &str) -> Result<HtmlElement, MountError> {
    let element = document
        .query_selector(selector)?
        .ok_or_else(|| MountError::MissingElement {
            selector: selector.to_owned(),
        })?;
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| MountError::NotHtmlElement {
            selector: selector.to_owned(),
        })
}

/// Computed value of a custom property, or `None` when unset or blank.
pub(crate) fn custom_property(window: &Window, element: &Element, name: &str) -> Option<String> {
    let style = window.get_computed_style(element).ok().flatten()?;
    style
        .get_property_value(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Replace the content of `text` with one span per cell.
pub(crate) fn render_cells(
    document: &Document,
    text: &HtmlElement,
    cells: &[Cell],
) -> Result<Vec<HtmlElement>, MountError> {
    text.set_text_content(None);
    let mut spans = Vec::with_capacity(cells.len());
    for cell in cells {
        let span = document
            .create_element("span")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| MountError::Js("created span is not an HtmlElement".to_owned()))?;
        span.set_class_name(CHAR_CLASS);
        span.set_attribute(INDEX_ATTR, &cell.index().to_string())?;
        span.set_text_content(Some(cell.glyph()));
        text.append_child(&span)?;
        spans.push(span);
    }
    Ok(spans)
}

/// Write one cell's style.
pub(crate) fn write_cell(span: &HtmlElement, style: &DisplayStyle) {
    let css = CellCss::from(style);
    let decl = span.style();
    let _ = decl.set_property("transform", &css.transform);
    let _ = decl.set_property("font-weight", &css.font_weight);
    let _ = decl.set_property("font-stretch", &css.font_stretch);
}

/// Cell index of the span an event targeted, if any.
pub(crate) fn cell_index(event: &Event) -> Option<usize> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let cell = target.closest(CHAR_SELECTOR).ok().flatten()?;
    css::parse_index(&cell.get_attribute(INDEX_ATTR)?)
}

pub(crate) fn viewport(window: &Window) -> Viewport {
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(
        dimension(window.inner_width()),
        dimension(window.inner_height()),
    )
}

/// `performance.now()` in milliseconds; zero when unavailable.
pub(crate) fn performance_now(window: &Window) -> f64 {
    window.performance().map_or(0.0, |perf| perf.now())
}
