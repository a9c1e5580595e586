#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use stretchy_core::{Stage, StageConfig, StageEffects};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlElement, MouseEvent, Window};

use crate::clock::HostClock;
use crate::css::{GRAB_CLASS, REST_STRETCH_PROPERTY, REST_WEIGHT_PROPERTY};
use crate::error::MountError;
use crate::{STRETCHY_JS_API_VERSION, STRETCHY_JS_PUBLIC_METHODS, dom, logging, options};

type FrameCallback = Closure<dyn FnMut(f64)>;
type FrameSlot = Rc<RefCell<Option<FrameCallback>>>;
type Shared = Rc<RefCell<Inner>>;

/// State shared by the frame loop and every listener.
struct Inner {
    window: Window,
    body: HtmlElement,
    stage_el: HtmlElement,
    text_el: HtmlElement,
    spans: Vec<HtmlElement>,
    stage: Stage,
    clock: HostClock,
    pending_frame: Option<i32>,
}

impl Inner {
    /// Current time from `performance.now()`.
    fn now(&mut self) -> std::time::Duration {
        let ms = dom::performance_now(&self.window);
        self.clock.observe(ms)
    }

    /// Carry out `effects`; returns whether another frame is wanted.
    fn apply(&mut self, effects: StageEffects) -> bool {
        if effects.contains(StageEffects::SHOW_STAGE) {
            let _ = self.stage_el.style().set_property("opacity", "1");
        }
        if effects.contains(StageEffects::GRAB_ON) {
            let _ = self.body.class_list().add_1(GRAB_CLASS);
        }
        if effects.contains(StageEffects::GRAB_OFF) {
            let _ = self.body.class_list().remove_1(GRAB_CLASS);
        }
        if effects.contains(StageEffects::REDRAW) {
            self.flush();
        }
        effects.contains(StageEffects::REQUEST_FRAME)
    }

    fn flush(&mut self) {
        for index in self.stage.take_dirty() {
            let cell = self.stage.cells().get(index);
            if let (Some(span), Some(cell)) = (self.spans.get(index), cell) {
                dom::write_cell(span, &cell.style.display());
            }
        }
    }
}

fn request_frame(inner: &Shared, frame: &FrameSlot) {
    let mut state = inner.borrow_mut();
    if state.pending_frame.is_some() {
        return;
    }
    let slot = frame.borrow();
    let Some(callback) = slot.as_ref() else {
        return;
    };
    match state
        .window
        .request_animation_frame(callback.as_ref().unchecked_ref())
    {
        Ok(id) => state.pending_frame = Some(id),
        Err(err) => warn!(?err, "requestAnimationFrame failed"),
    }
}

/// Run `action` against the shared state, apply its effects and schedule a
/// frame when the stage asks for one.
fn dispatch(inner: &Shared, frame: &FrameSlot, action: impl FnOnce(&mut Inner) -> StageEffects) {
    let again = {
        let mut state = inner.borrow_mut();
        let effects = action(&mut state);
        state.apply(effects)
    };
    if again {
        request_frame(inner, frame);
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, MountError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    Ok(Listener {
        target: target.clone(),
        kind,
        callback,
    })
}

fn pointer_y(event: &Event) -> Option<f64> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|mouse| f64::from(mouse.client_y()))
}

/// A mounted text effect.
///
/// Dropping the handle (or calling `free()` from JS) tears it down like
/// [`destroy`](Self::destroy).
#[wasm_bindgen]
pub struct StretchyText {
    inner: Shared,
    frame: FrameSlot,
    listeners: Vec<Listener>,
}

impl StretchyText {
    fn mount(
        stage_selector: &str,
        text_selector: &str,
        options_json: Option<&str>,
    ) -> Result<Self, MountError> {
        let window = web_sys::window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;
        let body = document.body().ok_or(MountError::NoBody)?;

        let seed = StageConfig::default().with_custom_properties(
            dom::custom_property(&window, &body, REST_WEIGHT_PROPERTY).as_deref(),
            dom::custom_property(&window, &body, REST_STRETCH_PROPERTY).as_deref(),
        );
        let options = options::resolve(seed, options_json)?;
        logging::init(options.log_level);

        let stage_el = dom::select(&document, stage_selector)?;
        let text_el = dom::select(&document, text_selector)?;
        let text = text_el.text_content().unwrap_or_default();

        let mut stage = Stage::new(&text, options.config);
        let spans = dom::render_cells(&document, &text_el, stage.cells())?;
        let _ = text_el.style().set_property("touch-action", "none");
        stage.resize(f64::from(text_el.offset_height()));
        debug!(
            cells = stage.len(),
            height = stage.container_height(),
            "mounted"
        );

        let inner: Shared = Rc::new(RefCell::new(Inner {
            window: window.clone(),
            body: body.clone(),
            stage_el,
            text_el: text_el.clone(),
            spans,
            stage,
            clock: HostClock::new(),
            pending_frame: None,
        }));

        let frame: FrameSlot = Rc::new(RefCell::new(None));
        {
            let inner = Rc::clone(&inner);
            // Self-reference; broken in `teardown`.
            let again_slot = Rc::clone(&frame);
            *frame.borrow_mut() = Some(FrameCallback::new(move |timestamp: f64| {
                let again = {
                    let mut state = inner.borrow_mut();
                    state.pending_frame = None;
                    let now = state.clock.observe(timestamp);
                    let effects = state.stage.tick(now);
                    state.apply(effects)
                };
                if again {
                    request_frame(&inner, &again_slot);
                }
            }));
        }

        let mut handle = Self {
            inner,
            frame,
            listeners: Vec::with_capacity(6),
        };
        handle.install_listeners(&window, &body, &text_el)?;

        dispatch(&handle.inner, &handle.frame, |state| {
            let now = state.now();
            state.stage.start(now)
        });
        Ok(handle)
    }

    fn install_listeners(
        &mut self,
        window: &Window,
        body: &HtmlElement,
        text_el: &HtmlElement,
    ) -> Result<(), MountError> {
        let body_target: &EventTarget = body.as_ref();

        let (inner, frame) = (Rc::clone(&self.inner), Rc::clone(&self.frame));
        self.listeners.push(listen(text_el.as_ref(), "pointerdown", move |event| {
            let (Some(index), Some(y)) = (dom::cell_index(&event), pointer_y(&event)) else {
                return;
            };
            dispatch(&inner, &frame, |state| {
                let effects = state.stage.press(index, y);
                if !effects.is_empty() {
                    // Keep the browser from starting a text selection.
                    event.prevent_default();
                }
                effects
            });
        })?);

        let (inner, frame) = (Rc::clone(&self.inner), Rc::clone(&self.frame));
        self.listeners.push(listen(body_target, "pointermove", move |event| {
            let Some(y) = pointer_y(&event) else {
                return;
            };
            dispatch(&inner, &frame, |state| state.stage.pointer_move(y));
        })?);

        for kind in ["pointerup", "pointercancel"] {
            let (inner, frame) = (Rc::clone(&self.inner), Rc::clone(&self.frame));
            self.listeners.push(listen(body_target, kind, move |_event| {
                dispatch(&inner, &frame, |state| {
                    let now = state.now();
                    state.stage.release(now)
                });
            })?);
        }

        let (inner, frame) = (Rc::clone(&self.inner), Rc::clone(&self.frame));
        self.listeners.push(listen(body_target, "pointerleave", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = (f64::from(mouse.client_x()), f64::from(mouse.client_y()));
            dispatch(&inner, &frame, |state| {
                let viewport = dom::viewport(&state.window);
                let now = state.now();
                state.stage.leave(x, y, viewport, now)
            });
        })?);

        let inner = Rc::clone(&self.inner);
        self.listeners.push(listen(window.as_ref(), "resize", move |_event| {
            let mut state = inner.borrow_mut();
            let height = f64::from(state.text_el.offset_height());
            state.stage.resize(height);
        })?);

        Ok(())
    }

    fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        if let Ok(mut state) = self.inner.try_borrow_mut() {
            if let Some(id) = state.pending_frame.take() {
                let _ = state.window.cancel_animation_frame(id);
            }
            state.stage.cancel_animations();
            let _ = state.body.class_list().remove_1(GRAB_CLASS);
        }
        if let Ok(mut slot) = self.frame.try_borrow_mut() {
            slot.take();
        }
    }
}

#[wasm_bindgen]
impl StretchyText {
    /// Remove every listener, cancel the pending frame and stop running
    /// animations. Cells keep their last written style. Idempotent.
    pub fn destroy(&mut self) {
        if !self.listeners.is_empty() {
            debug!("destroy");
        }
        self.teardown();
    }

    /// JSON snapshot of the stage (phase, drag state, displayed cells).
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let snapshot = self.inner.borrow().stage.snapshot();
        serde_json::to_string(&snapshot).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    #[wasm_bindgen(js_name = cellCount)]
    pub fn cell_count(&self) -> usize {
        self.inner.borrow().stage.len()
    }

    /// Whether pointer input is being processed.
    #[wasm_bindgen(js_name = isArmed)]
    pub fn is_armed(&self) -> bool {
        self.inner.borrow().stage.is_armed()
    }
}

impl Drop for StretchyText {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Split the element matching `text_selector` into animated characters and
/// start the entrance. `stage_selector` is made visible when it begins.
///
/// `options_json` may override any configuration field; see the crate docs.
#[wasm_bindgen]
pub fn mount(
    stage_selector: &str,
    text_selector: &str,
    options_json: Option<String>,
) -> Result<StretchyText, JsValue> {
    StretchyText::mount(stage_selector, text_selector, options_json.as_deref()).map_err(|err| {
        warn!(%err, "mount failed");
        JsValue::from(err)
    })
}

/// Stable JS API semver for host-side compatibility checks.
#[wasm_bindgen(js_name = apiVersion)]
pub fn api_version() -> String {
    STRETCHY_JS_API_VERSION.to_owned()
}

/// `{ apiVersion, packageName, packageVersion, methods }`.
#[wasm_bindgen(js_name = apiContract)]
pub fn api_contract() -> JsValue {
    let obj = Object::new();
    let _ = Reflect::set(
        &obj,
        &JsValue::from_str("apiVersion"),
        &JsValue::from_str(STRETCHY_JS_API_VERSION),
    );
    let _ = Reflect::set(
        &obj,
        &JsValue::from_str("packageName"),
        &JsValue::from_str(env!("CARGO_PKG_NAME")),
    );
    let _ = Reflect::set(
        &obj,
        &JsValue::from_str("packageVersion"),
        &JsValue::from_str(env!("CARGO_PKG_VERSION")),
    );
    let methods = STRETCHY_JS_PUBLIC_METHODS
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect::<Array>();
    let _ = Reflect::set(&obj, &JsValue::from_str("methods"), &methods);
    obj.into()
}
