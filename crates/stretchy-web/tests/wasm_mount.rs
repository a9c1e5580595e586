#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use js_sys::Promise;
use serde_json::Value;
use stretchy_web::{StretchyText, api_version, mount};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, Event, EventTarget, HtmlElement, PointerEvent, PointerEventInit};

/// Arms on the first frame and finishes the entrance almost at once.
const FAST_ENTRANCE: &str = r#"{
    "entranceBaseDelayMs": 0,
    "entranceStaggerMs": 0,
    "entranceDurationMs": 1,
    "logLevel": "off"
}"#;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("browser document")
}

fn fixture(text: &str) {
    let body = document().body().expect("body");
    body.set_inner_html(&format!(
        r#"<div class="stage" style="opacity:0"><h1 class="txt">{text}</h1></div>"#
    ));
}

fn element(selector: &str) -> HtmlElement {
    document()
        .query_selector(selector)
        .expect("valid selector")
        .expect("element exists")
        .dyn_into::<HtmlElement>()
        .expect("html element")
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        let _ = web_sys::window()
            .expect("window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
    });
    JsFuture::from(promise).await.expect("timer resolves");
}

fn pointer(target: &EventTarget, kind: &str, y: i32) {
    let init = PointerEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    init.set_client_x(100);
    init.set_client_y(y);
    let event = PointerEvent::new_with_event_init_dict(kind, &init).expect("pointer event");
    target.dispatch_event(&event).expect("dispatch");
}

fn snapshot(handle: &StretchyText) -> Value {
    let json = handle.snapshot_json().expect("snapshot");
    serde_json::from_str(&json).expect("snapshot is JSON")
}

fn has_grab_class() -> bool {
    document().body().expect("body").class_list().contains("grab")
}

async fn armed(text: &str) -> StretchyText {
    fixture(text);
    let handle = mount(".stage", ".txt", Some(FAST_ENTRANCE.to_owned())).expect("mount");
    sleep(100).await;
    assert!(handle.is_armed(), "armed after the first frames");
    handle
}

#[wasm_bindgen_test]
fn mount_splits_text_into_spans() {
    fixture("hi there");
    let handle = mount(".stage", ".txt", None).expect("mount");

    assert_eq!(handle.cell_count(), 8);
    assert_eq!(element(".txt").child_element_count(), 8);

    let space = element(".char[data-index='2']");
    assert_eq!(space.text_content().as_deref(), Some("\u{00A0}"));
    assert_eq!(element(".stage").style().get_property_value("opacity").ok().as_deref(), Some("1"));
    assert!(!handle.is_armed());
}

#[wasm_bindgen_test]
fn entrance_starts_offscreen() {
    fixture("ok");
    let handle = mount(".stage", ".txt", Some(r#"{"logLevel":"off"}"#.to_owned())).expect("mount");

    let transform = element(".char[data-index='0']")
        .style()
        .get_property_value("transform")
        .expect("style read");
    assert!(transform.starts_with("translateY(-"), "{transform}");

    let snapshot = handle.snapshot_json().expect("snapshot");
    assert!(snapshot.contains(r#""phase":"entering""#), "{snapshot}");
}

#[wasm_bindgen_test]
fn missing_selector_is_an_error() {
    fixture("x");
    let err = mount(".stage", ".nope", None).err().expect("mount should fail");
    assert_eq!(err.as_string().as_deref(), Some("no element matches \".nope\""));
}

#[wasm_bindgen_test]
fn bad_options_are_rejected() {
    fixture("x");
    assert!(mount(".stage", ".txt", Some("[]".to_owned())).is_err());
    assert!(mount(".stage", ".txt", Some(r#"{"maxYScale":1}"#.to_owned())).is_err());
}

#[wasm_bindgen_test]
fn destroy_is_idempotent() {
    fixture("abc");
    let mut handle = mount(".stage", ".txt", None).expect("mount");
    handle.destroy();
    handle.destroy();
    assert_eq!(handle.cell_count(), 3);
}

#[wasm_bindgen_test]
fn api_version_is_semver() {
    assert_eq!(api_version().split('.').count(), 3);
}

#[wasm_bindgen_test]
async fn press_drag_release_drives_the_dom() {
    let handle = armed("drag").await;
    let span = element(".char[data-index='1']");
    let body = document().body().expect("body");
    let rest_transform = span.style().get_property_value("transform").expect("style read");

    pointer(span.as_ref(), "pointerdown", 300);
    assert!(has_grab_class());
    let state = snapshot(&handle);
    assert_eq!(state["pressed"], Value::Bool(true));
    assert_eq!(state["selected"], Value::from(1));

    pointer(body.as_ref(), "pointermove", 200);
    let dragged = span.style().get_property_value("transform").expect("style read");
    assert_ne!(dragged, rest_transform);
    assert!(dragged.starts_with("translateY(-"), "{dragged}");

    pointer(body.as_ref(), "pointerup", 200);
    assert!(!has_grab_class());
    let state = snapshot(&handle);
    assert_eq!(state["pressed"], Value::Bool(false));
    assert_eq!(state["snapBackRunning"], Value::Bool(true));
}

#[wasm_bindgen_test]
async fn pointercancel_releases_the_grab() {
    let handle = armed("touch").await;
    let span = element(".char[data-index='2']");
    let body = document().body().expect("body");

    pointer(span.as_ref(), "pointerdown", 300);
    assert!(has_grab_class());
    pointer(body.as_ref(), "pointercancel", 300);
    assert!(!has_grab_class());
    assert_eq!(snapshot(&handle)["pressed"], Value::Bool(false));
}

#[wasm_bindgen_test]
fn press_before_arming_is_ignored() {
    fixture("slow");
    let options = Some(r#"{"logLevel":"off"}"#.to_owned());
    let handle = mount(".stage", ".txt", options).expect("mount");
    pointer(element(".char[data-index='0']").as_ref(), "pointerdown", 300);
    assert!(!has_grab_class());
    assert_eq!(snapshot(&handle)["pressed"], Value::Bool(false));
}

#[wasm_bindgen_test]
async fn resize_remeasures_text_height() {
    let handle = armed("tall").await;
    let text = element(".txt");
    text.style().set_property("font-size", "200px").expect("style write");
    let window = web_sys::window().expect("window");
    let resize = Event::new("resize").expect("resize event");
    window.dispatch_event(&resize).expect("dispatch");

    let height = snapshot(&handle)["containerHeight"].as_f64().expect("height");
    assert_eq!(height, f64::from(text.offset_height()));
    assert!(height >= 200.0, "{height}");
}
