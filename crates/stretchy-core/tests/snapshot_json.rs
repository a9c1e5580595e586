//! JSON shape of configuration and snapshots (requires the `serde` feature).
#![cfg(feature = "serde")]

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use stretchy_core::{Stage, StageConfig};

#[test]
fn config_accepts_partial_camel_case() {
    let config: StageConfig =
        serde_json::from_value(json!({ "restWeight": 700, "snapBackStaggerMs": 10 }))
            .expect("valid config");
    assert_eq!(config.rest_weight, 700.0);
    assert_eq!(config.snap_back_stagger_ms, 10.0);
    assert_eq!(config.target_weight, StageConfig::default().target_weight);
}

#[test]
fn config_rejects_unknown_fields() {
    let err = serde_json::from_value::<StageConfig>(json!({ "restWieght": 700 }))
        .expect_err("typo must be rejected");
    assert!(err.to_string().contains("restWieght"));
}

#[test]
fn snapshot_serialises_camel_case() {
    let mut stage = Stage::new("ok", StageConfig::default());
    stage.resize(10.0);
    stage.start(Duration::ZERO);
    let value = serde_json::to_value(stage.snapshot()).expect("snapshot serialises");
    assert_eq!(value["phase"], json!("entering"));
    assert_eq!(value["armed"], json!(false));
    assert_eq!(value["entranceRunning"], json!(true));
    assert_eq!(
        value["cells"][0],
        json!({
            "index": 0,
            "glyph": "o",
            "style": { "offsetY": -510.0, "scaleY": 2.0, "weight": 400, "stretch": 80 }
        })
    );
}
