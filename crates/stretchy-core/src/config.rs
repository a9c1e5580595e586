#![forbid(unsafe_code)]

//! Stage configuration.
//!
//! All timing fields are milliseconds. Rest weight and stretch are normally
//! seeded from the host document (see [`StageConfig::with_custom_properties`]);
//! every other field has a fixed default.

use std::time::Duration;

use crate::cell::CellStyle;
use crate::easing::{ENTRANCE_ELASTIC_PERIOD, SNAP_BACK_ELASTIC_PERIOD};

/// Rest weight when the host does not provide a usable value.
pub const DEFAULT_REST_WEIGHT: f64 = 600.0;
/// Rest stretch (percent) when the host does not provide a usable value.
pub const DEFAULT_REST_STRETCH: f64 = 150.0;

/// Tunables for one stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct StageConfig {
    /// Font weight at rest.
    pub rest_weight: f64,
    /// Font stretch (%) at rest.
    pub rest_stretch: f64,
    /// Weight reached at full positive dispersion (100–800).
    pub target_weight: f64,
    /// Stretch reached at full positive dispersion (10–200).
    pub target_stretch: f64,
    /// Upper bound on vertical scale; drag scale saturates at `max_y_scale - 1`.
    pub max_y_scale: f64,
    /// Fraction of the cell count over which dispersion falls to zero.
    pub elastic_drop_off: f64,
    /// Vertical lift in px at dispersion `1.0`.
    pub lift_px: f64,
    /// Floor for the deformed vertical scale.
    pub min_scale_y: f64,
    /// Extra px above the container the entrance starts from.
    pub entrance_margin_px: f64,
    /// Vertical scale cells start the entrance with.
    pub entrance_scale_y: f64,
    pub entrance_duration_ms: f64,
    /// Delay before the first cell starts its entrance.
    pub entrance_base_delay_ms: f64,
    /// Added per cell index to the entrance delay.
    pub entrance_stagger_ms: f64,
    pub entrance_elastic_period: f64,
    /// Snap-back window before stagger is added.
    pub snap_back_base_ms: f64,
    /// Snap-back delay per cell of distance from the grabbed cell.
    pub snap_back_stagger_ms: f64,
    pub snap_back_elastic_period: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            rest_weight: DEFAULT_REST_WEIGHT,
            rest_stretch: DEFAULT_REST_STRETCH,
            target_weight: 400.0,
            target_stretch: 80.0,
            max_y_scale: 2.5,
            elastic_drop_off: 0.8,
            lift_px: 50.0,
            min_scale_y: 0.5,
            entrance_margin_px: 500.0,
            entrance_scale_y: 2.0,
            entrance_duration_ms: 1500.0,
            entrance_base_delay_ms: 500.0,
            entrance_stagger_ms: 50.0,
            entrance_elastic_period: ENTRANCE_ELASTIC_PERIOD,
            snap_back_base_ms: 1000.0,
            snap_back_stagger_ms: 20.0,
            snap_back_elastic_period: SNAP_BACK_ELASTIC_PERIOD,
        }
    }
}

impl StageConfig {
    /// Seed rest weight and stretch from host custom property values
    /// (`--fw`, `--fs`). Missing or unparseable values keep the current ones.
    #[must_use]
    pub fn with_custom_properties(mut self, weight: Option<&str>, stretch: Option<&str>) -> Self {
        if let Some(w) = weight.and_then(parse_css_number) {
            self.rest_weight = w;
        }
        if let Some(s) = stretch.and_then(parse_css_number) {
            self.rest_stretch = s;
        }
        self
    }

    /// Resting style every animation returns to.
    #[must_use]
    pub const fn rest_style(&self) -> CellStyle {
        CellStyle::rest(self.rest_weight, self.rest_stretch)
    }

    /// Upper bound of the drag scale.
    #[must_use]
    pub fn max_drag_scale(&self) -> f64 {
        self.max_y_scale - 1.0
    }

    #[must_use]
    pub fn entrance_duration(&self) -> Duration {
        millis(self.entrance_duration_ms)
    }

    #[must_use]
    pub fn entrance_base_delay(&self) -> Duration {
        millis(self.entrance_base_delay_ms)
    }

    #[must_use]
    pub fn entrance_stagger(&self) -> Duration {
        millis(self.entrance_stagger_ms)
    }

    #[must_use]
    pub fn snap_back_base(&self) -> Duration {
        millis(self.snap_back_base_ms)
    }

    #[must_use]
    pub fn snap_back_stagger(&self) -> Duration {
        millis(self.snap_back_stagger_ms)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("restWeight", self.rest_weight),
            ("restStretch", self.rest_stretch),
            ("targetWeight", self.target_weight),
            ("targetStretch", self.target_stretch),
            ("maxYScale", self.max_y_scale),
            ("elasticDropOff", self.elastic_drop_off),
            ("liftPx", self.lift_px),
            ("minScaleY", self.min_scale_y),
            ("entranceMarginPx", self.entrance_margin_px),
            ("entranceScaleY", self.entrance_scale_y),
            ("entranceDurationMs", self.entrance_duration_ms),
            ("entranceBaseDelayMs", self.entrance_base_delay_ms),
            ("entranceStaggerMs", self.entrance_stagger_ms),
            ("entranceElasticPeriod", self.entrance_elastic_period),
            ("snapBackBaseMs", self.snap_back_base_ms),
            ("snapBackStaggerMs", self.snap_back_stagger_ms),
            ("snapBackElasticPeriod", self.snap_back_elastic_period),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        if self.max_y_scale <= 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "maxYScale",
                reason: "must be greater than 1",
            });
        }
        if self.elastic_drop_off <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "elasticDropOff",
                reason: "must be positive",
            });
        }
        let positive = [
            ("entranceDurationMs", self.entrance_duration_ms),
            ("snapBackBaseMs", self.snap_back_base_ms),
            ("entranceElasticPeriod", self.entrance_elastic_period),
            ("snapBackElasticPeriod", self.snap_back_elastic_period),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    reason: "must be positive",
                });
            }
        }
        let non_negative = [
            ("entranceBaseDelayMs", self.entrance_base_delay_ms),
            ("entranceStaggerMs", self.entrance_stagger_ms),
            ("snapBackStaggerMs", self.snap_back_stagger_ms),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    reason: "must not be negative",
                });
            }
        }
        Ok(())
    }
}

/// Configuration error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field is NaN or infinite.
    NotFinite { field: &'static str },
    /// A field is outside its usable range.
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFinite { field } => write!(f, "{field}: not a finite number"),
            Self::OutOfRange { field, reason } => write!(f, "{field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a numeric CSS value such as `600`, ` 150 ` or `150%`.
#[must_use]
pub fn parse_css_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = StageConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_drag_scale(), 1.5);
        assert_eq!(config.entrance_base_delay(), Duration::from_millis(500));
        assert_eq!(config.snap_back_stagger(), Duration::from_millis(20));
    }

    #[test]
    fn parse_css_number_variants() {
        assert_eq!(parse_css_number("600"), Some(600.0));
        assert_eq!(parse_css_number("  150 "), Some(150.0));
        assert_eq!(parse_css_number("150%"), Some(150.0));
        assert_eq!(parse_css_number("72.5 %"), Some(72.5));
        assert_eq!(parse_css_number(""), None);
        assert_eq!(parse_css_number("bold"), None);
        assert_eq!(parse_css_number("inf"), None);
    }

    #[test]
    fn custom_properties_fall_back() {
        let config = StageConfig::default().with_custom_properties(Some("700"), Some("oops"));
        assert_eq!(config.rest_weight, 700.0);
        assert_eq!(config.rest_stretch, DEFAULT_REST_STRETCH);

        let config = StageConfig::default().with_custom_properties(None, None);
        assert_eq!(config.rest_style(), CellStyle::rest(600.0, 150.0));
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let config = StageConfig {
            max_y_scale: 1.0,
            ..StageConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "maxYScale",
                ..
            })
        ));

        let config = StageConfig {
            lift_px: f64::NAN,
            ..StageConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "liftPx" })
        );

        let config = StageConfig {
            snap_back_stagger_ms: -1.0,
            ..StageConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn error_display_names_field() {
        let err = ConfigError::OutOfRange {
            field: "elasticDropOff",
            reason: "must be positive",
        };
        assert_eq!(err.to_string(), "elasticDropOff: must be positive");
    }

    #[test]
    fn negative_millis_are_zero() {
        assert_eq!(millis(-5.0), Duration::ZERO);
        assert_eq!(millis(f64::NAN), Duration::ZERO);
    }
}
