#![forbid(unsafe_code)]

//! Character cells and their typed presentation state.
//!
//! A [`Cell`] is one animatable unit. Its [`CellStyle`] holds full-precision
//! values; [`DisplayStyle`] is what gets written to the host, with weight and
//! stretch rounded to whole font-variation units.

/// Full-precision style of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CellStyle {
    /// Vertical offset in px (negative is up).
    pub offset_y: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Font weight (nominal range 100–800).
    pub weight: f64,
    /// Font stretch in percent (nominal range 10–200).
    pub stretch: f64,
}

impl CellStyle {
    #[must_use]
    pub const fn new(offset_y: f64, scale_y: f64, weight: f64, stretch: f64) -> Self {
        Self {
            offset_y,
            scale_y,
            weight,
            stretch,
        }
    }

    /// Resting style: no offset, unit scale, the given weight and stretch.
    #[must_use]
    pub const fn rest(weight: f64, stretch: f64) -> Self {
        Self::new(0.0, 1.0, weight, stretch)
    }

    /// Linear blend from `self` (at `f = 0`) to `to` (at `f = 1`) on all
    /// four channels. Both endpoints are reproduced exactly.
    ///
    /// `f` is not clamped; elastic curves rely on values above `1.0`.
    #[must_use]
    pub fn lerp(self, to: Self, f: f64) -> Self {
        let mix = |a: f64, b: f64| a * (1.0 - f) + b * f;
        Self {
            offset_y: mix(self.offset_y, to.offset_y),
            scale_y: mix(self.scale_y, to.scale_y),
            weight: mix(self.weight, to.weight),
            stretch: mix(self.stretch, to.stretch),
        }
    }

    /// Values as written to the host.
    #[must_use]
    pub fn display(self) -> DisplayStyle {
        DisplayStyle {
            offset_y: self.offset_y,
            scale_y: self.scale_y,
            weight: round_axis(self.weight),
            stretch: round_axis(self.stretch),
        }
    }
}

/// Style with integer font-variation axes, ready to write.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DisplayStyle {
    pub offset_y: f64,
    pub scale_y: f64,
    pub weight: i32,
    pub stretch: i32,
}

fn round_axis(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    // Half-up to match how the platform rounds font-variation values.
    (value + 0.5).floor() as i32
}

/// One character of the split text.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    index: usize,
    glyph: String,
    /// Current presentation state, mutated by every animation step.
    pub style: CellStyle,
}

impl Cell {
    #[must_use]
    pub fn new(index: usize, glyph: impl Into<String>, style: CellStyle) -> Self {
        Self {
            index,
            glyph: glyph.into(),
            style,
        }
    }

    /// Stable position within the sequence.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Displayed text of this cell (a single grapheme).
    #[must_use]
    pub fn glyph(&self) -> &str {
        &self.glyph
    }
}

/// Tracks which cells changed since the host last flushed.
#[derive(Debug, Clone, Default)]
pub struct DirtySet {
    flags: Vec<bool>,
    count: usize,
}

impl DirtySet {
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            flags: vec![false; len],
            count: 0,
        }
    }

    /// Mark one cell; out-of-range indices are ignored.
    pub fn mark(&mut self, index: usize) {
        if let Some(flag) = self.flags.get_mut(index)
            && !*flag
        {
            *flag = true;
            self.count += 1;
        }
    }

    pub fn mark_all(&mut self) {
        self.flags.iter_mut().for_each(|f| *f = true);
        self.count = self.flags.len();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Return dirty indices in ascending order and clear the set.
    pub fn drain(&mut self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.count);
        for (index, flag) in self.flags.iter_mut().enumerate() {
            if *flag {
                out.push(index);
                *flag = false;
            }
        }
        self.count = 0;
        out
    }
}
