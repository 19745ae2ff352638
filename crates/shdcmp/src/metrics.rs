//! Per-element error metrics and severity classification.

use crate::config::Thresholds;
use crate::error::Severity;
use crate::ulp::bit_distance;

/// Bytes per complex sample (two `f32`).
pub const SAMPLE_BYTES: usize = 8;

/// Value forced into every metric when NaN-ness disagrees.
pub const NAN_MISMATCH_SENTINEL: f64 = 1e10;
const NAN_MISMATCH_ULP: u64 = 10_000_000_000;

/// Absolute differences below this are negligible.
pub const NEGLIGIBLE_ABS: f64 = 1e-10;

/// One complex sample as raw bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexSample {
    pub real_bits: u32,
    pub imag_bits: u32,
}

impl ComplexSample {
    /// Decode a little-endian (real, imag) pair.
    #[must_use]
    pub fn from_le_bytes(bytes: [u8; SAMPLE_BYTES]) -> Self {
        Self {
            real_bits: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            imag_bits: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    #[must_use]
    pub fn from_parts(real: f32, imag: f32) -> Self {
        Self {
            real_bits: real.to_bits(),
            imag_bits: imag.to_bits(),
        }
    }

    #[must_use]
    pub fn real(&self) -> f32 {
        f32::from_bits(self.real_bits)
    }

    #[must_use]
    pub fn imag(&self) -> f32 {
        f32::from_bits(self.imag_bits)
    }
}

/// Error of one sample against the reference sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMetrics {
    pub ulp_real: u64,
    pub ulp_imag: u64,
    pub abs_real: f64,
    pub abs_imag: f64,
    pub rel_real: f64,
    pub rel_imag: f64,
}

impl ErrorMetrics {
    /// Metrics for a sample whose NaN-ness disagrees with the reference.
    #[must_use]
    pub fn nan_mismatch() -> Self {
        Self {
            ulp_real: NAN_MISMATCH_ULP,
            ulp_imag: NAN_MISMATCH_ULP,
            abs_real: NAN_MISMATCH_SENTINEL,
            abs_imag: NAN_MISMATCH_SENTINEL,
            rel_real: NAN_MISMATCH_SENTINEL,
            rel_imag: NAN_MISMATCH_SENTINEL,
        }
    }

    /// Compare `sample` against `reference`.
    ///
    /// The reference supplies the relative-error denominator.
    #[must_use]
    pub fn compute(sample: &ComplexSample, reference: &ComplexSample) -> Self {
        let (a_re, a_im) = (sample.real(), sample.imag());
        let (b_re, b_im) = (reference.real(), reference.imag());

        if a_re.is_nan() != b_re.is_nan() || a_im.is_nan() != b_im.is_nan() {
            return Self::nan_mismatch();
        }

        let (ulp_real, abs_real, rel_real) =
            component(sample.real_bits, reference.real_bits, a_re, b_re);
        let (ulp_imag, abs_imag, rel_imag) =
            component(sample.imag_bits, reference.imag_bits, a_im, b_im);

        Self {
            ulp_real,
            ulp_imag,
            abs_real,
            abs_imag,
            rel_real,
            rel_imag,
        }
    }
}

fn component(a_bits: u32, b_bits: u32, a: f32, b: f32) -> (u64, f64, f64) {
    let (a, b) = (f64::from(a), f64::from(b));
    let abs = (a - b).abs();
    if abs < NEGLIGIBLE_ABS {
        return (0, abs, 0.0);
    }
    let rel = if b == 0.0 { abs } else { abs / b.abs() };
    (bit_distance(a_bits, b_bits), abs, rel)
}

/// Which metrics exceeded a tier's thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triggers {
    pub ulp: bool,
    pub abs: bool,
    pub rel: bool,
}

impl Triggers {
    /// Evaluate the three metric families against one tier.
    #[must_use]
    pub fn evaluate(m: &ErrorMetrics, ulp_limit: u64, abs_limit: f64, rel_limit: f64) -> Self {
        Self {
            ulp: m.ulp_real > ulp_limit || m.ulp_imag > ulp_limit,
            abs: m.abs_real > abs_limit || m.abs_imag > abs_limit,
            rel: m.rel_real > rel_limit || m.rel_imag > rel_limit,
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.ulp || self.abs || self.rel
    }

    /// Integer bit patterns are shown when ULP triggered.
    #[must_use]
    pub fn show_int(&self) -> bool {
        self.ulp
    }

    /// Float values are shown when ABS or REL triggered.
    #[must_use]
    pub fn show_flt(&self) -> bool {
        self.abs || self.rel
    }
}

/// Triggers against the print tier.
#[must_use]
pub fn print_triggers(m: &ErrorMetrics, t: &Thresholds) -> Triggers {
    Triggers::evaluate(m, t.ulp_print, t.abs_print, t.rel_print)
}

/// Triggers against the alarm tier.
#[must_use]
pub fn alarm_triggers(m: &ErrorMetrics, t: &Thresholds) -> Triggers {
    Triggers::evaluate(m, t.ulp_alarm, t.abs_alarm, t.rel_alarm)
}

/// Classify an element's metrics into a severity tier.
#[must_use]
pub fn classify(m: &ErrorMetrics, t: &Thresholds) -> Severity {
    if alarm_triggers(m, t).any() {
        Severity::Alarm
    } else if print_triggers(m, t).any() {
        Severity::Printable
    } else {
        Severity::Silent
    }
}
