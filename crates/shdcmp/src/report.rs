//! Diagnostic line rendering.
//!
//! Floats use 6-significant-digit general notation: fixed point for
//! decimal exponents in `[-4, 5)` (always keeping one fractional digit),
//! otherwise `1.5e-07` style, trailing zeros stripped in both forms.

use crate::coords::GridCoordinate;
use crate::header::HeaderWordDiff;
use crate::metrics::{ComplexSample, ErrorMetrics, Triggers};

/// Banner written once, when the first alarm-level element is seen.
pub const ALARM_BANNER: &str = "\nERROR: Extremely large error(s) detected:";

const SIG_DIGITS: usize = 6;
const FLT_WIDTH: usize = 12;
const REL_WIDTH: usize = 9;

/// Everything needed to render one flagged element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementReport {
    /// Absolute byte offset of the sample in the file.
    pub offset: u64,
    pub coord: GridCoordinate,
    pub left: ComplexSample,
    pub right: ComplexSample,
    pub metrics: ErrorMetrics,
    /// Metrics over the print tier.
    pub triggers: Triggers,
}

impl ElementReport {
    fn p_addr(&self) -> String {
        let invalid = if self.coord.range_valid { "" } else { "INVALID " };
        format!(
            "src {:3} iz {:3} ir {invalid}{:3} {:08X}: ",
            self.coord.source, self.coord.depth, self.coord.range, self.offset
        )
    }

    fn p_int(&self) -> String {
        format!(
            "{:08X} {:08X} / {:08X} {:08X} | ",
            self.left.real_bits, self.left.imag_bits, self.right.real_bits, self.right.imag_bits
        )
    }

    fn p_flt(&self) -> String {
        format!(
            "({},{}) / ({},{}) | ",
            flt(f64::from(self.left.real())),
            flt(f64::from(self.left.imag())),
            flt(f64::from(self.right.real())),
            flt(f64::from(self.right.imag())),
        )
    }

    fn p_ulp(&self) -> String {
        format!(
            "ULP ({:4},{:4}) | ",
            self.metrics.ulp_real, self.metrics.ulp_imag
        )
    }

    fn p_abs(&self) -> String {
        format!(
            "ABS ({},{}) | ",
            flt(self.metrics.abs_real),
            flt(self.metrics.abs_imag)
        )
    }

    fn p_rel(&self) -> String {
        format!(
            "REL ({}%,{}%) | ",
            format_general(self.metrics.rel_real * 100.0, SIG_DIGITS, REL_WIDTH),
            format_general(self.metrics.rel_imag * 100.0, SIG_DIGITS, REL_WIDTH),
        )
    }

    /// Every field, used once the run has alarmed.
    #[must_use]
    pub fn render_full(&self) -> String {
        let mut line = self.p_addr();
        line.push_str(&self.p_int());
        line.push_str(&self.p_flt());
        line.push_str(&self.p_ulp());
        line.push_str(&self.p_abs());
        line.push_str(&self.p_rel());
        line
    }

    /// Only the fields whose print threshold was crossed.
    ///
    /// Returns `None` when nothing crossed.
    #[must_use]
    pub fn render_selected(&self) -> Option<String> {
        let t = self.triggers;
        if !t.any() {
            return None;
        }
        let mut line = self.p_addr();
        if t.show_int() {
            line.push_str(&self.p_int());
        }
        if t.show_flt() {
            line.push_str(&self.p_flt());
        }
        if t.ulp {
            line.push_str(&self.p_ulp());
        }
        if t.abs {
            line.push_str(&self.p_abs());
        }
        if t.rel {
            line.push_str(&self.p_rel());
        }
        Some(line)
    }
}

/// One header diff line: `OFFSET: LEFT xxxxxxxx  RIGHT xxxxxxxx`.
#[must_use]
pub fn render_header_diff(diff: &HeaderWordDiff, left_label: &str, right_label: &str) -> String {
    format!(
        "{:08X}: {left_label} {:08X}  {right_label} {:08X}",
        diff.offset, diff.left, diff.right
    )
}

fn flt(x: f64) -> String {
    format_general(x, SIG_DIGITS, FLT_WIDTH)
}

/// General-notation float with `precision` significant digits,
/// right-aligned in `width`.
#[must_use]
pub fn format_general(x: f64, precision: usize, width: usize) -> String {
    let body = general_body(x, precision.max(1));
    format!("{body:>width$}")
}

fn general_body(x: f64, precision: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        let s = if x > 0.0 { "inf" } else { "-inf" };
        return s.to_string();
    }
    if x == 0.0 {
        let s = if x.is_sign_negative() { "-0.0" } else { "0.0" };
        return s.to_string();
    }

    // Round once in scientific form to learn the decimal exponent.
    let sci = format!("{:.*e}", precision - 1, x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    let p = i32::try_from(precision).unwrap_or(i32::MAX);
    if (-4..p - 1).contains(&exp) {
        let decimals = usize::try_from(p - 1 - exp).unwrap_or(0);
        let fixed = format!("{x:.decimals$}");
        let mut s = strip_fraction_zeros(&fixed);
        if !s.contains('.') {
            s.push_str(".0");
        }
        s
    } else {
        let m = strip_fraction_zeros(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{m}e{sign}{:02}", exp.unsigned_abs())
    }
}

fn strip_fraction_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
