//! One comparison pass over a pair of shade files.
//!
//! [`compare_buffers`] runs the whole pipeline: file length and record
//! length agreement, header word diff, structural validation, then the
//! element scan held in a [`ComparisonSession`].

use std::io::Write;

use tracing::{debug, warn};

use crate::config::{CompareConfig, Thresholds};
use crate::coords::decode_sample_index;
use crate::error::{CompareError, Severity};
use crate::header::{diff_header_words, validate_structure, GridShape};
use crate::layout::{reconcile_layouts, LayoutAgreement, RecordLayout};
use crate::metrics::{classify, print_triggers, ComplexSample, ErrorMetrics, SAMPLE_BYTES};
use crate::report::{render_header_diff, ElementReport, ALARM_BANNER};

/// Why a pair of files could not be compared at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incomparable {
    FileLength { left: u64, right: u64 },
    RecordLength { left: u32, right: u32 },
}

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every element is within the alarm tier.
    Match,
    /// At least one element reached [`Severity::Alarm`].
    Alarm,
    /// The files were not compared; see [`Incomparable`].
    Incomparable(Incomparable),
}

impl RunStatus {
    /// Whether the process should exit with a failure status.
    ///
    /// Incomparable files are reported but do not fail the run.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, RunStatus::Alarm)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: RunStatus,
    pub worst: Severity,
    pub header_diffs: usize,
    pub printable: u64,
    pub alarms: u64,
}

impl Outcome {
    fn incomparable(reason: Incomparable) -> Self {
        Self {
            status: RunStatus::Incomparable(reason),
            worst: Severity::Silent,
            header_diffs: 0,
            printable: 0,
            alarms: 0,
        }
    }
}

/// Run-level state for one scan of the data region.
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    layout: RecordLayout,
    shape: GridShape,
    thresholds: Thresholds,
    errored: bool,
    worst: Severity,
    printable: u64,
    alarms: u64,
}

impl ComparisonSession {
    #[must_use]
    pub fn new(layout: RecordLayout, shape: GridShape, thresholds: Thresholds) -> Self {
        Self {
            layout,
            shape,
            thresholds,
            errored: false,
            worst: Severity::Silent,
            printable: 0,
            alarms: 0,
        }
    }

    /// True once any element has alarmed. Never resets.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.errored
    }

    #[must_use]
    pub fn worst(&self) -> Severity {
        self.worst
    }

    /// Classify the sample at absolute byte `offset`.
    ///
    /// Returns `None` for bit-identical samples and for silent ones.
    #[must_use]
    pub fn examine(
        &self,
        offset: u64,
        left: [u8; SAMPLE_BYTES],
        right: [u8; SAMPLE_BYTES],
    ) -> Option<(Severity, ElementReport)> {
        if left == right {
            return None;
        }
        let left = ComplexSample::from_le_bytes(left);
        let right = ComplexSample::from_le_bytes(right);
        let metrics = ErrorMetrics::compute(&left, &right);
        let severity = classify(&metrics, &self.thresholds);
        if severity == Severity::Silent {
            return None;
        }
        let sample_index =
            offset.saturating_sub(self.layout.header_bytes()) / SAMPLE_BYTES as u64;
        Some((
            severity,
            ElementReport {
                offset,
                coord: decode_sample_index(sample_index, &self.shape, &self.layout),
                left,
                right,
                metrics,
                triggers: print_triggers(&metrics, &self.thresholds),
            },
        ))
    }

    /// Account for one flagged element and write its diagnostic line.
    ///
    /// The first alarm writes [`ALARM_BANNER`] and latches errored mode,
    /// after which every flagged element is written in full.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Output`] if writing fails.
    pub fn record<W: Write>(
        &mut self,
        severity: Severity,
        report: &ElementReport,
        out: &mut W,
    ) -> Result<(), CompareError> {
        self.worst = self.worst.max(severity);
        match severity {
            Severity::Silent => return Ok(()),
            Severity::Printable => self.printable += 1,
            Severity::Alarm => {
                self.alarms += 1;
                if !self.errored {
                    writeln!(out, "{ALARM_BANNER}")?;
                    self.errored = true;
                }
            }
        }
        if self.errored {
            writeln!(out, "{}", report.render_full())?;
        } else if let Some(line) = report.render_selected() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Scan the whole data region of both buffers.
    ///
    /// Both buffers must already have passed [`validate_structure`].
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Output`] if writing fails.
    pub fn scan<W: Write>(
        &mut self,
        left: &[u8],
        right: &[u8],
        out: &mut W,
    ) -> Result<Severity, CompareError> {
        let header_bytes = self.layout.header_bytes();
        let start = usize::try_from(header_bytes).unwrap_or(usize::MAX);
        let data_left = left.get(start..).unwrap_or_default();
        let data_right = right.get(start..).unwrap_or_default();

        let mut offset = header_bytes;
        for (l, r) in data_left
            .chunks_exact(SAMPLE_BYTES)
            .zip(data_right.chunks_exact(SAMPLE_BYTES))
        {
            if l != r {
                let mut lb = [0u8; SAMPLE_BYTES];
                let mut rb = [0u8; SAMPLE_BYTES];
                lb.copy_from_slice(l);
                rb.copy_from_slice(r);
                if let Some((severity, report)) = self.examine(offset, lb, rb) {
                    self.record(severity, &report, out)?;
                }
            }
            offset += SAMPLE_BYTES as u64;
        }

        debug!(
            printable = self.printable,
            alarms = self.alarms,
            worst = %self.worst,
            "data region scanned"
        );
        Ok(self.worst)
    }

    fn outcome(&self, header_diffs: usize) -> Outcome {
        Outcome {
            status: if self.errored {
                RunStatus::Alarm
            } else {
                RunStatus::Match
            },
            worst: self.worst,
            header_diffs,
            printable: self.printable,
            alarms: self.alarms,
        }
    }
}

/// Compare two complete shade file images, writing diagnostics to `out`.
///
/// `left` is the implementation under test, `right` the reference.
///
/// # Errors
///
/// Returns a structural [`CompareError`] if the header contract is
/// violated, or [`CompareError::Output`] if writing fails. Files that
/// differ in length or record length are not errors: they yield
/// [`RunStatus::Incomparable`].
pub fn compare_buffers<W: Write>(
    left: &[u8],
    right: &[u8],
    config: &CompareConfig,
    out: &mut W,
) -> Result<Outcome, CompareError> {
    if left.len() != right.len() {
        writeln!(
            out,
            "File lengths differ: {} vs {}",
            left.len(),
            right.len()
        )?;
        warn!(
            left = left.len(),
            right = right.len(),
            "file lengths differ, skipping comparison"
        );
        return Ok(Outcome::incomparable(Incomparable::FileLength {
            left: left.len() as u64,
            right: right.len() as u64,
        }));
    }

    let layout = match reconcile_layouts(left, right)? {
        LayoutAgreement::Agreed(layout) => layout,
        LayoutAgreement::Differ { left, right } => {
            writeln!(out, "Record lengths differ: {left} vs {right}")?;
            warn!(left, right, "record lengths differ, skipping comparison");
            return Ok(Outcome::incomparable(Incomparable::RecordLength {
                left,
                right,
            }));
        }
    };
    debug!(word_length = layout.word_length, "record layout agreed");

    let diffs = diff_header_words(left, right, &layout)?;
    for d in &diffs {
        writeln!(
            out,
            "{}",
            render_header_diff(d, &config.left_label, &config.right_label)
        )?;
    }

    let shape = validate_structure(left, right, &layout)?;
    debug!(%shape, header_diffs = diffs.len(), "header validated");

    let mut session = ComparisonSession::new(layout, shape, config.thresholds);
    session.scan(left, right, out)?;
    Ok(session.outcome(diffs.len()))
}
