//! Decomposition of a data-region sample index into grid coordinates.
//!
//! Each record holds `word_length / 2` complex samples for one
//! (source, depth) pair; slots at or beyond NRr are padding.

use crate::header::GridShape;
use crate::layout::RecordLayout;

/// Position of a sample within the logical grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoordinate {
    pub source: u32,
    pub depth: u32,
    pub range: u32,
    /// False when `range` is a padding slot past NRr.
    pub range_valid: bool,
}

/// Complex samples per record.
#[must_use]
pub fn ranges_per_record(layout: &RecordLayout) -> u64 {
    u64::from(layout.word_length) / 2
}

/// Map a zero-based sample index to its grid coordinate.
///
/// Source varies slowest and range fastest. Callers must ensure
/// `num_depths` and `word_length / 2` are non-zero; header validation
/// guarantees both whenever the data region is non-empty.
#[must_use]
pub fn decode_sample_index(
    sample_index: u64,
    shape: &GridShape,
    layout: &RecordLayout,
) -> GridCoordinate {
    let per_record = ranges_per_record(layout);
    let depths = u64::from(shape.num_depths);

    let source = sample_index / (depths * per_record);
    let depth = (sample_index / per_record) % depths;
    let range = sample_index % per_record;

    GridCoordinate {
        source: saturate(source),
        depth: saturate(depth),
        range: saturate(range),
        range_valid: range < u64::from(shape.num_ranges_declared),
    }
}

fn saturate(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}
