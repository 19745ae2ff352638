//! Header cross-checks between the two files.
//!
//! The header word diff is informational; grid shape, range capacity and
//! total file size are hard structural requirements.

use crate::error::CompareError;
use crate::layout::{RecordLayout, WORD_BYTES};

/// Header record carrying the grid dimensions.
pub const SHAPE_RECORD: u64 = 2;
/// Word offsets of NSz, NRz and NRr within [`SHAPE_RECORD`].
pub const NSZ_WORD: u64 = 4;
pub const NRZ_WORD: u64 = 5;
pub const NRR_WORD: u64 = 6;

/// Declared logical dimensions of the data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// NSz
    pub num_sources: u32,
    /// NRz
    pub num_depths: u32,
    /// NRr
    pub num_ranges_declared: u32,
}

impl GridShape {
    /// Total file length implied by this shape under `layout`.
    ///
    /// Saturates at `u64::MAX`, which no real file length can match.
    #[must_use]
    pub fn expected_file_bytes(&self, layout: &RecordLayout) -> u64 {
        (u64::from(self.num_sources) * u64::from(self.num_depths))
            .checked_mul(layout.record_bytes())
            .and_then(|data| data.checked_add(layout.header_bytes()))
            .unwrap_or(u64::MAX)
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NSz {} NRz {} NRr {}",
            self.num_sources, self.num_depths, self.num_ranges_declared
        )
    }
}

/// One header word that differs between the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderWordDiff {
    /// Byte offset of the word.
    pub offset: u64,
    pub left: u32,
    pub right: u32,
}

/// List every differing word in the first `10 * word_length` words.
///
/// # Errors
///
/// Returns [`CompareError::Truncated`] if either buffer is shorter than
/// the header.
pub fn diff_header_words(
    left: &[u8],
    right: &[u8],
    layout: &RecordLayout,
) -> Result<Vec<HeaderWordDiff>, CompareError> {
    let header_bytes = layout.header_bytes();
    for buf in [left, right] {
        if (buf.len() as u64) < header_bytes {
            return Err(CompareError::Truncated {
                what: "header".to_string(),
                needed: header_bytes,
                len: buf.len() as u64,
            });
        }
    }
    // Both buffers hold at least `header_bytes`, so this fits in usize.
    let end = usize::try_from(header_bytes).unwrap_or(usize::MAX);
    let diffs = left[..end]
        .chunks_exact(4)
        .zip(right[..end].chunks_exact(4))
        .enumerate()
        .filter(|(_, (l, r))| l != r)
        .map(|(w, (l, r))| HeaderWordDiff {
            offset: w as u64 * WORD_BYTES,
            left: u32::from_le_bytes([l[0], l[1], l[2], l[3]]),
            right: u32::from_le_bytes([r[0], r[1], r[2], r[3]]),
        })
        .collect();
    Ok(diffs)
}

/// Read NSz / NRz / NRr from header record 2.
///
/// # Errors
///
/// Returns [`CompareError::Truncated`] if the record lies past the end of
/// `buf`.
pub fn extract_grid_shape(buf: &[u8], layout: &RecordLayout) -> Result<GridShape, CompareError> {
    Ok(GridShape {
        num_sources: layout.read_word(buf, SHAPE_RECORD, NSZ_WORD)?,
        num_depths: layout.read_word(buf, SHAPE_RECORD, NRZ_WORD)?,
        num_ranges_declared: layout.read_word(buf, SHAPE_RECORD, NRR_WORD)?,
    })
}

/// Run the structural checks and return the agreed grid shape.
///
/// The right-hand file is the reference: its shape is read first and the
/// left file must match it exactly.
///
/// # Errors
///
/// Returns the first failing structural check: [`CompareError::GridShapeMismatch`],
/// [`CompareError::RangeCapacity`], [`CompareError::FileSize`] or
/// [`CompareError::UnpairedRecordLength`].
pub fn validate_structure(
    left: &[u8],
    right: &[u8],
    layout: &RecordLayout,
) -> Result<GridShape, CompareError> {
    let shape = extract_grid_shape(right, layout)?;
    let left_shape = extract_grid_shape(left, layout)?;
    if left_shape != shape {
        return Err(CompareError::GridShapeMismatch {
            left: left_shape,
            right: shape,
        });
    }

    if u64::from(shape.num_ranges_declared) * 2 > u64::from(layout.word_length) {
        return Err(CompareError::RangeCapacity {
            num_ranges: shape.num_ranges_declared,
            word_length: layout.word_length,
        });
    }

    let expected = shape.expected_file_bytes(layout);
    for (which, buf) in [("left", left), ("right", right)] {
        let actual = buf.len() as u64;
        if actual != expected {
            return Err(CompareError::FileSize {
                which: which.to_string(),
                actual,
                expected,
                shape,
                word_length: layout.word_length,
            });
        }
    }

    if layout.word_length == 0 || layout.word_length % 2 != 0 {
        return Err(CompareError::UnpairedRecordLength {
            word_length: layout.word_length,
        });
    }

    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Header-only file image with the given shape words.
    fn header(word_length: u32, nsz: u32, nrz: u32, nrr: u32) -> Vec<u32> {
        let wl = word_length as usize;
        let mut ws = vec![0u32; 10 * wl];
        ws[0] = word_length;
        ws[2 * wl + 4] = nsz;
        ws[2 * wl + 5] = nrz;
        ws[2 * wl + 6] = nrr;
        ws
    }

    fn file(word_length: u32, nsz: u32, nrz: u32, nrr: u32) -> Vec<u8> {
        let mut ws = header(word_length, nsz, nrz, nrr);
        ws.extend(std::iter::repeat(0).take((nsz * nrz * word_length) as usize));
        ws.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn identical_headers_have_no_diffs() {
        let a = file(8, 1, 2, 3);
        let diffs = diff_header_words(&a, &a, &RecordLayout::new(8)).unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn header_diff_reports_offset_and_values() {
        let a = file(8, 1, 2, 3);
        let mut b = a.clone();
        b[12..16].copy_from_slice(&0xABCD_u32.to_le_bytes());
        let diffs = diff_header_words(&a, &b, &RecordLayout::new(8)).unwrap();
        assert_eq!(
            diffs,
            vec![HeaderWordDiff {
                offset: 12,
                left: 0,
                right: 0xABCD
            }]
        );
    }

    #[test]
    fn header_diff_ignores_data_region() {
        let a = file(8, 1, 2, 3);
        let mut b = a.clone();
        let last = b.len() - 1;
        b[last] = 0xFF;
        let diffs = diff_header_words(&a, &b, &RecordLayout::new(8)).unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn header_diff_requires_full_header() {
        let a = file(8, 1, 2, 3);
        let err = diff_header_words(&a[..100], &a[..100], &RecordLayout::new(8)).unwrap_err();
        assert!(matches!(err, CompareError::Truncated { needed: 320, .. }));
    }

    #[test]
    fn extracts_shape_from_record_two() {
        let a = file(8, 1, 2, 3);
        let shape = extract_grid_shape(&a, &RecordLayout::new(8)).unwrap();
        assert_eq!(
            shape,
            GridShape {
                num_sources: 1,
                num_depths: 2,
                num_ranges_declared: 3
            }
        );
        assert_eq!(shape.to_string(), "NSz 1 NRz 2 NRr 3");
    }

    #[test]
    fn valid_structure_passes() {
        let a = file(8, 2, 3, 4);
        let shape = validate_structure(&a, &a, &RecordLayout::new(8)).unwrap();
        assert_eq!(shape.expected_file_bytes(&RecordLayout::new(8)), a.len() as u64);
    }

    #[test]
    fn shape_mismatch_is_fatal() {
        // Same byte length, different NSz/NRz split.
        let a = file(8, 1, 4, 3);
        let b = file(8, 2, 2, 3);
        let err = validate_structure(&a, &b, &RecordLayout::new(8)).unwrap_err();
        match err {
            CompareError::GridShapeMismatch { left, right } => {
                assert_eq!(left.num_sources, 1);
                assert_eq!(right.num_sources, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn range_capacity_is_fatal() {
        let a = file(8, 1, 2, 5);
        let err = validate_structure(&a, &a, &RecordLayout::new(8)).unwrap_err();
        assert!(matches!(
            err,
            CompareError::RangeCapacity {
                num_ranges: 5,
                word_length: 8
            }
        ));
    }

    #[test]
    fn range_capacity_boundary_is_allowed() {
        let a = file(8, 1, 2, 4);
        assert!(validate_structure(&a, &a, &RecordLayout::new(8)).is_ok());
    }

    #[test]
    fn file_size_mismatch_is_fatal() {
        let mut a = file(8, 1, 2, 3);
        a.truncate(a.len() - 8);
        let err = validate_structure(&a, &a, &RecordLayout::new(8)).unwrap_err();
        match err {
            CompareError::FileSize {
                actual, expected, ..
            } => {
                assert_eq!(actual, 376);
                assert_eq!(expected, 384);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn huge_declared_shape_does_not_overflow() {
        let shape = GridShape {
            num_sources: u32::MAX,
            num_depths: u32::MAX,
            num_ranges_declared: 0,
        };
        assert_eq!(
            shape.expected_file_bytes(&RecordLayout::new(u32::MAX)),
            u64::MAX
        );
    }

    #[test]
    fn odd_record_length_is_fatal() {
        let a = file(7, 1, 2, 3);
        let err = validate_structure(&a, &a, &RecordLayout::new(7)).unwrap_err();
        assert!(matches!(
            err,
            CompareError::UnpairedRecordLength { word_length: 7 }
        ));
    }
}
