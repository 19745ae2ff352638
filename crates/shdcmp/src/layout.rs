//! Record layout of a shade file.
//!
//! A shade file is a sequence of fixed-size records of `word_length`
//! little-endian 4-byte words. Word 0 of record 0 stores `word_length`
//! itself; records 0 through 9 form the header.

use crate::error::CompareError;

/// Bytes per word.
pub const WORD_BYTES: u64 = 4;

/// Number of records in the header.
pub const HEADER_RECORDS: u64 = 10;

/// Per-file record geometry, derived once from record 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub word_length: u32,
}

impl RecordLayout {
    #[must_use]
    pub fn new(word_length: u32) -> Self {
        Self { word_length }
    }

    /// Bytes in a single record.
    #[must_use]
    pub fn record_bytes(&self) -> u64 {
        u64::from(self.word_length) * WORD_BYTES
    }

    /// Words in the header (`10 * word_length`).
    #[must_use]
    pub fn header_words(&self) -> u64 {
        HEADER_RECORDS * u64::from(self.word_length)
    }

    /// Byte offset where the data region starts.
    #[must_use]
    pub fn header_bytes(&self) -> u64 {
        self.header_words() * WORD_BYTES
    }

    /// Byte offset of `word` within `record`.
    #[must_use]
    pub fn word_offset(&self, record: u64, word: u64) -> u64 {
        WORD_BYTES * (record * u64::from(self.word_length) + word)
    }

    /// Read word `word` of record `record` as a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Truncated`] if the word lies past the end
    /// of `buf`.
    pub fn read_word(&self, buf: &[u8], record: u64, word: u64) -> Result<u32, CompareError> {
        read_u32_le(
            buf,
            self.word_offset(record, word),
            &format!("record {record} word {word}"),
        )
    }
}

/// Read a little-endian `u32` at `offset`.
///
/// # Errors
///
/// Returns [`CompareError::Truncated`] when fewer than four bytes remain.
pub fn read_u32_le(buf: &[u8], offset: u64, what: &str) -> Result<u32, CompareError> {
    let truncated = || CompareError::Truncated {
        what: what.to_string(),
        needed: offset + WORD_BYTES,
        len: buf.len() as u64,
    };
    let start = usize::try_from(offset).map_err(|_| truncated())?;
    let bytes = start
        .checked_add(4)
        .and_then(|end| buf.get(start..end))
        .ok_or_else(truncated)?;
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(word))
}

/// Parse the record layout from record 0, word 0.
///
/// # Errors
///
/// Returns [`CompareError::Truncated`] if `buf` is shorter than one word.
pub fn parse_record_layout(buf: &[u8]) -> Result<RecordLayout, CompareError> {
    read_u32_le(buf, 0, "record length").map(RecordLayout::new)
}

/// Outcome of reading the record layout from both files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAgreement {
    /// Both files declare the same record length.
    Agreed(RecordLayout),
    /// The files declare different record lengths and cannot be compared.
    Differ { left: u32, right: u32 },
}

/// Parse both layouts and report whether they agree.
///
/// # Errors
///
/// Propagates [`CompareError::Truncated`] from either buffer.
pub fn reconcile_layouts(left: &[u8], right: &[u8]) -> Result<LayoutAgreement, CompareError> {
    let l = parse_record_layout(left)?;
    let r = parse_record_layout(right)?;
    if l == r {
        Ok(LayoutAgreement::Agreed(l))
    } else {
        Ok(LayoutAgreement::Differ {
            left: l.word_length,
            right: r.word_length,
        })
    }
}
