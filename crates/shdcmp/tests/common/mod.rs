//! Shared shade-file fixtures for integration tests.

#![allow(dead_code)]

/// In-memory shade file image: a 10-record header followed by
/// `nsz * nrz` data records of `word_length` words.
pub struct ShdImage {
    pub word_length: u32,
    words: Vec<u32>,
}

impl ShdImage {
    /// Header with the given shape and a zeroed data region.
    pub fn new(word_length: u32, nsz: u32, nrz: u32, nrr: u32) -> Self {
        let wl = word_length as usize;
        let total = 10 * wl + (nsz * nrz) as usize * wl;
        let mut words = vec![0u32; total];
        words[0] = word_length;
        words[2 * wl + 4] = nsz;
        words[2 * wl + 5] = nrz;
        words[2 * wl + 6] = nrr;
        Self { word_length, words }
    }

    /// Data-region image where sample `i` holds `(i, -i)`.
    pub fn ramp(word_length: u32, nsz: u32, nrz: u32, nrr: u32) -> Self {
        let mut img = Self::new(word_length, nsz, nrz, nrr);
        for i in 0..img.num_samples() {
            img.set_sample(i, i as f32 + 1.0, -(i as f32) - 1.0);
        }
        img
    }

    pub fn header_bytes(&self) -> usize {
        40 * self.word_length as usize
    }

    pub fn num_samples(&self) -> usize {
        (self.words.len() - 10 * self.word_length as usize) / 2
    }

    /// Overwrite header word `index` (counted from the file start).
    pub fn set_header_word(&mut self, index: usize, value: u32) {
        self.words[index] = value;
    }

    pub fn set_sample(&mut self, index: usize, re: f32, im: f32) {
        self.set_sample_bits(index, re.to_bits(), im.to_bits());
    }

    pub fn set_sample_bits(&mut self, index: usize, re: u32, im: u32) {
        let w = 10 * self.word_length as usize + 2 * index;
        self.words[w] = re;
        self.words[w + 1] = im;
    }

    pub fn sample(&self, index: usize) -> (f32, f32) {
        let w = 10 * self.word_length as usize + 2 * index;
        (f32::from_bits(self.words[w]), f32::from_bits(self.words[w + 1]))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

/// Run a comparison and return the outcome with the captured output.
pub fn run(
    left: &ShdImage,
    right: &ShdImage,
) -> Result<(shdcmp::Outcome, String), shdcmp::CompareError> {
    run_bytes(&left.to_bytes(), &right.to_bytes())
}

pub fn run_bytes(
    left: &[u8],
    right: &[u8],
) -> Result<(shdcmp::Outcome, String), shdcmp::CompareError> {
    let mut out = Vec::new();
    let outcome = shdcmp::compare_buffers(left, right, &shdcmp::CompareConfig::default(), &mut out)?;
    Ok((outcome, String::from_utf8(out).expect("report is utf-8")))
}
