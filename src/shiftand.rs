use tracing::debug;

use crate::{
    Error,
    Result,
    SearchAlgorithm,
    SearchProcessor,
    UnrolledSearchProcessor,
};

/// Longest needle a [`ShiftAnd`] accepts.
/// A word step shifts the register by eight, so seven bits above the
/// needle must stay free.
pub const MAX_NEEDLE_LEN: usize = 57;

/// Bytes consumed by one word step.
pub const WORD_LEN: usize = 8;

/// Index of the all-ones mask mixed into every word step.
const SENTINEL: usize = 256;

/// Compiled Shift-And table for a single needle.
///
/// Bit `p` of `masks[v]` is set when `needle[p] == v`. Bits at or above the
/// needle length are always set, so they never block progress.
#[derive(Clone, Debug)]
pub struct ShiftAnd {
    masks: [u64; 257],
    success: u64,
    word_success: u64,
    needle_len: usize,
}

impl ShiftAnd {
    /// Compile `needle` into a table.
    /// Fails with [`Error::InvalidPattern`] for an empty needle or one longer
    /// than [`MAX_NEEDLE_LEN`].
    pub fn new(needle: &[u8]) -> Result<Self> {
        let len = needle.len();
        if len == 0 || len > MAX_NEEDLE_LEN {
            debug!(len, "rejected search pattern");
            return Err(Error::InvalidPattern { len });
        }

        let mut masks = [u64::MAX << len; 257];
        let mut bit = 1u64;
        for &byte in needle {
            masks[byte as usize] |= bit;
            bit <<= 1;
        }
        masks[SENTINEL] = u64::MAX;

        debug!(len, "compiled shift-and table");
        Ok(Self {
            masks,
            success: 1 << (len - 1),
            word_success: 0xFF << (len - 1),
            needle_len: len,
        })
    }

    /// Length of the compiled needle.
    pub fn needle_len(&self) -> usize {
        self.needle_len
    }

    /// Mask for a single byte value.
    pub fn mask(&self, byte: u8) -> u64 {
        self.masks[byte as usize]
    }

    /// Return a fresh [`Processor`] borrowing this table.
    pub fn processor(&self) -> Processor<'_> {
        Processor::new(self)
    }
}

/// Search session over a [`ShiftAnd`] table.
///
/// Holds the progress register and the completions left over from the last
/// word step. Drain those with [`Processor::next_completion_offset`] before
/// stepping again.
#[derive(Clone, Debug)]
pub struct Processor<'a> {
    table: &'a ShiftAnd,
    /// Bit `p` set means the last `p + 1` bytes match the needle prefix.
    progress: u64,
    /// Completions found by the last word step, not yet reported.
    pending: u64,
}

impl<'a> Processor<'a> {
    pub fn new(table: &'a ShiftAnd) -> Self {
        Self { table, progress: 0, pending: 0 }
    }

    /// Clear all progress and pending completions.
    pub fn reset(&mut self) {
        self.progress = 0;
        self.pending = 0;
    }

    /// Advance by one byte.
    /// Returns false if a match ends at this byte, true otherwise.
    #[inline]
    pub fn step_byte(&mut self, byte: u8) -> bool {
        self.progress = ((self.progress << 1) | 1) & self.table.masks[byte as usize];
        self.progress & self.table.success == 0
    }

    /// Advance by eight bytes packed little-endian into `word`, so the lowest
    /// byte is the first one in the stream.
    ///
    /// Same result as eight calls to [`Processor::step_byte`]. Returns false if
    /// any of them would have completed a match, and records which ones for
    /// [`Processor::next_completion_offset`].
    #[inline]
    pub fn step_word(&mut self, word: u64) -> bool {
        let m = &self.table.masks;
        let b = word.to_le_bytes();
        // Byte k is shifted by 7 - k; the low bits are padded with ones so the
        // earlier bytes can't clear progress made by the later ones.
        self.progress = ((self.progress << 8) | 0xFF)
            & m[SENTINEL]
            & ((m[b[0] as usize] << 7) | 0x7F)
            & ((m[b[1] as usize] << 6) | 0x3F)
            & ((m[b[2] as usize] << 5) | 0x1F)
            & ((m[b[3] as usize] << 4) | 0x0F)
            & ((m[b[4] as usize] << 3) | 0x07)
            & ((m[b[5] as usize] << 2) | 0x03)
            & ((m[b[6] as usize] << 1) | 0x01)
            & m[b[7] as usize];
        self.pending = self.progress & self.table.word_success;
        self.pending == 0
    }

    /// [`Processor::step_word`] over an eight byte chunk in stream order.
    #[inline]
    pub fn step_chunk(&mut self, chunk: &[u8; WORD_LEN]) -> bool {
        self.step_word(u64::from_le_bytes(*chunk))
    }

    pub fn has_pending_completions(&self) -> bool {
        self.pending != 0
    }

    /// Pop the highest pending completion.
    ///
    /// The offset is the distance from the start of the match to the end of
    /// the word, so for a word covering `[s, s + 8)` the match starts at
    /// `s + 8 - offset`. Higher offsets, which belong to earlier matches, are
    /// returned first.
    ///
    /// # Panics
    ///
    /// Panics if nothing is pending.
    pub fn next_completion_offset(&mut self) -> usize {
        assert_ne!(self.pending, 0, "no pending completions to drain");
        let offset = 64 - self.pending.leading_zeros() as usize;
        self.pending ^= 1 << (offset - 1);
        offset
    }

    pub fn needle_len(&self) -> usize {
        self.table.needle_len
    }
}

//>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>>
// Traits
//<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<

impl SearchAlgorithm for ShiftAnd {
    type Processor<'a> = Processor<'a>;

    fn compile(needle: &[u8]) -> Result<Self> {
        Self::new(needle)
    }

    fn processor(&self) -> Processor<'_> {
        Processor::new(self)
    }
}

impl SearchProcessor for Processor<'_> {
    fn process_byte(&mut self, byte: u8) -> bool {
        self.step_byte(byte)
    }

    fn needle_len(&self) -> usize {
        self.table.needle_len
    }

    fn reset(&mut self) {
        Processor::reset(self)
    }
}

impl UnrolledSearchProcessor for Processor<'_> {
    fn process_word(&mut self, word: u64) -> bool {
        self.step_word(word)
    }

    fn has_pending_completions(&self) -> bool {
        self.pending != 0
    }

    fn next_completion_offset(&mut self) -> usize {
        Processor::next_completion_offset(self)
    }
}
