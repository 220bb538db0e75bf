pub mod error;
pub mod shiftand;

pub use error::{Error, Result};
pub use shiftand::{MAX_NEEDLE_LEN, Processor, ShiftAnd, WORD_LEN};

/// Single pattern search algorithm.
///
/// Compiling produces an immutable table that any number of processors
/// can borrow at once, each one tracking its own position in a stream.
pub trait SearchAlgorithm: Sized {
    type Processor<'a>: UnrolledSearchProcessor
    where
        Self: 'a;

    /// Compile a needle into a search table.
    fn compile(needle: &[u8]) -> Result<Self>;

    /// Return a fresh processor over this table.
    fn processor(&self) -> Self::Processor<'_>;
}

/// Consumes a stream one byte at a time.
pub trait SearchProcessor {
    /// Advance by one byte.
    /// Returns false if a match ends at this byte.
    fn process_byte(&mut self, byte: u8) -> bool;

    /// Length of the needle this processor searches for.
    fn needle_len(&self) -> usize;

    /// Forget all progress.
    fn reset(&mut self);
}

/// Consumes a stream eight bytes at a time.
pub trait UnrolledSearchProcessor: SearchProcessor {
    /// Advance by one little-endian word.
    /// Returns false if one or more matches end within the word.
    fn process_word(&mut self, word: u64) -> bool;

    /// Whether the last word left completions to drain.
    fn has_pending_completions(&self) -> bool;

    /// Pop the next completion offset, highest first.
    fn next_completion_offset(&mut self) -> usize;
}
