//! The unit of work sent to the oracle

/// A contiguous slice of document text with its position in the sequence.
///
/// Excerpts are produced by one deterministic segmentation pass: re-running
/// the segmenter on identical input and parameters yields byte-identical
/// excerpts in the same order. Each excerpt repeats a bounded trailing
/// window of its predecessor so facts that straddle a cut are not lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// 0-based position in the segmentation sequence
    pub index: usize,

    /// The excerpt text, owned so exactly one oracle call can consume it
    pub text: String,

    /// Leading characters shared with the predecessor excerpt (0 for the
    /// first excerpt)
    pub overlap: usize,
}

impl Excerpt {
    /// Create an excerpt.
    pub fn new(index: usize, text: impl Into<String>, overlap: usize) -> Self {
        Self {
            index,
            text: text.into(),
            overlap,
        }
    }

    /// Length of the excerpt in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
