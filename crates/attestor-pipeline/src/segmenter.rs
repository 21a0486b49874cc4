//! Document segmentation into overlapping excerpts

use attestor_domain::Excerpt;

/// Split document text into an ordered sequence of overlapping excerpts.
///
/// Each excerpt is at most `max_size` characters. Cuts prefer natural
/// boundaries — a paragraph break, then a sentence break, then any
/// whitespace — closest to `max_size` from the current cursor; a window
/// with no boundary at all is cut at exactly `max_size`. After each cut the
/// cursor retreats by `overlap` characters so a trailing window of every
/// excerpt is repeated at the head of the next one.
///
/// The pass is deterministic: identical input and parameters yield
/// byte-identical excerpts in the same order. Empty text yields an empty
/// sequence, not an error.
///
/// Callers must uphold `max_size > 0` and `overlap < max_size`
/// (see `PipelineConfig::validate`).
pub fn segment(text: &str, max_size: usize, overlap: usize) -> Vec<Excerpt> {
    debug_assert!(max_size > 0);
    debug_assert!(overlap < max_size);

    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, end offset appended. Window
    // arithmetic happens in characters; slicing stays byte-exact.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = bounds.len() - 1;

    let mut excerpts = Vec::new();
    let mut start = 0usize;
    let mut prev_cut = 0usize;

    while start < total_chars {
        let window_end = (start + max_size).min(total_chars);
        let cut = if window_end == total_chars {
            total_chars
        } else {
            find_cut(text, &bounds, start, window_end)
        };

        let shared = prev_cut.saturating_sub(start);
        excerpts.push(Excerpt::new(
            excerpts.len(),
            &text[bounds[start]..bounds[cut]],
            shared,
        ));

        if cut == total_chars {
            break;
        }

        // Retreat by the overlap, but never behind the excerpt just emitted
        // and always at least one character forward, so a boundary landing
        // inside the overlap window cannot stall the pass.
        start = cut.saturating_sub(overlap).max(start + 1);
        prev_cut = cut;
    }

    excerpts
}

/// Concatenate excerpts with each one's leading shared window dropped,
/// reconstructing the original document text.
pub fn reassemble(excerpts: &[Excerpt]) -> String {
    let mut text = String::new();
    for excerpt in excerpts {
        let mut chars = excerpt.text.chars();
        for _ in 0..excerpt.overlap {
            chars.next();
        }
        text.push_str(chars.as_str());
    }
    text
}

/// Pick the cut position (as a char index) for a window that does not reach
/// the end of the document. Boundary classes are tried in preference order;
/// within a class the boundary closest to the window edge wins.
fn find_cut(text: &str, bounds: &[usize], start: usize, window_end: usize) -> usize {
    let window = &text[bounds[start]..bounds[window_end]];

    // Paragraph break: cut just after the last blank line in the window.
    if let Some(pos) = window.rfind("\n\n") {
        let cut = char_index(bounds, bounds[start] + pos + 2);
        if cut > start {
            return cut;
        }
    }

    // Sentence break: the last terminator followed by whitespace.
    let mut sentence_end = None;
    let mut prev: Option<(usize, char)> = None;
    for (offset, ch) in window.char_indices() {
        if let Some((prev_offset, prev_ch)) = prev {
            if matches!(prev_ch, '.' | '!' | '?') && ch.is_whitespace() {
                sentence_end = Some(bounds[start] + prev_offset + prev_ch.len_utf8());
            }
        }
        prev = Some((offset, ch));
    }
    if let Some(byte_cut) = sentence_end {
        let cut = char_index(bounds, byte_cut);
        if cut > start {
            return cut;
        }
    }

    // Any whitespace at all: cut just after the last one.
    let mut whitespace_end = None;
    for (offset, ch) in window.char_indices() {
        if ch.is_whitespace() {
            whitespace_end = Some(bounds[start] + offset + ch.len_utf8());
        }
    }
    if let Some(byte_cut) = whitespace_end {
        let cut = char_index(bounds, byte_cut);
        if cut > start {
            return cut;
        }
    }

    // No boundary in the window: cut at exactly the size limit.
    window_end
}

/// Map a byte offset that is known to sit on a char boundary back to its
/// char index.
fn char_index(bounds: &[usize], byte_offset: usize) -> usize {
    bounds.binary_search(&byte_offset).unwrap_or_else(|i| i)
}
