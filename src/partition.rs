use log::debug;

use crate::error::WordCountError;
use crate::text::{Segment, Text};

/// Split `text` into `n` contiguous segments without cutting through a word.
///
/// Every segment but the last starts out `len / n` characters long and is
/// then stretched until it ends right before a whitespace character or at
/// the end of the text. The last segment takes whatever is left. Once the
/// end of the text is reached the remaining segments are empty. An empty
/// text yields no segments at all.
pub fn partition(text: &Text, n: usize) -> Result<Vec<Segment>, WordCountError> {
    if n < 1 {
        return Err(WordCountError::invalid_argument(format!(
            "segment count must be at least 1, got {}",
            n
        )));
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let buffer = text.as_str();
    let length = buffer.len();
    let part_size = buffer.chars().count() / n;

    let mut segments = Vec::with_capacity(n);
    let mut from: usize = 0;
    for index in 0..n {
        let to = if index == n - 1 {
            length
        } else {
            let target = advance_chars(buffer, from, part_size);
            next_whitespace(buffer, target)
        };
        debug!("segment {}: bytes {}..{}", index, from, to);
        segments.push(text.segment(index, from..to));
        from = to;
    }

    Ok(segments)
}

/// Byte offset `count` characters past `from`, or the end of `buffer`.
fn advance_chars(buffer: &str, from: usize, count: usize) -> usize {
    buffer[from..]
        .char_indices()
        .nth(count)
        .map_or(buffer.len(), |(offset, _)| from + offset)
}

/// Byte offset of the first whitespace character at or after `from`.
fn next_whitespace(buffer: &str, from: usize) -> usize {
    buffer[from..]
        .char_indices()
        .find(|&(_, c)| c.is_whitespace())
        .map_or(buffer.len(), |(offset, _)| from + offset)
}
