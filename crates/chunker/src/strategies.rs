//! The four splitting strategies.
//!
//! Every strategy is a pure function with the uniform signature
//! `(text, &ChunkerConfig) -> Vec<Segment>`, so new strategies can be added
//! without touching the packing or metadata-wrapping logic in the engine.

use crate::config::{ChunkerConfig, Strategy};
use crate::helpers::{
    floor_char_boundary, overlap_tail, paragraph_units, sentence_units, word_units, Unit,
};

/// An ordered text segment produced by a splitting strategy, before being
/// wrapped into a [`Chunk`](crate::Chunk). `start`/`end` are the byte span
/// of the segment's fresh (non-overlap) content in the original text.
#[derive(Debug, Clone)]
pub(crate) struct Segment {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

type SplitFn = fn(&str, &ChunkerConfig) -> Vec<Segment>;

impl Strategy {
    /// Strategy table: identifier → pure splitting function.
    pub(crate) fn split_fn(self) -> SplitFn {
        match self {
            Strategy::Paragraph => split_paragraph,
            Strategy::Sentence => split_sentence,
            Strategy::Fixed => split_fixed,
            Strategy::Token => split_token,
        }
    }
}

// ── Paragraph / sentence packing ────────────────────────────────────────────

/// Greedily pack units into segments up to `chunk_size`, seeding each new
/// segment with the word tail of the closed one when overlap is configured.
/// A single unit larger than `chunk_size` becomes its own segment rather
/// than being dropped.
fn pack_units(units: &[Unit<'_>], joiner: &str, config: &ChunkerConfig) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buf = String::new();
    // Span of the fresh content in `buf` (the overlap seed is excluded).
    let mut fresh: Option<(usize, usize)> = None;

    for unit in units {
        if !buf.is_empty() && buf.len() + unit.text.len() > config.chunk_size() {
            let closed = std::mem::take(&mut buf);
            let (start, end) = fresh.take().unwrap_or((unit.start, unit.start));
            buf = overlap_tail(&closed, config.chunk_overlap());
            segments.push(Segment {
                text: closed,
                start,
                end,
            });
        }

        if buf.is_empty() {
            buf.push_str(unit.text);
        } else {
            buf.push_str(joiner);
            buf.push_str(unit.text);
        }
        fresh = Some(match fresh {
            Some((start, _)) => (start, unit.end),
            None => (unit.start, unit.end),
        });
    }

    if !buf.is_empty() {
        let (start, end) = fresh.unwrap_or((0, 0));
        segments.push(Segment {
            text: buf,
            start,
            end,
        });
    }
    segments
}

fn split_paragraph(text: &str, config: &ChunkerConfig) -> Vec<Segment> {
    pack_units(&paragraph_units(text), "\n\n", config)
}

fn split_sentence(text: &str, config: &ChunkerConfig) -> Vec<Segment> {
    pack_units(&sentence_units(text), " ", config)
}

// ── Fixed-width strategy ────────────────────────────────────────────────────

/// Walk the text in `chunk_size`-byte windows. When a window ends mid-word,
/// backtrack to the nearest preceding space (never forward); with no space
/// in range, accept the hard cut. The next window starts `chunk_overlap`
/// bytes before the previous end, with a non-progress guard so pathological
/// overlap/size combinations still terminate.
fn split_fixed(text: &str, config: &ChunkerConfig) -> Vec<Segment> {
    let mut segments = Vec::new();
    let len = text.len();
    let mut start = 0usize;

    while start < len {
        let mut end = floor_char_boundary(text, (start + config.chunk_size()).min(len));

        // Backtrack so words are not split mid-token.
        let cut_mid_word = end < len
            && !text[end..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace);
        if cut_mid_word {
            if let Some(pos) = text[start..end].rfind(' ') {
                if pos > 0 {
                    end = start + pos;
                }
            }
        }

        let window = &text[start..end];
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            let lead = window.len() - window.trim_start().len();
            segments.push(Segment {
                text: trimmed.to_string(),
                start: start + lead,
                end: start + lead + trimmed.len(),
            });
        }

        if end >= len {
            break;
        }
        // Floor before the guard: rounding down to a char boundary can eat
        // the whole advance when the overlap nearly equals the window size.
        let next = floor_char_boundary(text, end.saturating_sub(config.chunk_overlap()));
        // Non-progress guard: force forward movement.
        start = if next <= start || next >= end { end } else { next };
    }
    segments
}

// ── Token (approximate) strategy ────────────────────────────────────────────

/// Window over whitespace words, converting the character budgets through
/// the estimated mean word length (`len / word_count`). An approximation,
/// not a tokenizer.
fn split_token(text: &str, config: &ChunkerConfig) -> Vec<Segment> {
    let words = word_units(text);
    if words.is_empty() {
        return Vec::new();
    }

    let avg_word_len = (text.len() as f64 / words.len() as f64).max(1.0);
    let words_per_chunk = ((config.chunk_size() as f64 / avg_word_len) as usize).max(1);
    let overlap_words = (config.chunk_overlap() as f64 / avg_word_len) as usize;

    let mut segments = Vec::new();
    let mut i = 0usize;
    while i < words.len() {
        let end = (i + words_per_chunk).min(words.len());
        let slice = &words[i..end];
        segments.push(Segment {
            text: slice
                .iter()
                .map(|u| u.text)
                .collect::<Vec<_>>()
                .join(" "),
            start: slice[0].start,
            end: slice[slice.len() - 1].end,
        });

        if end >= words.len() {
            break;
        }
        let next = end.saturating_sub(overlap_words);
        // Same non-progress guard as the fixed strategy, counting words.
        i = if next <= i || next >= end { end } else { next };
    }
    segments
}
