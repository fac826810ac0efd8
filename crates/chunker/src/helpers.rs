//! Boundary detection and text utilities shared by the splitting strategies.

/// A unit of text (paragraph, sentence, or word) with its byte span in the
/// original input. `text` is trimmed; `start`/`end` cover the trimmed region.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Unit<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

fn push_trimmed<'a>(units: &mut Vec<Unit<'a>>, text: &'a str, start: usize, end: usize) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    let s = start + lead;
    units.push(Unit {
        start: s,
        end: s + trimmed.len(),
        text: trimmed,
    });
}

/// Split `text` into paragraphs at blank-line boundaries (one or more lines
/// that are empty after trimming). Empty paragraphs are discarded.
pub(crate) fn paragraph_units(text: &str) -> Vec<Unit<'_>> {
    let mut units = Vec::new();
    let mut block_start: Option<usize> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(start) = block_start.take() {
                push_trimmed(&mut units, text, start, offset);
            }
        } else if block_start.is_none() {
            block_start = Some(offset);
        }
        offset += line.len();
    }
    if let Some(start) = block_start {
        push_trimmed(&mut units, text, start, text.len());
    }
    units
}

/// Split `text` into sentences at terminal punctuation (`.`, `!`, `?`)
/// followed by whitespace. A deliberately simple heuristic — abbreviations
/// and decimals will over-split, which the packing step tolerates.
pub(crate) fn sentence_units(text: &str) -> Vec<Unit<'_>> {
    let bytes = text.as_bytes();
    let mut units = Vec::new();
    let mut start = 0;

    // Branching only on ASCII bytes is UTF-8 safe: continuation bytes never
    // match `.`, `!`, or `?`.
    for i in 0..bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?')
            && text[i + 1..]
                .chars()
                .next()
                .is_some_and(char::is_whitespace)
        {
            push_trimmed(&mut units, text, start, i + 1);
            start = i + 1;
        }
    }
    push_trimmed(&mut units, text, start, text.len());
    units
}

/// Split `text` into whitespace-separated words with their byte spans.
pub(crate) fn word_units(text: &str) -> Vec<Unit<'_>> {
    let mut units = Vec::new();
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                units.push(Unit {
                    start: s,
                    end: i,
                    text: &text[s..i],
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        units.push(Unit {
            start: s,
            end: text.len(),
            text: &text[s..],
        });
    }
    units
}

/// Word tail of `text` approximating `overlap` characters, assuming an
/// average word length of ~5 characters. Used to seed the next chunk when
/// packing paragraph/sentence units.
pub(crate) fn overlap_tail(text: &str, overlap: usize) -> String {
    if overlap == 0 {
        return String::new();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    let take = (overlap / 5).min(words.len());
    words[words.len() - take..].join(" ")
}

/// Largest char boundary `<= idx`. Hard cuts must never split a code point.
pub(crate) fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
