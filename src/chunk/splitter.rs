//! Recursive separator splitting measured in tokens.
//!
//! Text is cut on the coarsest separator present (`"\n\n"`, then `"\n"`,
//! then `" "`, then between characters). Each separator stays attached to the
//! start of the piece that follows it. Short pieces are greedily packed back
//! together up to the chunk size, carrying trailing pieces worth up to the
//! overlap into the next chunk; pieces that are still too long are split again
//! with the next separator.

use super::Tokenizer;

/// Default separators, coarsest first.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive splitter over a tokenizer.
pub struct RecursiveSplitter<'a> {
    tokenizer: &'a dyn Tokenizer,
    chunk_size: usize,
    overlap: usize,
    separators: Vec<String>,
}

impl<'a> RecursiveSplitter<'a> {
    /// Create a splitter with the default separators.
    pub fn new(tokenizer: &'a dyn Tokenizer, chunk_size: usize, overlap: usize) -> Self {
        Self {
            tokenizer,
            chunk_size,
            overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the separator list.
    pub fn with_separators<S: Into<String>>(mut self, separators: impl IntoIterator<Item = S>) -> Self {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Split text into trimmed, non-empty chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut short: Vec<&str> = Vec::new();

        for piece in split_keep_start(text, separator) {
            if self.tokenizer.count(piece) < self.chunk_size {
                short.push(piece);
                continue;
            }
            if !short.is_empty() {
                chunks.extend(self.merge(&short));
                short.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_with(piece, remaining));
            }
        }
        if !short.is_empty() {
            chunks.extend(self.merge(&short));
        }

        chunks
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Greedily pack pieces into chunks, keeping up to `overlap` tokens of
    /// trailing pieces at the start of the next chunk.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<(&str, usize)> = Vec::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = self.tokenizer.count(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                if total > self.chunk_size {
                    log::warn!(
                        "Created a chunk of {} tokens, longer than the limit of {}",
                        total,
                        self.chunk_size
                    );
                }
                push_joined(&mut chunks, &window);

                while total > self.overlap || (total + len > self.chunk_size && total > 0) {
                    let Some((_, first_len)) = window.first().copied() else {
                        break;
                    };
                    total -= first_len;
                    window.remove(0);
                }
            }
            window.push((piece, len));
            total += len;
        }
        push_joined(&mut chunks, &window);

        chunks
    }
}

fn push_joined(chunks: &mut Vec<String>, window: &[(&str, usize)]) {
    let joined: String = window.iter().map(|(p, _)| *p).collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Split on `separator`, attaching each separator to the following piece.
///
/// An empty separator splits between characters. Empty pieces are dropped.
fn split_keep_start<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, _) in text.match_indices(separator) {
        pieces.push(&text[start..index]);
        start = index;
    }
    pieces.push(&text[start..]);
    pieces.retain(|p| !p.is_empty());
    pieces
}
