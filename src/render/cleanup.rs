//! Text cleanup applied to the reconstructed body.
//!
//! Besides character-level normalization, the aggressive preset removes
//! page furniture the layout engine failed to label: a block of lines that
//! recurs verbatim on many pages (letterheads) and bare page-number lines.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Unicode NFC normalization and blank-line collapsing
    #[default]
    Minimal,
    /// Minimal + ligature and replacement-character fixes
    Standard,
    /// Standard + repeated header block and page-number line removal
    Aggressive,
}

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove a block of lines that repeats on many pages
    pub remove_repeated_header_block: bool,

    /// Remove numeric lines that repeat on many pages
    pub remove_repeated_page_numbers: bool,

    /// Smallest block considered a repeated header
    pub min_block_lines: usize,

    /// Largest block considered a repeated header
    pub max_block_lines: usize,

    /// Repetitions required before a block or line counts as furniture
    pub min_repetitions: usize,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_replacement_char: false,
            remove_repeated_header_block: false,
            remove_repeated_page_numbers: false,
            min_block_lines: 3,
            max_block_lines: 8,
            min_repetitions: 3,
            max_consecutive_newlines: 2,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            fix_ligatures: true,
            remove_replacement_char: true,
            ..Self::minimal()
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            remove_repeated_header_block: true,
            remove_repeated_page_numbers: true,
            ..Self::standard()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::minimal()
    }
}

/// Text cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self {
            options,
            ligature_map: vec![
                ("\u{FB00}", "ff"),
                ("\u{FB01}", "fi"),
                ("\u{FB02}", "fl"),
                ("\u{FB03}", "ffi"),
                ("\u{FB04}", "ffl"),
                ("\u{FB05}", "st"),
                ("\u{FB06}", "st"),
            ],
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.remove_repeated_header_block || self.options.remove_repeated_page_numbers
        {
            result = self.remove_repeated_furniture(&result);
        }

        if self.options.max_consecutive_newlines > 0 {
            result = self.limit_newlines(&result);
        }

        result.trim().to_string()
    }

    fn remove_repeated_furniture(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();

        let header_block = if self.options.remove_repeated_header_block {
            self.find_repeated_block(&lines)
        } else {
            None
        };
        let page_numbers = if self.options.remove_repeated_page_numbers {
            self.find_repeated_page_numbers(&lines)
        } else {
            HashSet::new()
        };

        if let Some(ref block) = header_block {
            log::debug!("Removing repeated header block: {:?}", block);
        }
        if !page_numbers.is_empty() {
            log::debug!("Removing repeated page-number lines: {:?}", page_numbers);
        }

        let mut kept = Vec::with_capacity(lines.len());
        let mut i = 0;
        while i < lines.len() {
            if let Some(ref block) = header_block {
                if matches_block_at(&lines, i, block) {
                    i += block.len();
                    continue;
                }
            }
            if page_numbers.contains(&normalize_line(lines[i])) {
                i += 1;
                continue;
            }
            kept.push(lines[i]);
            i += 1;
        }

        kept.join("\n")
    }

    /// Most frequent run of consecutive non-empty lines, if it recurs often enough.
    fn find_repeated_block(&self, lines: &[&str]) -> Option<Vec<String>> {
        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        let mut first_seen: Vec<Vec<String>> = Vec::new();

        for start in 0..lines.len() {
            let block = extract_block(lines, start, self.options.max_block_lines);
            if block.len() < self.options.min_block_lines {
                continue;
            }
            let count = counts.entry(block.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(block);
            }
            *count += 1;
        }

        // Ties go to the block seen first.
        let mut best: Option<(&Vec<String>, usize)> = None;
        for block in &first_seen {
            let count = counts[block];
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((block, count));
            }
        }

        best.filter(|(_, count)| *count >= self.options.min_repetitions)
            .map(|(block, _)| block.clone())
    }

    fn find_repeated_page_numbers(&self, lines: &[&str]) -> HashSet<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for line in lines {
            let norm = normalize_line(line);
            if !norm.is_empty() && norm.chars().all(|c| c.is_ascii_digit()) {
                *counts.entry(norm).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .filter(|(_, c)| *c >= self.options.min_repetitions)
            .map(|(line, _)| line)
            .collect()
    }

    fn limit_newlines(&self, text: &str) -> String {
        let max = self.options.max_consecutive_newlines as usize;
        let pattern = format!(r"\n{{{},}}", max + 1);
        match Regex::new(&pattern) {
            Ok(re) => re.replace_all(text, "\n".repeat(max).as_str()).to_string(),
            Err(_) => text.to_string(),
        }
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_block(lines: &[&str], start: usize, max_len: usize) -> Vec<String> {
    lines[start..]
        .iter()
        .map(|l| normalize_line(l))
        .take_while(|l| !l.is_empty())
        .take(max_len)
        .collect()
}

fn matches_block_at(lines: &[&str], start: usize, block: &[String]) -> bool {
    if start + block.len() > lines.len() {
        return false;
    }
    block
        .iter()
        .enumerate()
        .all(|(offset, expected)| normalize_line(lines[start + offset]) == *expected)
}
