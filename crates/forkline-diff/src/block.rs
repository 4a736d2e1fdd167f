//! Block-level diff: line-granular comparison of two texts.
//!
//! Uses the `similar` crate (Myers diff algorithm) over interned lines, so
//! each distinct line behaves as a single symbol. Consecutive changes are
//! coalesced: every maximal run of non-equal lines becomes one `Delete` block
//! followed by one `Insert` block.

use std::fmt;

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// Classification of a block or line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ope {
    Insert,
    Delete,
    Keep,
}

impl Ope {
    /// Prefix used when rendering a line of this kind.
    pub fn marker(self) -> &'static str {
        match self {
            Ope::Insert => "+ ",
            Ope::Delete => "- ",
            Ope::Keep => "  ",
        }
    }
}

impl fmt::Display for Ope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ope::Insert => write!(f, "Insert"),
            Ope::Delete => write!(f, "Delete"),
            Ope::Keep => write!(f, "Keep"),
        }
    }
}

/// A contiguous, diff-classified run of whole lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub ope: Ope,
    /// Raw text of the run, newlines included.
    pub text: String,
    /// 1-based line number of the first line in the old text.
    /// `None` for `Insert` blocks.
    pub old_line: Option<usize>,
    /// 1-based line number of the first line in the new text.
    /// `None` for `Delete` blocks.
    pub new_line: Option<usize>,
}

impl Block {
    /// Number of newline characters in the block.
    pub fn newlines(&self) -> usize {
        self.text.matches('\n').count()
    }
}

/// Compute the ordered block diff between `old` and `new`.
///
/// Keep blocks advance both line counters, delete blocks the old counter and
/// insert blocks the new counter, each by the number of newline characters
/// consumed.
pub fn calc_block_diff(old: &str, new: &str) -> Vec<Block> {
    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(old, new);

    let mut blocks = Vec::new();
    let mut kept = String::new();
    let mut deleted = String::new();
    let mut inserted = String::new();
    let mut old_line = 1usize;
    let mut new_line = 1usize;

    for change in text_diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Equal => {
                flush_changes(
                    &mut blocks,
                    &mut deleted,
                    &mut inserted,
                    &mut old_line,
                    &mut new_line,
                );
                kept.push_str(change.value());
            }
            ChangeTag::Delete => {
                flush_kept(&mut blocks, &mut kept, &mut old_line, &mut new_line);
                deleted.push_str(change.value());
            }
            ChangeTag::Insert => {
                flush_kept(&mut blocks, &mut kept, &mut old_line, &mut new_line);
                inserted.push_str(change.value());
            }
        }
    }
    flush_kept(&mut blocks, &mut kept, &mut old_line, &mut new_line);
    flush_changes(
        &mut blocks,
        &mut deleted,
        &mut inserted,
        &mut old_line,
        &mut new_line,
    );

    blocks
}

fn flush_kept(blocks: &mut Vec<Block>, kept: &mut String, old_line: &mut usize, new_line: &mut usize) {
    if kept.is_empty() {
        return;
    }
    let block = Block {
        ope: Ope::Keep,
        text: std::mem::take(kept),
        old_line: Some(*old_line),
        new_line: Some(*new_line),
    };
    *old_line += block.newlines();
    *new_line += block.newlines();
    blocks.push(block);
}

fn flush_changes(
    blocks: &mut Vec<Block>,
    deleted: &mut String,
    inserted: &mut String,
    old_line: &mut usize,
    new_line: &mut usize,
) {
    if !deleted.is_empty() {
        let block = Block {
            ope: Ope::Delete,
            text: std::mem::take(deleted),
            old_line: Some(*old_line),
            new_line: None,
        };
        *old_line += block.newlines();
        blocks.push(block);
    }
    if !inserted.is_empty() {
        let block = Block {
            ope: Ope::Insert,
            text: std::mem::take(inserted),
            old_line: None,
            new_line: Some(*new_line),
        };
        *new_line += block.newlines();
        blocks.push(block);
    }
}
