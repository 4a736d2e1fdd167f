//! Expansion of blocks into per-line output.
//!
//! [`line_diff`] marks every non-kept line as changed in full. [`word_diff`]
//! additionally refines each line-level replacement (a `Delete` block
//! immediately followed by an `Insert` block) with a character-level diff so
//! that only the changed spans of a line are flagged.

use similar::{Algorithm, ChangeTag, TextDiff};

use crate::block::{Block, Ope};
use crate::result::{Fragment, Line};

/// Expand each block into one [`Line`] per contained line.
pub fn line_diff(blocks: &[Block]) -> Vec<Line> {
    blocks.iter().flat_map(expand_block).collect()
}

/// Expand blocks with intra-line highlighting for replacement pairs.
///
/// Only a `Delete` block immediately followed by an `Insert` block is
/// refined; every other block (isolated, or an `Insert` before a `Delete`)
/// is expanded exactly as [`line_diff`] does.
pub fn word_diff(blocks: &[Block]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut index = 0;

    while index < blocks.len() {
        let block = &blocks[index];
        let paired = blocks
            .get(index + 1)
            .filter(|next| block.ope == Ope::Delete && next.ope == Ope::Insert);

        match paired {
            Some(inserted) => {
                lines.extend(refine_pair(block, inserted));
                index += 2;
            }
            None => {
                lines.extend(expand_block(block));
                index += 1;
            }
        }
    }

    lines
}

/// Split block text into lines, dropping the trailing empty piece left by a
/// final newline.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = text.split('\n').collect();
    if parts.last().is_some_and(|last| last.is_empty()) {
        parts.pop();
    }
    parts
}

fn expand_block(block: &Block) -> Vec<Line> {
    let changed = block.ope != Ope::Keep;
    split_lines(&block.text)
        .into_iter()
        .enumerate()
        .map(|(offset, text)| Line {
            ope: block.ope,
            old_line_number: block.old_line.map(|n| n + offset),
            new_line_number: block.new_line.map(|n| n + offset),
            fragments: vec![Fragment::new(text, changed)],
        })
        .collect()
}

fn refine_pair(deleted: &Block, inserted: &Block) -> Vec<Line> {
    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(deleted.text.as_str(), inserted.text.as_str());

    let mut old_side = SideLines::new(Ope::Delete, deleted.old_line.unwrap_or(1));
    let mut new_side = SideLines::new(Ope::Insert, inserted.new_line.unwrap_or(1));

    for change in text_diff.iter_all_changes() {
        let text = change.value();
        match change.tag() {
            ChangeTag::Equal => {
                old_side.push(text, false);
                new_side.push(text, false);
            }
            ChangeTag::Delete => old_side.push(text, true),
            ChangeTag::Insert => new_side.push(text, true),
        }
    }

    let mut lines = old_side.finish();
    lines.extend(new_side.finish());
    lines
}

/// Accumulates fragments for one side of a replacement pair, closing a
/// line at every newline.
struct SideLines {
    ope: Ope,
    next_number: usize,
    fragments: Vec<Fragment>,
    lines: Vec<Line>,
}

impl SideLines {
    fn new(ope: Ope, first_number: usize) -> Self {
        Self {
            ope,
            next_number: first_number,
            fragments: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn push(&mut self, text: &str, changed: bool) {
        for (index, piece) in text.split('\n').enumerate() {
            if index > 0 {
                self.close_line();
            }
            if piece.is_empty() {
                continue;
            }
            match self.fragments.last_mut() {
                Some(last) if last.changed == changed => last.text.push_str(piece),
                _ => self.fragments.push(Fragment::new(piece, changed)),
            }
        }
    }

    fn close_line(&mut self) {
        let mut fragments = std::mem::take(&mut self.fragments);
        if fragments.is_empty() {
            // An emptied or blank line inside a replacement.
            fragments.push(Fragment::new("", true));
        }
        let number = Some(self.next_number);
        let (old_line_number, new_line_number) = match self.ope {
            Ope::Delete => (number, None),
            _ => (None, number),
        };
        self.lines.push(Line {
            ope: self.ope,
            old_line_number,
            new_line_number,
            fragments,
        });
        self.next_number += 1;
    }

    fn finish(mut self) -> Vec<Line> {
        if !self.fragments.is_empty() {
            self.close_line();
        }
        self.lines
    }
}
