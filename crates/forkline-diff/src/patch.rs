//! Character-level patches.
//!
//! A [`Patch`] is made from a `before`/`after` pair and can be applied to any
//! text, not only `before`. Each [`Hunk`] carries a few characters of
//! surrounding context; on application the hunk is located by its context
//! (expected offset first, nearest other occurrence otherwise) so that edits
//! still land when the target has drifted from `before`.

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// Characters of context kept on each side of a change.
pub const PATCH_MARGIN: usize = 4;

/// One context-anchored edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Byte offset of `old` in the text the patch was made from.
    pub offset: usize,
    /// Leading context, deleted text, and trailing context.
    pub old: String,
    /// Leading context, inserted text, and trailing context.
    pub new: String,
}

/// Result of applying a patch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchOutcome {
    pub text: String,
    /// Per hunk, whether it was located and applied.
    pub applied: Vec<bool>,
}

impl PatchOutcome {
    pub fn all_applied(&self) -> bool {
        self.applied.iter().all(|a| *a)
    }
}

/// An ordered list of hunks turning one text into another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    hunks: Vec<Hunk>,
}

impl Patch {
    /// Build the patch that turns `before` into `after`.
    pub fn make(before: &str, after: &str) -> Self {
        let runs = change_runs(before, after);
        let mut hunks = Vec::new();
        let mut current: Option<Hunk> = None;
        let mut old_pos = 0usize;

        for (index, (tag, text)) in runs.iter().enumerate() {
            match tag {
                ChangeTag::Equal => {
                    if let Some(hunk) = current.as_mut() {
                        let is_last = index + 1 == runs.len();
                        if !is_last && text.chars().count() <= 2 * PATCH_MARGIN {
                            hunk.old.push_str(text);
                            hunk.new.push_str(text);
                        } else {
                            let context = head_chars(text, PATCH_MARGIN);
                            hunk.old.push_str(context);
                            hunk.new.push_str(context);
                            hunks.extend(current.take());
                        }
                    }
                    old_pos += text.len();
                }
                ChangeTag::Delete | ChangeTag::Insert => {
                    let hunk = current.get_or_insert_with(|| {
                        let context = match index.checked_sub(1).map(|i| &runs[i]) {
                            Some((ChangeTag::Equal, previous)) => tail_chars(previous, PATCH_MARGIN),
                            _ => "",
                        };
                        Hunk {
                            offset: old_pos - context.len(),
                            old: context.to_string(),
                            new: context.to_string(),
                        }
                    });
                    if *tag == ChangeTag::Delete {
                        hunk.old.push_str(text);
                        old_pos += text.len();
                    } else {
                        hunk.new.push_str(text);
                    }
                }
            }
        }
        hunks.extend(current);

        Self { hunks }
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Apply every hunk in order to `text`.
    ///
    /// Hunks that cannot be located are skipped and reported as `false` in
    /// [`PatchOutcome::applied`]; the remaining hunks still apply.
    pub fn apply(&self, text: &str) -> PatchOutcome {
        let mut result = text.to_string();
        let mut applied = Vec::with_capacity(self.hunks.len());
        // Drift between hunk offsets and positions in `result`.
        let mut delta: isize = 0;

        for hunk in &self.hunks {
            let expected = (hunk.offset as isize + delta).clamp(0, result.len() as isize) as usize;
            match locate(&result, &hunk.old, expected) {
                Some(at) => {
                    result.replace_range(at..at + hunk.old.len(), &hunk.new);
                    delta = at as isize - hunk.offset as isize + hunk.new.len() as isize
                        - hunk.old.len() as isize;
                    applied.push(true);
                }
                None => applied.push(false),
            }
        }

        PatchOutcome {
            text: result,
            applied,
        }
    }
}

/// Find `needle` in `haystack`, preferring `expected`, else the nearest match.
fn locate(haystack: &str, needle: &str, expected: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(floor_char_boundary(haystack, expected));
    }
    if haystack
        .get(expected..)
        .is_some_and(|rest| rest.starts_with(needle))
    {
        return Some(expected);
    }
    haystack
        .match_indices(needle)
        .map(|(at, _)| at)
        .min_by_key(|at| at.abs_diff(expected))
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    (0..=index.min(text.len()))
        .rev()
        .find(|i| text.is_char_boundary(*i))
        .unwrap_or(0)
}

/// Character diff of `before` and `after`, coalesced into runs of one tag.
fn change_runs(before: &str, after: &str) -> Vec<(ChangeTag, String)> {
    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(before, after);

    let mut runs: Vec<(ChangeTag, String)> = Vec::new();
    for change in text_diff.iter_all_changes() {
        match runs.last_mut() {
            Some((tag, text)) if *tag == change.tag() => text.push_str(change.value()),
            _ => runs.push((change.tag(), change.value().to_string())),
        }
    }
    runs
}

fn head_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn tail_chars(text: &str, count: usize) -> &str {
    match count.checked_sub(1).and_then(|n| text.char_indices().rev().nth(n)) {
        Some((start, _)) => &text[start..],
        None if count == 0 => "",
        None => text,
    }
}
