//! Diff output types and the top-level [`diff`] entry point.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::{calc_block_diff, Ope};
use crate::line::{line_diff, word_diff};

/// Granularity of change highlighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffMode {
    /// Every changed line is flagged in full.
    #[default]
    LineByLine,
    /// Replaced lines are refined to flag only the changed spans.
    WordByWord,
}

/// A sub-span of a line, flagged as changed or unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub changed: bool,
}

impl Fragment {
    pub fn new(text: impl Into<String>, changed: bool) -> Self {
        Self {
            text: text.into(),
            changed,
        }
    }
}

/// A single output line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub ope: Ope,
    /// 1-based line number in the old text (absent for inserted lines).
    pub old_line_number: Option<usize>,
    /// 1-based line number in the new text (absent for deleted lines).
    pub new_line_number: Option<usize>,
    pub fragments: Vec<Fragment>,
}

impl Line {
    /// The full text of the line.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Returns `true` if any fragment is flagged changed.
    pub fn has_changes(&self) -> bool {
        self.fragments.iter().any(|f| f.changed)
    }
}

/// The result of diffing two texts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub mode: DiffMode,
    pub lines: Vec<Line>,
}

impl DiffResult {
    /// Returns `true` if every line is kept.
    pub fn is_unchanged(&self) -> bool {
        self.lines.iter().all(|l| l.ope == Ope::Keep)
    }

    /// Number of inserted lines.
    pub fn additions(&self) -> usize {
        self.lines.iter().filter(|l| l.ope == Ope::Insert).count()
    }

    /// Number of deleted lines.
    pub fn deletions(&self) -> usize {
        self.lines.iter().filter(|l| l.ope == Ope::Delete).count()
    }
}

/// Render one line per output line: a two-character marker followed by the
/// line text. In [`DiffMode::WordByWord`] changed fragments are bracketed.
impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line.ope.marker())?;
            for fragment in &line.fragments {
                if self.mode == DiffMode::WordByWord && fragment.changed && !fragment.text.is_empty() {
                    write!(f, "[{}]", fragment.text)?;
                } else {
                    f.write_str(&fragment.text)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Diff `old` against `new` at the requested granularity.
pub fn diff(old: &str, new: &str, mode: DiffMode) -> DiffResult {
    let blocks = calc_block_diff(old, new);
    let lines = match mode {
        DiffMode::LineByLine => line_diff(&blocks),
        DiffMode::WordByWord => word_diff(&blocks),
    };
    DiffResult { mode, lines }
}
