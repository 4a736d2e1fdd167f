//! Diff engine for Forkline.
//!
//! Computes structured, fragment-annotated diffs between two texts and builds
//! character-level patches that can be replayed onto text that has drifted
//! from the original.
//!
//! # Key Types
//!
//! - [`Block`] -- Contiguous run of inserted, deleted, or kept lines
//! - [`DiffResult`] / [`Line`] / [`Fragment`] -- Per-line diff output
//! - [`DiffMode`] -- Whole-line or intra-line (word) highlighting
//! - [`Patch`] / [`Hunk`] -- Context-anchored edit script for `PATCH`

pub mod block;
pub mod line;
pub mod patch;
pub mod result;

pub use block::{calc_block_diff, Block, Ope};
pub use line::{line_diff, word_diff};
pub use patch::{Hunk, Patch, PatchOutcome};
pub use result::{diff, DiffMode, DiffResult, Fragment, Line};
