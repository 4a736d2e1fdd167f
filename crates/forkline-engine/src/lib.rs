//! Transformation engine for Forkline.
//!
//! An [`Engine`] owns one branch of a versioned value. Writes are recorded in
//! a bounded undo history and can be undone, redone, or reconciled with
//! another branch of the same document through a [`MergePolicy`].
//!
//! # Key Types
//!
//! - [`Engine`] -- Branch of a value with undo, redo, batch, and merge
//! - [`State`] -- Value plus its document id and version
//! - [`Action`] -- Operation kinds recorded in history
//! - [`History`] -- Bounded revision stack
//! - [`EngineConfig`] -- History capacity and merge policy, loadable from TOML
//!
//! ```
//! use forkline_engine::{Engine, MergeOutcome};
//! use forkline_text::{StringOp, StringValue};
//! use forkline_types::Owner;
//!
//! let mut alice = Engine::new(Owner::new("alice"), StringValue::from("draft"));
//! let mut bob = alice.fork(Owner::new("bob"));
//! bob.apply(StringOp::concat(" v2"));
//!
//! assert_eq!(alice.merge(&bob), MergeOutcome::Adopted);
//! assert_eq!(alice.value().as_str(), "draft v2");
//!
//! alice.undo(1);
//! assert_eq!(alice.value().as_str(), "draft");
//! ```

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod merge;
pub mod state;

pub use action::{Action, BatchStep};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::ConfigError;
pub use history::{History, Revision};
pub use merge::{MergeOutcome, MergePolicy};
pub use state::{Snapshot, State};
