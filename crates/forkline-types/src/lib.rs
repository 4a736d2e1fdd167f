//! Foundation types for Forkline.
//!
//! This crate provides the identity, ordering, and contract types shared by
//! every other Forkline crate. Values and operations are defined here so that
//! concrete value types (such as `forkline-text`) and the transformation
//! engine can depend on the same contract without depending on each other.
//!
//! # Key Types
//!
//! - [`Value`] -- Substitutable unit of state: operate, reverse, serialize
//! - [`Operation`] -- Identified, timestamped envelope around an operation kind
//! - [`OperationId`] -- UUID v7 operation identifier
//! - [`Version`] -- Time-sortable version string used as a logical clock
//! - [`StateId`] -- Identity of a logical document shared by all its branches
//! - [`Owner`] -- Actor responsible for a branch, used for merge provenance
//! - [`Clock`] -- Injectable time source for operation timestamps

pub mod clock;
pub mod error;
pub mod id;
pub mod operation;
pub mod owner;
pub mod value;
pub mod version;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TypeError;
pub use id::{OperationId, OwnerId, StateId};
pub use operation::Operation;
pub use owner::Owner;
pub use value::Value;
pub use version::Version;
