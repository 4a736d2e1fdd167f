//! String value for Forkline.
//!
//! [`StringValue`] is the canonical [`Value`](forkline_types::Value)
//! implementation: an immutable string transformed by [`StringOp`]s. The
//! `PATCH` operation replays a character-level patch made from a
//! `before`/`after` pair, so an edit captured on one branch can be applied to
//! text that has since drifted.
//!
//! Schema validation ([`StringSchema`]) is the one fail-fast path; the engine
//! never invokes it on its own.

pub mod error;
pub mod op;
pub mod schema;
pub mod value;

pub use error::SchemaError;
pub use op::StringOp;
pub use schema::StringSchema;
pub use value::StringValue;
