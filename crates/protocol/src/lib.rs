//! Wire types for remote command batches.
//!
//! A batch is an ordered list of [`CommandDescriptor`]s decoded from JSON or
//! NDJSON. Argument values stay untyped at this layer; `rc-core` converts them
//! into each command's declared argument shape.
//!
//! Types in this crate are pure data: they only know how to (de)serialize
//! themselves and how to name their enum variants.

pub mod descriptor;
pub mod types;

pub use descriptor::*;
pub use types::*;
