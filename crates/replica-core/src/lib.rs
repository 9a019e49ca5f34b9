//! Core runtime for replica: the `Clonable` capability, per-field policy
//! tables, the clone and update walks, update specifications, and the
//! observability and configuration layers around them.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod engine;
pub mod error;
pub mod obs;
pub mod sequence;
pub mod spec;
pub mod table;
pub mod traits;
pub mod walk;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::ReplicaError;

///
/// CONSTANTS
///

/// Default maximum nesting depth for a single clone or update walk.
///
/// Entity graphs are trees; the limit turns pathological depth into a
/// structured error instead of a stack overflow.
pub const DEFAULT_MAX_DEPTH: usize = 64;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, walks, sinks, or registries are re-exported here.
///

pub mod prelude {
    pub use crate::{
        spec::{CloneIndex, UpdateSpecification},
        table::{CloneRule, FieldTable, UpdateRule},
        traits::{Clonable, Replicate, Sequence, Shared},
    };
}
