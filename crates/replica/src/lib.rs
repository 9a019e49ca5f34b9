//! ## Crate layout
//! - `traits`: the `Clonable`, `Replicate`, `Sequence` and `Shared` capabilities.
//! - `table`: per-type field tables with typed clone and update rules.
//! - `walk`: clone and update walk state.
//! - `spec`: update specifications, the built-in specs, and their registry.
//! - `engine`: configured entry points for clone, update and reset walks.
//! - `obs`: walk metrics and sink overrides.
//! - `config`: TOML engine configuration.
//!
//! `#[derive(Clonable)]` builds a field table from `#[replica(...)]` field
//! attributes; `#[derive(Replicate)]` covers enums holding entities.

pub use replica_core::*;
pub use replica_derive::{Clonable, Replicate};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// traits and derives needed to declare and use clonable entities
///

pub mod prelude {
    pub use replica_core::{
        engine::Engine,
        prelude::*,
        spec::{IndexSuffix, OffsetByIndex},
    };
    pub use replica_derive::{Clonable, Replicate};
}
