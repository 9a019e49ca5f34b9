mod index_suffix;
mod offset;
mod registry;

pub use index_suffix::{IndexOrder, IndexSuffix};
pub use offset::OffsetByIndex;
pub use registry::SpecRegistry;

use derive_more::{Display, From};
use thiserror::Error as ThisError;

///
/// CloneIndex
///
/// Identifies which copy in a batch of clones an update call customizes.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct CloneIndex(u32);

impl CloneIndex {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

///
/// UpdateSpecification
///
/// Pure transformation applied to one field's value given a clone index.
/// Implementations are stateless; the registry keeps one instance per type.
///

pub trait UpdateSpecification: Send + Sync + 'static {
    type Value;

    /// Produce the value a clone with `index` should carry.
    fn update(&self, original: &Self::Value, index: CloneIndex) -> Result<Self::Value, SpecError>;

    /// Undo previous updates, returning the un-indexed value.
    fn reset(&self, _updated: &Self::Value) -> Result<Self::Value, SpecError> {
        Err(SpecError::NotReversible)
    }
}

///
/// SpecError
///
/// Failure reported by a specification for a single value.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SpecError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("specification cannot reset an updated value")]
    NotReversible,
}

impl SpecError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Stable identifier used for a spec in descriptors and diagnostics.
#[must_use]
pub fn spec_id<S: UpdateSpecification>() -> &'static str {
    std::any::type_name::<S>()
}
