#[macro_use]
mod macros;

pub use crate::sequence::Sequence;

use crate::{
    engine::Engine,
    error::ReplicaError,
    spec::{CloneIndex, SpecRegistry},
    table::FieldTable,
    walk::{CloneWalk, UpdateWalk},
};
use std::{rc::Rc, sync::Arc};

// ============================================================================
// CAPABILITY
// ============================================================================

///
/// Clonable
///
/// Capability contract for entities the engine can deep clone and update.
///
/// An implementation names its type path and hands out its field table;
/// everything else is provided. The table is built once per type, usually
/// behind a `OnceLock`, either by hand through `FieldTable::builder` or by
/// `#[derive(Clonable)]`.
///

pub trait Clonable: Default + Sized + 'static {
    const PATH: &'static str;

    /// Per-field clone and update policy for this type's own fields.
    fn field_table() -> &'static FieldTable<Self>;

    /// Fresh instance the clone walk copies into.
    ///
    /// Override to report that the type cannot be constructed for cloning;
    /// the error should be `ReplicaError::construction`.
    fn allocate() -> Result<Self, ReplicaError> {
        Ok(Self::default())
    }

    /// Deep clone through the global engine. Never mutates `self`.
    fn clone_self(&self) -> Result<Self, ReplicaError> {
        Engine::global().clone_entity(self)
    }

    /// Apply update specifications in place for clone `index`.
    fn update_self(&mut self, index: CloneIndex) -> Result<(), ReplicaError> {
        Engine::global().update_entity(self, index)
    }

    /// Like `update_self`, resolving specs from `registry`.
    fn update_self_with(
        &mut self,
        index: CloneIndex,
        registry: &SpecRegistry,
    ) -> Result<(), ReplicaError> {
        Engine::global().update_entity_with(self, index, registry)
    }

    /// Restore spec-bound fields to their un-indexed values.
    fn reset_self(&mut self) -> Result<(), ReplicaError> {
        Engine::global().reset_entity(self)
    }
}

// ============================================================================
// ELEMENTS
// ============================================================================

///
/// Replicate
///
/// Anything the default clone rule can deep copy.
/// Clonable entities recurse through their tables, sequences clone
/// elementwise, scalars are copied. `refresh` is the update-walk
/// counterpart and does nothing for plain values.
///

pub trait Replicate: Sized {
    fn replicate(&self, walk: &mut CloneWalk) -> Result<Self, ReplicaError>;

    fn refresh(&mut self, _walk: &mut UpdateWalk<'_>) -> Result<(), ReplicaError> {
        Ok(())
    }
}

impl<T: Clonable> Replicate for T {
    fn replicate(&self, walk: &mut CloneWalk) -> Result<Self, ReplicaError> {
        walk.descend(T::PATH, |walk| {
            let mut destination = T::allocate()?;
            T::field_table().clone_fields(self, &mut destination, walk)?;

            Ok(destination)
        })
    }

    fn refresh(&mut self, walk: &mut UpdateWalk<'_>) -> Result<(), ReplicaError> {
        walk.descend(T::PATH, |walk| T::field_table().update_fields(self, walk))
    }
}

impl<T: Replicate> Replicate for Option<T> {
    fn replicate(&self, walk: &mut CloneWalk) -> Result<Self, ReplicaError> {
        self.as_ref().map(|inner| inner.replicate(walk)).transpose()
    }

    fn refresh(&mut self, walk: &mut UpdateWalk<'_>) -> Result<(), ReplicaError> {
        match self {
            Some(inner) => inner.refresh(walk),
            None => Ok(()),
        }
    }
}

impl_scalar!(Replicate);

// ============================================================================
// SHARING
// ============================================================================

///
/// Shared
///
/// Handle types a `Share` field may hold. Cloning the handle yields the
/// same referent, so origin and clone observe one value.
///

pub trait Shared: Clone {
    /// True when both handles point at the same referent.
    fn shares_with(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Shared for Rc<T> {
    fn shares_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Shared for Arc<T> {
    fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Shared for &'static T {
    fn shares_with(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

impl<S: Shared> Shared for Option<S> {
    fn shares_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.shares_with(b),
            (None, None) => true,
            _ => false,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_handles_share_only_when_both_point_at_one_value() {
        let shared = Rc::new(5u8);
        let other = Rc::new(5u8);

        assert!(Some(Rc::clone(&shared)).shares_with(&Some(Rc::clone(&shared))));
        assert!(!Some(Rc::clone(&shared)).shares_with(&Some(other)));
        assert!(None::<Rc<u8>>.shares_with(&None));
        assert!(!Some(shared).shares_with(&None));
    }

    #[test]
    fn static_references_compare_by_address() {
        static A: [u8; 2] = [1, 2];
        static B: [u8; 2] = [1, 2];

        let a: &'static [u8; 2] = &A;
        let b: &'static [u8; 2] = &B;

        assert!(a.shares_with(&a));
        assert!(!a.shares_with(&b));
    }
}
