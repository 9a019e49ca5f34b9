use crate::{
    error::ReplicaError,
    traits::Replicate,
    walk::{CloneWalk, UpdateWalk},
};
use std::collections::{LinkedList, VecDeque};

///
/// Sequence
///
/// Ordered, homogeneous container the engine can walk elementwise.
///
/// Cloning a sequence replicates each element and then asks the origin to
/// `rebuild` a container of the same kind from the copies. Kinds without a
/// rebuild strategy keep the default, which reports the kind as
/// unsupported; a field can still supply one through
/// `CloneRule::sequence_with`.
///

pub trait Sequence: Sized {
    type Item;

    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    type IterMut<'a>: Iterator<Item = &'a mut Self::Item>
    where
        Self: 'a;

    /// Kind name used in diagnostics.
    const KIND: &'static str;

    fn items(&self) -> Self::Iter<'_>;

    fn items_mut(&mut self) -> Self::IterMut<'_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// New container of the same kind as `self`, holding `items` in order.
    fn rebuild(&self, _items: Vec<Self::Item>) -> Result<Self, ReplicaError> {
        Err(ReplicaError::unsupported_container(Self::KIND))
    }
}

/// Replicate every element of `origin` in order.
pub fn replicate_items<S>(origin: &S, walk: &mut CloneWalk) -> Result<Vec<S::Item>, ReplicaError>
where
    S: Sequence,
    S::Item: Replicate,
{
    let mut copies = Vec::with_capacity(origin.len());
    for (i, item) in origin.items().enumerate() {
        copies.push(item.replicate(walk).map_err(|err| err.with_index(i))?);
    }

    Ok(copies)
}

/// Replicate `origin` into a new container of the same kind.
pub fn replicate_sequence<S>(origin: &S, walk: &mut CloneWalk) -> Result<S, ReplicaError>
where
    S: Sequence,
    S::Item: Replicate,
{
    let copies = replicate_items(origin, walk)?;

    origin.rebuild(copies)
}

/// Run the update walk over every element in place.
pub fn refresh_items<S>(target: &mut S, walk: &mut UpdateWalk<'_>) -> Result<(), ReplicaError>
where
    S: Sequence,
    S::Item: Replicate,
{
    for (i, item) in target.items_mut().enumerate() {
        item.refresh(walk).map_err(|err| err.with_index(i))?;
    }

    Ok(())
}

// impl_sequence
// std sequences rebuild by collecting, which preserves their kind
macro_rules! impl_sequence {
    ($($ty:ident => $kind:literal),* $(,)?) => {
        $(
            impl<T> Sequence for $ty<T> {
                type Item = T;
                type Iter<'a> = <&'a $ty<T> as IntoIterator>::IntoIter where Self: 'a;
                type IterMut<'a> = <&'a mut $ty<T> as IntoIterator>::IntoIter where Self: 'a;

                const KIND: &'static str = $kind;

                fn items(&self) -> Self::Iter<'_> {
                    self.iter()
                }

                fn items_mut(&mut self) -> Self::IterMut<'_> {
                    self.iter_mut()
                }

                fn len(&self) -> usize {
                    $ty::len(self)
                }

                fn rebuild(&self, items: Vec<T>) -> Result<Self, ReplicaError> {
                    Ok(items.into_iter().collect())
                }
            }

            impl<T: Replicate> Replicate for $ty<T> {
                fn replicate(&self, walk: &mut CloneWalk) -> Result<Self, ReplicaError> {
                    replicate_sequence(self, walk)
                }

                fn refresh(&mut self, walk: &mut UpdateWalk<'_>) -> Result<(), ReplicaError> {
                    refresh_items(self, walk)
                }
            }
        )*
    };
}

impl_sequence!(
    Vec => "Vec",
    VecDeque => "VecDeque",
    LinkedList => "LinkedList",
);

///
/// TESTS
///
