use crate::spec::{CloneIndex, SpecError, UpdateSpecification};
use num_traits::{NumCast, PrimInt};
use std::{fmt, marker::PhantomData};

///
/// OffsetByIndex
///
/// Built-in spec for integer fields: the clone index is added to the value.
/// Not reversible, since the index is not recoverable from the result.
///

pub struct OffsetByIndex<N>(PhantomData<fn() -> N>);

impl<N> Default for OffsetByIndex<N> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<N> fmt::Debug for OffsetByIndex<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OffsetByIndex<{}>", std::any::type_name::<N>())
    }
}

impl<N> UpdateSpecification for OffsetByIndex<N>
where
    N: PrimInt + 'static,
{
    type Value = N;

    fn update(&self, original: &N, index: CloneIndex) -> Result<N, SpecError> {
        let offset = <N as NumCast>::from(index.get()).ok_or_else(|| {
            SpecError::invalid_argument(format!(
                "clone index {index} does not fit in {}",
                std::any::type_name::<N>()
            ))
        })?;

        original.checked_add(&offset).ok_or_else(|| {
            SpecError::invalid_argument(format!(
                "offsetting by clone index {index} overflows {}",
                std::any::type_name::<N>()
            ))
        })
    }
}

///
/// TESTS
///
