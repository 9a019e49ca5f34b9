use crate::{
    error::ReplicaError,
    sequence::{Sequence, refresh_items, replicate_items, replicate_sequence},
    spec::{UpdateSpecification, spec_id},
    table::{ClonePolicy, UpdatePolicy},
    traits::{Replicate, Shared},
    walk::{CloneWalk, UpdateWalk},
};
use std::fmt;

pub(crate) type CloneRun<F> =
    Box<dyn Fn(&F, &mut CloneWalk) -> Result<F, ReplicaError> + Send + Sync>;

pub(crate) type UpdateRun<F> =
    Box<dyn Fn(&mut F, &mut UpdateWalk<'_>) -> Result<(), ReplicaError> + Send + Sync>;

///
/// CloneRule
///
/// Typed clone behavior for one field of type `F`.
///

pub struct CloneRule<F> {
    pub(crate) policy: ClonePolicy,
    pub(crate) run: CloneRun<F>,
}

impl<F: 'static> CloneRule<F> {
    #[must_use]
    pub fn deep() -> Self
    where
        F: Replicate,
    {
        Self {
            policy: ClonePolicy::Deep,
            run: Box::new(|value: &F, walk: &mut CloneWalk| value.replicate(walk)),
        }
    }

    #[must_use]
    pub fn copy() -> Self
    where
        F: Clone,
    {
        Self {
            policy: ClonePolicy::Copy,
            run: Box::new(|value: &F, _: &mut CloneWalk| Ok(value.clone())),
        }
    }

    #[must_use]
    pub fn share() -> Self
    where
        F: Shared,
    {
        Self {
            policy: ClonePolicy::Share,
            run: Box::new(|value: &F, _: &mut CloneWalk| Ok(value.clone())),
        }
    }

    /// Clone through `hook`; `name` identifies it in descriptors and errors.
    #[must_use]
    pub fn custom(name: &'static str, hook: fn(&F) -> F) -> Self {
        Self {
            policy: ClonePolicy::Custom { hook: name },
            run: Box::new(move |value: &F, _: &mut CloneWalk| Ok(hook(value))),
        }
    }

    /// Like `custom`, for hooks that can fail.
    #[must_use]
    pub fn try_custom<E>(name: &'static str, hook: fn(&F) -> Result<F, E>) -> Self
    where
        E: fmt::Display + 'static,
    {
        Self {
            policy: ClonePolicy::Custom { hook: name },
            run: Box::new(move |value: &F, _: &mut CloneWalk| {
                hook(value).map_err(|err| ReplicaError::custom_clone(name, err))
            }),
        }
    }

    /// Elementwise clone rebuilt by the sequence's own strategy.
    #[must_use]
    pub fn sequence() -> Self
    where
        F: Sequence,
        F::Item: Replicate,
    {
        Self {
            policy: ClonePolicy::Sequence { kind: F::KIND },
            run: Box::new(|value: &F, walk: &mut CloneWalk| replicate_sequence(value, walk)),
        }
    }

    /// Elementwise clone rebuilt by `rebuild`, for kinds that have no
    /// strategy of their own.
    #[must_use]
    pub fn sequence_with(rebuild: fn(&F, Vec<F::Item>) -> F) -> Self
    where
        F: Sequence,
        F::Item: Replicate,
    {
        Self {
            policy: ClonePolicy::Sequence { kind: F::KIND },
            run: Box::new(move |value: &F, walk: &mut CloneWalk| {
                let items = replicate_items(value, walk)?;

                Ok(rebuild(value, items))
            }),
        }
    }
}

impl<F> fmt::Debug for CloneRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CloneRule").field(&self.policy).finish()
    }
}

///
/// UpdateRule
///
/// Typed update behavior for one field of type `F`.
/// `Exclude` and `Leave` carry no action.
///

pub struct UpdateRule<F> {
    pub(crate) policy: UpdatePolicy,
    pub(crate) run: Option<UpdateRun<F>>,
}

impl<F: 'static> UpdateRule<F> {
    /// Never touched or recursed into by the update walk.
    #[must_use]
    pub const fn exclude() -> Self {
        Self {
            policy: UpdatePolicy::Exclude,
            run: None,
        }
    }

    /// No update behavior; the default for copied, shared and custom fields.
    #[must_use]
    pub const fn leave() -> Self {
        Self {
            policy: UpdatePolicy::Leave,
            run: None,
        }
    }

    #[must_use]
    pub fn recurse() -> Self
    where
        F: Replicate,
    {
        Self {
            policy: UpdatePolicy::Recurse,
            run: Some(Box::new(|value: &mut F, walk: &mut UpdateWalk<'_>| {
                value.refresh(walk)
            })),
        }
    }

    /// Recurse into every element of a sequence.
    #[must_use]
    pub fn elements() -> Self
    where
        F: Sequence,
        F::Item: Replicate,
    {
        Self {
            policy: UpdatePolicy::Recurse,
            run: Some(Box::new(|value: &mut F, walk: &mut UpdateWalk<'_>| {
                refresh_items(value, walk)
            })),
        }
    }

    /// Apply `S`, constructing it in the registry on first use.
    #[must_use]
    pub fn spec<S>() -> Self
    where
        S: UpdateSpecification<Value = F> + Default,
    {
        Self {
            policy: UpdatePolicy::ApplySpec { spec: spec_id::<S>() },
            run: Some(Box::new(|value: &mut F, walk: &mut UpdateWalk<'_>| {
                let spec = walk.registry().resolve::<S>()?;
                walk.apply_spec(spec.as_ref(), value)
            })),
        }
    }

    /// Apply `S`, which must already be registered.
    #[must_use]
    pub fn registered<S>() -> Self
    where
        S: UpdateSpecification<Value = F>,
    {
        Self {
            policy: UpdatePolicy::ApplySpec { spec: spec_id::<S>() },
            run: Some(Box::new(|value: &mut F, walk: &mut UpdateWalk<'_>| {
                let spec = walk.registry().get::<S>()?;
                walk.apply_spec(spec.as_ref(), value)
            })),
        }
    }
}

impl<F> fmt::Debug for UpdateRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UpdateRule").field(&self.policy).finish()
    }
}
