//! Walk state threaded through clone and update traversals.
//!
//! A walk tracks nesting depth against the configured limit and counts the
//! fields it touched. Neither walk keeps a record of visited objects, so a
//! graph containing a cycle through owned fields is reported as a depth
//! failure rather than detected.

use crate::{
    error::ReplicaError,
    obs::sink::{self, MetricsEvent, WalkKind},
    spec::{CloneIndex, SpecRegistry, UpdateSpecification, spec_id},
};

///
/// CloneWalk
///

#[derive(Debug)]
pub struct CloneWalk {
    depth: usize,
    max_depth: usize,
    fields: u64,
}

impl CloneWalk {
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            fields: 0,
        }
    }

    /// Run `f` one entity level deeper.
    pub fn descend<R>(
        &mut self,
        type_path: &'static str,
        f: impl FnOnce(&mut Self) -> Result<R, ReplicaError>,
    ) -> Result<R, ReplicaError> {
        enter(&mut self.depth, self.max_depth, type_path)?;
        sink::record(MetricsEvent::EntityVisited {
            kind: WalkKind::Clone,
            entity_path: type_path,
        });

        let result = f(self);
        self.depth -= 1;

        result
    }

    pub const fn record_field(&mut self) {
        self.fields = self.fields.saturating_add(1);
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn fields_touched(&self) -> u64 {
        self.fields
    }
}

///
/// UpdateMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpdateMode {
    /// Customize values for the clone with this index.
    Apply(CloneIndex),
    /// Restore values to their un-indexed form.
    Reset,
}

impl UpdateMode {
    #[must_use]
    pub const fn kind(self) -> WalkKind {
        match self {
            Self::Apply(_) => WalkKind::Update,
            Self::Reset => WalkKind::Reset,
        }
    }
}

///
/// UpdateWalk
///
/// Update traversal state. Specs are resolved from the borrowed registry
/// each time a spec-bound field is reached.
///

#[derive(Debug)]
pub struct UpdateWalk<'r> {
    registry: &'r SpecRegistry,
    mode: UpdateMode,
    depth: usize,
    max_depth: usize,
    fields: u64,
}

impl<'r> UpdateWalk<'r> {
    #[must_use]
    pub const fn new(registry: &'r SpecRegistry, mode: UpdateMode, max_depth: usize) -> Self {
        Self {
            registry,
            mode,
            depth: 0,
            max_depth,
            fields: 0,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &'r SpecRegistry {
        self.registry
    }

    #[must_use]
    pub const fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Run `f` one entity level deeper.
    pub fn descend<R>(
        &mut self,
        type_path: &'static str,
        f: impl FnOnce(&mut Self) -> Result<R, ReplicaError>,
    ) -> Result<R, ReplicaError> {
        enter(&mut self.depth, self.max_depth, type_path)?;
        sink::record(MetricsEvent::EntityVisited {
            kind: self.mode.kind(),
            entity_path: type_path,
        });

        let result = f(self);
        self.depth -= 1;

        result
    }

    /// Transform `value` with `spec` according to the walk mode.
    pub fn apply_spec<S: UpdateSpecification>(
        &self,
        spec: &S,
        value: &mut S::Value,
    ) -> Result<(), ReplicaError> {
        let next = match self.mode {
            UpdateMode::Apply(index) => spec.update(value, index),
            UpdateMode::Reset => spec.reset(value),
        }
        .map_err(|err| ReplicaError::spec_rejected(spec_id::<S>(), err))?;
        *value = next;

        Ok(())
    }

    pub const fn record_field(&mut self) {
        self.fields = self.fields.saturating_add(1);
    }

    #[must_use]
    pub const fn fields_touched(&self) -> u64 {
        self.fields
    }
}

fn enter(depth: &mut usize, max_depth: usize, type_path: &str) -> Result<(), ReplicaError> {
    if *depth >= max_depth {
        return Err(ReplicaError::depth_exceeded(type_path, max_depth));
    }
    *depth += 1;

    Ok(())
}

///
/// TESTS
///
