//! Per-type field tables.
//!
//! A `FieldTable<T>` lists every field `T` declares together with its typed
//! accessors and its clone and update rules. Inherited fields live in the
//! embedded base's own table; `inherit` links to it so walks continue from
//! the most-derived level down through every base.

mod descriptor;
mod rule;

pub use descriptor::{ClonePolicy, FieldDescriptor, FieldLevel, UpdatePolicy};
pub use rule::{CloneRule, UpdateRule};

use crate::{
    error::ReplicaError,
    traits::{Clonable, Replicate},
    walk::{CloneWalk, UpdateWalk},
};
use std::fmt;

type CloneFn<T> = Box<dyn Fn(&T, &mut T, &mut CloneWalk) -> Result<(), ReplicaError> + Send + Sync>;

type UpdateFn<T> =
    Box<dyn Fn(&mut T, &mut UpdateWalk<'_>) -> Result<(), ReplicaError> + Send + Sync>;

///
/// FieldEntry
///

struct FieldEntry<T> {
    descriptor: FieldDescriptor,
    clone: CloneFn<T>,
    update: Option<UpdateFn<T>>,
}

///
/// BaseEntry
///

struct BaseEntry<T> {
    path: &'static str,
    clone: CloneFn<T>,
    update: UpdateFn<T>,
    levels: fn() -> Vec<FieldLevel>,
}

///
/// FieldTable
///

pub struct FieldTable<T> {
    path: &'static str,
    fields: Vec<FieldEntry<T>>,
    base: Option<BaseEntry<T>>,
}

impl<T: 'static> FieldTable<T> {
    #[must_use]
    pub const fn builder(path: &'static str) -> TableBuilder<T> {
        TableBuilder {
            path,
            fields: Vec::new(),
            base: None,
        }
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Descriptors for the fields this type declares, in walk order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().map(|entry| &entry.descriptor)
    }

    /// Descriptor for a field declared by this type (not by a base).
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors().find(|descriptor| descriptor.name == name)
    }

    #[must_use]
    pub fn base_path(&self) -> Option<&'static str> {
        self.base.as_ref().map(|base| base.path)
    }

    /// Every level of the inheritance chain, most-derived first.
    #[must_use]
    pub fn levels(&self) -> Vec<FieldLevel> {
        let mut levels = vec![FieldLevel {
            path: self.path,
            fields: self.descriptors().copied().collect(),
        }];
        if let Some(base) = &self.base {
            levels.extend((base.levels)());
        }

        levels
    }

    /// Copy every field from `origin` into `destination`, own fields first.
    pub fn clone_fields(
        &self,
        origin: &T,
        destination: &mut T,
        walk: &mut CloneWalk,
    ) -> Result<(), ReplicaError> {
        for entry in &self.fields {
            (entry.clone)(origin, destination, walk)
                .map_err(|err| err.with_field(entry.descriptor.name))?;
            walk.record_field();
        }

        match &self.base {
            Some(base) => (base.clone)(origin, destination, walk),
            None => Ok(()),
        }
    }

    /// Run each field's update rule in place, own fields first.
    pub fn update_fields(
        &self,
        target: &mut T,
        walk: &mut UpdateWalk<'_>,
    ) -> Result<(), ReplicaError> {
        for entry in &self.fields {
            let Some(update) = &entry.update else {
                continue;
            };
            update(target, walk).map_err(|err| err.with_field(entry.descriptor.name))?;
            walk.record_field();
        }

        match &self.base {
            Some(base) => (base.update)(target, walk),
            None => Ok(()),
        }
    }
}

impl<T> fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self.fields.iter().map(|entry| entry.descriptor).collect();

        f.debug_struct("FieldTable")
            .field("path", &self.path)
            .field("fields", &fields)
            .field("base", &self.base.as_ref().map(|base| base.path))
            .finish()
    }
}

///
/// TableBuilder
///

pub struct TableBuilder<T> {
    path: &'static str,
    fields: Vec<FieldEntry<T>>,
    base: Option<BaseEntry<T>>,
}

impl<T: 'static> TableBuilder<T> {
    /// Field with the default rules: deep clone, recurse on update.
    #[must_use]
    pub fn field<F>(
        self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self
    where
        F: Replicate + 'static,
    {
        self.field_with(name, get, get_mut, CloneRule::deep(), UpdateRule::recurse())
    }

    /// Field with explicit rules. Registering a name twice keeps the later one.
    #[must_use]
    pub fn field_with<F: 'static>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
        clone: CloneRule<F>,
        update: UpdateRule<F>,
    ) -> Self {
        let descriptor = FieldDescriptor {
            name,
            clone: clone.policy,
            update: update.policy,
        };

        let clone_run = clone.run;
        let clone: CloneFn<T> =
            Box::new(move |origin: &T, destination: &mut T, walk: &mut CloneWalk| {
                *get_mut(destination) = clone_run(get(origin), walk)?;
                Ok(())
            });

        let update = update.run.map(|run| -> UpdateFn<T> {
            Box::new(move |target: &mut T, walk: &mut UpdateWalk<'_>| run(get_mut(target), walk))
        });

        self.fields.retain(|entry| entry.descriptor.name != name);
        self.fields.push(FieldEntry {
            descriptor,
            clone,
            update,
        });

        self
    }

    /// Embed `B`'s fields, walked after the fields of this type.
    #[must_use]
    pub fn inherit<B: Clonable>(
        mut self,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.base = Some(BaseEntry {
            path: B::PATH,
            clone: Box::new(move |origin: &T, destination: &mut T, walk: &mut CloneWalk| {
                B::field_table().clone_fields(get(origin), get_mut(destination), walk)
            }),
            update: Box::new(move |target: &mut T, walk: &mut UpdateWalk<'_>| {
                B::field_table().update_fields(get_mut(target), walk)
            }),
            levels: || B::field_table().levels(),
        });

        self
    }

    #[must_use]
    pub fn build(self) -> FieldTable<T> {
        FieldTable {
            path: self.path,
            fields: self.fields,
            base: self.base,
        }
    }
}

///
/// TESTS
///
