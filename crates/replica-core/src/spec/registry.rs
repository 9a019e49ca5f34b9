use crate::{
    error::ReplicaError,
    obs::sink::{self, MetricsEvent},
    spec::{UpdateSpecification, spec_id},
};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

type SpecInstance = Arc<dyn Any + Send + Sync>;

///
/// SpecRegistry
///
/// Type-keyed cache of specification singletons.
///
/// The map is read-mostly: lookups take a read lock, and a missing
/// `Default` spec is constructed outside the lock and inserted with
/// first-use-wins semantics. A frozen registry never constructs; it only
/// serves what was registered before `freeze`.
///

#[derive(Default)]
pub struct SpecRegistry {
    specs: RwLock<HashMap<TypeId, SpecInstance>>,
    frozen: bool,
}

impl SpecRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prepared instance, replacing any earlier one of the same type.
    #[must_use]
    pub fn with<S: UpdateSpecification>(self, spec: S) -> Self {
        self.insert(spec);
        self
    }

    /// Register a prepared instance. Returns `true` if one was replaced.
    pub fn insert<S: UpdateSpecification>(&self, spec: S) -> bool {
        let mut specs = self.specs.write().unwrap_or_else(PoisonError::into_inner);

        specs.insert(TypeId::of::<S>(), Arc::new(spec)).is_some()
    }

    /// Stop lazy construction; only registered specs resolve afterwards.
    #[must_use]
    pub fn freeze(mut self) -> Self {
        self.frozen = true;
        self
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn contains<S: UpdateSpecification>(&self) -> bool {
        self.specs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<S>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a registered spec without constructing it.
    pub fn get<S: UpdateSpecification>(&self) -> Result<Arc<S>, ReplicaError> {
        let spec = self
            .lookup::<S>()
            .ok_or_else(|| ReplicaError::spec_unavailable(spec_id::<S>()))?;
        sink::record(MetricsEvent::SpecResolved {
            spec: spec_id::<S>(),
            constructed: false,
        });

        Ok(spec)
    }

    /// Fetch a spec, constructing and caching it on first use.
    pub fn resolve<S>(&self) -> Result<Arc<S>, ReplicaError>
    where
        S: UpdateSpecification + Default,
    {
        if let Some(spec) = self.lookup::<S>() {
            sink::record(MetricsEvent::SpecResolved {
                spec: spec_id::<S>(),
                constructed: false,
            });

            return Ok(spec);
        }

        if self.frozen {
            return Err(ReplicaError::spec_unavailable(spec_id::<S>()));
        }

        let fresh: SpecInstance = Arc::new(S::default());
        let stored = {
            let mut specs = self.specs.write().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(specs.entry(TypeId::of::<S>()).or_insert(fresh))
        };
        sink::record(MetricsEvent::SpecResolved {
            spec: spec_id::<S>(),
            constructed: true,
        });

        downcast::<S>(stored)
    }

    fn lookup<S: UpdateSpecification>(&self) -> Option<Arc<S>> {
        let specs = self.specs.read().unwrap_or_else(PoisonError::into_inner);
        let instance = specs.get(&TypeId::of::<S>()).cloned()?;

        downcast::<S>(instance).ok()
    }
}

impl fmt::Debug for SpecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecRegistry")
            .field("len", &self.len())
            .field("frozen", &self.frozen)
            .finish()
    }
}

fn downcast<S: UpdateSpecification>(instance: SpecInstance) -> Result<Arc<S>, ReplicaError> {
    instance
        .downcast::<S>()
        .map_err(|_| ReplicaError::spec_unavailable(spec_id::<S>()))
}

///
/// TESTS
///
