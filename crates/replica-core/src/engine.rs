use crate::{
    config::{ConfigError, ReplicaConfig},
    error::ReplicaError,
    obs::sink::{Span, WalkKind},
    spec::{CloneIndex, IndexSuffix, SpecRegistry},
    traits::{Clonable, Replicate},
    walk::{CloneWalk, UpdateMode, UpdateWalk},
};
use std::sync::OnceLock;

///
/// Engine
///
/// Runs clone, update and reset walks with one configuration and one
/// specification registry.
///

#[derive(Debug)]
pub struct Engine {
    config: ReplicaConfig,
    registry: SpecRegistry,
}

impl Engine {
    /// Validate `config` and register the built-in `IndexSuffix` it describes.
    pub fn new(config: ReplicaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = SpecRegistry::new().with(config.naming.index_suffix()?);

        Ok(Self { config, registry })
    }

    /// Use a caller-prepared registry as is.
    pub fn with_registry(
        config: ReplicaConfig,
        registry: SpecRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self { config, registry })
    }

    /// Process-wide engine with default configuration.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Engine> = OnceLock::new();

        GLOBAL.get_or_init(Self::default)
    }

    #[must_use]
    pub const fn config(&self) -> &ReplicaConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// Deep clone `origin`.
    pub fn clone_entity<T: Clonable>(&self, origin: &T) -> Result<T, ReplicaError> {
        let mut span = Span::new(WalkKind::Clone, T::PATH);
        let mut walk = CloneWalk::new(self.config.walk.max_depth);

        let result = origin.replicate(&mut walk);
        span.set_fields(walk.fields_touched());
        span.observe(&result);

        result
    }

    /// Customize `target` in place for the clone with `index`.
    pub fn update_entity<T: Clonable>(
        &self,
        target: &mut T,
        index: CloneIndex,
    ) -> Result<(), ReplicaError> {
        self.update_entity_with(target, index, &self.registry)
    }

    /// Like `update_entity`, resolving specs from `registry`.
    pub fn update_entity_with<T: Clonable>(
        &self,
        target: &mut T,
        index: CloneIndex,
        registry: &SpecRegistry,
    ) -> Result<(), ReplicaError> {
        self.run_update(target, registry, UpdateMode::Apply(index))
    }

    /// Restore spec-bound fields of `target` to their un-indexed values.
    pub fn reset_entity<T: Clonable>(&self, target: &mut T) -> Result<(), ReplicaError> {
        self.run_update(target, &self.registry, UpdateMode::Reset)
    }

    /// Clone `origin` once per index and customize each copy with its index.
    pub fn replicate_indexed<T, I>(&self, origin: &T, indices: I) -> Result<Vec<T>, ReplicaError>
    where
        T: Clonable,
        I: IntoIterator<Item = CloneIndex>,
    {
        indices
            .into_iter()
            .map(|index| {
                let mut copy = self.clone_entity(origin)?;
                self.update_entity(&mut copy, index)?;

                Ok(copy)
            })
            .collect()
    }

    fn run_update<T: Clonable>(
        &self,
        target: &mut T,
        registry: &SpecRegistry,
        mode: UpdateMode,
    ) -> Result<(), ReplicaError> {
        let mut span = Span::new(mode.kind(), T::PATH);
        let mut walk = UpdateWalk::new(registry, mode, self.config.walk.max_depth);

        let result = target.refresh(&mut walk);
        span.set_fields(walk.fields_touched());
        span.observe(&result);

        result
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: ReplicaConfig::default(),
            registry: SpecRegistry::new().with(IndexSuffix::default()),
        }
    }
}

///
/// TESTS
///
