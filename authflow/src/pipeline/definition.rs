//! Named, ordered, overridable stage lists.

use super::stage::Stage;
use crate::errors::ConfigurationError;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// The closed set of stage names of one pipeline shape.
///
/// Usually generated with [`stage_keys!`](crate::stage_keys).
pub trait StageKey: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {
    /// Every key, in declaration order.
    const ALL: &'static [Self];

    /// Returns the stage name.
    fn as_str(&self) -> &'static str;

    /// Looks a key up by name.
    #[must_use]
    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }
}

/// Declares a stage key enum.
///
/// ```ignore
/// stage_keys! {
///     /// Stages of the lookup pipeline.
///     pub enum LookupStage {
///         /// Reads the id.
///         Extract => "extract",
///         /// Fetches the record.
///         Fetch => "fetch",
///     }
/// }
/// ```
#[macro_export]
macro_rules! stage_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::pipeline::StageKey for $name {
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::pipeline::StageKey::as_str(self))
            }
        }
    };
}

pub(super) struct Slot<K> {
    pub(super) key: K,
    pub(super) stage: RwLock<Arc<dyn Stage>>,
}

/// An ordered list of named stages.
///
/// The order and the set of names are fixed when the definition is built.
/// Individual slots can be replaced afterwards; a replacement is seen by
/// every stage start that follows it.
pub struct PipelineDefinition<K: StageKey> {
    name: String,
    pub(super) slots: Vec<Slot<K>>,
}

impl<K: StageKey> PipelineDefinition<K> {
    /// Starts a builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> PipelineDefinitionBuilder<K> {
        PipelineDefinitionBuilder {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Defines a pipeline from `(key, stage)` pairs in execution order.
    ///
    /// # Errors
    ///
    /// Returns an error if a key repeats or the list is empty.
    pub fn define(
        name: impl Into<String>,
        stages: impl IntoIterator<Item = (K, Arc<dyn Stage>)>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let mut seen = HashSet::new();
        let mut slots = Vec::new();

        for (key, stage) in stages {
            if !seen.insert(key) {
                return Err(ConfigurationError::DuplicateStage {
                    pipeline: name,
                    stage: key.to_string(),
                });
            }
            slots.push(Slot {
                key,
                stage: RwLock::new(stage),
            });
        }

        if slots.is_empty() {
            return Err(ConfigurationError::EmptyPipeline(name));
        }

        Ok(Self { name, slots })
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stage keys in execution order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.slots.iter().map(|slot| slot.key).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false for a defined pipeline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the stage currently in slot `key`.
    #[must_use]
    pub fn stage(&self, key: K) -> Option<Arc<dyn Stage>> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| slot.stage.read().clone())
    }

    /// Replaces the stage in slot `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if this pipeline does not define `key`.
    pub fn replace(&self, key: K, stage: Arc<dyn Stage>) -> Result<(), ConfigurationError> {
        let slot = self
            .slots
            .iter()
            .find(|slot| slot.key == key)
            .ok_or_else(|| self.unknown(key.as_str()))?;

        debug!(pipeline = %self.name, stage = %key, "Overriding stage");
        *slot.stage.write() = stage;
        Ok(())
    }

    /// Replaces a stage by name.
    ///
    /// Nothing changes when the name is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a stage of this pipeline.
    pub fn override_stage(
        &self,
        name: &str,
        stage: Arc<dyn Stage>,
    ) -> Result<(), ConfigurationError> {
        let key = K::parse(name).ok_or_else(|| self.unknown(name))?;
        self.replace(key, stage)
    }

    /// Builder-style [`override_stage`](Self::override_stage).
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a stage of this pipeline.
    pub fn with_override(
        self,
        name: &str,
        stage: Arc<dyn Stage>,
    ) -> Result<Self, ConfigurationError> {
        self.override_stage(name, stage)?;
        Ok(self)
    }

    fn unknown(&self, stage: &str) -> ConfigurationError {
        ConfigurationError::UnknownStage {
            pipeline: self.name.clone(),
            stage: stage.to_string(),
        }
    }
}

impl<K: StageKey> Debug for PipelineDefinition<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineDefinition")
            .field("name", &self.name)
            .field("stages", &self.keys())
            .finish()
    }
}

/// Collects stages for a [`PipelineDefinition`].
pub struct PipelineDefinitionBuilder<K: StageKey> {
    name: String,
    stages: Vec<(K, Arc<dyn Stage>)>,
}

impl<K: StageKey> PipelineDefinitionBuilder<K> {
    /// Appends a stage.
    #[must_use]
    pub fn stage(mut self, key: K, stage: impl Stage + 'static) -> Self {
        self.stages.push((key, Arc::new(stage)));
        self
    }

    /// Appends an already shared stage.
    #[must_use]
    pub fn shared_stage(mut self, key: K, stage: Arc<dyn Stage>) -> Self {
        self.stages.push((key, stage));
        self
    }

    /// Builds the definition.
    ///
    /// # Errors
    ///
    /// Returns an error if a key repeats or no stage was added.
    pub fn build(self) -> Result<PipelineDefinition<K>, ConfigurationError> {
        PipelineDefinition::define(self.name, self.stages)
    }
}

impl<K: StageKey> Debug for PipelineDefinitionBuilder<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineDefinitionBuilder")
            .field("name", &self.name)
            .field("stages", &self.stages.iter().map(|(k, _)| *k).collect::<Vec<_>>())
            .finish()
    }
}
