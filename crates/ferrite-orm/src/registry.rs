use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;

use crate::entity::Entity;
use crate::repository::Repository;
use crate::{Error, Result};

/// A process-wide mapping from entity type name to its repository.
///
/// Lets an entity reach its own persistence operations without being
/// constructed with a repository reference: callers pass the registry
/// explicitly instead of relying on ambient global state. Populated at
/// startup, read thereafter; lookups are safe under concurrency and there
/// is no removal operation.
#[derive(Default)]
pub struct Registry {
    repositories: DashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `repository` keyed by its entity's type name, overwriting
    /// any prior entry for that type.
    pub fn add<E: Entity + 'static>(&self, repository: Repository<E>) {
        tracing::debug!(entity = E::type_name(), "registering repository");
        self.repositories.insert(E::type_name(), Arc::new(repository));
    }

    /// The repository registered for entity type `E`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unregistered`] if no repository is registered for
    /// `E` — an unregistered type is a configuration error surfaced
    /// immediately, never a silent null.
    pub fn repository<E: Entity + 'static>(&self) -> Result<Arc<Repository<E>>> {
        let unregistered = || Error::Unregistered(E::type_name().to_string());
        let entry = self.repositories.get(E::type_name()).ok_or_else(unregistered)?;
        let repository = Arc::clone(entry.value());
        drop(entry);
        repository.downcast::<Repository<E>>().map_err(|_downcast| unregistered())
    }

    /// Entity-initiated upsert through the entity's own repository.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unregistered`] if `E` has no repository, otherwise
    /// whatever [`Repository::upsert`] returns.
    pub fn save<E: Entity + 'static>(&self, entity: &mut E) -> Result<()> {
        self.repository::<E>()?.upsert(entity)
    }

    /// Entity-initiated deletion through the entity's own repository.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unregistered`] if `E` has no repository, otherwise
    /// whatever [`Repository::delete`] returns.
    pub fn remove<E: Entity + 'static>(&self, entity: &E) -> Result<bool> {
        self.repository::<E>()?.delete(entity)
    }
}
