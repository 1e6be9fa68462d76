use thiserror::Error;

/// Failure modes of the ORM core.
///
/// Lookup absence is not represented here: point lookups return
/// `Ok(None)` when zero rows match.
#[derive(Debug, Error)]
pub enum Error {
    /// Metadata and a result row (or an entity's values) disagree:
    /// a declared column is missing, a value cannot be converted to the
    /// declared field type, or an upsert carries no persistable values.
    /// Indicates metadata/schema drift and should not be swallowed.
    #[error("row mapping failed: {0}")]
    Mapping(String),

    /// The underlying store rejected a statement (constraint violation,
    /// connectivity loss, syntax). Propagated untranslated; the core does
    /// not retry.
    #[error("store rejected statement: {0}")]
    Store(#[from] anyhow::Error),

    /// A repository lookup for an entity type nothing was registered for.
    #[error("no repository registered for entity type `{0}`")]
    Unregistered(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
