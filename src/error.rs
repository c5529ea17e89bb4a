//! Error types for aggregate selection and record loading.

use crate::models::EntityType;
use thiserror::Error;

/// Errors surfaced at the boundaries of the aggregation engine.
///
/// The engine itself never fails: malformed records are dropped. These
/// errors belong to the layers that pick an aggregate and feed it records.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The entity type name is not one the registry knows.
    #[error("unknown entity type: {0}")]
    UnknownEntity(String),

    /// No aggregate with this name exists for the entity type.
    #[error("unknown aggregate '{name}' for {entity}")]
    UnknownAggregate { entity: EntityType, name: String },

    /// The record list could not be parsed.
    #[error("invalid {entity} records: {source}")]
    InvalidRecords {
        entity: EntityType,
        #[source]
        source: serde_json::Error,
    },
}
