//! Record loading and aggregate dispatch.
//!
//! Parses exported record lists and runs the named aggregate for the
//! requested entity type.

use crate::analysis::{aggregate_with_stats, AggregateCollection, Registry};
use crate::error::ChartError;
use crate::models::{EntityType, Series};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// A computed series plus how many input records fed into it.
#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub entity: EntityType,
    pub aggregate: String,
    pub series: Series,
    pub records: usize,
    pub dropped: usize,
}

/// Parse a JSON array of records.
pub fn parse_records<T: DeserializeOwned>(
    entity: EntityType,
    json: &str,
) -> Result<Vec<T>, ChartError> {
    serde_json::from_str(json).map_err(|source| ChartError::InvalidRecords { entity, source })
}

/// Run the aggregate `name` of `entity` over a JSON record list.
pub fn build_chart(
    registry: &Registry,
    entity: EntityType,
    name: &str,
    json: &str,
) -> Result<ChartOutput, ChartError> {
    match entity {
        EntityType::Assets => run(&registry.assets, entity, name, json),
        EntityType::Risks => run(&registry.risks, entity, name, json),
        EntityType::Seeds => run(&registry.seeds, entity, name, json),
        EntityType::Accounts => run(&registry.accounts, entity, name, json),
    }
}

fn run<T: DeserializeOwned>(
    collection: &AggregateCollection<T>,
    entity: EntityType,
    name: &str,
    json: &str,
) -> Result<ChartOutput, ChartError> {
    let definition = collection
        .get(name)
        .ok_or_else(|| ChartError::UnknownAggregate {
            entity,
            name: name.to_string(),
        })?;

    let records: Vec<T> = parse_records(entity, json)?;
    debug!("Parsed {} {} records", records.len(), entity);

    let result = aggregate_with_stats(definition, &records);
    info!(
        "{}: {} points from {} records ({} dropped)",
        definition.label,
        result.points.len(),
        records.len(),
        result.dropped
    );

    let dropped = result.dropped;
    Ok(ChartOutput {
        entity,
        aggregate: name.to_string(),
        series: result.into_series(definition),
        records: records.len(),
        dropped,
    })
}
