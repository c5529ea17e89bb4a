//! Aggregate registry.
//!
//! Holds one named collection of aggregate definitions per entity type.
//! Built once at startup and passed by reference to whoever needs it.

use super::definition::{define_aggregate, AggregateDefinition, Mode};
use super::extractors;
use crate::models::{Account, Asset, EntityType, Risk, Seed};
use std::collections::BTreeMap;

/// Named aggregate definitions for one record type.
pub struct AggregateCollection<T> {
    definitions: BTreeMap<&'static str, AggregateDefinition<T>>,
}

impl<T> Default for AggregateCollection<T> {
    fn default() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }
}

impl<T> AggregateCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition under `name`, replacing any previous one.
    pub fn with(mut self, name: &'static str, definition: AggregateDefinition<T>) -> Self {
        self.definitions.insert(name, definition);
        self
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&AggregateDefinition<T>> {
        self.definitions.get(name)
    }

    /// Definition summaries, in name order.
    pub fn entries(&self) -> impl Iterator<Item = AggregateInfo> + '_ {
        self.definitions.iter().map(|(name, def)| AggregateInfo {
            name: *name,
            label: def.label,
            mode: def.mode,
        })
    }
}

/// Name, label and mode of a registered aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub mode: Mode,
}

/// Aggregate collections for every entity type.
pub struct Registry {
    pub assets: AggregateCollection<Asset>,
    pub risks: AggregateCollection<Risk>,
    pub seeds: AggregateCollection<Seed>,
    pub accounts: AggregateCollection<Account>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Build the standard set of chart aggregates.
    pub fn new() -> Self {
        Self {
            assets: asset_aggregates(),
            risks: risk_aggregates(),
            seeds: seed_aggregates(),
            accounts: account_aggregates(),
        }
    }

    /// Aggregate summaries for one entity type.
    pub fn entries(&self, entity: EntityType) -> Vec<AggregateInfo> {
        match entity {
            EntityType::Assets => self.assets.entries().collect(),
            EntityType::Risks => self.risks.entries().collect(),
            EntityType::Seeds => self.seeds.entries().collect(),
            EntityType::Accounts => self.accounts.entries().collect(),
        }
    }

    /// Aggregate names for one entity type.
    pub fn aggregate_names(&self, entity: EntityType) -> Vec<&'static str> {
        self.entries(entity).into_iter().map(|info| info.name).collect()
    }
}

fn asset_aggregates() -> AggregateCollection<Asset> {
    AggregateCollection::new()
        .with(
            "count_by_class",
            define_aggregate("Assets by Class", extractors::asset_class, "class", "count"),
        )
        .with(
            "count_by_date",
            define_aggregate("Assets Created by Date", extractors::asset_date, "date", "count"),
        )
        .with(
            "total_over_time",
            define_aggregate("Total Assets Over Time", extractors::asset_date, "date", "total")
                .cumulative(),
        )
}

fn risk_aggregates() -> AggregateCollection<Risk> {
    AggregateCollection::new()
        .with(
            "count_by_status",
            define_aggregate("Risks by Status", extractors::risk_status, "status", "count"),
        )
        .with(
            "count_by_severity",
            define_aggregate(
                "Risks by Severity",
                extractors::risk_severity,
                "severity",
                "count",
            ),
        )
        .with(
            "count_by_date",
            define_aggregate("Risks Updated by Date", extractors::risk_date, "date", "count"),
        )
        .with(
            "total_over_time",
            define_aggregate("Total Risks Over Time", extractors::risk_date, "date", "total")
                .cumulative(),
        )
}

fn seed_aggregates() -> AggregateCollection<Seed> {
    AggregateCollection::new()
        .with(
            "count_by_status",
            define_aggregate("Seeds by Status", extractors::seed_status, "status", "count"),
        )
        .with(
            "count_by_class",
            define_aggregate("Seeds by Class", extractors::seed_class, "class", "count"),
        )
        .with(
            "count_by_date",
            define_aggregate("Seeds Added by Date", extractors::seed_date, "date", "count"),
        )
        .with(
            "total_over_time",
            define_aggregate("Total Seeds Over Time", extractors::seed_date, "date", "total")
                .cumulative(),
        )
}

fn account_aggregates() -> AggregateCollection<Account> {
    AggregateCollection::new()
        .with(
            "count_by_domain",
            define_aggregate(
                "Accounts by Domain",
                extractors::account_domain,
                "domain",
                "count",
            ),
        )
        .with(
            "count_by_date",
            define_aggregate("Accounts by Date", extractors::account_date, "date", "count"),
        )
        .with(
            "total_over_time",
            define_aggregate(
                "Total Accounts Over Time",
                extractors::account_date,
                "date",
                "total",
            )
            .cumulative(),
        )
}
