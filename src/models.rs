//! Data models for chart aggregation.
//!
//! This module contains the entity records handed to the aggregation
//! engine, the decoded status enums, and the data points it produces.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;

/// Entity types that own an aggregate collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Assets,
    Risks,
    Seeds,
    Accounts,
}

impl EntityType {
    /// All entity types, in listing order.
    pub const ALL: [EntityType; 4] = [
        EntityType::Assets,
        EntityType::Risks,
        EntityType::Seeds,
        EntityType::Accounts,
    ];
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Assets => write!(f, "assets"),
            EntityType::Risks => write!(f, "risks"),
            EntityType::Seeds => write!(f, "seeds"),
            EntityType::Accounts => write!(f, "accounts"),
        }
    }
}

impl FromStr for EntityType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" | "assets" => Ok(EntityType::Assets),
            "risk" | "risks" => Ok(EntityType::Risks),
            "seed" | "seeds" => Ok(EntityType::Seeds),
            "account" | "accounts" => Ok(EntityType::Accounts),
            other => Err(ChartError::UnknownEntity(other.to_string())),
        }
    }
}

/// A discovered asset (host, IP, repository...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    pub key: String,
    pub name: String,
    pub dns: String,
    /// Asset classification, e.g. `ipv4`, `domain`, `repository`.
    pub class: String,
    pub status: String,
    /// ISO-8601 creation timestamp.
    pub created: String,
    /// ISO-8601 last-update timestamp.
    pub updated: String,
}

/// A risk raised against an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    pub key: String,
    pub name: String,
    pub dns: String,
    /// Packed status: state character followed by severity character (`"OH"`).
    pub status: String,
    pub created: String,
    pub updated: String,
}

impl Risk {
    /// Decoded lifecycle state.
    pub fn state(&self) -> RiskState {
        RiskState::from_code(self.status.chars().next())
    }

    /// Decoded severity.
    pub fn severity(&self) -> Severity {
        Severity::from_code(self.status.chars().nth(1))
    }
}

/// A discovery seed (root domain, CIDR...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub status: String,
    pub created: String,
    pub updated: String,
}

/// A user account linked to the tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub key: String,
    pub name: String,
    /// Member email address.
    pub member: String,
    pub value: String,
    pub created: String,
    pub updated: String,
}

/// Lifecycle state of a risk, first character of the packed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskState {
    Triage,
    Open,
    Remediated,
    Closed,
    Unknown,
}

impl RiskState {
    pub fn from_code(code: Option<char>) -> Self {
        match code {
            Some('T') => RiskState::Triage,
            Some('O') => RiskState::Open,
            Some('R') => RiskState::Remediated,
            Some('C') => RiskState::Closed,
            _ => RiskState::Unknown,
        }
    }
}

impl fmt::Display for RiskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskState::Triage => write!(f, "Triage"),
            RiskState::Open => write!(f, "Open"),
            RiskState::Remediated => write!(f, "Remediated"),
            RiskState::Closed => write!(f, "Closed"),
            RiskState::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Severity level of a risk, second character of the packed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Anything the decode table does not know.
    Unknown,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_code(code: Option<char>) -> Self {
        match code {
            Some('I') => Severity::Info,
            Some('L') => Severity::Low,
            Some('M') => Severity::Medium,
            Some('H') => Severity::High,
            Some('C') => Severity::Critical,
            _ => Severity::Unknown,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Unknown => write!(f, "Unknown"),
            Severity::Info => write!(f, "Info"),
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

/// Seed state, first character of the status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedState {
    Active,
    Frozen,
}

impl SeedState {
    /// Status code marking a frozen seed.
    pub const FROZEN_CODE: char = 'F';

    pub fn from_code(code: Option<char>) -> Self {
        match code {
            Some(c) if c == Self::FROZEN_CODE => SeedState::Frozen,
            _ => SeedState::Active,
        }
    }
}

impl fmt::Display for SeedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedState::Active => write!(f, "Active"),
            SeedState::Frozen => write!(f, "Frozen"),
        }
    }
}

/// One bucket of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Bucketing key.
    pub key: String,
    /// Count or running total, depending on the aggregate mode.
    pub value: u64,
}

impl DataPoint {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// An ordered series of data points, labeled for a charting consumer.
///
/// Serializes each point as `{ <key_field>: key, <value_field>: value }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub label: &'static str,
    pub key_field: &'static str,
    pub value_field: &'static str,
    pub points: Vec<DataPoint>,
}

impl Series {
    /// Sum of all point values.
    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points viewed under the series' field names.
    pub fn labeled_points(&self) -> impl Iterator<Item = LabeledPoint<'_>> {
        self.points.iter().map(move |point| LabeledPoint {
            key_field: self.key_field,
            value_field: self.value_field,
            point,
        })
    }
}

/// A data point borrowed together with the field names it is reported under.
#[derive(Debug, Clone, Copy)]
pub struct LabeledPoint<'a> {
    key_field: &'static str,
    value_field: &'static str,
    point: &'a DataPoint,
}

impl Serialize for LabeledPoint<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.key_field, &self.point.key)?;
        map.serialize_entry(self.value_field, &self.point.value)?;
        map.end()
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let points: Vec<LabeledPoint<'_>> = self.labeled_points().collect();
        let mut state = serializer.serialize_struct("Series", 4)?;
        state.serialize_field("label", self.label)?;
        state.serialize_field("key_field", self.key_field)?;
        state.serialize_field("value_field", self.value_field)?;
        state.serialize_field("points", &points)?;
        state.end()
    }
}
