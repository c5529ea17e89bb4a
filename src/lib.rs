//! asmchart - chart aggregation for attack-surface management data.
//!
//! Turns in-memory lists of assets, risks, seeds and accounts into
//! labeled count or cumulative series for charting.
//!
//! ```
//! use asmchart::analysis::{aggregate, Registry};
//! use asmchart::models::{DataPoint, Risk};
//!
//! let registry = Registry::new();
//! let severity = registry.risks.get("count_by_severity").unwrap();
//! let risks = vec![Risk { status: "OH".into(), ..Risk::default() }];
//!
//! assert_eq!(aggregate(severity, &risks), vec![DataPoint::new("High", 1)]);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;

pub use error::ChartError;
