//! Chart report generation.
//!
//! This module renders a computed series either as JSON for a charting
//! consumer or as a Markdown table for humans.

use crate::config::ReportConfig;
use crate::loader::ChartOutput;
use crate::models::{EntityType, Series};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata about a generated chart report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub entity: EntityType,
    pub aggregate: String,
    pub generated_at: DateTime<Utc>,
    /// Number of input records.
    pub records: usize,
    /// Records dropped because no key could be extracted.
    pub dropped: usize,
}

impl ReportMetadata {
    pub fn for_output(output: &ChartOutput, generated_at: DateTime<Utc>) -> Self {
        Self {
            entity: output.entity,
            aggregate: output.aggregate.clone(),
            generated_at,
            records: output.records,
            dropped: output.dropped,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    series: &'a Series,
}

/// Generate a JSON report.
pub fn generate_json_report(
    metadata: &ReportMetadata,
    series: &Series,
    config: &ReportConfig,
) -> Result<String> {
    let report = JsonReport { metadata, series };

    let json = if config.pretty_json {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    Ok(json)
}

/// Generate a Markdown report.
pub fn generate_markdown_report(
    metadata: &ReportMetadata,
    series: &Series,
    config: &ReportConfig,
) -> String {
    let mut output = String::new();

    if config.include_label {
        output.push_str(&format!("# {}\n\n", series.label));
    }

    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_table(series));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Entity:** {}\n", metadata.entity));
    section.push_str(&format!("- **Aggregate:** `{}`\n", metadata.aggregate));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.records));
    if metadata.dropped > 0 {
        section.push_str(&format!("- **Dropped:** {}\n", metadata.dropped));
    }
    section.push('\n');

    section
}

/// Generate the data table.
fn generate_table(series: &Series) -> String {
    if series.is_empty() {
        return "No data.\n".to_string();
    }

    let mut table = String::new();

    table.push_str(&format!("| {} | {} |\n", series.key_field, series.value_field));
    table.push_str("|:---|---:|\n");

    for point in &series.points {
        table.push_str(&format!("| {} | {} |\n", escape_cell(&point.key), point.value));
    }

    table
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;
    use chrono::TimeZone;

    fn create_test_series() -> Series {
        Series {
            label: "Risks by Severity",
            key_field: "severity",
            value_field: "count",
            points: vec![DataPoint::new("High", 3), DataPoint::new("Low", 1)],
        }
    }

    fn create_test_metadata(dropped: usize) -> ReportMetadata {
        ReportMetadata {
            entity: EntityType::Risks,
            aggregate: "count_by_severity".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            records: 4 + dropped,
            dropped,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(
            &create_test_metadata(1),
            &create_test_series(),
            &ReportConfig::default(),
        );

        assert!(markdown.contains("# Risks by Severity"));
        assert!(markdown.contains("- **Entity:** risks"));
        assert!(markdown.contains("- **Dropped:** 1"));
        assert!(markdown.contains("| severity | count |"));
        assert!(markdown.contains("| High | 3 |"));
        assert!(markdown.contains("2024-03-01 12:00:00 UTC"));
    }

    #[test]
    fn test_markdown_without_label_or_drops() {
        let config = ReportConfig {
            include_label: false,
            ..ReportConfig::default()
        };
        let markdown =
            generate_markdown_report(&create_test_metadata(0), &create_test_series(), &config);

        assert!(!markdown.contains("# Risks by Severity"));
        assert!(!markdown.contains("Dropped"));
    }

    #[test]
    fn test_markdown_empty_series() {
        let series = Series {
            points: Vec::new(),
            ..create_test_series()
        };
        let markdown =
            generate_markdown_report(&create_test_metadata(0), &series, &ReportConfig::default());

        assert!(markdown.contains("No data."));
        assert!(!markdown.contains("| severity |"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(
            &create_test_metadata(0),
            &create_test_series(),
            &ReportConfig::default(),
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["entity"], "risks");
        assert_eq!(value["metadata"]["aggregate"], "count_by_severity");
        assert_eq!(value["series"]["points"][0]["severity"], "High");
        assert_eq!(value["series"]["points"][0]["count"], 3);
    }

    #[test]
    fn test_compact_json() {
        let config = ReportConfig {
            pretty_json: false,
            ..ReportConfig::default()
        };
        let json =
            generate_json_report(&create_test_metadata(0), &create_test_series(), &config).unwrap();
        assert!(!json.contains('\n'));
    }
}
