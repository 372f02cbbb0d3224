//! # Output Writers
//!
//! Writes a [`NestingReport`] into an output folder:
//!
//! | File | Format | Contents |
//! |---|---|---|
//! | `taz_nesting.csv` | csv | one row per TAZ, sibling Block Groups padded to a common width |
//! | `bg_nesting.csv` | csv | one row per Block Group, sibling TAZs padded likewise |
//! | `nestings.csv` | csv | one row per nesting |
//! | `summary.json` | json | per-shape counts, run diagnostics, and the full report |
//!
//! Zone rows are written in ascending zone-id order. A zone with no
//! population carries nesting `0`, classification "No Population", and no
//! siblings.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use zonenest_partition::{NestingReport, NestingSummary, ZoneTable};

use crate::config::{OutputConfig, OutputFormat};

/// Per-TAZ table file name.
pub const TAZ_TABLE_FILE: &str = "taz_nesting.csv";
/// Per-Block-Group table file name.
pub const BLOCK_GROUP_TABLE_FILE: &str = "bg_nesting.csv";
/// Per-nesting table file name.
pub const NESTINGS_FILE: &str = "nestings.csv";
/// Run summary file name.
pub const SUMMARY_FILE: &str = "summary.json";

/// Folder for one run: `base` itself, or `base/nesting_YYYYMMDD_HHMMSS`.
pub fn output_folder(base: &Path, timestamped: bool, now: DateTime<Local>) -> PathBuf {
    if timestamped {
        base.join(format!("nesting_{}", now.format("%Y%m%d_%H%M%S")))
    } else {
        base.to_path_buf()
    }
}

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    input: String,
    generated_at: String,
    summary: NestingSummary,
    report: &'a NestingReport,
}

/// Write every enabled format into `folder`, creating it if needed.
///
/// Returns the paths written.
pub fn write_report(
    report: &NestingReport,
    folder: &Path,
    output: &OutputConfig,
    input: &Path,
    now: DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(folder)
        .with_context(|| format!("creating output folder: {}", folder.display()))?;

    let mut written = Vec::new();
    if output.wants(OutputFormat::Csv) {
        let taz_path = folder.join(TAZ_TABLE_FILE);
        write_file(&taz_path, &zone_table_csv("TAZ", "BG", &report.tazs))?;
        written.push(taz_path);

        let bg_path = folder.join(BLOCK_GROUP_TABLE_FILE);
        write_file(&bg_path, &zone_table_csv("BG", "TAZ", &report.block_groups))?;
        written.push(bg_path);

        let nestings_path = folder.join(NESTINGS_FILE);
        write_file(&nestings_path, &nestings_csv(report))?;
        written.push(nestings_path);
    }
    if output.wants(OutputFormat::Json) {
        let document = SummaryDocument {
            input: input.display().to_string(),
            generated_at: now.to_rfc3339(),
            summary: report.summary(),
            report,
        };
        let summary_path = folder.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(&document)?;
        write_file(&summary_path, &json)?;
        written.push(summary_path);
    }

    tracing::info!(folder = %folder.display(), files = written.len(), "wrote outputs");
    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Render a zone table with sibling columns `"{sibling} #1".."{sibling} #k"`.
pub fn zone_table_csv<Z: Ord + Display, S: Display>(
    zone: &str,
    sibling: &str,
    table: &ZoneTable<Z, S>,
) -> String {
    let width = table.max_siblings();
    let mut header = vec![
        zone.to_string(),
        "Nesting".to_string(),
        "Classification".to_string(),
        "Population".to_string(),
        "Population Bucket".to_string(),
    ];
    header.extend((1..=width).map(|n| format!("{sibling} #{n}")));

    let mut out = csv_line(&header);
    for record in table.records() {
        let mut fields = vec![
            record.id.to_string(),
            record.nesting.to_string(),
            record.classification.label().to_string(),
            record.population.to_string(),
            record.bucket.label().to_string(),
        ];
        fields.extend(record.siblings.iter().map(ToString::to_string));
        fields.resize(header.len(), String::new());
        out.push_str(&csv_line(&fields));
    }
    out
}

/// Render one row per nesting; member ids are space separated.
pub fn nestings_csv(report: &NestingReport) -> String {
    let header = [
        "Nesting",
        "Classification",
        "TAZ Count",
        "BG Count",
        "Population",
        "TAZs",
        "BGs",
    ]
    .map(String::from);
    let mut out = csv_line(&header);
    for nesting in &report.nestings {
        out.push_str(&csv_line(&[
            nesting.id.to_string(),
            nesting.shape.label().to_string(),
            nesting.taz_count().to_string(),
            nesting.block_group_count().to_string(),
            nesting.population.to_string(),
            join_ids(&nesting.tazs),
            join_ids(&nesting.block_groups),
        ]));
    }
    out
}

fn join_ids<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One CSV line, quoting fields that need it.
fn csv_line(fields: &[String]) -> String {
    let mut line = fields
        .iter()
        .map(|f| {
            if f.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}
