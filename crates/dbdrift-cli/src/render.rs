//! Report rendering (HTML page or JSON document)

use anyhow::{Context, Result};
use dbdrift_core::{CategoryDrift, Column, ColumnsDiff, DriftReport, DriftSummary, ObjectCategory, ObjectChange};
use minijinja::Environment;
use serde::Serialize;
use std::path::Path;

/// Output format of the written report
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

impl OutputFormat {
    /// Infer the format from a file extension, HTML unless it is `.json`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Html,
        }
    }
}

/// Render the report in `format`
pub fn render(report: &DriftReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => render_html(report),
        OutputFormat::Json => report.to_json().context("Failed to serialize report"),
    }
}

/// Render and write the report to `path`
///
/// The report is fully rendered before the file is touched.
pub fn write_report(report: &DriftReport, path: &Path, format: OutputFormat) -> Result<()> {
    let contents = render(report, format)?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write report to {}", path.display()))
}

const REPORT_TEMPLATE: &str = include_str!("../templates/report.html");

/// Self-contained HTML page for the report
///
/// The template is registered under an `.html` name, so every value is
/// HTML-escaped on output.
pub fn render_html(report: &DriftReport) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("report.html", REPORT_TEMPLATE)
        .context("Failed to load report template")?;

    let template = env.get_template("report.html").context("Failed to load report template")?;
    template
        .render(PageView::new(report))
        .context("Failed to render HTML report")
}

#[derive(Serialize)]
struct PageView<'a> {
    version: String,
    generated_at: Option<&'a str>,
    summary: &'a DriftSummary,
    has_drift: bool,
    categories: Vec<CategoryView<'a>>,
}

impl<'a> PageView<'a> {
    fn new(report: &'a DriftReport) -> Self {
        Self {
            version: report.version.to_string(),
            generated_at: report.generated_at.as_deref(),
            summary: &report.summary,
            has_drift: report.has_drift(),
            categories: report
                .categories
                .iter()
                .map(|(category, drift)| CategoryView::new(*category, drift))
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct CategoryView<'a> {
    id: &'static str,
    title: &'static str,
    summary: &'a DriftSummary,
    added: Vec<&'a str>,
    removed: Vec<&'a str>,
    modified: Vec<ChangeView<'a>>,
    unchanged: &'a [String],
}

impl<'a> CategoryView<'a> {
    fn new(category: ObjectCategory, drift: &'a CategoryDrift) -> Self {
        Self {
            id: category.as_str(),
            title: category.title(),
            summary: &drift.summary,
            added: drift.added_names(),
            removed: drift.removed_names(),
            modified: drift.modified.iter().map(ChangeView::new).collect(),
            unchanged: &drift.unchanged,
        }
    }
}

#[derive(Serialize)]
struct ChangeView<'a> {
    name: &'a str,
    changed: Vec<&'static str>,
    fields: Vec<FieldRow<'a>>,
    columns: Vec<ColumnRow<'a>>,
}

impl<'a> ChangeView<'a> {
    fn new(change: &'a ObjectChange) -> Self {
        let fields = [
            ("Comment", &change.doc),
            ("Definition", &change.definition),
            ("Body hash", &change.body_hash),
            ("Table", &change.table_name),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value.as_ref().map(|value| FieldRow {
                label,
                source: value.source.as_deref(),
                target: value.target.as_deref(),
            })
        })
        .collect();

        Self {
            name: &change.name,
            changed: change.changed.iter().map(|f| f.as_str()).collect(),
            fields,
            columns: change.columns.as_ref().map(column_rows).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct FieldRow<'a> {
    label: &'static str,
    source: Option<&'a str>,
    target: Option<&'a str>,
}

#[derive(Serialize)]
struct ColumnRow<'a> {
    name: &'a str,
    class: &'static str,
    change: &'static str,
    source: Option<String>,
    target: Option<String>,
}

fn column_rows(columns: &ColumnsDiff) -> Vec<ColumnRow<'_>> {
    let mut rows = Vec::new();

    for column in &columns.added {
        rows.push(ColumnRow {
            name: &column.name,
            class: "added",
            change: "added",
            source: None,
            target: Some(describe_column(column)),
        });
    }

    for column in &columns.removed {
        rows.push(ColumnRow {
            name: &column.name,
            class: "removed",
            change: "removed",
            source: Some(describe_column(column)),
            target: None,
        });
    }

    for column in &columns.modified {
        let modified = move |change, source, target| ColumnRow {
            name: &column.name,
            class: "modified",
            change,
            source,
            target,
        };
        if let Some(data_type) = &column.data_type {
            rows.push(modified(
                "data type",
                Some(data_type.source.clone()),
                Some(data_type.target.clone()),
            ));
        }
        if let Some(nullable) = &column.nullable {
            rows.push(modified(
                "nullability",
                Some(nullable.source.to_string()),
                Some(nullable.target.to_string()),
            ));
        }
        if let Some(doc) = &column.doc {
            rows.push(modified("comment", doc.source.clone(), doc.target.clone()));
        }
    }

    rows
}

fn describe_column(column: &Column) -> String {
    format!("{} {}", column.data_type, column.nullable)
}
