/*!
 * Rendering of command results
 *
 * Results are either rendered as console tables using the tabled library or
 * serialized as pretty-printed JSON for scripting.
 */

use serde::Serialize;
use serde_json::{Map, Value};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::settings::SettingKey;
use crate::types::{BrowseView, DeleteOutcome, MediaTarget, StorageView, WatchView};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Report generator for command results
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn render<T: Serialize>(&self, value: &T, table: impl FnOnce(&T) -> String) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(table(value)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn style<R: Tabled>(rows: Vec<R>) -> String {
        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Keep the tail of long names, which carries the episode number
    fn truncate(name: &str, max_len: usize) -> String {
        let count = name.chars().count();
        if count <= max_len {
            return name.to_string();
        }
        let tail: String = name.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }

    /// Render a directory page
    pub fn browse(&self, view: &BrowseView) -> Result<String> {
        self.render(view, |view| {
            #[derive(Tabled)]
            struct EntryRow {
                #[tabled(rename = "Type")]
                kind: &'static str,

                #[tabled(rename = "Name")]
                name: String,

                #[tabled(rename = "Path")]
                path: String,
            }

            let rows: Vec<EntryRow> = view
                .page
                .items
                .iter()
                .map(|entry| EntryRow {
                    kind: if entry.is_dir {
                        "dir"
                    } else if entry.is_video {
                        "video"
                    } else {
                        "file"
                    },
                    name: Self::truncate(&entry.name, 60),
                    path: entry.path.clone(),
                })
                .collect();

            let mut summary = vec![
                SummaryRow::new("Directory", format!("/{}", view.current)),
                SummaryRow::new(
                    "Page",
                    format!("{} of {}", view.page.page, view.page.page_count),
                ),
                SummaryRow::new("Items", view.total_items.to_string()),
            ];
            if !view.query.is_empty() {
                summary.push(SummaryRow::new("Filter", view.query.clone()));
            }

            let listing = if rows.is_empty() {
                "(empty)".to_string()
            } else {
                Self::style(rows)
            };
            format!("{}\n{}", listing, Self::style(summary))
        })
    }

    /// Render a playback description
    pub fn watch(&self, view: &WatchView) -> Result<String> {
        self.render(view, |view| {
            Self::style(vec![
                SummaryRow::new("Video", view.video.clone()),
                SummaryRow::new("Directory", format!("/{}", view.parent)),
                SummaryRow::new(
                    "Next",
                    view.next_video.clone().unwrap_or_else(|| "-".to_string()),
                ),
            ])
        })
    }

    /// Render a resolved media file
    pub fn media(&self, target: &MediaTarget) -> Result<String> {
        self.render(target, |target| {
            Self::style(vec![
                SummaryRow::new("File", target.path.display().to_string()),
                SummaryRow::new("Redirect", target.accel_uri.clone()),
            ])
        })
    }

    /// Render the result of a delete
    pub fn delete(&self, outcome: &DeleteOutcome) -> Result<String> {
        self.render(outcome, |outcome| {
            Self::style(vec![
                SummaryRow::new("Status", outcome.message.clone()),
                SummaryRow::new("Removed directories", outcome.removed_dirs.to_string()),
                SummaryRow::new("Continue at", format!("/{}", outcome.redirect)),
            ])
        })
    }

    /// Render the cached library size
    pub fn storage(&self, view: &StorageView) -> Result<String> {
        self.render(view, |view| match (&view.record, &view.formatted) {
            (Some(record), Some(formatted)) => Self::style(vec![
                SummaryRow::new("Library size", formatted.clone()),
                SummaryRow::new("Bytes", record.bytes.to_string()),
                SummaryRow::new("Updated", record.updated_at.to_rfc3339()),
            ]),
            _ => Self::style(vec![SummaryRow::new("Library size", "unknown")]),
        })
    }

    /// Render stored settings
    pub fn settings(&self, settings: &[(SettingKey, Option<Value>)]) -> Result<String> {
        let map: Map<String, Value> = settings
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone().unwrap_or(Value::Null)))
            .collect();

        self.render(&map, |map| {
            let rows: Vec<SummaryRow> = map
                .iter()
                .map(|(key, value)| {
                    let shown = match value {
                        Value::Null => "(unset)".to_string(),
                        other => other.to_string(),
                    };
                    SummaryRow::new(key, shown)
                })
                .collect();
            Self::style(rows)
        })
    }
}
