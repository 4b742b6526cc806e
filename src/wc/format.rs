use std::collections::BTreeMap;
use std::io;

use serde::Serialize;

use super::core::{CountSelection, Counts};
use super::runner::{OutputRow, RunOptions, RunResult, TotalMode};
use crate::common::io_error_msg;

impl CountSelection {
    /// Selected metric names in output order: lines, words, chars, bytes,
    /// max line length.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::with_capacity(5);
        if self.lines {
            labels.push("lines");
        }
        if self.words {
            labels.push("words");
        }
        if self.chars {
            labels.push("chars");
        }
        if self.bytes {
            labels.push("bytes");
        }
        if self.max_line_length {
            labels.push("maxLineLength");
        }
        labels
    }

    /// Selected count values, in the same order as `labels`.
    pub fn values(&self, counts: &Counts) -> Vec<u64> {
        let mut values = Vec::with_capacity(5);
        if self.lines {
            values.push(counts.lines);
        }
        if self.words {
            values.push(counts.words);
        }
        if self.chars {
            values.push(counts.chars);
        }
        if self.bytes {
            values.push(counts.bytes);
        }
        if self.max_line_length {
            values.push(counts.max_line_length);
        }
        values
    }
}

/// Render the final output for a completed run.
///
/// Row visibility under --total=only is decided here, once, before the
/// format split: successful per-input rows drop out of the logical row set
/// while error rows stay (text reports them on stderr, JSON inlines them),
/// so both formats always see the same rows.
pub fn render(result: &RunResult, options: &RunOptions) -> io::Result<String> {
    let only = options.total_mode == TotalMode::Only;

    let rows: Vec<&OutputRow> = result
        .rows
        .iter()
        .filter(|row| !(only && row.outcome.is_ok()))
        .collect();
    let total = result.show_total.then_some(&result.total);

    if options.json {
        format_json(&rows, &options.selection, total).map_err(io::Error::other)
    } else {
        Ok(format_text(&rows, &options.selection, total, only))
    }
}

/// Plain-text rows: counts right-aligned to the widest displayed value,
/// followed by the display name when there is one. The total row is labeled
/// "total", except under --total=only where it is bare and unaligned.
pub fn format_text(
    rows: &[&OutputRow],
    selection: &CountSelection,
    total: Option<&Counts>,
    total_only: bool,
) -> String {
    let mut table: Vec<(Vec<u64>, &str)> = rows
        .iter()
        .filter_map(|row| {
            row.outcome
                .as_ref()
                .ok()
                .map(|counts| (selection.values(counts), row.name.as_str()))
        })
        .collect();

    if let Some(total) = total {
        let label = if total_only { "" } else { "total" };
        table.push((selection.values(total), label));
    }

    if table.is_empty() {
        return String::new();
    }

    let align = !total_only;
    let field_count = selection.labels().len();
    let width = table
        .iter()
        .flat_map(|(values, _)| values.iter())
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);

    let mut lines = Vec::with_capacity(table.len());
    for (values, name) in &table {
        let mut line = if field_count == 1 || !align {
            values
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            values
                .iter()
                .map(|value| format!("{value:>width$}"))
                .collect::<Vec<_>>()
                .join(" ")
        };

        if !name.is_empty() {
            line.push(' ');
            line.push_str(name);
        }
        lines.push(line);
    }

    lines.join("\n")
}

#[derive(Serialize)]
struct JsonFileEntry {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    counts: Option<BTreeMap<&'static str, u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput {
    metrics: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<JsonFileEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<BTreeMap<&'static str, u64>>,
}

fn selected_map(selection: &CountSelection, counts: &Counts) -> BTreeMap<&'static str, u64> {
    selection
        .labels()
        .into_iter()
        .zip(selection.values(counts))
        .collect()
}

/// Structured output: requested metric names, one entry per visible row
/// (counts or error message), and the total when shown. An unnamed stdin
/// row appears as "stdin".
pub fn format_json(
    rows: &[&OutputRow],
    selection: &CountSelection,
    total: Option<&Counts>,
) -> serde_json::Result<String> {
    let files = rows
        .iter()
        .map(|row| {
            let file = if row.name.is_empty() {
                "stdin".to_string()
            } else {
                row.name.clone()
            };

            match &row.outcome {
                Ok(counts) => JsonFileEntry {
                    file,
                    counts: Some(selected_map(selection, counts)),
                    error: None,
                },
                Err(err) => JsonFileEntry {
                    file,
                    counts: None,
                    error: Some(io_error_msg(err)),
                },
            }
        })
        .collect();

    let out = JsonOutput {
        metrics: selection.labels(),
        files,
        total: total.map(|total| selected_map(selection, total)),
    };

    serde_json::to_string_pretty(&out)
}
