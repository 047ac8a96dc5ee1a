//! Record rendering.

use std::io::Write;

use anyhow::Result;
use openaire_lib::api::query::Record;
use serde_json::Value;

use crate::args::OutputFormat;

enum Sink<W: Write> {
    Text(W),
    Csv {
        writer: csv::Writer<W>,
        /// Column names, taken from the first record.
        header: Option<Vec<String>>,
    },
}

/// Streams records to `out` as a JSON array, JSON Lines or CSV.
pub struct RecordWriter<W: Write> {
    sink: Sink<W>,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        let sink = match format {
            OutputFormat::Csv => Sink::Csv {
                writer: csv::Writer::from_writer(out),
                header: None,
            },
            OutputFormat::Json | OutputFormat::Jsonl => Sink::Text(out),
        };
        Self {
            sink,
            format,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, record: &Record) -> Result<()> {
        match &mut self.sink {
            Sink::Text(out) => {
                let line = serde_json::to_string(record)?;
                if self.format == OutputFormat::Json {
                    let sep = if self.written == 0 { "[\n  " } else { ",\n  " };
                    write!(out, "{sep}{line}")?;
                } else {
                    writeln!(out, "{line}")?;
                }
            }
            Sink::Csv { writer, header } => {
                if header.is_none() {
                    let columns = csv_columns(record);
                    writer.write_record(&columns)?;
                    *header = Some(columns);
                }
                let columns = header.as_deref().unwrap_or_default();
                let row: Vec<String> = match record {
                    Value::Object(fields) => columns
                        .iter()
                        .map(|column| fields.get(column).map(csv_cell).unwrap_or_default())
                        .collect(),
                    other => vec![csv_cell(other)],
                };
                writer.write_record(&row)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    /// Closes the array for `json` output and flushes.
    ///
    /// Safe to call after a failed fetch: whatever was written stays a
    /// complete document.
    pub fn finish(self) -> Result<W> {
        match self.sink {
            Sink::Text(mut out) => {
                if self.format == OutputFormat::Json {
                    if self.written == 0 {
                        writeln!(out, "[]")?;
                    } else {
                        writeln!(out, "\n]")?;
                    }
                }
                out.flush()?;
                Ok(out)
            }
            Sink::Csv { writer, .. } => {
                let mut out = writer.into_inner().map_err(|e| e.into_error())?;
                out.flush()?;
                Ok(out)
            }
        }
    }
}

/// Top-level keys of an object record, or a single `value` column.
fn csv_columns(record: &Record) -> Vec<String> {
    match record {
        Value::Object(fields) => fields.keys().cloned().collect(),
        _ => vec!["value".to_string()],
    }
}

/// Strings are written as-is, null as empty, and anything else as JSON.
fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
