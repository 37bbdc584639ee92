//! Output rendering for command rows.
//!
//! Supports table (human-readable), JSON and tab-delimited output.

use std::io::Write;

use clc_plug::Row;
use serde_json::{Map, Value as Json};

use crate::cli::Format;
use crate::error::CliError;

/// Renders rows in the selected format.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Write rows to the output. Nothing is written for zero rows except in
    /// JSON, which writes an empty array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W: Write>(&self, writer: &mut W, rows: &[Row]) -> Result<(), CliError> {
        match self.format {
            Format::Json => write_json(writer, rows),
            Format::Table => write_table(writer, rows),
            Format::Delimited => write_delimited(writer, rows),
        }
    }

    /// Render rows to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string(&self, rows: &[Row]) -> Result<String, CliError> {
        let mut buf = Vec::new();
        self.write(&mut buf, rows)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

fn write_json<W: Write>(writer: &mut W, rows: &[Row]) -> Result<(), CliError> {
    let objects = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|col| {
                    serde_json::to_value(&col.value).map(|value| (col.name.clone(), value))
                })
                .collect::<Result<Map<String, Json>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
    serde_json::to_writer_pretty(&mut *writer, &objects)
        .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
    writeln!(writer)?;
    Ok(())
}

fn write_delimited<W: Write>(writer: &mut W, rows: &[Row]) -> Result<(), CliError> {
    for row in rows {
        let cells: Vec<String> = row.iter().map(|col| col.value.to_string()).collect();
        writeln!(writer, "{}", cells.join("\t"))?;
    }
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, rows: &[Row]) -> Result<(), CliError> {
    let mut headers: Vec<&str> = Vec::new();
    for row in rows {
        for col in row {
            if !headers.contains(&col.name.as_str()) {
                headers.push(&col.name);
            }
        }
    }
    if headers.is_empty() {
        return Ok(());
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| {
                    row.iter()
                        .find(|col| col.name == *h)
                        .map(|col| col.value.to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |values: &[&str]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<width$}", width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };
    writeln!(writer, "{}", line(&headers))?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(writer, "{}", rule.join("-+-"))?;
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        writeln!(writer, "{}", line(&values))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clc_plug::Column;
    use clc_plug::output::{NAME_KEY, NAME_VALUE};
    use clc_proto::{Value, ValueType};

    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            vec![
                Column::string(NAME_KEY, "k1"),
                Column::new(NAME_VALUE, ValueType::INT64, Value::Int64(42)),
            ],
            vec![
                Column::string(NAME_KEY, "key-2"),
                Column::new(NAME_VALUE, ValueType::new(7), Value::undecodable("CUSTOM(7)")),
            ],
        ]
    }

    #[test]
    fn table_aligns_columns() {
        let out = OutputFormat::new(Format::Table).to_string(&rows()).expect("render");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Key   | Value");
        assert_eq!(lines[1], format!("{}+{}", "-".repeat(6), "-".repeat(25)));
        assert_eq!(lines[2], "k1    | 42");
        assert_eq!(lines[3], "key-2 | (undecodable: CUSTOM(7))");
    }

    #[test]
    fn json_is_array_of_objects() {
        let out = OutputFormat::new(Format::Json).to_string(&rows()).expect("render");
        let parsed: Json = serde_json::from_str(&out).expect("valid json");
        assert_eq!(parsed[0]["Key"], "k1");
        assert_eq!(parsed[0]["Value"], 42);
        assert_eq!(parsed[1]["Value"], "(undecodable: CUSTOM(7))");
    }

    #[test]
    fn delimited_has_no_header() {
        let out = OutputFormat::new(Format::Delimited)
            .to_string(&rows())
            .expect("render");
        assert_eq!(out, "k1\t42\nkey-2\t(undecodable: CUSTOM(7))\n");
    }

    #[test]
    fn zero_rows() {
        assert_eq!(OutputFormat::new(Format::Table).to_string(&[]).expect("render"), "");
        assert_eq!(
            OutputFormat::new(Format::Json).to_string(&[]).expect("render"),
            "[]\n"
        );
    }
}
