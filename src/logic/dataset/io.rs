//! Dataset files: JSON arrays (`.json`), JSON Lines (`.jsonl`) or flat CSV (`.csv`)

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, ScoringError};
use crate::logic::personnel::{CategoricalField, NumericField, PersonnelRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    JsonLines,
    Csv,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(DatasetFormat::Json),
            Some("jsonl") | Some("ndjson") => Ok(DatasetFormat::JsonLines),
            Some("csv") => Ok(DatasetFormat::Csv),
            other => Err(ScoringError::invalid(
                "dataset",
                format!("unsupported extension {:?}; use .json, .jsonl or .csv", other),
            )),
        }
    }
}

/// CSV header: identity, categoricals, numerics, skills, labels
pub fn csv_columns() -> Vec<&'static str> {
    let mut columns = vec!["id", "name"];
    columns.extend(CategoricalField::ALL.iter().map(|f| f.as_str()));
    columns.extend(NumericField::ALL.iter().map(|f| f.as_str()));
    columns.extend(["skills", "attrition_risk", "readiness_score"]);
    columns
}

/// Parse one loosely typed record
pub fn record_from_value(value: &Value) -> Result<PersonnelRecord> {
    match value {
        Value::Object(map) => PersonnelRecord::from_map(map),
        _ => Err(ScoringError::invalid("record", "expected a JSON object")),
    }
}

pub fn read_records(path: &Path) -> Result<Vec<PersonnelRecord>> {
    let records = match DatasetFormat::from_path(path)? {
        DatasetFormat::Json => {
            let data = fs::read(path)?;
            match serde_json::from_slice::<Value>(&data)? {
                Value::Array(items) => items.iter().map(record_from_value).collect::<Result<Vec<_>>>()?,
                other => vec![record_from_value(&other)?],
            }
        }
        DatasetFormat::JsonLines => {
            let reader = BufReader::new(File::open(path)?);
            let mut records = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let value: Value = serde_json::from_str(&line)?;
                records.push(record_from_value(&value)?);
            }
            records
        }
        DatasetFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
            let headers = reader.headers()?.clone();
            let mut records = Vec::new();
            for row in reader.records() {
                let row = row?;
                // Empty cells count as absent
                let map: Map<String, Value> = headers
                    .iter()
                    .zip(row.iter())
                    .filter(|(_, cell)| !cell.is_empty())
                    .map(|(h, cell)| (h.to_string(), Value::String(cell.to_string())))
                    .collect();
                records.push(PersonnelRecord::from_map(&map)?);
            }
            records
        }
    };

    log::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

pub fn write_records(path: &Path, records: &[PersonnelRecord]) -> Result<usize> {
    let format = DatasetFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        DatasetFormat::Json => {
            let mut out = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut out, records)?;
            out.flush()?;
        }
        DatasetFormat::JsonLines => {
            let mut out = BufWriter::new(File::create(path)?);
            for record in records {
                serde_json::to_writer(&mut out, record)?;
                writeln!(out)?;
            }
            out.flush()?;
        }
        DatasetFormat::Csv => write_csv(path, records)?,
    }

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(records.len())
}

fn write_csv(path: &Path, records: &[PersonnelRecord]) -> Result<()> {
    let columns = csv_columns();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;

    for record in records {
        let Value::Object(fields) = serde_json::to_value(record)? else {
            return Err(ScoringError::invalid("record", "did not serialize to an object"));
        };
        let row = columns.iter().map(|c| match fields.get(*c) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        });
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}
