//! Output sink collaborator
//!
//! One batch write of the flattened records into a delimited file, header
//! row taken from the schema. The schema is an ordered list of
//! `(field_id, display_title)` pairs so column order and titles live with
//! the caller, not the sink.

use crate::domain::model::TraderRecord;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to create output file: {0}")]
    Create(#[from] std::io::Error),

    #[error("failed to write records: {0}")]
    Write(#[from] csv::Error),
}

pub type SinkResult<T> = Result<T, SinkError>;

/// Field ids a [`TraderRecord`] can be asked for by the schema
fn record_field<'a>(record: &'a TraderRecord, field_id: &str) -> &'a str {
    match field_id {
        "coin" => &record.pair,
        "wallet_address" => &record.wallet,
        _ => "",
    }
}

pub trait OutputSink {
    fn write(
        &self,
        path: &Path,
        schema: &[(&str, &str)],
        records: &[TraderRecord],
    ) -> SinkResult<()>;
}

/// CSV file sink
#[derive(Debug, Default)]
pub struct CsvSink;

impl OutputSink for CsvSink {
    fn write(
        &self,
        path: &Path,
        schema: &[(&str, &str)],
        records: &[TraderRecord],
    ) -> SinkResult<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        writer.write_record(schema.iter().map(|(_, title)| *title))?;
        for record in records {
            writer.write_record(schema.iter().map(|(field, _)| record_field(record, field)))?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = records.len(), "output written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[(&str, &str)] = &[("coin", "Coin Name"), ("wallet_address", "Wallet Address")];

    fn record(pair: &str, wallet: &str) -> TraderRecord {
        TraderRecord {
            pair: pair.to_string(),
            wallet: wallet.to_string(),
        }
    }

    #[test]
    fn writes_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        CsvSink
            .write(
                &path,
                SCHEMA,
                &[record("PEPE", "9xQeWvG81"), record("WIF", "3nGhTxP42")],
            )
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(
            lines,
            [
                "Coin Name,Wallet Address",
                "PEPE,9xQeWvG81",
                "WIF,3nGhTxP42"
            ]
        );
    }

    #[test]
    fn empty_batch_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        CsvSink.write(&path, SCHEMA, &[]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim(), "Coin Name,Wallet Address");
    }

    #[test]
    fn fields_containing_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        CsvSink
            .write(&path, SCHEMA, &[record("A,B", "w1")])
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"A,B\",w1"));
    }
}
