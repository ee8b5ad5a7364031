//! # CSV I/O
//!
//! $$
//! \text{Date},\ \text{Symbol},\ \text{Close},\ \text{Return+1} \mapsto \text{Instrument}
//! $$
//!
//! Loading instrument histories and writing the sampled scatter.

use std::path::Path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use csv::Reader;
use csv::Writer;
use serde::Deserialize;

use crate::portfolio::PortfolioSample;
use crate::series::Instrument;
use crate::series::PriceRecord;
use crate::stats::InstrumentStats;

/// The four columns used from a price file; any other column is ignored.
#[derive(Debug, Deserialize)]
struct PriceRow {
  #[serde(rename = "Date")]
  date: NaiveDate,
  #[serde(rename = "Symbol")]
  symbol: String,
  #[serde(rename = "Close")]
  close: f64,
  #[serde(rename = "Return+1")]
  forward_return: f64,
}

/// Load one instrument from a CSV file with a header row.
///
/// The instrument symbol is taken from the first record.
pub fn load_instrument<P: AsRef<Path>>(path: P) -> Result<Instrument> {
  let path = path.as_ref();
  let mut reader = Reader::from_path(path)
    .with_context(|| format!("Failed to open file: {:?}", path))?;

  let mut records = Vec::new();
  for (i, row) in reader.deserialize::<PriceRow>().enumerate() {
    let row = row.with_context(|| format!("Failed to parse row {} of {:?}", i + 1, path))?;
    records.push(PriceRecord {
      date: row.date,
      symbol: row.symbol,
      close: row.close,
      forward_return: row.forward_return,
    });
  }

  let Some(first) = records.first() else {
    bail!("no price records in {:?}", path);
  };
  let symbol = first.symbol.clone();

  Instrument::new(symbol, records).with_context(|| format!("Invalid history in {:?}", path))
}

/// Write samples as CSV: one weight column per symbol, then `risk` and `return`.
pub fn write_samples<P: AsRef<Path>>(
  path: P,
  stats: &[InstrumentStats],
  samples: &[PortfolioSample],
) -> Result<()> {
  let path = path.as_ref();
  let mut writer =
    Writer::from_path(path).with_context(|| format!("Failed to create file: {:?}", path))?;

  let mut header: Vec<String> = stats.iter().map(|s| s.symbol.clone()).collect();
  header.push("risk".to_string());
  header.push("return".to_string());
  writer.write_record(&header)?;

  for sample in samples {
    let mut row: Vec<String> = sample.weights.iter().map(|w| w.to_string()).collect();
    row.push(sample.risk.to_string());
    row.push(sample.expected_return.to_string());
    writer.write_record(&row)?;
  }

  writer.flush()?;
  Ok(())
}
