//! Whitespace-delimited data file of accepted search records.
//!
//! One header line names the columns, e.g. `gamma a beta energy variance`,
//! then one row per record. The last column is sqrt(|σ²|), the display error
//! bar, not the raw variance of the mean.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use crate::error::{Result, VmcError};
use crate::sampling::SearchRecord;

/// One parsed row: parameters, energy and error bar.
#[derive(Clone, Debug, PartialEq)]
pub struct DataRow {
    pub params: Vec<f64>,
    pub energy: f64,
    pub sigma: f64,
}

impl From<&SearchRecord> for DataRow {
    fn from(record: &SearchRecord) -> Self {
        Self {
            params: record.params.clone(),
            energy: record.energy,
            sigma: record.sigma(),
        }
    }
}

/// Write `records` under a header of `param_names` followed by
/// `energy variance`.
pub fn write_records<W: Write>(out: W, param_names: &[&str], records: &[SearchRecord]) -> Result<()> {
    let mut writer = BufWriter::new(out);
    let header: Vec<&str> = param_names.iter().copied().chain(["energy", "variance"]).collect();
    writeln!(writer, "{}", header.join("  "))?;
    for record in records {
        let row: Vec<String> = record
            .params
            .iter()
            .chain([record.energy, record.sigma()].iter())
            .map(|v| v.to_string())
            .collect();
        writeln!(writer, "{}", row.join("  "))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_data_file<P: AsRef<Path>>(path: P, param_names: &[&str], records: &[SearchRecord]) -> Result<()> {
    write_records(File::create(path)?, param_names, records)
}

/// Parse a data file back into its column names and rows.
pub fn read_records<R: BufRead>(input: R) -> Result<(Vec<String>, Vec<DataRow>)> {
    let mut lines = input.lines();
    let header: Vec<String> = match lines.next() {
        Some(line) => line?.split_whitespace().map(str::to_owned).collect(),
        None => {
            return Err(VmcError::Parse {
                line: 1,
                message: "missing header".into(),
            })
        }
    };
    if header.len() < 3 {
        return Err(VmcError::Parse {
            line: 1,
            message: format!("expected at least 3 columns, found {}", header.len()),
        });
    }
    let n_params = header.len() - 2;

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let values = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|e| VmcError::Parse {
                    line: line_no,
                    message: format!("{:?}: {}", tok, e),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if values.len() != header.len() {
            return Err(VmcError::Parse {
                line: line_no,
                message: format!("expected {} columns, found {}", header.len(), values.len()),
            });
        }
        rows.push(DataRow {
            params: values[..n_params].to_vec(),
            energy: values[n_params],
            sigma: values[n_params + 1],
        });
    }
    Ok((header, rows))
}

pub fn read_data_file<P: AsRef<Path>>(path: P) -> Result<(Vec<String>, Vec<DataRow>)> {
    read_records(BufReader::new(File::open(path)?))
}
