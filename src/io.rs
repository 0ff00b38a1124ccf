//! Loading and saving datasets as delimited text.
//!
//! Format:
//!
//! - first line: attribute names separated by tabs (trimmed, lower-cased);
//! - every other line: one record, tab-separated (`", "`-separated lines are
//!   accepted too);
//! - decimal commas are read as decimal points;
//! - values must be finite (`inf` and `NaN` are rejected);
//! - `?` marks a missing value, imputed with a uniform draw from the column's
//!   observed `[min, max]`.
//!
//! A column whose every present value is written as an integer is declared
//! [`NumericKind::Integer`]; any other column is `Real`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use rand::Rng;
use tracing::{debug, info};

use crate::data::{Attribute, Dataset, NumericKind};
use crate::error::{Result, SdcError};

/// Missing-value marker.
pub const NULL_SENTINEL: &str = "?";

/// Parse a dataset from delimited text, imputing missing values with `rng`.
pub fn read_dataset<R: Read, G: Rng + ?Sized>(reader: R, rng: &mut G) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let names: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    if names.is_empty() || names.iter().all(String::is_empty) {
        return Err(SdcError::Parse {
            line: 1,
            message: "missing header row".to_string(),
        });
    }
    let width = names.len();

    let mut rows: Vec<Vec<Option<f64>>> = Vec::new();
    let mut integral = vec![true; width];
    let mut observed = vec![false; width];

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(rows.len() + 2, |p| p.line() as usize);
        let fields: Vec<&str> = if record.len() == 1 {
            record[0].split(", ").map(str::trim).collect()
        } else {
            record.iter().collect()
        };
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        if fields.len() != width {
            return Err(SdcError::Parse {
                line,
                message: format!("expected {width} values, found {}", fields.len()),
            });
        }

        let mut row = Vec::with_capacity(width);
        for (col, field) in fields.iter().enumerate() {
            if *field == NULL_SENTINEL {
                row.push(None);
                continue;
            }
            let token = field.replace(',', ".");
            let value: f64 = token.parse().map_err(|_| SdcError::Parse {
                line,
                message: format!("attribute {} has non-numeric value '{field}'", names[col]),
            })?;
            if !value.is_finite() {
                return Err(SdcError::Parse {
                    line,
                    message: format!("attribute {} has non-finite value '{field}'", names[col]),
                });
            }
            observed[col] = true;
            integral[col] &= token.parse::<i64>().is_ok();
            row.push(Some(value));
        }
        rows.push(row);
    }

    let kinds: Vec<NumericKind> = integral
        .iter()
        .zip(&observed)
        .map(|(&int, &seen)| {
            if int && seen {
                NumericKind::Integer
            } else {
                NumericKind::Real
            }
        })
        .collect();
    let ranges = observed_ranges(&rows, width);

    let attributes = names
        .into_iter()
        .zip(&kinds)
        .map(|(name, &kind)| Attribute::new(name).with_kind(kind))
        .collect();
    let mut dataset = Dataset::new(attributes);
    let mut imputed = 0usize;

    for row in rows {
        let mut values = Vec::with_capacity(width);
        for (col, cell) in row.into_iter().enumerate() {
            let value = match cell {
                Some(v) => v,
                None => {
                    let (lo, hi) = ranges[col].ok_or_else(|| SdcError::Parse {
                        line: 1,
                        message: format!(
                            "attribute {} has no observed values to impute from",
                            dataset.attribute(col).name()
                        ),
                    })?;
                    imputed += 1;
                    impute(rng, lo, hi, kinds[col])
                }
            };
            values.push(value);
        }
        dataset.push(values)?;
    }

    if imputed > 0 {
        debug!(imputed, "imputed missing values");
    }
    Ok(dataset)
}

fn observed_ranges(rows: &[Vec<Option<f64>>], width: usize) -> Vec<Option<(f64, f64)>> {
    let mut ranges: Vec<Option<(f64, f64)>> = vec![None; width];
    for row in rows {
        for (range, cell) in ranges.iter_mut().zip(row) {
            if let Some(v) = *cell {
                *range = Some(match *range {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
    }
    ranges
}

fn impute<G: Rng + ?Sized>(rng: &mut G, lo: f64, hi: f64, kind: NumericKind) -> f64 {
    let v = if hi > lo { rng.random_range(lo..=hi) } else { lo };
    match kind {
        NumericKind::Integer => v.round(),
        NumericKind::Real => v,
    }
}

/// Load a dataset from a file.
pub fn load<P: AsRef<Path>, G: Rng + ?Sized>(path: P, rng: &mut G) -> Result<Dataset> {
    let path = path.as_ref();
    let dataset = read_dataset(File::open(path)?, rng)?;
    info!(
        path = %path.display(),
        records = dataset.len(),
        attributes = dataset.num_attributes(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Write a dataset as tab-separated text with a header row.
///
/// Integer attributes are written without a fractional part.
pub fn write_dataset<W: Write>(writer: W, dataset: &Dataset) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    csv_writer.write_record(dataset.attributes().iter().map(Attribute::name))?;
    for record in dataset.records() {
        csv_writer.write_record(
            record
                .values()
                .iter()
                .zip(dataset.attributes())
                .map(|(v, a)| format_value(*v, a.kind())),
        )?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn format_value(v: f64, kind: NumericKind) -> String {
    match kind {
        NumericKind::Integer => format!("{v:.0}"),
        NumericKind::Real => v.to_string(),
    }
}

/// Save a dataset to a file.
pub fn save<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<()> {
    let path = path.as_ref();
    write_dataset(File::create(path)?, dataset)?;
    info!(path = %path.display(), records = dataset.len(), "dataset written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parse(text: &str) -> Result<Dataset> {
        let mut rng = StdRng::seed_from_u64(9);
        read_dataset(text.as_bytes(), &mut rng)
    }

    #[test]
    fn reads_header_and_kinds() {
        let ds = parse(" Age \tIncome\n30\t1200,5\n40\t800\n").unwrap();
        assert_eq!(ds.attribute(0).name(), "age");
        assert_eq!(ds.attribute(0).kind(), NumericKind::Integer);
        assert_eq!(ds.attribute(1).kind(), NumericKind::Real);
        assert_eq!(ds.record(0).values(), &[30.0, 1200.5]);
        assert_eq!(ds.record(1).original_position(), 1);
    }

    #[test]
    fn accepts_comma_space_rows() {
        let ds = parse("a\tb\n1, 2\n3\t4\n").unwrap();
        assert_eq!(ds.column(1), vec![2.0, 4.0]);
    }

    #[test]
    fn imputes_missing_within_observed_range() {
        let ds = parse("a\tb\n1\t10\n?\t20\n5\t?\n").unwrap();
        let a = ds.value(1, 0);
        let b = ds.value(2, 1);
        assert!((1.0..=5.0).contains(&a));
        assert_eq!(a.fract(), 0.0);
        assert!((10.0..=20.0).contains(&b));
    }

    #[test]
    fn rejects_ragged_and_non_numeric_rows() {
        assert!(matches!(
            parse("a\tb\n1\t2\t3\n"),
            Err(SdcError::Parse { .. }) | Err(SdcError::Csv(_))
        ));
        assert!(matches!(
            parse("a\tb\n1\tabc\n"),
            Err(SdcError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        for token in ["inf", "-inf", "NaN", "infinity"] {
            let text = format!("a\tb\n1\t{token}\n2\t3\n");
            assert!(
                matches!(parse(&text), Err(SdcError::Parse { line: 2, .. })),
                "{token} accepted"
            );
        }
    }

    #[test]
    fn column_without_values_reports_header_line() {
        let err = parse("a\tb\n1\t?\n2\t?\n").unwrap_err();
        match err {
            SdcError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("attribute b "), "{message}");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn write_then_read_keeps_values() {
        let ds = parse("n\tx\n1\t0.25\n2\t0.5\n").unwrap();
        let mut buf = Vec::new();
        write_dataset(&mut buf, &ds).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "n\tx\n1\t0.25\n2\t0.5\n");
        assert_eq!(parse(&text).unwrap(), ds);
    }
}
