use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::boundary::CountyBoundaries;
use super::error::{DataError, FormatIssue};
use super::model::{CaseDataset, CaseRecord, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Both inputs, loaded and ready for the dashboard.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: CaseDataset,
    pub boundaries: CountyBoundaries,
}

/// Load the case table and the county boundaries.
///
/// Both paths are checked before either is parsed, so a missing file is
/// always reported as [`DataError::NotFound`] naming that file.
pub fn load(cases_path: &Path, boundaries_path: &Path) -> Result<LoadedData, DataError> {
    ensure_exists(cases_path)?;
    ensure_exists(boundaries_path)?;

    let dataset = load_cases(cases_path)?;
    if dataset.is_empty() {
        log::warn!("Case table {} has a header but no rows", cases_path.display());
    }
    log::info!(
        "Loaded {} case rows ({} diseases, {} counties, {} years) from {}",
        dataset.len(),
        dataset.vocabulary.diseases.len(),
        dataset.vocabulary.counties.len(),
        dataset.vocabulary.years.len(),
        cases_path.display()
    );

    let boundaries = load_boundaries(boundaries_path)?;
    if boundaries.is_empty() {
        log::warn!(
            "No feature in {} has a usable polygon; the map will be blank",
            boundaries_path.display()
        );
    }
    log::info!(
        "Loaded {} county boundaries from {}",
        boundaries.len(),
        boundaries_path.display()
    );

    Ok(LoadedData {
        dataset,
        boundaries,
    })
}

fn ensure_exists(path: &Path) -> Result<(), DataError> {
    if path.exists() {
        Ok(())
    } else {
        Err(DataError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Load the case table, dispatching on the file extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Disease,County,Year,Sex,Cases`
/// * `.json`    – `[{ "Disease": ..., "County": ..., ... }, ...]`
/// * `.parquet` – the same five columns as Arrow Utf8 / integer columns
pub fn load_cases(path: &Path) -> Result<CaseDataset, DataError> {
    ensure_exists(path)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(DataError::format(
                path,
                FormatIssue::UnsupportedExtension(other.to_string()),
            ))
        }
    };

    Ok(CaseDataset::from_records(records))
}

/// Load the GeoJSON county boundary collection.
pub fn load_boundaries(path: &Path) -> Result<CountyBoundaries, DataError> {
    ensure_exists(path)?;
    let text = read_text(path)?;
    CountyBoundaries::parse(&text, path)
}

fn read_text(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// First required column not satisfied by `has`.
fn first_missing(has: impl Fn(&str) -> bool) -> Option<&'static str> {
    REQUIRED_COLUMNS.into_iter().find(|col| !has(col))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<CaseRecord>, DataError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();

    if let Some(col) = first_missing(|c| headers.iter().any(|h| h == c)) {
        return Err(DataError::format(path, FormatIssue::MissingColumn(col)));
    }

    reader
        .deserialize::<CaseRecord>()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| {
                DataError::format(
                    path,
                    FormatIssue::BadRow {
                        row: i + 1,
                        detail: e.to_string(),
                    },
                )
            })
        })
        .collect()
}

fn csv_error(path: &Path, err: csv::Error) -> DataError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DataError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => DataError::malformed(path, format!("{other:?}")),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented layout, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Disease": "Flu", "County": "Alameda", "Year": 2020, "Sex": "M", "Cases": 5 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<CaseRecord>, DataError> {
    let text = read_text(path)?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| DataError::malformed(path, format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataError::malformed(path, "expected top-level JSON array"))?;

    // Columns only exist through the records, so an empty array has none.
    if rows.is_empty() {
        return Err(DataError::format(
            path,
            FormatIssue::MissingColumn(REQUIRED_COLUMNS[0]),
        ));
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| {
            DataError::format(
                path,
                FormatIssue::BadRow {
                    row: i + 1,
                    detail: "not a JSON object".into(),
                },
            )
        })?;

        if let Some(col) = first_missing(|c| obj.contains_key(c)) {
            return Err(DataError::format(path, FormatIssue::MissingColumn(col)));
        }

        let rec = CaseRecord::deserialize(row).map_err(|e| {
            DataError::format(
                path,
                FormatIssue::BadRow {
                    row: i + 1,
                    detail: e.to_string(),
                },
            )
        })?;
        records.push(rec);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet case table.
///
/// Expected schema:
/// - `Disease`, `County`, `Sex`: Utf8 / LargeUtf8
/// - `Year`, `Cases`: Int32 or Int64
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<CaseRecord>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::malformed(path, format!("reading parquet metadata: {e}")))?;

    let schema = builder.schema().clone();
    if let Some(col) = first_missing(|c| schema.index_of(c).is_ok()) {
        return Err(DataError::format(path, FormatIssue::MissingColumn(col)));
    }

    let reader = builder
        .build()
        .map_err(|e| DataError::malformed(path, format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DataError::malformed(path, format!("reading parquet batch: {e}")))?;
        let columns = ParquetColumns::locate(&batch.schema(), path)?;

        for row in 0..batch.num_rows() {
            let bad_row = |detail: String| {
                DataError::format(
                    path,
                    FormatIssue::BadRow {
                        row: row_base + row + 1,
                        detail,
                    },
                )
            };

            let disease = extract_string(batch.column(columns.disease), row).map_err(&bad_row)?;
            let county = extract_string(batch.column(columns.county), row).map_err(&bad_row)?;
            let sex = extract_string(batch.column(columns.sex), row).map_err(&bad_row)?;
            let year = extract_i64(batch.column(columns.year), row).map_err(&bad_row)?;
            let cases = extract_i64(batch.column(columns.cases), row).map_err(&bad_row)?;

            let year =
                i32::try_from(year).map_err(|_| bad_row(format!("year {year} out of range")))?;
            let cases =
                u64::try_from(cases).map_err(|_| bad_row(format!("negative case count {cases}")))?;

            records.push(CaseRecord {
                disease,
                county,
                year,
                sex,
                cases,
            });
        }
        row_base += batch.num_rows();
    }

    Ok(records)
}

/// Column positions of the five required fields within a record batch.
struct ParquetColumns {
    disease: usize,
    county: usize,
    year: usize,
    sex: usize,
    cases: usize,
}

impl ParquetColumns {
    fn locate(schema: &Schema, path: &Path) -> Result<Self, DataError> {
        let idx = |col: &'static str| {
            schema
                .index_of(col)
                .map_err(|_| DataError::format(path, FormatIssue::MissingColumn(col)))
        };
        Ok(ParquetColumns {
            disease: idx("Disease")?,
            county: idx("County")?,
            year: idx("Year")?,
            sex: idx("Sex")?,
            cases: idx("Cases")?,
        })
    }
}

// -- Parquet / Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String, String> {
    if col.is_null(row) {
        return Err("null in text column".into());
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => Err(format!("expected a text column, got {other:?}")),
    }
}

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Result<i64, String> {
    if col.is_null(row) {
        return Err("null in integer column".into());
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or("expected Int32Array")?;
            Ok(i64::from(arr.value(row)))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or("expected Int64Array")?;
            Ok(arr.value(row))
        }
        other => Err(format!("expected an integer column, got {other:?}")),
    }
}
