use std::io;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Date32Array, PrimitiveArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{ArrowPrimitiveType, DataType, Date32Type, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Dataset, Record, Weather, WorkingDay};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a bike-sharing dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `dteday, temp, hum, casual, registered, cnt,
///                workingday, hr, weathersit` (other columns are ignored)
/// * `.json`    – `[{ "dteday": "2011-01-01", "hr": 0, ... }, ...]`
/// * `.parquet` – same column names; `dteday` as text, date or timestamp
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    };
    dataset.with_context(|| format!("loading {}", path.display()))
}

// ---------------------------------------------------------------------------
// Row schema shared by the text formats
// ---------------------------------------------------------------------------

/// One row as it appears in the source file, before validation.
///
/// `D` is the date as read: text for CSV/JSON, already a date for Parquet.
#[derive(Debug, Deserialize)]
struct RawRow<D> {
    dteday: D,
    hr: i64,
    temp: f64,
    hum: f64,
    casual: i64,
    registered: i64,
    cnt: i64,
    workingday: i64,
    weathersit: i64,
}

impl RawRow<String> {
    fn parse_date(self) -> Result<RawRow<NaiveDate>> {
        let dteday = parse_date(&self.dteday)?;
        Ok(RawRow {
            dteday,
            hr: self.hr,
            temp: self.temp,
            hum: self.hum,
            casual: self.casual,
            registered: self.registered,
            cnt: self.cnt,
            workingday: self.workingday,
            weathersit: self.weathersit,
        })
    }
}

impl RawRow<NaiveDate> {
    fn into_record(self) -> Result<Record> {
        let hour = u8::try_from(self.hr)
            .ok()
            .filter(|h| *h < 24)
            .with_context(|| format!("'hr' out of range: {}", self.hr))?;

        Ok(Record {
            date: self.dteday,
            hour,
            temp_norm: self.temp,
            humidity_norm: self.hum,
            casual_count: count(self.casual, "casual")?,
            registered_count: count(self.registered, "registered")?,
            total_count: count(self.cnt, "cnt")?,
            working_day: WorkingDay::try_from(self.workingday)?,
            weather: Weather::try_from(self.weathersit)?,
        })
    }
}

fn count(value: i64, col: &str) -> Result<u64> {
    u64::try_from(value).with_context(|| format!("'{col}' is negative: {value}"))
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a calendar date, dropping any time-of-day suffix.
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let date_part = s.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .with_context(|| format!("'{s}' is not a date"))
}

fn into_dataset(records: Vec<Record>) -> Result<Dataset> {
    Ok(Dataset::new(records)?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

fn read_csv<R: io::Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow<String>>().enumerate() {
        let record = result
            .map_err(anyhow::Error::from)
            .and_then(|raw| raw.parse_date()?.into_record())
            .with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    into_dataset(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records', date_format='iso')`):
///
/// ```json
/// [
///   { "dteday": "2011-01-01", "hr": 0, "temp": 0.24, "hum": 0.81,
///     "casual": 3, "registered": 13, "cnt": 16, "workingday": 0, "weathersit": 1 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Dataset> {
    let rows: Vec<RawRow<String>> = serde_json::from_str(text).context("parsing JSON")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            raw.parse_date()
                .and_then(|raw| raw.into_record())
                .with_context(|| format!("Row {i}"))
        })
        .collect::<Result<Vec<_>>>()?;

    into_dataset(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing bike-sharing rows.
///
/// Numeric columns may use any integer or float width; they are cast on read.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();

        let dteday = DateColumn::new(&batch, "dteday")?;
        let hr = primitive_column::<Int64Type>(&batch, "hr")?;
        let temp = primitive_column::<Float64Type>(&batch, "temp")?;
        let hum = primitive_column::<Float64Type>(&batch, "hum")?;
        let casual = primitive_column::<Int64Type>(&batch, "casual")?;
        let registered = primitive_column::<Int64Type>(&batch, "registered")?;
        let cnt = primitive_column::<Int64Type>(&batch, "cnt")?;
        let workingday = primitive_column::<Int64Type>(&batch, "workingday")?;
        let weathersit = primitive_column::<Int64Type>(&batch, "weathersit")?;

        for row in 0..batch.num_rows() {
            let raw = || -> Result<RawRow<NaiveDate>> {
                Ok(RawRow {
                    dteday: dteday.value(row)?,
                    hr: value_at(&hr, row, "hr")?,
                    temp: value_at(&temp, row, "temp")?,
                    hum: value_at(&hum, row, "hum")?,
                    casual: value_at(&casual, row, "casual")?,
                    registered: value_at(&registered, row, "registered")?,
                    cnt: value_at(&cnt, row, "cnt")?,
                    workingday: value_at(&workingday, row, "workingday")?,
                    weathersit: value_at(&weathersit, row, "weathersit")?,
                })
            };
            let record = raw()
                .and_then(|raw| raw.into_record())
                .with_context(|| format!("Row {}", offset + row))?;
            records.push(record);
        }
    }

    into_dataset(records)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

/// Fetch a column and cast it to the primitive type `T`.
fn primitive_column<T: ArrowPrimitiveType>(
    batch: &RecordBatch,
    name: &str,
) -> Result<PrimitiveArray<T>> {
    let col = column(batch, name)?;
    let cast_col = cast(col, &T::DATA_TYPE)
        .with_context(|| format!("column '{name}' has type {:?}", col.data_type()))?;
    Ok(cast_col.as_primitive::<T>().clone())
}

fn value_at<T: ArrowPrimitiveType>(
    arr: &PrimitiveArray<T>,
    row: usize,
    name: &str,
) -> Result<T::Native> {
    if arr.is_null(row) {
        bail!("null value in '{name}'");
    }
    Ok(arr.value(row))
}

/// `dteday` either as text (parsed like CSV) or as a native date type.
enum DateColumn {
    Text(StringArray),
    Days(Date32Array),
}

impl DateColumn {
    fn new(batch: &RecordBatch, name: &str) -> Result<Self> {
        let col = column(batch, name)?;
        match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                let text = cast(col, &DataType::Utf8).context("reading date text")?;
                Ok(DateColumn::Text(text.as_string::<i32>().clone()))
            }
            other => {
                let days = cast(col, &DataType::Date32)
                    .with_context(|| format!("column '{name}' has non-date type {other:?}"))?;
                Ok(DateColumn::Days(days.as_primitive::<Date32Type>().clone()))
            }
        }
    }

    fn value(&self, row: usize) -> Result<NaiveDate> {
        match self {
            DateColumn::Text(arr) => {
                if arr.is_null(row) {
                    bail!("null value in 'dteday'");
                }
                parse_date(arr.value(row))
            }
            DateColumn::Days(arr) => {
                if arr.is_null(row) {
                    bail!("null value in 'dteday'");
                }
                arr.value_as_date(row).context("'dteday' out of range")
            }
        }
    }
}
