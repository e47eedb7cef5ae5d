use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use arrow::array::timezone::Tz;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    ArrowTimestampType, DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type,
    Int64Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt32Type, UInt64Type,
};
use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use chrono::NaiveDate;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::dates::parse_order_date;
use super::error::DataError;
use super::model::{Gender, SalesDataset, SalesRecord, NA_SENTINEL};

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

pub const ORDER_DATE: &str = "order_date";
pub const TERRITORY_GROUP: &str = "territory_groups";
pub const TOTAL_PRICE: &str = "totalprice_rupiah";
pub const QUANTITY: &str = "quantity";
pub const CUSTOMER_ID: &str = "customer_id";
pub const CATEGORY: &str = "category";
pub const PRODUCT_NAME: &str = "product_name";
pub const GENDER: &str = "gender";
pub const COLOR: &str = "color";
pub const SIZE_RANGE: &str = "size_range";

/// Largest accepted quantity on a single order line. Keeps every sum of
/// quantities far away from `u64` overflow.
pub const MAX_QUANTITY: u64 = u32::MAX as u64;

/// Columns every input file must provide, in the order rows are assembled.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    ORDER_DATE,
    TERRITORY_GROUP,
    TOTAL_PRICE,
    QUANTITY,
    CUSTOMER_ID,
    CATEGORY,
    PRODUCT_NAME,
    GENDER,
    COLOR,
    SIZE_RANGE,
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

static DATASET_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<SalesDataset>>>> = OnceLock::new();

fn cache() -> MutexGuard<'static, HashMap<PathBuf, Arc<SalesDataset>>> {
    DATASET_CACHE
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Load a dataset at most once per path for the lifetime of the process.
///
/// The first successful load is stored; later calls with the same path hand
/// back the same `Arc` without reading the file again. Failed loads are not
/// remembered, so a missing file can be retried once it appears.
pub fn load_cached(path: &Path) -> Result<Arc<SalesDataset>, DataError> {
    if let Some(dataset) = cache().get(path) {
        debug!("Dataset cache hit for {}", path.display());
        return Ok(Arc::clone(dataset));
    }

    // File IO happens outside the lock.
    let loaded = Arc::new(load_file(path)?);
    let mut guard = cache();
    let entry = guard.entry(path.to_path_buf()).or_insert(loaded);
    Ok(Arc::clone(entry))
}

/// Load a sales dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns listed in [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "order_date": "...", "territory_groups": "...", ... }, ...]`
/// * `.parquet` – one column per field; dates may be `Date32`, `Date64`,
///   `Timestamp` (zoned timestamps use their local date) or text
/// * `.xlsx` / `.xls` – first worksheet, header row first
pub fn load_file(path: &Path) -> Result<SalesDataset, DataError> {
    if !path.is_file() {
        return Err(DataError::DataSourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        "xlsx" | "xls" => load_excel(path)?,
        other => {
            return Err(DataError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    info!(
        "Loaded {} sales records from {} ({} territory groups)",
        dataset.len(),
        path.display(),
        dataset.territory_groups.len()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataError::DataSourceNotFound {
            path: path.to_path_buf(),
        },
        _ => DataError::Io(e),
    })
}

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before validation
// ---------------------------------------------------------------------------

/// A raw cell as read from any of the supported formats.
#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Null,
}

impl CellValue {
    fn from_text(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(s.to_string())
        }
    }

    fn into_date(self, row: usize, column: &str) -> Result<NaiveDate, DataError> {
        match self {
            CellValue::Date(d) => Ok(d),
            CellValue::Text(s) => parse_order_date(&s)
                .ok_or_else(|| DataError::format(row, column, format!("'{s}' is not a valid date"))),
            CellValue::Null => Err(DataError::format(row, column, "missing date")),
            other => Err(DataError::format(row, column, format!("{other:?} is not a date"))),
        }
    }

    fn into_price(self, row: usize, column: &str) -> Result<f64, DataError> {
        let value = match self {
            CellValue::Float(f) => f,
            CellValue::Integer(i) => i as f64,
            CellValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| DataError::format(row, column, format!("'{s}' is not a number")))?,
            CellValue::Null => return Err(DataError::format(row, column, "missing price")),
            CellValue::Date(d) => {
                return Err(DataError::format(row, column, format!("{d} is not a number")))
            }
        };
        if !value.is_finite() || value < 0.0 {
            return Err(DataError::format(
                row,
                column,
                format!("{value} is not a non-negative amount"),
            ));
        }
        Ok(value)
    }

    fn into_quantity(self, row: usize, column: &str) -> Result<u64, DataError> {
        let invalid = |shown: String| {
            DataError::format(row, column, format!("{shown} is not a non-negative integer"))
        };
        let quantity = match self {
            CellValue::Integer(i) => u64::try_from(i).map_err(|_| invalid(i.to_string())),
            CellValue::Float(f) => float_to_count(f).ok_or_else(|| invalid(f.to_string())),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<u64>() {
                    Ok(n) => Ok(n),
                    Err(_) => trimmed
                        .parse::<f64>()
                        .ok()
                        .and_then(float_to_count)
                        .ok_or_else(|| invalid(format!("'{s}'"))),
                }
            }
            CellValue::Null => Err(DataError::format(row, column, "missing quantity")),
            CellValue::Date(d) => Err(invalid(d.to_string())),
        }?;
        if quantity > MAX_QUANTITY {
            return Err(DataError::format(
                row,
                column,
                format!("{quantity} exceeds the maximum of {MAX_QUANTITY} per order line"),
            ));
        }
        Ok(quantity)
    }

    /// Like [`CellValue::into_text`], but `11000.0` and `11000` name the
    /// same customer whether the cell was typed or text.
    fn into_customer_id(self, row: usize, column: &str) -> Result<String, DataError> {
        let id = self.into_text(row, column)?;
        match id.split_once('.') {
            Some((whole, fraction))
                if !whole.is_empty()
                    && whole.bytes().all(|b| b.is_ascii_digit())
                    && fraction.bytes().all(|b| b == b'0') =>
            {
                Ok(whole.to_string())
            }
            _ => Ok(id),
        }
    }

    fn into_text(self, row: usize, column: &str) -> Result<String, DataError> {
        self.into_optional_text()
            .ok_or_else(|| DataError::format(row, column, "missing value"))
    }

    fn into_optional_text(self) -> Option<String> {
        match self {
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(s),
            CellValue::Integer(i) => Some(i.to_string()),
            // Integer ids that passed through a float column (e.g. because of nulls).
            CellValue::Float(f) if f.fract() == 0.0 => Some(format!("{f:.0}")),
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Date(d) => Some(d.to_string()),
            CellValue::Null => None,
        }
    }

    fn into_gender(self, row: usize, column: &str) -> Result<Option<Gender>, DataError> {
        match self.into_optional_text() {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => Gender::parse(&s)
                .map(Some)
                .ok_or_else(|| DataError::format(row, column, format!("unknown gender '{s}'"))),
        }
    }
}

fn float_to_count(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Validate one row whose cells are in [`REQUIRED_COLUMNS`] order.
/// Missing `color` / `size_range` are filled with [`NA_SENTINEL`] here, once.
fn build_record(row: usize, mut cells: Vec<CellValue>) -> Result<SalesRecord, DataError> {
    let mut take = |i: usize| std::mem::replace(&mut cells[i], CellValue::Null);
    Ok(SalesRecord {
        order_date: take(0).into_date(row, ORDER_DATE)?,
        territory_group: take(1).into_text(row, TERRITORY_GROUP)?,
        total_price: take(2).into_price(row, TOTAL_PRICE)?,
        quantity: take(3).into_quantity(row, QUANTITY)?,
        customer_id: take(4).into_customer_id(row, CUSTOMER_ID)?,
        category: take(5).into_text(row, CATEGORY)?,
        product_name: take(6).into_text(row, PRODUCT_NAME)?,
        gender: take(7).into_gender(row, GENDER)?,
        color: take(8)
            .into_optional_text()
            .unwrap_or_else(|| NA_SENTINEL.to_string()),
        size_range: take(9)
            .into_optional_text()
            .unwrap_or_else(|| NA_SENTINEL.to_string()),
    })
}

fn missing_column(column: &str) -> DataError {
    DataError::MissingColumn {
        column: column.to_string(),
    }
}

/// Position of every required column in a header row.
fn column_positions<S: AsRef<str>>(headers: &[S]) -> Result<Vec<usize>, DataError> {
    REQUIRED_COLUMNS
        .iter()
        .map(|col| {
            headers
                .iter()
                .position(|h| h.as_ref().trim() == *col)
                .ok_or_else(|| missing_column(col))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one order line per row.
/// Columns beyond [`REQUIRED_COLUMNS`] are ignored; empty cells are nulls.
fn load_csv(path: &Path) -> Result<SalesDataset, DataError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let positions = column_positions(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells = positions
            .iter()
            .map(|&idx| CellValue::from_text(record.get(idx).unwrap_or("")))
            .collect();
        records.push(build_record(row_no, cells)?);
    }

    Ok(SalesDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "order_date": "2021-01-03",
///     "territory_groups": "Europe",
///     "totalprice_rupiah": 1250000.0,
///     "quantity": 1,
///     ...
///   }
/// ]
/// ```
fn load_json(path: &Path) -> Result<SalesDataset, DataError> {
    let text = io::read_to_string(open(path)?)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataError::format(0, "<root>", "expected a top-level JSON array"))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataError::format(i, "<row>", "not a JSON object"))?;

        let cells = REQUIRED_COLUMNS
            .iter()
            .map(|col| {
                obj.get(*col)
                    .map(json_to_cell)
                    .ok_or_else(|| missing_column(col))
            })
            .collect::<Result<_, _>>()?;
        records.push(build_record(i, cells)?);
    }

    Ok(SalesDataset::from_records(records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::from_text(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`), Polars or the
/// bundled `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<SalesDataset, DataError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let columns: Vec<(&str, ArrayRef)> = REQUIRED_COLUMNS
            .iter()
            .map(|col| {
                let idx = schema.index_of(col).map_err(|_| missing_column(col))?;
                Ok((*col, decode_dictionary(batch.column(idx))?))
            })
            .collect::<Result<_, DataError>>()?;

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let cells = columns
                .iter()
                .map(|(name, array)| extract_cell(array, row).map_err(|r| DataError::format(row_no, name, r)))
                .collect::<Result<_, _>>()?;
            records.push(build_record(row_no, cells)?);
        }
        row_offset += batch.num_rows();
    }

    Ok(SalesDataset::from_records(records))
}

/// Dictionary-encoded columns (pandas `category`) are expanded to their value
/// type once per batch; other columns pass through.
fn decode_dictionary(array: &ArrayRef) -> Result<ArrayRef, DataError> {
    match array.data_type() {
        DataType::Dictionary(_, value_type) => Ok(arrow::compute::cast(array, value_type)?),
        _ => Ok(Arc::clone(array)),
    }
}

/// Calendar date of a timestamp. Zoned timestamps are converted to their
/// local time first, so a row keeps the month it was recorded in.
fn timestamp_date<T: ArrowTimestampType>(
    col: &ArrayRef,
    row: usize,
    tz: Option<&str>,
) -> Result<NaiveDate, String> {
    let array = col.as_primitive::<T>();
    let date = match tz {
        None => array.value_as_datetime(row).map(|dt| dt.date()),
        Some(tz) => {
            let tz: Tz = tz.parse().map_err(|e| format!("timezone '{tz}': {e}"))?;
            array
                .value_as_datetime_with_tz(row, tz)
                .map(|dt| dt.date_naive())
        }
    };
    date.ok_or_else(|| "timestamp out of range".to_string())
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue, String> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::from_text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => CellValue::from_text(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => CellValue::Integer(i64::from(col.as_primitive::<UInt32Type>().value(row))),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .map_err(|_| format!("{v} is out of range"))?
        }
        DataType::Float32 => CellValue::Float(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map(CellValue::Date)
            .ok_or("date out of range")?,
        DataType::Date64 => col
            .as_primitive::<Date64Type>()
            .value_as_date(row)
            .map(CellValue::Date)
            .ok_or("date out of range")?,
        DataType::Timestamp(unit, tz) => {
            let tz = tz.as_deref();
            let date = match unit {
                TimeUnit::Second => timestamp_date::<TimestampSecondType>(col, row, tz)?,
                TimeUnit::Millisecond => timestamp_date::<TimestampMillisecondType>(col, row, tz)?,
                TimeUnit::Microsecond => timestamp_date::<TimestampMicrosecondType>(col, row, tz)?,
                TimeUnit::Nanosecond => timestamp_date::<TimestampNanosecondType>(col, row, tz)?,
            };
            CellValue::Date(date)
        }
        other => return Err(format!("unsupported column type {other:?}")),
    };
    Ok(cell)
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// First worksheet of an `.xlsx` / `.xls` workbook; the first row holds the
/// column names.
fn load_excel(path: &Path) -> Result<SalesDataset, DataError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataError::format(0, "<sheet>", "workbook has no worksheets"))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    let positions = column_positions(&headers)?;

    let mut records = Vec::new();
    for (row_no, row) in rows.enumerate() {
        let cells = positions
            .iter()
            .map(|&idx| row.get(idx).map_or(CellValue::Null, excel_to_cell))
            .collect();
        records.push(build_record(row_no, cells)?);
    }

    Ok(SalesDataset::from_records(records))
}

fn excel_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::from_text(s),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Date(dt.date()),
            None => CellValue::Text(cell.to_string()),
        },
        other => CellValue::Text(other.to_string()),
    }
}
