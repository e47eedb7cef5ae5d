use std::sync::Arc;

use arrow::array::{
    ArrayRef, DictionaryArray, Float64Array, Int64Array, StringArray, TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Field, Int32Type, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bee_cycle_dashboard::data::loader::load_file;
use bee_cycle_dashboard::data::model::{Gender, NA_SENTINEL};
use bee_cycle_dashboard::data::DataError;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

fn nanos(y: i32, m: u32, d: u32) -> i64 {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_nanos_opt()
        .unwrap()
}

/// Same layout `pandas.DataFrame.to_parquet()` produces for the sales sheet.
fn write_pandas_like(path: &std::path::Path, with_gender: bool) {
    let mut fields = vec![
        Field::new("order_date", DataType::Timestamp(TimeUnit::Nanosecond, None), true),
        Field::new("territory_groups", DataType::Utf8, true),
        Field::new("totalprice_rupiah", DataType::Float64, true),
        Field::new("quantity", DataType::Int64, true),
        Field::new("customer_id", DataType::Int64, true),
        Field::new("category", DataType::Utf8, true),
        Field::new("product_name", DataType::Utf8, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampNanosecondArray::from(vec![nanos(2021, 12, 31), nanos(2022, 1, 1)])),
        Arc::new(StringArray::from(vec!["Europe", "Pacific"])),
        Arc::new(Float64Array::from(vec![53_700_000.0, 74_000.0])),
        Arc::new(Int64Array::from(vec![1, 3])),
        Arc::new(Int64Array::from(vec![11000, 11001])),
        Arc::new(StringArray::from(vec!["Bikes", "Accessories"])),
        Arc::new(StringArray::from(vec!["Road-150 Red", "Water Bottle - 30 oz."])),
    ];
    if with_gender {
        fields.push(Field::new("gender", DataType::Utf8, true));
        columns.push(Arc::new(StringArray::from(vec![Some("F"), None])));
    }
    fields.push(Field::new("color", DataType::Utf8, true));
    columns.push(Arc::new(StringArray::from(vec![Some("Red"), None])));
    fields.push(Field::new("size_range", DataType::Utf8, true));
    columns.push(Arc::new(StringArray::from(vec![None, Some("NA")])));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn loads_timestamps_and_nulls_from_parquet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.parquet");
    write_pandas_like(&path, true);

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.territory_groups, ["Europe", "Pacific"]);

    let first = &ds.records[0];
    assert_eq!(first.order_date, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
    assert_eq!(first.customer_id, "11000");
    assert_eq!(first.gender, Some(Gender::Female));
    assert_eq!(first.size_range, NA_SENTINEL);

    let second = &ds.records[1];
    assert_eq!(second.year_month().to_string(), "2022-01");
    assert_eq!(second.quantity, 3);
    assert_eq!(second.gender, None);
    assert_eq!(second.color, NA_SENTINEL);
}

#[test]
fn parquet_without_gender_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.pq");
    write_pandas_like(&path, false);

    match load_file(&path) {
        Err(DataError::MissingColumn { column }) => assert_eq!(column, "gender"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn zoned_timestamps_and_category_columns_use_local_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.parquet");

    // 20:00 UTC on Jan 31st is already February in Jakarta.
    let evening = nanos(2021, 1, 31) + 20 * 3_600 * 1_000_000_000;
    let category = || DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
    let zoned = DataType::Timestamp(TimeUnit::Nanosecond, Some("+07:00".into()));

    let schema = Arc::new(Schema::new(vec![
        Field::new("order_date", zoned, true),
        Field::new("territory_groups", category(), true),
        Field::new("totalprice_rupiah", DataType::Float64, true),
        Field::new("quantity", DataType::Int64, true),
        Field::new("customer_id", DataType::Int64, true),
        Field::new("category", category(), true),
        Field::new("product_name", DataType::Utf8, true),
        Field::new("gender", category(), true),
        Field::new("color", DataType::Utf8, true),
        Field::new("size_range", DataType::Utf8, true),
    ]));
    let regions: DictionaryArray<Int32Type> = vec!["Pacific", "Europe"].into_iter().collect();
    let categories: DictionaryArray<Int32Type> = vec!["Bikes", "Bikes"].into_iter().collect();
    let genders: DictionaryArray<Int32Type> = vec![Some("M"), None].into_iter().collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampNanosecondArray::from(vec![evening, nanos(2021, 1, 2)]).with_timezone("+07:00")),
        Arc::new(regions),
        Arc::new(Float64Array::from(vec![100.0, 200.0])),
        Arc::new(Int64Array::from(vec![1, 2])),
        Arc::new(Int64Array::from(vec![11000, 11001])),
        Arc::new(categories),
        Arc::new(StringArray::from(vec!["Road-150 Red", "Road-250 Black"])),
        Arc::new(genders),
        Arc::new(StringArray::from(vec![Some("Red"), Some("Black")])),
        Arc::new(StringArray::from(vec![Some("62"), Some("48")])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.records[0].order_date, NaiveDate::from_ymd_opt(2021, 2, 1).unwrap());
    assert_eq!(ds.records[0].year_month().to_string(), "2021-02");
    assert_eq!(ds.records[1].order_date, NaiveDate::from_ymd_opt(2021, 1, 2).unwrap());
    assert_eq!(ds.territory_groups, ["Pacific", "Europe"]);
    assert_eq!(ds.records[1].category, "Bikes");
    assert_eq!(ds.records[0].gender, Some(Gender::Male));
    assert_eq!(ds.records[1].gender, None);
}
