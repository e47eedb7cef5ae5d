use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

/// (category, product, unit price in rupiah, color, size range)
const PRODUCTS: [(&str, &str, f64, Option<&str>, Option<&str>); 12] = [
    ("Bikes", "Mountain-200 Black", 34_500_000.0, Some("Black"), Some("38-40 CM")),
    ("Bikes", "Road-150 Red", 53_700_000.0, Some("Red"), Some("42-46 CM")),
    ("Bikes", "Touring-1000 Blue", 36_400_000.0, Some("Blue"), Some("54-58 CM")),
    ("Bikes", "Road-650 Silver", 11_200_000.0, Some("Silver"), Some("48-52 CM")),
    ("Accessories", "Water Bottle - 30 oz.", 74_000.0, None, None),
    ("Accessories", "Patch Kit/8 Patches", 34_000.0, None, None),
    ("Accessories", "Sport-100 Helmet Red", 524_000.0, Some("Red"), None),
    ("Accessories", "Mountain Tire Tube", 74_000.0, None, None),
    ("Clothing", "AWC Logo Cap", 134_000.0, Some("Multi"), None),
    ("Clothing", "Long-Sleeve Logo Jersey L", 749_000.0, Some("Multi"), Some("L")),
    ("Clothing", "Short-Sleeve Classic Jersey M", 809_000.0, Some("Yellow"), Some("M")),
    ("Clothing", "Women's Mountain Shorts S", 1_049_000.0, Some("Black"), Some("S")),
];

const TERRITORY_GROUPS: [&str; 3] = ["Europe", "North America", "Pacific"];

#[derive(Serialize)]
struct SampleRow {
    order_date: NaiveDate,
    territory_groups: &'static str,
    totalprice_rupiah: f64,
    quantity: i64,
    customer_id: i64,
    category: &'static str,
    product_name: &'static str,
    gender: Option<&'static str>,
    color: Option<&'static str>,
    size_range: Option<&'static str>,
}

fn generate_rows(n: usize, start: NaiveDate, rng: &mut SimpleRng) -> Vec<SampleRow> {
    (0..n)
        .map(|_| {
            let (category, product, unit_price, color, size) = *rng.pick(&PRODUCTS);
            let quantity = if category == "Bikes" { 1 } else { 1 + rng.below(4) as i64 };
            // ~5% of customers have no recorded gender.
            let gender = match rng.below(20) {
                0 => None,
                k if k % 2 == 0 => Some("F"),
                _ => Some("M"),
            };
            SampleRow {
                order_date: start + Duration::days(rng.below(730) as i64),
                territory_groups: *rng.pick(&TERRITORY_GROUPS),
                totalprice_rupiah: unit_price * quantity as f64,
                quantity,
                customer_id: 11_000 + rng.below(800) as i64,
                category,
                product_name: product,
                gender,
                color,
                size_range: size,
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[SampleRow]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("unix epoch")?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("order_date", DataType::Date32, false),
        Field::new("territory_groups", DataType::Utf8, false),
        Field::new("totalprice_rupiah", DataType::Float64, false),
        Field::new("quantity", DataType::Int64, false),
        Field::new("customer_id", DataType::Int64, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("product_name", DataType::Utf8, false),
        Field::new("gender", DataType::Utf8, true),
        Field::new("color", DataType::Utf8, true),
        Field::new("size_range", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(
                rows.iter()
                    .map(|r| (r.order_date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.territory_groups).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.totalprice_rupiah).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.quantity).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.customer_id).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.category).collect::<Vec<_>>())),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.product_name).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(rows.iter().map(|r| r.gender).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.color).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.size_range).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let preview = batch.slice(0, batch.num_rows().min(5));
    println!("{}", pretty_format_batches(&[preview]).context("formatting preview")?);

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).context("start date")?;
    // Two years of orders.
    let rows = generate_rows(2_000, start, &mut rng);
    log::debug!("Generated {} rows starting {start}", rows.len());

    write_csv("sample_sales.csv", &rows)?;
    write_parquet("sample_sales.parquet", &rows)?;

    println!(
        "Wrote {} sales rows to sample_sales.csv and sample_sales.parquet",
        rows.len()
    );
    Ok(())
}
