use std::f64::consts::PI;
use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate, Weekday};
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output row, in the column layout of the UCI hourly bike-sharing file.
#[derive(Serialize)]
struct Row {
    instant: i64,
    dteday: String,
    hr: i64,
    workingday: i64,
    weathersit: i64,
    temp: f64,
    hum: f64,
    casual: i64,
    registered: i64,
    cnt: i64,
}

fn is_holiday(date: NaiveDate) -> bool {
    matches!((date.month(), date.day()), (1, 1) | (7, 4) | (11, 11) | (12, 25))
}

fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !is_holiday(date)
}

/// Relative demand per hour: commute peaks on working days, a midday hump otherwise.
fn hourly_profile(hour: u32, working: bool) -> f64 {
    let h = hour as f64;
    let bump = |center: f64, width: f64| (-(h - center).powi(2) / (2.0 * width * width)).exp();
    if working {
        0.05 + 0.9 * bump(8.0, 1.0) + bump(17.5, 1.3) + 0.25 * bump(12.5, 2.0)
    } else {
        0.05 + 0.75 * bump(14.0, 3.5)
    }
}

/// Weather code 1..=4, sticky from one hour to the next.
fn next_weather(previous: i64, rng: &mut SimpleRng) -> i64 {
    if rng.next_f64() < 0.85 {
        return previous;
    }
    match rng.next_f64() {
        p if p < 0.62 => 1,
        p if p < 0.90 => 2,
        p if p < 0.995 => 3,
        _ => 4,
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let first = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid start date");
    let last = NaiveDate::from_ymd_opt(2012, 12, 31).expect("valid end date");

    let mut rows = Vec::new();
    let mut weather = 1;

    for date in first.iter_days().take_while(|d| *d <= last) {
        let working = is_working_day(date);
        let year_growth = if date.year() == 2012 { 1.6 } else { 1.0 };
        let season = -(2.0 * PI * (date.ordinal() as f64 - 15.0) / 365.0).cos();
        let day_temp = 0.5 + 0.28 * season + rng.gauss(0.0, 0.04);

        for hour in 0..24u32 {
            weather = next_weather(weather, &mut rng);
            let daily_swing = -0.06 * (2.0 * PI * (hour as f64 - 3.0) / 24.0).cos();
            let temp = (day_temp + daily_swing).clamp(0.02, 1.0);
            let hum = (0.62 - 0.15 * season + 0.08 * (weather - 1) as f64 + rng.gauss(0.0, 0.08))
                .clamp(0.0, 1.0);

            let weather_factor = [1.0, 0.85, 0.45, 0.15][(weather - 1) as usize];
            let comfort = 0.35 + 0.65 * (1.0 - (temp - 0.65).abs() * 1.6).max(0.0);
            let demand = hourly_profile(hour, working) * weather_factor * comfort * year_growth;

            let casual_share = if working { 0.12 } else { 0.35 };
            let casual = (demand * 260.0 * casual_share + rng.gauss(0.0, 2.0)).round().max(0.0) as i64;
            let registered =
                (demand * 260.0 * (1.0 - casual_share) + rng.gauss(0.0, 6.0)).round().max(0.0) as i64;

            rows.push(Row {
                instant: rows.len() as i64 + 1,
                dteday: date.format("%Y-%m-%d").to_string(),
                hr: hour as i64,
                workingday: working as i64,
                weathersit: weather,
                temp: (temp * 100.0).round() / 100.0,
                hum: (hum * 100.0).round() / 100.0,
                casual,
                registered,
                cnt: casual + registered,
            });
        }
    }

    // Write CSV
    let csv_path = "sample_bike.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    let days: Vec<i32> = rows
        .iter()
        .map(|r| {
            let date = NaiveDate::parse_from_str(&r.dteday, "%Y-%m-%d").expect("formatted above");
            (date - epoch).num_days() as i32
        })
        .collect();
    let ints = |f: fn(&Row) -> i64| Int64Array::from(rows.iter().map(f).collect::<Vec<_>>());
    let floats = |f: fn(&Row) -> f64| Float64Array::from(rows.iter().map(f).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("instant", DataType::Int64, false),
        Field::new("dteday", DataType::Date32, false),
        Field::new("hr", DataType::Int64, false),
        Field::new("workingday", DataType::Int64, false),
        Field::new("weathersit", DataType::Int64, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("hum", DataType::Float64, false),
        Field::new("casual", DataType::Int64, false),
        Field::new("registered", DataType::Int64, false),
        Field::new("cnt", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(ints(|r| r.instant)),
            Arc::new(Date32Array::from(days)),
            Arc::new(ints(|r| r.hr)),
            Arc::new(ints(|r| r.workingday)),
            Arc::new(ints(|r| r.weathersit)),
            Arc::new(floats(|r| r.temp)),
            Arc::new(floats(|r| r.hum)),
            Arc::new(ints(|r| r.casual)),
            Arc::new(ints(|r| r.registered)),
            Arc::new(ints(|r| r.cnt)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_bike.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} hourly records ({first} to {last}) to {csv_path} and {parquet_path}",
        rows.len()
    );
}
