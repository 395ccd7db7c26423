use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One room as written to `data.json` (pandas `orient='records'` layout).
#[derive(Debug, Serialize)]
struct RoomRecord {
    gt_corners: i64,
    rb_corners: i64,
    ceiling_max: f64,
    ceiling_mean: f64,
    ceiling_min: f64,
    floor_max: f64,
    floor_mean: f64,
    floor_min: f64,
}

/// Deterministic splitmix64 generator.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }
}

/// Per-room min/mean/max angular deviation, growing with room complexity.
fn deviation_stats(rng: &mut SplitMix, corners: i64) -> (f64, f64, f64) {
    let base = 1.0 + corners as f64 * 0.6;
    let min = rng.range(0.0, base * 0.4);
    let mean = min + rng.range(0.5, base);
    let max = mean + rng.range(0.5, base * 2.0);
    (max, mean, min)
}

fn generate_rooms(n: usize, rng: &mut SplitMix) -> Vec<RoomRecord> {
    const CORNER_COUNTS: [i64; 4] = [4, 6, 8, 10];

    (0..n)
        .map(|_| {
            let gt = CORNER_COUNTS[(rng.next_u64() % CORNER_COUNTS.len() as u64) as usize];
            // The model mostly agrees, sometimes off by two in either direction.
            let miss = match rng.next_u64() % 10 {
                0 => -2,
                1 => 2,
                _ => 0,
            };
            let rb = (gt + miss).max(4);

            let (ceiling_max, ceiling_mean, ceiling_min) = deviation_stats(rng, gt);
            let (floor_max, floor_mean, floor_min) = deviation_stats(rng, gt);
            RoomRecord {
                gt_corners: gt,
                rb_corners: rb,
                ceiling_max,
                ceiling_mean,
                ceiling_min,
                floor_max,
                floor_mean,
                floor_min,
            }
        })
        .collect()
}

fn to_record_batch(rooms: &[RoomRecord]) -> Result<RecordBatch> {
    let float_col = |f: fn(&RoomRecord) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rooms.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("gt_corners", DataType::Int64, false),
        Field::new("rb_corners", DataType::Int64, false),
        Field::new("ceiling_max", DataType::Float64, false),
        Field::new("ceiling_mean", DataType::Float64, false),
        Field::new("ceiling_min", DataType::Float64, false),
        Field::new("floor_max", DataType::Float64, false),
        Field::new("floor_mean", DataType::Float64, false),
        Field::new("floor_min", DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(rooms.iter().map(|r| r.gt_corners).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rooms.iter().map(|r| r.rb_corners).collect::<Vec<_>>())),
        float_col(|r| r.ceiling_max),
        float_col(|r| r.ceiling_mean),
        float_col(|r| r.ceiling_min),
        float_col(|r| r.floor_max),
        float_col(|r| r.floor_mean),
        float_col(|r| r.floor_min),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn write_parquet(batch: &RecordBatch, path: &str) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SplitMix(42);
    let rooms = generate_rooms(120, &mut rng);

    let json_path = "data.json";
    let file = std::fs::File::create(json_path).with_context(|| format!("creating {json_path}"))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &rooms)
        .context("writing JSON records")?;

    let batch = to_record_batch(&rooms)?;
    let parquet_path = "data.parquet";
    write_parquet(&batch, parquet_path)?;

    let preview = batch.slice(0, batch.num_rows().min(5));
    println!("{}", pretty_format_batches(&[preview]).context("formatting preview")?);

    println!(
        "Wrote {} rooms to {json_path} and {parquet_path}",
        rooms.len()
    );
    Ok(())
}
