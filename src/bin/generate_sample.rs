use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;
use serde_json::json;

/// Write a synthetic case table and matching county boundaries.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Cli {
    /// Directory that receives the generated files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Store county names under `name` instead of `NAME`.
    #[arg(long)]
    lower_case_key: bool,
}

const DISEASES: [(&str, f64); 8] = [
    ("Campylobacteriosis", 40.0),
    ("Coccidioidomycosis", 25.0),
    ("Giardiasis", 12.0),
    ("Hepatitis A", 3.0),
    ("Legionellosis", 2.0),
    ("Measles", 0.4),
    ("Pertussis", 15.0),
    ("Salmonellosis", 30.0),
];

/// County names with a rough population weight, laid out on a grid.
const COUNTIES: [(&str, f64); 24] = [
    ("Del Norte", 0.1),
    ("Siskiyou", 0.2),
    ("Modoc", 0.05),
    ("Humboldt", 0.6),
    ("Shasta", 0.9),
    ("Lassen", 0.1),
    ("Mendocino", 0.4),
    ("Butte", 1.0),
    ("Sacramento", 7.5),
    ("Sonoma", 2.4),
    ("San Francisco", 4.0),
    ("Alameda", 8.0),
    ("Santa Clara", 9.0),
    ("Fresno", 5.0),
    ("Inyo", 0.1),
    ("Monterey", 2.1),
    ("Tulare", 2.3),
    ("Kern", 4.5),
    ("San Luis Obispo", 1.4),
    ("Ventura", 4.1),
    ("Los Angeles", 50.0),
    ("San Bernardino", 10.0),
    ("Orange", 15.0),
    ("San Diego", 16.0),
];

const SEXES: [&str; 2] = ["Female", "Male"];
const YEARS: std::ops::RangeInclusive<i32> = 2001..=2023;
const GRID_COLUMNS: usize = 4;

#[derive(Serialize)]
struct Row<'a> {
    #[serde(rename = "Disease")]
    disease: &'a str,
    #[serde(rename = "County")]
    county: &'a str,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Sex")]
    sex: &'a str,
    #[serde(rename = "Cases")]
    cases: i64,
}

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row<'static>> {
    let mut rows = Vec::new();
    for &(disease, rate) in &DISEASES {
        for &(county, weight) in &COUNTIES {
            for year in YEARS {
                // Slow upward drift over the period.
                let trend = 1.0 + 0.02 * f64::from(year - YEARS.start());
                for &sex in &SEXES {
                    let mean = rate * weight * trend / 2.0;
                    let cases = rng.gauss(mean, mean.sqrt().max(0.5)).round().max(0.0) as i64;
                    rows.push(Row {
                        disease,
                        county,
                        year,
                        sex,
                        cases,
                    });
                }
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Disease", DataType::Utf8, false),
        Field::new("County", DataType::Utf8, false),
        Field::new("Year", DataType::Int32, false),
        Field::new("Sex", DataType::Utf8, false),
        Field::new("Cases", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.disease).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.county).collect::<Vec<_>>())),
            Arc::new(Int32Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.sex).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.cases).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// One rectangle per county over the California bounding box.
fn write_geojson(path: &Path, name_key: &str) -> Result<()> {
    let (west, east, south, north) = (-124.4, -114.1, 32.5, 42.0);
    let rows = COUNTIES.len().div_ceil(GRID_COLUMNS);
    let dx = (east - west) / GRID_COLUMNS as f64;
    let dy = (north - south) / rows as f64;

    let features: Vec<serde_json::Value> = COUNTIES
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            let x0 = west + (i % GRID_COLUMNS) as f64 * dx;
            let y1 = north - (i / GRID_COLUMNS) as f64 * dy;
            let (x1, y0) = (x0 + dx, y1 - dy);
            json!({
                "type": "Feature",
                "properties": { name_key: name },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]],
                },
            })
        })
        .collect();

    let collection = json!({ "type": "FeatureCollection", "features": features });
    let text = serde_json::to_string_pretty(&collection).context("serializing GeoJSON")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    let mut rng = SimpleRng::new(cli.seed);
    let rows = generate_rows(&mut rng);

    let csv_path = cli.out_dir.join("california_infectious_diseases.csv");
    write_csv(&csv_path, &rows)?;

    let parquet_path = cli.out_dir.join("california_infectious_diseases.parquet");
    write_parquet(&parquet_path, &rows)?;

    let geojson_path = cli.out_dir.join("california-counties.geojson");
    let name_key = if cli.lower_case_key { "name" } else { "NAME" };
    write_geojson(&geojson_path, name_key)?;

    println!(
        "Wrote {} case rows to {} and {}, {} counties to {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display(),
        COUNTIES.len(),
        geojson_path.display()
    );
    Ok(())
}
