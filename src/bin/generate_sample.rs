//! Writes `sample_stars.csv`, `sample_stars.parquet` and `sample_lines.csv`
//! for trying out the `starline` binary.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

/// A star row; `None` leaves the cell empty.
struct SampleStar {
    id: &'static str,
    out: Option<[f64; 7]>,
    inp: [f64; 4],
    v: Option<f64>,
    plx: Option<f64>,
    converged: bool,
}

// wavelength, species, ep, log gf
const LINES: [(f64, f64, f64, f64); 8] = [
    (4389.24, 26.0, 0.052, -4.583),
    (4445.47, 26.0, 0.087, -5.441),
    (5044.21, 26.0, 2.851, -2.058),
    (5247.05, 26.0, 0.087, -4.946),
    (5952.72, 26.0, 3.984, -1.340),
    (6226.74, 26.0, 3.884, -2.120),
    (4508.29, 26.1, 2.856, -2.440),
    (5234.63, 26.1, 3.221, -2.180),
];

fn cell(v: Option<f64>) -> String {
    v.map_or_else(String::new, |x| format!("{x}"))
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let stars = [
        SampleStar {
            id: "HD1",
            out: Some([5700.0, 4.4, 0.0, 25.0, 0.05, 0.02, f64::NAN]),
            inp: [5750.0, 4.5, 0.1, 1.0],
            v: Some(-12.3),
            plx: Some(40.1),
            converged: true,
        },
        SampleStar {
            id: "HD2",
            out: None,
            inp: [5000.0, 4.0, -0.2, 0.9],
            v: None,
            plx: Some(0.0),
            converged: false,
        },
        SampleStar {
            id: "HD3",
            out: Some([6020.0, 4.25, -0.35, 40.0, 0.08, 0.03, 1.35]),
            inp: [6000.0, 4.3, -0.3, 1.3],
            v: Some(21.7),
            plx: None,
            converged: true,
        },
    ];

    // ---- Stellar parameters (CSV) ----
    let mut writer = csv::Writer::from_path("sample_stars.csv").expect("Failed to create sample_stars.csv");
    writer
        .write_record([
            "id", "teff_out", "logg_out", "feh_out", "err_teff_out", "err_logg_out",
            "err_feh_out", "vt_out", "teff_in", "logg_in", "feh_in", "vt_in", "v", "plx",
            "converged",
        ])
        .expect("Failed to write header");
    for star in &stars {
        let mut row = vec![star.id.to_string()];
        match star.out {
            // A NaN vt marks a star whose microturbulence was not fitted.
            Some(out) => row.extend(out.iter().map(|x| cell((!x.is_nan()).then_some(*x)))),
            None => row.extend(std::iter::repeat(String::new()).take(7)),
        }
        row.extend(star.inp.iter().map(|x| format!("{x}")));
        row.push(cell(star.v));
        row.push(cell(star.plx));
        row.push(star.converged.to_string());
        writer.write_record(&row).expect("Failed to write star row");
    }
    writer.flush().expect("Failed to flush sample_stars.csv");

    // ---- Stellar parameters (Parquet, input family only) ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("teff_in", DataType::Float64, false),
        Field::new("logg_in", DataType::Float64, false),
        Field::new("feh_in", DataType::Float64, false),
        Field::new("vt_in", DataType::Float64, false),
        Field::new("v", DataType::Float64, true),
        Field::new("converged", DataType::Boolean, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(stars.iter().map(|s| s.id).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(stars.iter().map(|s| s.inp[0]).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(stars.iter().map(|s| s.inp[1]).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(stars.iter().map(|s| s.inp[2]).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(stars.iter().map(|s| s.inp[3]).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(stars.iter().map(|s| s.v).collect::<Vec<_>>())),
        Arc::new(BooleanArray::from(stars.iter().map(|s| s.converged).collect::<Vec<_>>())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create("sample_stars.parquet").expect("Failed to create output file");
    let mut parquet_writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    parquet_writer.write(&batch).expect("Failed to write batch");
    parquet_writer.close().expect("Failed to close writer");

    // ---- Lines with per-star equivalent widths ----
    let mut writer = csv::Writer::from_path("sample_lines.csv").expect("Failed to create sample_lines.csv");
    let mut header = vec!["wavelength", "species", "ep", "gf"];
    header.extend(stars.iter().map(|s| s.id));
    writer.write_record(&header).expect("Failed to write header");

    let mut measured = 0;
    for &(wavelength, species, ep, gf) in &LINES {
        let mut row = vec![
            format!("{wavelength}"),
            format!("{species}"),
            format!("{ep}"),
            format!("{gf}"),
        ];
        for _ in &stars {
            // Roughly one line in four goes unmeasured.
            let ew = if rng.next_f64() < 0.25 {
                0.0
            } else {
                measured += 1;
                rng.gauss(60.0, 20.0).abs().max(1.0)
            };
            row.push(format!("{ew:.1}"));
        }
        writer.write_record(&row).expect("Failed to write line row");
    }
    writer.flush().expect("Failed to flush sample_lines.csv");

    println!(
        "Wrote {} stars to sample_stars.csv / sample_stars.parquet and {} lines ({measured} measurements) to sample_lines.csv",
        stars.len(),
        LINES.len()
    );
}
