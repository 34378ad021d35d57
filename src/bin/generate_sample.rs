//! Writes a small set of synthetic photoluminescence files:
//!
//! * `raster_scan.spe`: a 3x3 raster scan, one frame per pixel, with the
//!   emission peak drifting across the scan.
//! * `field_0.txt` .. `field_2.txt`: whitespace-delimited two-acquisition
//!   spectra on overlapping axes, as exported by a bench spectrometer.
//!
//! Usage: `generate-sample [output-dir]` (defaults to `sample_data`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusty_lumen::data::spe::{SpeDataType, SpeWriter};

const SCAN_SIDE: usize = 3;
const PIXELS: u16 = 512;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_spectrum(
    axis: &[f64],
    peaks: &[(f64, f64, f64)],
    baseline: f64,
    noise_level: f64,
    noise: &mut Noise,
) -> Vec<f64> {
    axis.iter()
        .map(|&x| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(x, mu, sigma, amp))
                .sum();
            (baseline + signal + noise.gauss(0.0, noise_level)).max(0.0)
        })
        .collect()
}

/// Deterministic Gaussian noise: splitmix64 stream fed through the polar
/// Box-Muller method, which yields samples in pairs.
struct Noise {
    state: u64,
    spare: Option<f64>,
}

impl Noise {
    fn new(seed: u64) -> Self {
        Noise { state: seed, spare: None }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[-1, 1)`.
    fn symmetric(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }

    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        if let Some(z) = self.spare.take() {
            return mean + std_dev * z;
        }
        loop {
            let (u, v) = (self.symmetric(), self.symmetric());
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let scale = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(v * scale);
                return mean + std_dev * u * scale;
            }
        }
    }
}

fn linear_axis(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let step = (stop - start) / (n.max(2) - 1) as f64;
    (0..n).map(|i| start + i as f64 * step).collect()
}

fn write_raster_scan(dir: &Path, noise: &mut Noise) -> Result<PathBuf> {
    let (start, stop) = (650.0, 800.0);
    let axis = linear_axis(start, stop, PIXELS as usize);

    let mut writer = SpeWriter::new(PIXELS, 1, SpeDataType::U16).axis(start, stop);
    writer.laser_wavelength = 532.0;
    writer.exposure_time = 0.5;
    writer.center_wavelength = 725.0;
    for x in 0..SCAN_SIDE {
        for y in 0..SCAN_SIDE {
            // peak drifts along x, brightens along y
            let mu = 705.0 + 8.0 * x as f64;
            let amp = 2_000.0 + 1_500.0 * y as f64;
            let frame = generate_spectrum(&axis, &[(mu, 6.0, amp), (760.0, 12.0, 400.0)], 300.0, 25.0, noise);
            writer = writer.frame(frame);
        }
    }

    let path = dir.join("raster_scan.spe");
    writer
        .write(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn write_text_spectrum(
    path: &Path,
    axis: &[f64],
    columns: &[Vec<f64>],
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for (row, &x) in axis.iter().enumerate() {
        let record = std::iter::once(format!("{x:.3}"))
            .chain(columns.iter().map(|c| format!("{:.4}", c[row])));
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_field_sweep(dir: &Path, noise: &mut Noise) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for i in 0..3 {
        // each file covers a shifted window so the union has gaps
        let start = 600.0 + 20.0 * i as f64;
        let axis = linear_axis(start, start + 100.0, 201);
        let columns: Vec<Vec<f64>> = (0..2)
            .map(|k| {
                let field = (2 * i + k) as f64;
                let amp = 1.0 + 0.25 * field;
                generate_spectrum(&axis, &[(680.0 - 1.5 * field, 5.0, amp)], 0.05, 0.01, noise)
            })
            .collect();

        let path = dir.join(format!("field_{i}.txt"));
        write_text_spectrum(&path, &axis, &columns)?;
        paths.push(path);
    }
    Ok(paths)
}

fn main() -> Result<()> {
    let dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "sample_data".to_string()),
    );
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut noise = Noise::new(42);
    let spe = write_raster_scan(&dir, &mut noise)?;
    println!(
        "Wrote {} frames ({} pixels each) to {}",
        SCAN_SIDE * SCAN_SIDE,
        PIXELS,
        spe.display()
    );

    for path in write_field_sweep(&dir, &mut noise)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
