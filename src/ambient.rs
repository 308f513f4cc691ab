//! Ambient theming from album artwork.
//!
//! The artwork is downsampled and clustered into a handful of dominant
//! colors; the most vibrant ones are darkened into a background palette so
//! text stays readable on top.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use image::imageops::FilterType;
use ratatui::style::Color;

const SAMPLE_EDGE: u32 = 64;
const CLUSTERS: usize = 5;
const MAX_ITERATIONS: usize = 10;

/// Background colors derived from the current track's artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
}

impl Default for Palette {
    /// The dark violet theme shown before any artwork has been analyzed.
    fn default() -> Self {
        Self {
            primary: Color::Rgb(30, 10, 60),
            secondary: Color::Rgb(15, 5, 40),
            accent: Color::Rgb(45, 20, 80),
        }
    }
}

/// Analyze the artwork at `path` on a worker thread.
///
/// The receiver yields exactly one palette; decode failures fall back to
/// the default theme so a broken image never blanks the UI.
pub fn spawn_extractor(path: PathBuf) -> Receiver<Palette> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let palette = extract_palette(&path).unwrap_or_default();
        let _ = tx.send(palette);
    });
    rx
}

fn extract_palette(path: &std::path::Path) -> Option<Palette> {
    let img = match image::open(path) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("rondo: failed to decode artwork {}: {e}", path.display());
            return None;
        }
    };

    let small = img
        .resize_exact(SAMPLE_EDGE, SAMPLE_EDGE, FilterType::Triangle)
        .to_rgb8();
    let pixels: Vec<[f32; 3]> = small
        .pixels()
        .map(|p| [p.0[0] as f32, p.0[1] as f32, p.0[2] as f32])
        .collect();

    // Prefer colorful midtones; near-black, near-white and gray pixels say
    // little about the artwork's character.
    let mut samples: Vec<[f32; 3]> = pixels
        .iter()
        .copied()
        .filter(|c| {
            let b = brightness(*c);
            (30.0..200.0).contains(&b) && saturation(*c) > 0.2
        })
        .collect();
    if samples.len() < CLUSTERS {
        samples = pixels;
    }
    if samples.is_empty() {
        return None;
    }

    Some(palette_from_samples(&samples))
}

fn palette_from_samples(samples: &[[f32; 3]]) -> Palette {
    let mut clusters = kmeans(samples);
    clusters.sort_by(|a, b| {
        vibrancy(*b)
            .partial_cmp(&vibrancy(*a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let pick = |rank: usize| clusters.get(rank).or_else(|| clusters.first()).copied();
    let primary = pick(0).unwrap_or([30.0, 10.0, 60.0]);
    let secondary = pick(1).unwrap_or(primary);
    let accent = pick(2).unwrap_or(primary);

    Palette {
        primary: to_color(darken(primary, 0.8)),
        secondary: to_color(darken(secondary, 0.7)),
        accent: to_color(darken(accent, 0.5)),
    }
}

// Plain k-means with evenly spaced initial centers, so the same artwork
// always produces the same palette. Returns non-empty cluster centers.
fn kmeans(samples: &[[f32; 3]]) -> Vec<[f32; 3]> {
    let k = CLUSTERS.min(samples.len());
    let mut centers: Vec<[f32; 3]> = (0..k)
        .map(|i| samples[i * samples.len() / k])
        .collect();
    let mut assignment = vec![0usize; samples.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut moved = false;
        for (i, sample) in samples.iter().enumerate() {
            let nearest = centers
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    distance_sq(*sample, **a)
                        .partial_cmp(&distance_sq(*sample, **b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(idx, _)| idx)
                .unwrap_or(0);
            if assignment[i] != nearest {
                assignment[i] = nearest;
                moved = true;
            }
        }

        let mut sums = vec![[0.0f32; 3]; k];
        let mut counts = vec![0usize; k];
        for (sample, &cluster) in samples.iter().zip(&assignment) {
            for ch in 0..3 {
                sums[cluster][ch] += sample[ch];
            }
            counts[cluster] += 1;
        }
        for (center, (sum, &count)) in centers.iter_mut().zip(sums.iter().zip(&counts)) {
            if count > 0 {
                *center = [
                    sum[0] / count as f32,
                    sum[1] / count as f32,
                    sum[2] / count as f32,
                ];
            }
        }

        if !moved {
            break;
        }
    }

    let mut counts = vec![0usize; k];
    for &cluster in &assignment {
        counts[cluster] += 1;
    }
    centers
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(center, _)| center)
        .collect()
}

fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

fn brightness(c: [f32; 3]) -> f32 {
    0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2]
}

fn saturation(c: [f32; 3]) -> f32 {
    let max = c[0].max(c[1]).max(c[2]);
    let min = c[0].min(c[1]).min(c[2]);
    if max <= 0.0 { 0.0 } else { (max - min) / max }
}

fn vibrancy(c: [f32; 3]) -> f32 {
    saturation(c) * brightness(c)
}

fn darken(c: [f32; 3], factor: f32) -> [f32; 3] {
    [c[0] * factor, c[1] * factor, c[2] * factor]
}

fn to_color(c: [f32; 3]) -> Color {
    Color::Rgb(
        c[0].round().clamp(0.0, 255.0) as u8,
        c[1].round().clamp(0.0, 255.0) as u8,
        c[2].round().clamp(0.0, 255.0) as u8,
    )
}
