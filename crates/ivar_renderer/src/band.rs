//! Row-band partitioning for parallel rendering.
//!
//! The image is split into contiguous horizontal bands, one per worker.
//! Each worker owns its band's rows of the output buffer exclusively.

use crate::renderer::{render_pixel, Background};
use crate::{Camera, Color, Hittable};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// A contiguous run of image rows rendered by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First row (inclusive)
    pub start_row: u32,
    /// Last row (exclusive)
    pub end_row: u32,
    /// Index of this band, top to bottom
    pub index: usize,
}

impl Band {
    pub fn new(start_row: u32, end_row: u32, index: usize) -> Self {
        Self { start_row, end_row, index }
    }

    pub fn rows(&self) -> Range<u32> {
        self.start_row..self.end_row
    }

    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row
    }

    /// Independent generator for this band.
    ///
    /// With a base seed the stream is reproducible for a given band layout.
    pub fn rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.index as u64)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Split `height` rows into `workers` equal bands, the last absorbing the remainder.
///
/// The worker count is capped at the row count so no band is empty.
pub fn generate_bands(height: u32, workers: usize) -> Vec<Band> {
    let count = (workers.max(1) as u64).min(height.max(1) as u64) as u32;
    let rows_per_band = height / count;

    (0..count)
        .map(|i| {
            let start = i * rows_per_band;
            let end = if i == count - 1 {
                height
            } else {
                (i + 1) * rows_per_band
            };
            Band::new(start, end, i as usize)
        })
        .collect()
}

/// Shared best-effort progress counter.
///
/// Workers only decrement an atomic; the readout is approximate and never
/// affects the image.
pub struct Progress {
    start: Instant,
    remaining: AtomicUsize,
}

impl Progress {
    pub fn new(total_rows: u32) -> Self {
        Self {
            start: Instant::now(),
            remaining: AtomicUsize::new(total_rows as usize),
        }
    }

    /// Mark one scanline finished and report.
    pub fn row_done(&self) {
        let remaining = self
            .remaining
            .fetch_sub(1, Ordering::Relaxed)
            .saturating_sub(1);
        log::debug!(
            "Duration: {:.2}s, scanlines remaining: {:03}",
            self.start.elapsed().as_secs_f64(),
            remaining
        );
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Render every pixel of `band` into `pixels`, which holds exactly the band's rows.
pub fn render_band(
    band: &Band,
    camera: &Camera,
    world: &dyn Hittable,
    background: &Background,
    rng: &mut dyn RngCore,
    pixels: &mut [Color],
    progress: &Progress,
) {
    let width = camera.image_width() as usize;
    debug_assert_eq!(pixels.len(), band.row_count() as usize * width);

    for (row, y) in pixels.chunks_mut(width).zip(band.rows()) {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = render_pixel(camera, world, x as u32, y, background, rng);
        }
        progress.row_done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn total_rows(bands: &[Band]) -> u32 {
        bands.iter().map(|b| b.row_count()).sum()
    }

    #[test]
    fn test_generate_bands_exact_fit() {
        let bands = generate_bands(100, 4);
        assert_eq!(bands.len(), 4);
        assert!(bands.iter().all(|b| b.row_count() == 25));
        assert_eq!(total_rows(&bands), 100);
    }

    #[test]
    fn test_last_band_absorbs_remainder() {
        let bands = generate_bands(675, 6);
        assert_eq!(bands.len(), 6);
        assert!(bands[..5].iter().all(|b| b.row_count() == 112));
        assert_eq!(bands[5].rows(), 560..675);
        assert_eq!(total_rows(&bands), 675);
    }

    #[test]
    fn test_bands_are_contiguous() {
        let bands = generate_bands(37, 5);
        assert_eq!(bands[0].start_row, 0);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].end_row, pair[1].start_row);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
        assert_eq!(bands.last().unwrap().end_row, 37);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let bands = generate_bands(3, 16);
        assert_eq!(bands.len(), 3);
        assert!(bands.iter().all(|b| b.row_count() == 1));
    }

    #[test]
    fn test_single_worker_gets_everything() {
        assert_eq!(generate_bands(10, 1), vec![Band::new(0, 10, 0)]);
    }

    #[test]
    fn test_band_rngs_are_independent_and_reproducible() {
        let a = Band::new(0, 10, 0);
        let b = Band::new(10, 20, 1);

        let first: u64 = a.rng(Some(9)).gen();
        assert_eq!(first, a.rng(Some(9)).gen::<u64>());
        assert_ne!(first, b.rng(Some(9)).gen::<u64>());
    }

    #[test]
    fn test_progress_counts_down() {
        let progress = Progress::new(3);
        progress.row_done();
        progress.row_done();
        assert_eq!(progress.remaining.load(Ordering::Relaxed), 1);
        assert!(progress.elapsed_secs() >= 0.0);
    }
}
