//! Block Pipeline (component A).
//!
//! The teacher's `sgs_raster::Raster` is fully in-memory, unlike the
//! windowed-read dataset this component is specified against (see
//! SPEC_FULL.md §4.A). Blocks are therefore synthesized as contiguous
//! row-chunks over the in-memory band storage; every other guarantee
//! (row-major block order, row-major within-block order, no-data/NaN
//! detection, per-block PRNG precomputation, per-dataset mutex
//! serialization) is preserved.

use crate::access::AccessMask;
use crate::existing::ExistingSampleSet;
use crate::rng::{BlockMask, MaskSelector};
use rand_xoshiro::Xoshiro256PlusPlus;
use sgs_raster::Raster;
use std::sync::{Arc, Mutex};

/// One pixel's worth of co-registered band values plus its predicate flags.
pub struct PixelRecord {
    pub x: isize,
    pub y: isize,
    pub values: Vec<f64>,
    pub accessible: bool,
    pub existing: bool,
    pub selected: bool,
}

/// Default row-chunk height, used when the caller does not override it.
/// Mirrors the teacher's own `rows / num_procs` block division for its
/// multi-threaded tools.
pub fn default_block_rows(total_rows: usize, max_procs: usize) -> usize {
    let procs = max_procs.max(1);
    (total_rows / procs).max(1)
}

/// Iterates `bands` (co-registered: same width/height) in row-major block
/// order, applying the no-data, access, existing, and probabilistic
/// predicates per spec §4.A.
pub struct BlockPipeline<'a> {
    bands: Vec<&'a Raster>,
    width: usize,
    height: usize,
    block_rows: usize,
    access: Option<&'a AccessMask>,
    existing: Option<&'a ExistingSampleSet>,
    selector: MaskSelector,
    rng: Xoshiro256PlusPlus,
    io_guard: Arc<Mutex<()>>,
}

impl<'a> BlockPipeline<'a> {
    pub fn new(
        bands: Vec<&'a Raster>,
        block_rows: usize,
        access: Option<&'a AccessMask>,
        existing: Option<&'a ExistingSampleSet>,
        selector: MaskSelector,
        rng: Xoshiro256PlusPlus,
    ) -> BlockPipeline<'a> {
        let primary = bands[0];
        let width = primary.configs.columns;
        let height = primary.configs.rows;
        for b in &bands {
            assert_eq!(b.configs.columns, width, "co-registered bands must share width");
            assert_eq!(b.configs.rows, height, "co-registered bands must share height");
        }
        BlockPipeline {
            bands,
            width,
            height,
            block_rows: block_rows.max(1),
            access,
            existing,
            selector,
            rng,
            io_guard: Arc::new(Mutex::new(())),
        }
    }

    fn is_nodata(&self, band: &Raster, v: f64) -> bool {
        v == band.configs.nodata || (band.configs.data_type.is_float() && v.is_nan())
    }

    /// Visits every pixel in row-major block order, calling `visitor` once
    /// per tuple. `visitor` returning `false` stops iteration early.
    pub fn for_each<F>(&mut self, mut visitor: F)
    where
        F: FnMut(PixelRecord) -> bool,
    {
        let mut row = 0isize;
        'blocks: while (row as usize) < self.height {
            let y_valid = self.block_rows.min(self.height - row as usize);

            // Acquire the per-dataset mutex for the duration of this block's
            // reads, mirroring the "serialized per-dataset" contract; the
            // in-memory Raster has no real contention, so this guards the
            // Stratifier's multi-threaded writers, not block I/O itself.
            let _guard = self.io_guard.lock().unwrap();
            let mask_len = self.width * y_valid;
            let mut mask = BlockMask::fill(&mut self.rng, &self.selector, mask_len);
            drop(_guard);

            for dy in 0..y_valid as isize {
                let y = row + dy;
                for x in 0..self.width as isize {
                    let mut values = Vec::with_capacity(self.bands.len());
                    let mut nodata = false;
                    for b in &self.bands {
                        let v = b.get_value(y, x);
                        if self.is_nodata(b, v) {
                            nodata = true;
                        }
                        values.push(v);
                    }
                    let accessible = self.access.map_or(true, |a| a.is_accessible(x, y));
                    let existing = self.existing.map_or(false, |e| e.contains_index(x, y));
                    let selected = !nodata && mask.next();

                    let keep_going = visitor(PixelRecord {
                        x,
                        y,
                        values,
                        accessible,
                        existing,
                        selected,
                    });
                    if !keep_going {
                        break 'blocks;
                    }
                }
            }
            row += y_valid as isize;
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::MaskSelector;
    use rand::SeedableRng;
    use sgs_raster::{Raster, RasterConfigs};

    fn fixture(values: &[f64], width: usize, height: usize) -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = width;
        cfg.rows = height;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::F64;
        let mut r = Raster::initialize_using_config("/tmp/unused.tif", &cfg);
        for row in 0..height as isize {
            for col in 0..width as isize {
                r.set_value(row, col, values[(row as usize) * width + col as usize]);
            }
        }
        r
    }

    #[test]
    fn visits_pixels_in_row_major_order() {
        let values: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let raster = fixture(&values, 4, 4);
        let mut pipeline = BlockPipeline::new(
            vec![&raster],
            2,
            None,
            None,
            MaskSelector::always_accept(),
            Xoshiro256PlusPlus::seed_from_u64(1),
        );
        let mut seen = Vec::new();
        pipeline.for_each(|p| {
            seen.push(p.values[0]);
            true
        });
        assert_eq!(seen, values);
    }

    #[test]
    fn marks_nodata_pixels_unselected() {
        let mut values: Vec<f64> = (0..16).map(|v| v as f64).collect();
        values[5] = -9999.0;
        let raster = fixture(&values, 4, 4);
        let mut pipeline = BlockPipeline::new(
            vec![&raster],
            4,
            None,
            None,
            MaskSelector::always_accept(),
            Xoshiro256PlusPlus::seed_from_u64(1),
        );
        let mut nodata_selected = false;
        pipeline.for_each(|p| {
            if p.x == 1 && p.y == 1 {
                nodata_selected = p.selected;
            }
            true
        });
        assert!(!nodata_selected);
    }
}
