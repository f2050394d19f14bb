//! Simple Random Sampling (component F).

use crate::access::AccessMask;
use crate::existing::ExistingSampleSet;
use crate::pipeline::BlockPipeline;
use crate::rng::MaskSelector;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use sgs_raster::Raster;
use sgs_vector::{Feature, Geometry, VectorLayer};

pub struct SrsOptions {
    pub num_samples: usize,
    pub mindist: f64,
}

pub struct SrsResult {
    pub layer: VectorLayer,
    pub count: usize,
}

/// Runs the Block Pipeline to build a candidate set of eligible pixel
/// indices, shuffles it with the run PRNG, then walks the shuffled order
/// appending points that respect `mindist` until `num_samples` is reached
/// or the pool is exhausted.
pub fn run_srs(
    raster: &Raster,
    access: Option<&AccessMask>,
    existing: Option<&ExistingSampleSet>,
    opts: &SrsOptions,
    mut rng: Xoshiro256PlusPlus,
) -> SrsResult {
    let width = raster.configs.columns;
    let height = raster.configs.rows;
    let access_ratio = access.map_or(1.0, |a| {
        a.access_ratio((width * height) as f64 * raster.configs.resolution_x.abs() * raster.configs.resolution_y.abs())
    });
    let p = MaskSelector::derive_probability(
        opts.num_samples,
        width,
        height,
        crate::rng::safety_factor(false),
        crate::rng::mindist_factor(opts.mindist),
        access_ratio,
    );
    let selector = MaskSelector::from_probability(p);

    let mut candidates: Vec<(isize, isize)> = Vec::new();
    let block_rows = crate::pipeline::default_block_rows(height, num_cpus::get());
    let mut pipeline = BlockPipeline::new(
        vec![raster],
        block_rows,
        access,
        existing,
        selector,
        rng.clone(),
    );
    pipeline.for_each(|p| {
        if p.accessible && !p.existing && p.selected {
            candidates.push((p.x, p.y));
        }
        true
    });

    candidates.shuffle(&mut rng);

    let mut layer = VectorLayer::new(raster.configs.coordinate_ref_system_wkt.clone());
    let mut kept: Vec<(f64, f64)> = Vec::new();
    for (x, y) in candidates {
        if layer.len() >= opts.num_samples {
            break;
        }
        let wx = raster.get_x_from_column(x);
        let wy = raster.get_y_from_row(y);
        let ok = opts.mindist <= 0.0
            || kept
                .iter()
                .all(|&(kx, ky)| ((wx - kx).powi(2) + (wy - ky).powi(2)).sqrt() >= opts.mindist);
        if ok {
            kept.push((wx, wy));
            layer.push(Geometry::Point((wx, wy)), Feature::default());
        }
    }

    let count = layer.len();
    SrsResult { layer, count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sgs_raster::RasterConfigs;

    fn fixture_4x4() -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 4;
        cfg.rows = 4;
        cfg.north = 4.0;
        cfg.south = 0.0;
        cfg.west = 0.0;
        cfg.east = 4.0;
        cfg.resolution_x = 1.0;
        cfg.resolution_y = 1.0;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::F64;
        let mut r = Raster::initialize_using_config("/tmp/unused_srs.tif", &cfg);
        for row in 0..4 {
            for col in 0..4 {
                r.set_value(row, col, (row * 4 + col) as f64);
            }
        }
        r
    }

    #[test]
    fn srs_basic_returns_requested_count() {
        let raster = fixture_4x4();
        let opts = SrsOptions { num_samples: 4, mindist: 0.0 };
        let rng = Xoshiro256PlusPlus::seed_from_u64(0xC0FFEE);
        let result = run_srs(&raster, None, None, &opts, rng);
        assert_eq!(result.count, 4);
    }

    #[test]
    fn mindist_is_respected() {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 10;
        cfg.rows = 10;
        cfg.north = 10.0;
        cfg.south = 0.0;
        cfg.west = 0.0;
        cfg.east = 10.0;
        cfg.resolution_x = 1.0;
        cfg.resolution_y = 1.0;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::F64;
        let mut raster = Raster::initialize_using_config("/tmp/unused_srs2.tif", &cfg);
        for row in 0..10 {
            for col in 0..10 {
                raster.set_value(row, col, 1.0);
            }
        }
        let opts = SrsOptions { num_samples: 10, mindist: 3.0 };
        let rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let result = run_srs(&raster, None, None, &opts, rng);
        for (i, gi) in result.layer.geometries.iter().enumerate() {
            for (j, gj) in result.layer.geometries.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let (Geometry::Point(a), Geometry::Point(b)) = (gi, gj) {
                    let d = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
                    assert!(d >= 3.0);
                }
            }
        }
    }
}
