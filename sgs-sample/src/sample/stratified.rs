//! Stratified sampling — random and Queinnec focal-window methods
//! (component G).

use crate::access::AccessMask;
use crate::existing::ExistingSampleSet;
use crate::rng::{mindist_factor, safety_factor, MaskSelector};
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use sgs_raster::{DataType, Raster};
use sgs_vector::{Feature, Geometry, VectorLayer};
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

const FIRST_X_CAP: usize = 10_000;

/// Bands already warned about by [`warn_if_band_overflows_i32`], keyed by the
/// source raster's file name. Spec §7 `NumericOverflowWarning`: logged once per
/// band, not once per pixel.
fn numeric_overflow_warned() -> &'static Mutex<HashSet<String>> {
    static WARNED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    WARNED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Spec §4.G: the stratified-random read takes a pixel's value "as a 32-bit
/// signed integer"; warn if the source band's type can't represent every
/// value that width allows. Returns whether a warning was actually emitted
/// (i.e. this is the first time this band has overflowed), for testability.
fn warn_if_band_overflows_i32(raster: &Raster) -> bool {
    let wide = matches!(
        raster.configs.data_type,
        DataType::I64 | DataType::U64 | DataType::F64
    );
    if !wide {
        return false;
    }
    let mut warned = numeric_overflow_warned().lock().unwrap();
    if warned.insert(raster.file_name.clone()) {
        warn!(
            "band '{}' has data type {:?}, which cannot be represented in a 32-bit \
             signed integer; stratum values will be truncated via `round() as isize`",
            raster.file_name, raster.configs.data_type
        );
        true
    } else {
        false
    }
}

#[derive(Debug, Clone)]
pub enum Allocation {
    Prop,
    Equal,
    Manual(Vec<f64>),
    Optim,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    Random,
    Queinnec { wrow: usize, wcol: usize },
}

pub struct StratifiedOptions {
    pub num_samples: usize,
    pub num_strata: usize,
    pub allocation: Allocation,
    pub method: Method,
    pub mindist: f64,
    pub force: bool,
}

pub struct StratifiedResult {
    pub layer: VectorLayer,
    pub counts_per_stratum: Vec<usize>,
}

/// Rolling row-cyclic focal-window matrices (spec §3 "Focal-window matrix").
/// `m[row % wrow][col]` is "the horizontal window centred at `col` on that
/// row is homogeneous"; `valid[row % wrow][col]` is "this pixel is
/// individually eligible". Rows are cleared on reuse rather than
/// reallocated.
struct FocalWindow {
    wrow: usize,
    width: usize,
    m: Vec<Vec<bool>>,
    valid: Vec<Vec<bool>>,
}

impl FocalWindow {
    fn new(wrow: usize, width: usize) -> FocalWindow {
        FocalWindow {
            wrow,
            width,
            m: vec![vec![false; width]; wrow],
            valid: vec![vec![false; width]; wrow],
        }
    }

    fn clear_row(&mut self, row: isize) {
        let slot = row.rem_euclid(self.wrow as isize) as usize;
        for c in 0..self.width {
            self.m[slot][c] = false;
            self.valid[slot][c] = false;
        }
    }

    fn set(&mut self, row: isize, col: usize, homogeneous: bool, eligible: bool) {
        let slot = row.rem_euclid(self.wrow as isize) as usize;
        self.m[slot][col] = homogeneous;
        self.valid[slot][col] = eligible;
    }

    fn vertical_and(&self, center_row: isize, vpad: usize, col: usize) -> bool {
        for dy in -(vpad as isize)..=(vpad as isize) {
            let slot = (center_row + dy).rem_euclid(self.wrow as isize) as usize;
            if !self.m[slot][col] {
                return false;
            }
        }
        true
    }

    fn valid_at(&self, row: isize, col: usize) -> bool {
        let slot = row.rem_euclid(self.wrow as isize) as usize;
        self.valid[slot][col]
    }
}

struct StratumPool {
    count: usize,
    existing: Vec<(isize, isize)>,
    first_x: Vec<(isize, isize)>,
    prob_pool: Vec<(isize, isize)>,
    queinnec_pool: Vec<(isize, isize)>,
}

impl StratumPool {
    fn new() -> StratumPool {
        StratumPool {
            count: 0,
            existing: Vec::new(),
            first_x: Vec::new(),
            prob_pool: Vec::new(),
            queinnec_pool: Vec::new(),
        }
    }
}

/// Welford running mean/variance, used by the `optim` allocation policy to
/// weight strata by the standard deviation of a secondary band.
#[derive(Default, Clone, Copy)]
struct Welford {
    n: f64,
    mean: f64,
    m2: f64,
}

impl Welford {
    fn update(&mut self, x: f64) {
        self.n += 1.0;
        let delta = x - self.mean;
        self.mean += delta / self.n;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    fn stdev(&self) -> f64 {
        if self.n < 2.0 {
            0.0
        } else {
            (self.m2 / (self.n - 1.0)).sqrt()
        }
    }
}

/// Floors each weight's share of `num_samples`, then redistributes the
/// integer-division remainder one pixel at a time from the last stratum
/// back to the first, per spec §4.G.
fn allocate_counts(weights: &[f64], num_samples: usize) -> Vec<usize> {
    let total: f64 = weights.iter().sum();
    let mut counts: Vec<usize> = if total <= 0.0 {
        vec![0; weights.len()]
    } else {
        weights
            .iter()
            .map(|w| ((w / total) * num_samples as f64).floor() as usize)
            .collect()
    };
    let assigned: usize = counts.iter().sum();
    let mut remainder = num_samples.saturating_sub(assigned);
    let n = counts.len();
    let mut i = 0;
    while remainder > 0 && n > 0 {
        let idx = n - 1 - (i % n);
        counts[idx] += 1;
        remainder -= 1;
        i += 1;
    }
    counts
}

fn validate_method(method: &Method) -> crate::error::Result<()> {
    if let Method::Queinnec { wrow, wcol } = method {
        for (name, v) in [("wrow", *wrow), ("wcol", *wcol)] {
            if ![3, 5, 7].contains(&v) {
                return Err(crate::error::SgsError::precondition(
                    name,
                    format!("must be in {{3,5,7}}, got {}", v),
                ));
            }
        }
    }
    Ok(())
}

pub fn run_stratified(
    raster: &Raster,
    secondary: Option<&Raster>,
    access: Option<&AccessMask>,
    existing: Option<&ExistingSampleSet>,
    opts: &StratifiedOptions,
    mut rng: Xoshiro256PlusPlus,
) -> crate::error::Result<StratifiedResult> {
    validate_method(&opts.method)?;
    warn_if_band_overflows_i32(raster);

    let width = raster.configs.columns;
    let height = raster.configs.rows;
    let is_queinnec = matches!(opts.method, Method::Queinnec { .. });
    let p = MaskSelector::derive_probability(
        opts.num_samples,
        width,
        height,
        safety_factor(is_queinnec),
        mindist_factor(opts.mindist),
        1.0,
    );
    let selector = MaskSelector::from_probability(p);
    let queinnec_selector = if is_queinnec {
        MaskSelector::from_probability(MaskSelector::derive_probability(
            opts.num_samples,
            width,
            height,
            safety_factor(true),
            mindist_factor(opts.mindist),
            1.0,
        ))
    } else {
        selector
    };

    let mut pools: Vec<StratumPool> = (0..opts.num_strata).map(|_| StratumPool::new()).collect();
    let mut welford: Vec<Welford> = vec![Welford::default(); opts.num_strata];

    let (vpad, hpad, wrow) = match opts.method {
        Method::Queinnec { wrow, wcol } => (wrow / 2, wcol / 2, wrow),
        Method::Random => (0, 0, 1),
    };
    let mut focal = FocalWindow::new(wrow.max(1), width);

    for row in 0..height as isize {
        if is_queinnec {
            focal.clear_row(row);
        }
        for col in 0..width as isize {
            let v = raster.get_value(row, col);
            let nodata = v == raster.configs.nodata || (raster.configs.data_type.is_float() && v.is_nan());
            let accessible = access.map_or(true, |a| a.is_accessible(col, row));
            let exists = existing.map_or(false, |e| e.contains_index(col, row));
            let stratum = v.round() as isize;

            if is_queinnec {
                let homogeneous = !nodata
                    && accessible
                    && col >= hpad as isize
                    && col < width as isize - hpad as isize
                    && (-(hpad as isize)..=(hpad as isize)).all(|dx| {
                        let nv = raster.get_value(row, col + dx);
                        nv == v
                    });
                let eligible = !nodata && accessible && !exists;
                focal.set(row, col as usize, homogeneous, eligible);
            }

            if nodata || stratum < 0 || stratum as usize >= opts.num_strata {
                continue;
            }
            let s = stratum as usize;
            pools[s].count += 1;
            if let Some(sec) = secondary {
                welford[s].update(sec.get_value(row, col));
            }

            if exists {
                pools[s].existing.push((col, row));
                continue;
            }
            if !accessible {
                continue;
            }
            if pools[s].first_x.len() < FIRST_X_CAP {
                pools[s].first_x.push((col, row));
            }
            if selector.accept(rng.gen::<u64>()) {
                pools[s].prob_pool.push((col, row));
            }

            if is_queinnec {
                let center_row = row - vpad as isize;
                if center_row >= 0 {
                    let center_col = col;
                    if center_col >= hpad as isize && center_col < width as isize - hpad as isize {
                        let window_ready = row >= wrow as isize - 1;
                        if window_ready
                            && focal.vertical_and(center_row, vpad, center_col as usize)
                            && focal.valid_at(center_row, center_col as usize)
                        {
                            let cv = raster.get_value(center_row, center_col);
                            let cs = cv.round() as isize;
                            if cs >= 0 && (cs as usize) < opts.num_strata
                                && queinnec_selector.accept(rng.gen::<u64>())
                            {
                                pools[cs as usize].queinnec_pool.push((center_col, center_row));
                            }
                        }
                    }
                }
            }
        }
    }

    let weights: Vec<f64> = match &opts.allocation {
        Allocation::Prop => pools.iter().map(|p| p.count as f64).collect(),
        Allocation::Equal => vec![1.0; opts.num_strata],
        Allocation::Manual(w) => w.clone(),
        Allocation::Optim => pools
            .iter()
            .zip(welford.iter())
            .map(|(p, w)| p.count as f64 * w.stdev())
            .collect(),
    };
    let quotas = allocate_counts(&weights, opts.num_samples);

    let mut layer = VectorLayer::new(raster.configs.coordinate_ref_system_wkt.clone());
    let mut counts_per_stratum = vec![0usize; opts.num_strata];
    let mut kept: Vec<(f64, f64)> = Vec::new();

    for s in 0..opts.num_strata {
        let quota = quotas[s];
        let mut added = 0usize;
        let pool = &mut pools[s];

        let mut push_point = |x: isize,
                               y: isize,
                               kept: &mut Vec<(f64, f64)>,
                               layer: &mut VectorLayer,
                               added: &mut usize,
                               bypass_mindist: bool| {
            if *added >= quota {
                return;
            }
            let wx = raster.get_x_from_column(x);
            let wy = raster.get_y_from_row(y);
            let ok = bypass_mindist
                || opts.mindist <= 0.0
                || kept
                    .iter()
                    .all(|&(kx, ky)| ((wx - kx).powi(2) + (wy - ky).powi(2)).sqrt() >= opts.mindist);
            if ok {
                kept.push((wx, wy));
                layer.push(Geometry::Point((wx, wy)), Feature::default());
                *added += 1;
            }
        };

        for &(x, y) in &pool.existing {
            push_point(x, y, &mut kept, &mut layer, &mut added, opts.force);
        }

        if is_queinnec {
            pool.queinnec_pool.shuffle(&mut rng);
            for &(x, y) in &pool.queinnec_pool {
                if added >= quota {
                    break;
                }
                push_point(x, y, &mut kept, &mut layer, &mut added, false);
            }
        }

        let remaining = quota.saturating_sub(added);
        let use_prob = pool.prob_pool.len() >= remaining || pool.first_x.len() >= FIRST_X_CAP;
        let chosen = if use_prob { &mut pool.prob_pool } else { &mut pool.first_x };
        chosen.shuffle(&mut rng);
        for &(x, y) in chosen.iter() {
            if added >= quota {
                break;
            }
            push_point(x, y, &mut kept, &mut layer, &mut added, false);
        }

        counts_per_stratum[s] = added;
    }

    Ok(StratifiedResult {
        layer,
        counts_per_stratum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sgs_raster::RasterConfigs;

    fn quadrant_raster() -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 8;
        cfg.rows = 8;
        cfg.north = 8.0;
        cfg.south = 0.0;
        cfg.west = 0.0;
        cfg.east = 8.0;
        cfg.resolution_x = 1.0;
        cfg.resolution_y = 1.0;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::I32;
        let mut r = Raster::initialize_using_config("/tmp/unused_strat.tif", &cfg);
        for row in 0..8isize {
            for col in 0..8isize {
                let stratum = match (row < 4, col < 4) {
                    (true, true) => 0,
                    (true, false) => 1,
                    (false, true) => 2,
                    (false, false) => 3,
                };
                r.set_value(row, col, stratum as f64);
            }
        }
        r
    }

    #[test]
    fn prop_allocation_splits_evenly_across_equal_quadrants() {
        let raster = quadrant_raster();
        let opts = StratifiedOptions {
            num_samples: 8,
            num_strata: 4,
            allocation: Allocation::Prop,
            method: Method::Random,
            mindist: 0.0,
            force: false,
        };
        let rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let result = run_stratified(&raster, None, None, None, &opts, rng).unwrap();
        assert_eq!(result.counts_per_stratum, vec![2, 2, 2, 2]);
    }

    #[test]
    fn queinnec_excludes_the_frame() {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 9;
        cfg.rows = 9;
        cfg.north = 9.0;
        cfg.south = 0.0;
        cfg.west = 0.0;
        cfg.east = 9.0;
        cfg.resolution_x = 1.0;
        cfg.resolution_y = 1.0;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::I32;
        let mut raster = Raster::initialize_using_config("/tmp/unused_queinnec.tif", &cfg);
        for row in 0..9isize {
            for col in 0..9isize {
                raster.set_value(row, col, 1.0);
            }
        }
        let opts = StratifiedOptions {
            num_samples: 20,
            num_strata: 2,
            allocation: Allocation::Equal,
            method: Method::Queinnec { wrow: 3, wcol: 3 },
            mindist: 0.0,
            force: false,
        };
        let rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let result = run_stratified(&raster, None, None, None, &opts, rng).unwrap();
        for geom in &result.layer.geometries {
            if let Geometry::Point((x, y)) = geom {
                let col = raster.get_column_from_x(*x);
                let row = raster.get_row_from_y(*y);
                assert!(col >= 1 && col <= 7, "col {} out of interior range", col);
                assert!(row >= 1 && row <= 7, "row {} out of interior range", row);
            }
        }
    }

    #[test]
    fn rejects_bad_window_sizes() {
        let raster = quadrant_raster();
        let opts = StratifiedOptions {
            num_samples: 4,
            num_strata: 4,
            allocation: Allocation::Equal,
            method: Method::Queinnec { wrow: 4, wcol: 3 },
            mindist: 0.0,
            force: false,
        };
        let rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let err = run_stratified(&raster, None, None, None, &opts, rng).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn numeric_overflow_warning_fires_once_per_band() {
        let mut cfg = RasterConfigs::default();
        cfg.data_type = sgs_raster::DataType::F64;
        let raster = Raster::initialize_using_config("/tmp/unused_overflow_warning.tif", &cfg);
        assert!(warn_if_band_overflows_i32(&raster));
        assert!(!warn_if_band_overflows_i32(&raster));
    }

    #[test]
    fn numeric_overflow_warning_does_not_fire_for_i32_or_narrower() {
        let raster = quadrant_raster();
        assert!(!warn_if_band_overflows_i32(&raster));
    }
}
