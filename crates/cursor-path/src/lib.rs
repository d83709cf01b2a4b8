//! Humanized cursor path synthesis.
//!
//! Combines Fitts' Law movement timing, a minimum-jerk velocity profile, a
//! Bézier-style perpendicular arc, decaying Gaussian jitter, and a trailing
//! spring-damper settle phase so a generated path looks like a human
//! reaching for and landing on a target rather than a teleport.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub const DEFAULT_FPS: f64 = 60.0;
pub const MIN_MOVEMENT_TIME_MS: f64 = 80.0;
pub const MAX_MOVEMENT_TIME_MS: f64 = 800.0;

const FITTS_A: f64 = 0.05;
const FITTS_B: f64 = 0.12;
const SPRING_K: f64 = 0.5;
const SPRING_C: f64 = 0.4;
const SPRING_DT: f64 = 0.6;
const SPRING_STEPS: usize = 8;
const SETTLE_STEP_MS: f64 = 12.0;

/// Mutable on-page cursor position, updated in place by every move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
}

impl CursorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Untimed point sequence for this move (mutates `self` to the target).
    pub fn path_to(&mut self, x: f64, y: f64, width: f64, seed: Option<u64>) -> Vec<(f64, f64)> {
        let result = generate_path(self.x, self.y, x, y, width, seed, DEFAULT_FPS);
        self.set(x, y);
        result.points
    }

    /// Timed path: full `PathResult` including per-step delay (mutates `self`).
    pub fn path_to_timed(&mut self, x: f64, y: f64, width: f64, seed: Option<u64>) -> PathResult {
        let result = generate_path(self.x, self.y, x, y, width, seed, DEFAULT_FPS);
        self.set(x, y);
        result
    }
}

/// A generated cursor path: the point sequence plus timing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub points: Vec<(f64, f64)>,
    pub total_time_ms: f64,
    pub delay_per_step_ms: f64,
}

impl PathResult {
    /// Iterate `(x, y, delay_ms)` triples: the main profile uses
    /// `delay_per_step_ms`, the trailing settle points use a fixed 12ms step.
    pub fn iter_timed(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let settle_len = SPRING_STEPS + 1;
        let main_len = self.points.len().saturating_sub(settle_len);
        self.points.iter().enumerate().map(move |(i, &(x, y))| {
            let delay = if i < main_len { self.delay_per_step_ms } else { SETTLE_STEP_MS };
            (x, y, delay)
        })
    }
}

/// Shannon-formulation Fitts' Law movement time, in seconds, clamped to the
/// documented `[MIN_MOVEMENT_TIME_MS, MAX_MOVEMENT_TIME_MS]` window.
fn fitts_mt(distance: f64, width: f64) -> f64 {
    let w_eff = width.max(6.0);
    let mt = FITTS_A + FITTS_B * (distance / w_eff + 1.0).log2();
    let mt_ms = (mt * 1000.0).clamp(MIN_MOVEMENT_TIME_MS, MAX_MOVEMENT_TIME_MS);
    mt_ms / 1000.0
}

/// Quintic minimum-jerk easing: `10s^3 - 15s^4 + 6s^5`.
fn min_jerk(s: f64) -> f64 {
    10.0 * s.powi(3) - 15.0 * s.powi(4) + 6.0 * s.powi(5)
}

/// Spring-damper settle from a small random offset back onto the exact
/// target, 8 integrated points followed by the exact target point.
fn spring_settle(x1: f64, y1: f64, rng: &mut StdRng) -> Vec<(f64, f64)> {
    let mut dx = rng.gen_range(-3.0..=3.0);
    let mut dy = rng.gen_range(-3.0..=3.0);
    let mut vx = 0.0_f64;
    let mut vy = 0.0_f64;
    let mut points = Vec::with_capacity(SPRING_STEPS + 1);
    for _ in 0..SPRING_STEPS {
        let ax = -SPRING_K * dx - SPRING_C * vx;
        let ay = -SPRING_K * dy - SPRING_C * vy;
        vx += ax * SPRING_DT;
        vy += ay * SPRING_DT;
        dx += vx * SPRING_DT;
        dy += vy * SPRING_DT;
        points.push((x1 + dx, y1 + dy));
    }
    points.push((x1, y1));
    points
}

/// Generate a humanized path from `(x0, y0)` to `(x1, y1)` against a target
/// of effective width `width` (e.g. the smaller bounding-box dimension).
///
/// `seed` pins the RNG for reproducible paths (used by tests and anywhere
/// deterministic replay matters); `None` draws fresh entropy each call.
pub fn generate_path(x0: f64, y0: f64, x1: f64, y1: f64, width: f64, seed: Option<u64>, fps: f64) -> PathResult {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let distance = dx.hypot(dy);
    let mt = fitts_mt(distance, width);
    let mut total_time_ms = mt * 1000.0;

    let steps = ((mt * fps).round() as i64).clamp(8, 150) as usize;
    let delay_per_step_ms = if steps > 0 { total_time_ms / steps as f64 } else { 0.0 };

    let perp_len = (-dy).hypot(dx);
    let perp_len = if perp_len == 0.0 { 1.0 } else { perp_len };
    let px = -dy / perp_len;
    let py = dx / perp_len;
    let bulge = rng.gen_range(-1.0..=1.0) * (30.0_f64).min(0.15 * distance);

    let jitter = Normal::new(0.0, 0.4).expect("fixed, valid normal parameters");

    let mut points = Vec::with_capacity(steps + 1 + SPRING_STEPS + 1);
    for i in 0..=steps {
        let s = i as f64 / steps as f64;
        let m = min_jerk(s);
        let base_x = x0 + dx * m;
        let base_y = y0 + dy * m;
        let curve = bulge * (std::f64::consts::PI * m).sin();
        let jitter_scale = (1.0 - m) * 2.0;
        let jx = jitter.sample(&mut rng) * jitter_scale;
        let jy = jitter.sample(&mut rng) * jitter_scale;
        points.push((base_x + px * curve + jx, base_y + py * curve + jy));
    }

    let settle = spring_settle(x1, y1, &mut rng);
    total_time_ms += settle.len() as f64 * SETTLE_STEP_MS;
    points.extend(settle);

    PathResult { points, total_time_ms, delay_per_step_ms }
}
