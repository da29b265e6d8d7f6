//! Similarity-weighted spring embedder for a single cluster.
//!
//! Every pair repels with `k / d^2`; pairs whose similarity reaches the threshold are also tied
//! by a spring whose rest length shrinks as similarity grows. Positions are integrated with a
//! damping factor and a small seeded jitter for a fixed number of rounds.

use crate::algo::SolverOptions;
use crate::model::Point;
use crate::prng::{centered, prng};
use crate::similarity::SimilarityMatrix;
use nalgebra::Vector2;
use std::f64::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub positions: Vec<Point>,
    pub iterations: usize,
    /// Whether `convergence_threshold` ended the run before `iterations` rounds.
    pub converged_early: bool,
}

/// Lays out one cluster in local coordinates around the origin.
///
/// `seeds[i]` is the placement seed of node `i` (derived from its record id) and must have
/// `similarity.len()` entries. `cluster_seed` decorrelates clusters whose members share ids.
pub fn solve(
    seeds: &[f64],
    similarity: &SimilarityMatrix,
    cluster_seed: f64,
    opts: &SolverOptions,
) -> Solution {
    debug_assert_eq!(seeds.len(), similarity.len());

    let mut sim = SimNodes::initial(seeds, cluster_seed, opts);
    if sim.len() < 2 {
        return Solution {
            positions: sim.points(),
            iterations: 0,
            converged_early: false,
        };
    }

    // The attraction set never changes across rounds.
    let springs: Vec<(usize, usize, f64)> = similarity
        .pairs_at_least(opts.similarity_threshold)
        .collect();

    let n = sim.len() as f64;
    let mut iterations = 0usize;
    let mut converged_early = false;
    for iteration in 0..opts.iterations {
        iterations += 1;
        sim.clear_displacements();
        sim.apply_repulsion(opts);
        sim.apply_attraction(&springs, opts);
        let total = sim.integrate(iteration, cluster_seed, opts);

        if let Some(threshold) = opts.convergence_threshold {
            if total / n < threshold {
                converged_early = iterations < opts.iterations;
                break;
            }
        }
    }

    Solution {
        positions: sim.points(),
        iterations,
        converged_early,
    }
}

/// Initial placement: a seeded angle on a circle whose radius is seeded within
/// `[min_radius, max_radius)`.
pub fn initial_position(seed: f64, cluster_seed: f64, opts: &SolverOptions) -> Point {
    let radius =
        opts.min_radius + prng(seed * 1.7 + cluster_seed) * (opts.max_radius - opts.min_radius);
    let angle = prng(seed * 3.1 + cluster_seed * 0.7 + 11.0) * TAU;
    Point::new(angle.cos() * radius, angle.sin() * radius)
}

#[derive(Debug, Clone)]
struct SimNodes {
    pos: Vec<Vector2<f64>>,
    disp: Vec<Vector2<f64>>,
}

impl SimNodes {
    fn initial(seeds: &[f64], cluster_seed: f64, opts: &SolverOptions) -> Self {
        let pos: Vec<Vector2<f64>> = seeds
            .iter()
            .map(|&seed| {
                let p = initial_position(seed, cluster_seed, opts);
                Vector2::new(p.x, p.y)
            })
            .collect();
        let disp = vec![Vector2::zeros(); pos.len()];
        Self { pos, disp }
    }

    fn len(&self) -> usize {
        self.pos.len()
    }

    fn points(&self) -> Vec<Point> {
        self.pos.iter().map(|p| Point::new(p.x, p.y)).collect()
    }

    fn clear_displacements(&mut self) {
        for d in &mut self.disp {
            *d = Vector2::zeros();
        }
    }

    fn apply_repulsion(&mut self, opts: &SolverOptions) {
        let n = self.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.pos[i] - self.pos[j];
                let len = delta.norm();
                // Coincident nodes have no direction to push along; jitter separates them.
                if len == 0.0 {
                    continue;
                }
                let dist = len.max(opts.min_distance);
                let push = delta * (opts.repulsion / (dist * dist * len));
                self.disp[i] += push;
                self.disp[j] -= push;
            }
        }
    }

    fn apply_attraction(&mut self, springs: &[(usize, usize, f64)], opts: &SolverOptions) {
        for &(i, j, s) in springs {
            let delta = self.pos[j] - self.pos[i];
            let len = delta.norm();
            if len == 0.0 {
                continue;
            }
            let target = opts.base_distance + (1.0 - s) * opts.spread;
            let force = (len - target) * opts.attraction * s;
            let pull = delta * (force / len);
            self.disp[i] += pull;
            self.disp[j] -= pull;
        }
    }

    /// Moves every node and returns the summed step length.
    fn integrate(&mut self, iteration: usize, cluster_seed: f64, opts: &SolverOptions) -> f64 {
        let mut total = 0.0;
        let t = iteration as f64;
        for (i, (p, d)) in self.pos.iter_mut().zip(&self.disp).enumerate() {
            let k = i as f64;
            let jitter = Vector2::new(
                centered(k * 13.0 + t * 7.0 + cluster_seed, opts.jitter),
                centered(k * 17.0 + t * 11.0 + cluster_seed + 0.5, opts.jitter),
            );
            let step = d * opts.damping + jitter;
            *p += step;
            total += step.norm();
        }
        total
    }
}
