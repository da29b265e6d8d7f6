//! Stateless seeded noise used for initial placement and jitter.
//!
//! This is not a random number generator in any statistical or cryptographic sense: it only
//! needs to look irregular while staying reproducible, so the same records always land in the
//! same place across renders.

/// `frac(sin(seed) * 10000)`, in `[0, 1)`.
pub fn prng(seed: f64) -> f64 {
    let v = seed.sin() * 10_000.0;
    let f = v - v.floor();
    // `v - floor(v)` can round up to exactly 1.0 for tiny negative `v`.
    if f >= 1.0 { 0.0 } else { f }
}

/// `prng` mapped to `[-0.5, 0.5)`, scaled by `amplitude`.
pub fn centered(seed: f64, amplitude: f64) -> f64 {
    (prng(seed) - 0.5) * amplitude
}
