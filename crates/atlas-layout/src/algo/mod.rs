pub mod force;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub solver: SolverOptions,
    pub compose: ComposeOptions,
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()?;
        self.compose.validate()
    }
}

/// Constants of the per-cluster force simulation, in local (cluster-relative) units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverOptions {
    /// Rounds of repulsion/attraction/integration. Always run in full unless
    /// `convergence_threshold` is set.
    pub iterations: usize,
    /// Pairs below this similarity exert no attraction.
    pub similarity_threshold: f64,
    /// Numerator of the `k / d^2` pairwise repulsion.
    pub repulsion: f64,
    pub attraction: f64,
    /// Rest distance of a perfectly similar pair.
    pub base_distance: f64,
    /// Extra rest distance per unit of dissimilarity.
    pub spread: f64,
    pub damping: f64,
    /// Floor on pair distances in the force terms.
    pub min_distance: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Amplitude of the per-iteration jitter on each axis.
    pub jitter: f64,
    /// Stop early once the mean per-node step of an iteration drops below this value. The step
    /// includes jitter, so thresholds below roughly `jitter / 4` never fire.
    pub convergence_threshold: Option<f64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            iterations: 80,
            similarity_threshold: 0.08,
            repulsion: 900.0,
            attraction: 0.08,
            base_distance: 12.0,
            spread: 48.0,
            damping: 0.85,
            min_distance: 4.0,
            min_radius: 30.0,
            max_radius: 80.0,
            jitter: 0.6,
            convergence_threshold: None,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<()> {
        non_negative("solver.similarityThreshold", self.similarity_threshold)?;
        if self.similarity_threshold > 1.0 {
            return Err(Error::InvalidOption {
                name: "solver.similarityThreshold",
                message: "must not exceed 1",
            });
        }
        non_negative("solver.repulsion", self.repulsion)?;
        non_negative("solver.attraction", self.attraction)?;
        non_negative("solver.baseDistance", self.base_distance)?;
        non_negative("solver.spread", self.spread)?;
        non_negative("solver.jitter", self.jitter)?;
        positive("solver.damping", self.damping)?;
        if self.damping > 1.0 {
            return Err(Error::InvalidOption {
                name: "solver.damping",
                message: "must be in (0, 1]",
            });
        }
        positive("solver.minDistance", self.min_distance)?;
        non_negative("solver.minRadius", self.min_radius)?;
        non_negative("solver.maxRadius", self.max_radius)?;
        if self.min_radius > self.max_radius {
            return Err(Error::InvalidOption {
                name: "solver.minRadius",
                message: "must not exceed solver.maxRadius",
            });
        }
        if let Some(t) = self.convergence_threshold {
            non_negative("solver.convergenceThreshold", t)?;
        }
        Ok(())
    }
}

/// Constants of the global canvas, in percent of the canvas on each axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposeOptions {
    /// Maximum number of laid-out nodes per cluster.
    pub node_cap: usize,
    pub center_x: f64,
    pub center_y: f64,
    /// Horizontal radius of the centroid ring.
    pub ring_radius_x: f64,
    /// Vertical radius of the centroid ring.
    pub ring_radius_y: f64,
    /// Full width (radians) of the per-cluster angular jitter.
    pub centroid_angle_jitter: f64,
    /// Relative ring radius jitter; each centroid sits within `1 +/- centroid_radius_jitter`.
    pub centroid_radius_jitter: f64,
    pub base_cluster_radius: f64,
    pub per_member_growth: f64,
    pub growth_cap: f64,
    /// Full width of the per-cluster x/y scale multiplier jitter around 1.
    pub scale_jitter: f64,
    pub node_jitter: f64,
    /// Final positions are clamped to `[margin, 100 - margin]`.
    pub canvas_margin: f64,
    /// Number of summary terms reported per cluster.
    pub top_terms: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            node_cap: 14,
            center_x: 50.0,
            center_y: 50.0,
            ring_radius_x: 32.0,
            ring_radius_y: 28.0,
            centroid_angle_jitter: 0.35,
            centroid_radius_jitter: 0.1,
            base_cluster_radius: 6.0,
            per_member_growth: 0.6,
            growth_cap: 8.0,
            scale_jitter: 0.3,
            node_jitter: 0.8,
            canvas_margin: 2.0,
            top_terms: 5,
        }
    }
}

impl ComposeOptions {
    pub fn validate(&self) -> Result<()> {
        if self.node_cap == 0 {
            return Err(Error::InvalidOption {
                name: "compose.nodeCap",
                message: "must be at least 1",
            });
        }
        for (name, v) in [
            ("compose.centerX", self.center_x),
            ("compose.centerY", self.center_y),
        ] {
            if !v.is_finite() {
                return Err(Error::InvalidOption {
                    name,
                    message: "must be finite",
                });
            }
        }
        non_negative("compose.ringRadiusX", self.ring_radius_x)?;
        non_negative("compose.ringRadiusY", self.ring_radius_y)?;
        non_negative("compose.centroidAngleJitter", self.centroid_angle_jitter)?;
        non_negative("compose.centroidRadiusJitter", self.centroid_radius_jitter)?;
        non_negative("compose.baseClusterRadius", self.base_cluster_radius)?;
        non_negative("compose.perMemberGrowth", self.per_member_growth)?;
        non_negative("compose.growthCap", self.growth_cap)?;
        non_negative("compose.scaleJitter", self.scale_jitter)?;
        if self.scale_jitter >= 2.0 {
            return Err(Error::InvalidOption {
                name: "compose.scaleJitter",
                message: "must be below 2 so scale multipliers stay positive",
            });
        }
        non_negative("compose.nodeJitter", self.node_jitter)?;
        non_negative("compose.canvasMargin", self.canvas_margin)?;
        if self.canvas_margin >= 50.0 {
            return Err(Error::InvalidOption {
                name: "compose.canvasMargin",
                message: "must be below 50",
            });
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, v: f64) -> Result<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(Error::InvalidOption {
            name,
            message: "must be a finite, non-negative number",
        });
    }
    Ok(())
}

fn positive(name: &'static str, v: f64) -> Result<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(Error::InvalidOption {
            name,
            message: "must be a finite, positive number",
        });
    }
    Ok(())
}
