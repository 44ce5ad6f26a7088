use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::boundary::bc1d::{
    BoundaryCondition, BoundaryConditions1D, FieldBoundary, PressureCorrectionOutlet,
};
use crate::error::SolverError;

/// Pressure-velocity coupling variant. `Piso` applies the raw momentum
/// diagonal in the corrections; `Simplec` subtracts the neighbor
/// coefficients first, which tolerates an unrelaxed pressure update less
/// well but converges with fewer correctors on stiff porous cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouplingScheme {
    Piso,
    Simplec,
}

/// What to do when the outer coupling loop exhausts its iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonConvergencePolicy {
    /// Log a warning and carry on with the last field (legacy behavior).
    Continue,
    /// Abort the run with `SolverError::NotConverged`.
    Fail,
}

/// Uniform volumetric source over `[start, end]` along the duct axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceZone {
    pub start: f64,
    pub end: f64,
    pub rate: f64,
}

/// One configuration structure for every solver variant: domain, timestep,
/// porous resistance, coupling controls, boundary values and source zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Duct length [m].
    pub length: f64,
    /// Collocated node count.
    pub nodes: usize,
    /// Timestep [s].
    pub dt: f64,
    /// Total simulated time [s].
    pub t_max: f64,
    /// Porous permeability [m^2].
    pub permeability: f64,
    /// Forchheimer quadratic-drag coefficient [-]; zero disables the term.
    pub forchheimer: f64,
    /// Outer (re-linearization) iteration budget per timestep.
    pub outer_iterations: usize,
    /// Pressure-correction sub-iterations per momentum solve.
    pub correctors: usize,
    /// Convergence tolerance on the velocity-change residual [m/s].
    pub tolerance: f64,
    pub pressure_relaxation: f64,
    pub velocity_relaxation: f64,
    /// Rhie-Chow amplification coefficient; zero disables the correction.
    pub rhie_chow: f64,
    pub scheme: CouplingScheme,
    pub non_convergence: NonConvergencePolicy,
    /// Uniform initial temperature [K].
    pub initial_temperature: f64,
    pub boundaries: BoundaryConditions1D,
    pub mass_sources: Vec<SourceZone>,
    pub momentum_sources: Vec<SourceZone>,
    pub energy_sources: Vec<SourceZone>,
}

impl Default for SimulationConfig {
    /// The sodium evaporator reference case: 1 cm duct, 500 nodes,
    /// 0.1 ms timesteps for 0.5 s, Darcy-only resistance.
    fn default() -> Self {
        Self {
            length: 0.01,
            nodes: 500,
            dt: 1e-4,
            t_max: 0.5,
            permeability: 1e-6,
            forchheimer: 0.0,
            outer_iterations: 1000,
            correctors: 1,
            tolerance: 1e-8,
            pressure_relaxation: 0.5,
            velocity_relaxation: 1.0,
            rhie_chow: 1.0,
            scheme: CouplingScheme::Simplec,
            non_convergence: NonConvergencePolicy::Continue,
            initial_temperature: 300.0,
            boundaries: BoundaryConditions1D {
                velocity: FieldBoundary {
                    inlet: BoundaryCondition::Dirichlet(0.01),
                    outlet: BoundaryCondition::ZeroGradient,
                },
                temperature: FieldBoundary {
                    inlet: BoundaryCondition::Dirichlet(1000.0),
                    outlet: BoundaryCondition::Dirichlet(500.0),
                },
                outlet_pressure: 0.0,
                pressure_correction_outlet: PressureCorrectionOutlet::ZeroCorrection,
            },
            mass_sources: Vec::new(),
            momentum_sources: Vec::new(),
            energy_sources: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let text = fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| SolverError::ConfigError(format!("{}: {e}", path.as_ref().display())))?;
        info!("Loaded configuration from {}", path.as_ref().display());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        let positive = [
            ("length", self.length),
            ("dt", self.dt),
            ("t_max", self.t_max),
            ("permeability", self.permeability),
            ("tolerance", self.tolerance),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SolverError::InvalidParameter(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if self.forchheimer < 0.0 {
            return Err(SolverError::InvalidParameter(format!(
                "forchheimer coefficient must be non-negative, got {}",
                self.forchheimer
            )));
        }
        if self.outer_iterations == 0 || self.correctors == 0 {
            return Err(SolverError::InvalidParameter(
                "outer_iterations and correctors must both be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("pressure_relaxation", self.pressure_relaxation),
            ("velocity_relaxation", self.velocity_relaxation),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SolverError::InvalidParameter(format!(
                    "{name} must lie in (0, 1], got {value}"
                )));
            }
        }
        if !(0.0..=2.0).contains(&self.rhie_chow) {
            return Err(SolverError::InvalidParameter(format!(
                "rhie_chow amplification must lie in [0, 2], got {}",
                self.rhie_chow
            )));
        }
        for zone in self
            .mass_sources
            .iter()
            .chain(&self.momentum_sources)
            .chain(&self.energy_sources)
        {
            if zone.start > zone.end {
                return Err(SolverError::InvalidParameter(format!(
                    "source zone [{}, {}] is inverted",
                    zone.start, zone.end
                )));
            }
        }
        Ok(())
    }

    pub fn timesteps(&self) -> usize {
        (self.t_max / self.dt).round() as usize
    }
}
