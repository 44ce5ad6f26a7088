use nalgebra::DVector;
use tracing::{info, info_span, warn};

use crate::boundary::bc1d::BoundaryCondition;
use crate::config::{NonConvergencePolicy, SimulationConfig};
use crate::domain::grid1d::Grid1D;
use crate::domain::state::SolverState;
use crate::error::SolverError;
use crate::numerical::tridiagonal::TridiagonalSystem;
use crate::properties::{FluidProperties, PropertyValidity};
use crate::solver::piso::Convergence;

pub mod continuity;
pub mod energy;
pub mod momentum;
pub mod piso;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DuctEnd {
    Inlet,
    Outlet,
}

/// Overwrites one boundary row of an assembled system with the configured
/// Dirichlet or zero-gradient condition. Interior-loop values never survive
/// in a boundary row.
pub(crate) fn apply_boundary_row(sys: &mut TridiagonalSystem, end: DuctEnd, bc: BoundaryCondition) {
    match end {
        DuctEnd::Inlet => {
            sys.a[0] = 0.0;
            match bc {
                BoundaryCondition::Dirichlet(value) => {
                    sys.b[0] = 1.0;
                    sys.c[0] = 0.0;
                    sys.d[0] = value;
                }
                BoundaryCondition::ZeroGradient => {
                    sys.b[0] = 1.0;
                    sys.c[0] = -1.0;
                    sys.d[0] = 0.0;
                }
            }
        }
        DuctEnd::Outlet => {
            let n = sys.len() - 1;
            sys.c[n] = 0.0;
            match bc {
                BoundaryCondition::Dirichlet(value) => {
                    sys.a[n] = 0.0;
                    sys.b[n] = 1.0;
                    sys.d[n] = value;
                }
                BoundaryCondition::ZeroGradient => {
                    sys.a[n] = -1.0;
                    sys.b[n] = 1.0;
                    sys.d[n] = 0.0;
                }
            }
        }
    }
}

/// Observational per-timestep record; filled after each step and handed to
/// the log sink, never fed back into the solver.
#[derive(Debug, Clone, Copy)]
pub struct StepDiagnostics {
    pub step: usize,
    pub time: f64,
    pub courant_max: f64,
    pub reynolds_max: f64,
    pub iterations: usize,
    pub residual: f64,
    pub converged: bool,
    pub mass_imbalance: f64,
}

#[derive(Debug)]
pub struct Solver<P: FluidProperties + Sync> {
    pub grid: Grid1D,
    pub config: SimulationConfig,
    pub props: P,
    pub state: SolverState,
    pub time: f64,
    steps_completed: usize,
}

impl<P: FluidProperties + Sync> Solver<P> {
    pub fn new(config: SimulationConfig, props: P) -> Result<Self, SolverError> {
        config.validate()?;
        let grid = Grid1D::new(config.nodes, config.length)?;
        let state = SolverState::new(&grid, &config, &props);
        Ok(Self {
            grid,
            config,
            props,
            state,
            time: 0.0,
            steps_completed: 0,
        })
    }

    /// Advances the solution by one timestep: snapshot the backward-Euler
    /// temperature reference, iterate the pressure-velocity coupling, then
    /// solve the energy equation once on the converged flow field.
    pub fn step(&mut self) -> Convergence {
        self.state.t_old.copy_from(&self.state.t);
        let convergence = piso::couple(&self.grid, &self.config, &self.props, &mut self.state);
        energy::advance(&self.grid, &self.config, &self.props, &mut self.state);
        self.time += self.config.dt;
        self.steps_completed += 1;
        convergence
    }

    pub fn steps_completed(&self) -> usize {
        self.steps_completed
    }

    /// Maximum convective Courant number `|u| dt / dz` over the grid.
    pub fn courant_max(&self) -> f64 {
        let u_max = self.state.u.iter().fold(0.0f64, |m, u| m.max(u.abs()));
        u_max * self.config.dt / self.grid.dz()
    }

    /// Maximum pore Reynolds number `rho |u| sqrt(K) / mu` over the grid.
    pub fn reynolds_max(&self) -> f64 {
        let sqrt_k = self.config.permeability.sqrt();
        self.state
            .u
            .iter()
            .zip(self.state.t.iter())
            .fold(0.0f64, |m, (u, &t)| {
                m.max(self.props.density(t) * u.abs() * sqrt_k / self.props.viscosity(t))
            })
    }

    fn diagnostics(&self, convergence: &Convergence) -> StepDiagnostics {
        StepDiagnostics {
            step: self.steps_completed,
            time: self.time,
            courant_max: self.courant_max(),
            reynolds_max: self.reynolds_max(),
            iterations: convergence
                .iterations()
                .unwrap_or(self.config.outer_iterations),
            residual: convergence.residual(),
            converged: convergence.is_converged(),
            mass_imbalance: continuity::net_mass_imbalance(
                &self.grid,
                &self.config,
                &self.props,
                &self.state,
            ),
        }
    }

    /// Runs the full transient from `t = 0` to `t_max`.
    pub fn run(&mut self) -> Result<(), SolverError> {
        let num_steps = self.config.timesteps();
        let run_span = info_span!("simulation_run", num_steps).entered();
        info!("Starting simulation with {} steps of dt = {:.3e} s", num_steps, self.config.dt);
        let start_time = std::time::Instant::now();

        for _ in 0..num_steps {
            let step_start = std::time::Instant::now();
            let convergence = self.step();
            let diag = self.diagnostics(&convergence);

            info!(
                "Step {}: t={:.5}s, Co={:.3e}, Re={:.3e}, iters={}, res={:.3e}, mass_imb={:.3e}, elapsed={:.2}ms",
                diag.step,
                diag.time,
                diag.courant_max,
                diag.reynolds_max,
                diag.iterations,
                diag.residual,
                diag.mass_imbalance,
                step_start.elapsed().as_secs_f64() * 1e3,
            );

            if !diag.converged {
                warn!(
                    "Step {}: outer loop exhausted {} iterations, residual {:.3e}",
                    diag.step, self.config.outer_iterations, diag.residual
                );
                if self.config.non_convergence == NonConvergencePolicy::Fail {
                    return Err(SolverError::NotConverged {
                        residual: diag.residual,
                        tolerance: self.config.tolerance,
                    });
                }
            }

            let t_min = self.state.t.iter().cloned().fold(f64::INFINITY, f64::min);
            if let PropertyValidity::OutOfRange(t) = self.props.validity(t_min) {
                warn!(
                    "Step {}: temperature {:.1} K below property validity floor {:.1} K, extrapolating",
                    diag.step,
                    t,
                    self.props.validity_floor()
                );
            }
        }

        info!("Simulation finished in {:.2}s", start_time.elapsed().as_secs_f64());
        drop(run_span);
        Ok(())
    }
}

/// Converts a solved coefficient vector back into a field array.
pub(crate) fn into_field(x: Vec<f64>) -> DVector<f64> {
    DVector::from_vec(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceZone;
    use crate::properties::ConstantProperties;
    use approx::assert_relative_eq;

    fn quick_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.nodes = 30;
        config.dt = 1e-3;
        config.t_max = 5e-3;
        config.outer_iterations = 200;
        config
    }

    fn test_props() -> ConstantProperties {
        ConstantProperties { rho: 800.0, mu: 2e-4, k: 60.0, cp: 1250.0 }
    }

    #[test]
    fn test_solver_new_validates_config() {
        let mut config = quick_config();
        config.tolerance = -1.0;
        assert!(Solver::new(config, test_props()).is_err());

        let mut config = quick_config();
        config.nodes = 2;
        assert!(Solver::new(config, test_props()).is_err());
    }

    #[test]
    fn test_step_advances_time_and_fields() {
        let mut solver = Solver::new(quick_config(), test_props()).unwrap();
        let p_before = solver.state.p.clone();
        let t_before = solver.state.t.clone();

        solver.step();

        assert_relative_eq!(solver.time, solver.config.dt, epsilon = 1e-12);
        assert_eq!(solver.steps_completed(), 1);
        assert_ne!(solver.state.p, p_before, "pressure field did not change");
        assert_ne!(solver.state.t, t_before, "temperature field did not change");
    }

    #[test]
    fn test_run_completes_and_counts_steps() {
        let mut solver = Solver::new(quick_config(), test_props()).unwrap();
        solver.run().unwrap();
        assert_eq!(solver.steps_completed(), solver.config.timesteps());
        assert_relative_eq!(solver.time, solver.config.t_max, epsilon = 1e-9);
        assert!(solver.state.u.iter().all(|u| u.is_finite()));
        assert!(solver.state.t.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn test_courant_number_matches_velocity_scale() {
        let solver = Solver::new(quick_config(), test_props()).unwrap();
        // Initial field: only the inlet cell moves at 0.01 m/s.
        let expected = 0.01 * solver.config.dt / solver.grid.dz();
        assert_relative_eq!(solver.courant_max(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_fail_policy_surfaces_non_convergence() {
        let mut config = quick_config();
        // An impossible budget forces the residual check to fail.
        config.outer_iterations = 1;
        config.tolerance = 1e-300;
        config.non_convergence = NonConvergencePolicy::Fail;
        // A momentum source keeps the field from settling to the trivial state.
        config.momentum_sources = vec![SourceZone { start: 0.0, end: 0.01, rate: 1e3 }];
        let mut solver = Solver::new(config, test_props()).unwrap();
        match solver.run() {
            Err(SolverError::NotConverged { residual, .. }) => assert!(residual > 0.0),
            other => panic!("expected NotConverged, got {other:?}"),
        }
    }
}
