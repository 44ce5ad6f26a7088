//! Outer/inner coupling loop.
//!
//! One momentum re-linearization per outer iteration, then `correctors`
//! cheap pressure-correction rounds against the frozen momentum
//! coefficients. Re-assembling the momentum matrix is the expensive part
//! and is only repeated while the velocity field is still moving; the inner
//! rounds do the bulk of the pressure-velocity adjustment.

use crate::config::SimulationConfig;
use crate::domain::grid1d::Grid1D;
use crate::domain::state::SolverState;
use crate::properties::FluidProperties;
use crate::solver::{continuity, momentum, update};

/// Outcome of one timestep's coupling loop. Exhausting the budget is not an
/// error here; the caller decides whether to continue or fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    Converged { iterations: usize, residual: f64 },
    NotConverged { residual: f64 },
}

impl Convergence {
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    pub fn residual(&self) -> f64 {
        match *self {
            Convergence::Converged { residual, .. } => residual,
            Convergence::NotConverged { residual } => residual,
        }
    }

    /// Outer iterations spent, or `None` if the budget ran out.
    pub fn iterations(&self) -> Option<usize> {
        match *self {
            Convergence::Converged { iterations, .. } => Some(iterations),
            Convergence::NotConverged { .. } => None,
        }
    }
}

pub fn couple<P: FluidProperties + Sync>(
    grid: &Grid1D,
    config: &SimulationConfig,
    props: &P,
    state: &mut SolverState,
) -> Convergence {
    let mut residual = f64::INFINITY;

    for outer in 1..=config.outer_iterations {
        momentum::predict(grid, config, props, state);

        for _ in 0..config.correctors {
            let p_prime = continuity::solve_correction(grid, config, props, state);
            residual = update::apply(grid, config, state, &p_prime);
        }

        if residual < config.tolerance {
            return Convergence::Converged { iterations: outer, residual };
        }
    }

    Convergence::NotConverged { residual }
}
