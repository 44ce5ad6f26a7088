//! Field updater: applies the pressure correction, refreshes the ghost
//! buffer, corrects the interior velocity and reports the convergence
//! residual of the sub-iteration.

use crate::boundary::bc1d::BoundaryCondition;
use crate::config::SimulationConfig;
use crate::domain::grid1d::Grid1D;
use crate::domain::state::SolverState;

/// Applies `p'` to the fields. Returns the maximum absolute velocity change
/// over the interior cells, the residual the outer loop converges on.
pub fn apply(
    grid: &Grid1D,
    config: &SimulationConfig,
    state: &mut SolverState,
    p_prime: &[f64],
) -> f64 {
    let n = grid.nodes();

    for i in 0..n {
        state.p[i] += config.pressure_relaxation * p_prime[i];
    }
    state
        .p_ghost
        .refresh(&state.p, config.boundaries.outlet_pressure);

    let mut max_err = 0.0f64;
    for i in 1..n - 1 {
        let du =
            config.velocity_relaxation * 0.5 * (p_prime[i + 1] - p_prime[i - 1]) / state.b_u[i];
        state.u[i] -= du;
        max_err = max_err.max(du.abs());
    }

    // Dirichlet boundary velocities stay untouched; a zero-gradient end is
    // re-imposed from the corrected neighbor.
    if config.boundaries.velocity.outlet == BoundaryCondition::ZeroGradient {
        state.u[n - 1] = state.u[n - 2];
    }
    if config.boundaries.velocity.inlet == BoundaryCondition::ZeroGradient {
        state.u[0] = state.u[1];
    }

    max_err
}
