//! Implicit momentum predictor.
//!
//! Assembles the tridiagonal momentum equation per interior cell with upwind
//! convection, linear-average diffusion, Darcy-Forchheimer porous resistance
//! and a central pressure gradient, solves it, and retains the diagonal as
//! the lagged Rhie-Chow coefficient for the continuity sub-iterations that
//! follow.

use crate::config::{CouplingScheme, SimulationConfig};
use crate::domain::grid1d::Grid1D;
use crate::domain::state::SolverState;
use crate::numerical::faces;
use crate::numerical::tridiagonal::TridiagonalSystem;
use crate::properties::FluidProperties;
use crate::solver::{apply_boundary_row, into_field, DuctEnd};

/// Solves the momentum equation; `state.u` becomes the predicted velocity
/// and `state.b_u` the lagged coefficient for the corrector stages.
pub fn predict<P: FluidProperties + Sync>(
    grid: &Grid1D,
    config: &SimulationConfig,
    props: &P,
    state: &mut SolverState,
) {
    let n = grid.nodes();
    let dz = grid.dz();
    let dt = config.dt;
    let mut sys = TridiagonalSystem::new(n);

    {
        let u = &state.u;
        let t = &state.t;
        let p_ghost = &state.p_ghost;
        let b_lag = &state.b_u;
        let su = &state.su;

        sys.fill_interior(|i| {
            let rho = props.density(t[i]);
            let mu = props.viscosity(t[i]);

            // Face velocities carry the Rhie-Chow correction built from the
            // previous iteration's pressure and lagged diagonal.
            let uf_w = faces::face_velocity(i - 1, u, p_ghost, b_lag, config.rhie_chow);
            let uf_e = faces::face_velocity(i, u, p_ghost, b_lag, config.rhie_chow);
            let f_w = faces::upwind(uf_w, props.density(t[i - 1]), rho) * uf_w;
            let f_e = faces::upwind(uf_e, rho, props.density(t[i + 1])) * uf_e;

            let d_w = faces::linear(props.viscosity(t[i - 1]), mu) / dz;
            let d_e = faces::linear(mu, props.viscosity(t[i + 1])) / dz;

            let darcy = mu * dz / config.permeability;
            let forchheimer =
                config.forchheimer * mu * dz / config.permeability.sqrt() * u[i].abs();

            let sub = -(d_w + f_w.max(0.0));
            let sup = -(d_e + (-f_e).max(0.0));
            let diag = rho * dz / dt
                + d_w
                + d_e
                + f_e.max(0.0)
                + (-f_w).max(0.0)
                + darcy
                + forchheimer;
            let rhs = rho * dz / dt * u[i]
                + 0.5 * (p_ghost.value(i as isize - 1) - p_ghost.value(i as isize + 1))
                + su[i];
            [sub, diag, sup, rhs]
        });
    }

    apply_boundary_row(&mut sys, DuctEnd::Inlet, config.boundaries.velocity.inlet);
    apply_boundary_row(&mut sys, DuctEnd::Outlet, config.boundaries.velocity.outlet);

    // Retain the lagged coefficient. Boundary rows hold the trivial BC
    // stencil, so the boundary cells keep their physical diagonal instead.
    for i in 1..n - 1 {
        state.b_u[i] = match config.scheme {
            CouplingScheme::Piso => sys.b[i],
            CouplingScheme::Simplec => sys.b[i] - (sys.a[i] + sys.c[i]),
        };
    }
    let inlet_diag = physical_diagonal(grid, config, props, state, 0);
    let outlet_diag = physical_diagonal(grid, config, props, state, n - 1);
    state.b_u[0] = inlet_diag;
    state.b_u[n - 1] = outlet_diag;

    state.u = into_field(sys.solve());
}

/// Diffusion-transient-resistance diagonal a boundary cell would have had
/// without its BC row; keeps `1/b_u` meaningful in the edge face stencils.
fn physical_diagonal<P: FluidProperties>(
    grid: &Grid1D,
    config: &SimulationConfig,
    props: &P,
    state: &SolverState,
    i: usize,
) -> f64 {
    let dz = grid.dz();
    let rho = props.density(state.t[i]);
    let mu = props.viscosity(state.t[i]);
    rho * dz / config.dt
        + 2.0 * mu / dz
        + mu * dz / config.permeability
        + config.forchheimer * mu * dz / config.permeability.sqrt() * state.u[i].abs()
}
