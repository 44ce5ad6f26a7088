//! Segregated energy equation, solved once per timestep on the converged
//! flow field: backward-Euler transient, linear-average conductivity
//! diffusion, upwind `rho cp` convection on the Rhie-Chow corrected face
//! velocities.

use crate::config::SimulationConfig;
use crate::domain::grid1d::Grid1D;
use crate::domain::state::SolverState;
use crate::numerical::faces;
use crate::numerical::tridiagonal::TridiagonalSystem;
use crate::properties::FluidProperties;
use crate::solver::{apply_boundary_row, into_field, DuctEnd};

pub fn advance<P: FluidProperties + Sync>(
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
        let t_old = &state.t_old;
        let p_ghost = &state.p_ghost;
        let b_u = &state.b_u;
        let st = &state.st;

        sys.fill_interior(|i| {
            let rho = props.density(t[i]);
            let cp = props.specific_heat(t[i]);
            let k = props.conductivity(t[i]);

            let d_w = faces::linear(props.conductivity(t[i - 1]), k) / dz;
            let d_e = faces::linear(k, props.conductivity(t[i + 1])) / dz;

            let uf_w = faces::face_velocity(i - 1, u, p_ghost, b_u, config.rhie_chow);
            let uf_e = faces::face_velocity(i, u, p_ghost, b_u, config.rhie_chow);
            // Heat capacity flux rho*cp*u carried from the upwind cell.
            let g_w = faces::upwind(
                uf_w,
                props.density(t[i - 1]) * props.specific_heat(t[i - 1]),
                rho * cp,
            ) * uf_w;
            let g_e = faces::upwind(
                uf_e,
                rho * cp,
                props.density(t[i + 1]) * props.specific_heat(t[i + 1]),
            ) * uf_e;

            let transient = rho * cp * dz / dt;
            let sub = -(d_w + g_w.max(0.0));
            let sup = -(d_e + (-g_e).max(0.0));
            let diag = transient + d_w + d_e + g_e.max(0.0) + (-g_w).max(0.0);
            let rhs = transient * t_old[i] + st[i];
            [sub, diag, sup, rhs]
        });
    }

    apply_boundary_row(&mut sys, DuctEnd::Inlet, config.boundaries.temperature.inlet);
    apply_boundary_row(&mut sys, DuctEnd::Outlet, config.boundaries.temperature.outlet);

    state.t = into_field(sys.solve());
}
