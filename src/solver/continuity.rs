//! Pressure-correction (continuity) equation.
//!
//! Rebuilt every sub-iteration from the just-predicted velocity and the
//! lagged momentum diagonal: symmetric face conductances on the
//! off-diagonals, net face mass-flux imbalance minus the local mass source
//! on the right-hand side.

use crate::boundary::bc1d::PressureCorrectionOutlet;
use crate::config::SimulationConfig;
use crate::domain::grid1d::Grid1D;
use crate::domain::state::SolverState;
use crate::numerical::faces;
use crate::numerical::tridiagonal::TridiagonalSystem;
use crate::properties::FluidProperties;

/// Predicted upwind mass fluxes through the west and east faces of cell `i`.
fn cell_fluxes<P: FluidProperties>(
    config: &SimulationConfig,
    props: &P,
    state: &SolverState,
    i: usize,
) -> (f64, f64) {
    let t = &state.t;
    let rho = props.density(t[i]);
    let uf_w = faces::face_velocity(i - 1, &state.u, &state.p_ghost, &state.b_u, config.rhie_chow);
    let uf_e = faces::face_velocity(i, &state.u, &state.p_ghost, &state.b_u, config.rhie_chow);
    let f_w = faces::upwind(uf_w, props.density(t[i - 1]), rho) * uf_w;
    let f_e = faces::upwind(uf_e, rho, props.density(t[i + 1])) * uf_e;
    (f_w, f_e)
}

/// Assembles and solves for the pressure correction `p'`; the solution is
/// applied by the field updater and then discarded.
pub fn solve_correction<P: FluidProperties + Sync>(
    grid: &Grid1D,
    config: &SimulationConfig,
    props: &P,
    state: &SolverState,
) -> Vec<f64> {
    let n = grid.nodes();
    let mut sys = TridiagonalSystem::new(n);

    {
        let t = &state.t;
        let b_u = &state.b_u;
        let sm = &state.sm;

        sys.fill_interior(|i| {
            let rho = props.density(t[i]);
            let (f_w, f_e) = cell_fluxes(config, props, state, i);

            let e_w = faces::linear(props.density(t[i - 1]), rho) * faces::face_inv_coeff(b_u, i - 1);
            let e_e = faces::linear(rho, props.density(t[i + 1])) * faces::face_inv_coeff(b_u, i);

            [-e_w, e_w + e_e, -e_e, sm[i] - (f_e - f_w)]
        });
    }

    // Inlet: zero-gradient correction.
    sys.a[0] = 0.0;
    sys.b[0] = 1.0;
    sys.c[0] = -1.0;
    sys.d[0] = 0.0;

    // Outlet: either pin the correction to zero or drive the cell back to
    // the reference outlet pressure.
    sys.a[n - 1] = 0.0;
    sys.b[n - 1] = 1.0;
    sys.c[n - 1] = 0.0;
    sys.d[n - 1] = match config.boundaries.pressure_correction_outlet {
        PressureCorrectionOutlet::ZeroCorrection => 0.0,
        PressureCorrectionOutlet::FixedPressure => {
            config.boundaries.outlet_pressure - state.p[n - 1]
        }
    };

    sys.solve()
}

/// Signed sum of the per-cell continuity defects `(F_e - F_w) - Sm` over the
/// interior; an observational probe of how well mass is conserved.
pub fn net_mass_imbalance<P: FluidProperties>(
    grid: &Grid1D,
    config: &SimulationConfig,
    props: &P,
    state: &SolverState,
) -> f64 {
    (1..grid.nodes() - 1)
        .map(|i| {
            let (f_w, f_e) = cell_fluxes(config, props, state, i);
            (f_e - f_w) - state.sm[i]
        })
        .sum()
}
