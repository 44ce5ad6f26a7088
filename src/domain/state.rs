use nalgebra::DVector;

use crate::config::SimulationConfig;
use crate::boundary::bc1d::BoundaryCondition;
use crate::domain::grid1d::Grid1D;
use crate::properties::FluidProperties;

/// Pressure field padded by one ghost cell on each side, backing the
/// four-point Rhie-Chow face stencil. Ghosts are refreshed after every
/// pressure update: zero-gradient (mirror) at the inlet, fixed outlet
/// pressure at the outlet.
#[derive(Debug, Clone)]
pub struct GhostedPressure {
    buf: Vec<f64>,
}

impl GhostedPressure {
    pub fn new(n: usize) -> Self {
        Self { buf: vec![0.0; n + 2] }
    }

    /// Number of interior cells.
    pub fn interior_len(&self) -> usize {
        self.buf.len() - 2
    }

    /// Value at cell `i`, where `-1` is the inlet ghost and `interior_len()`
    /// the outlet ghost.
    pub fn value(&self, i: isize) -> f64 {
        self.buf[(i + 1) as usize]
    }

    pub fn inlet_ghost(&self) -> f64 {
        self.buf[0]
    }

    pub fn outlet_ghost(&self) -> f64 {
        self.buf[self.buf.len() - 1]
    }

    /// Copies the interior pressure and re-derives both ghosts.
    pub fn refresh(&mut self, p: &DVector<f64>, outlet_pressure: f64) {
        let n = self.interior_len();
        debug_assert_eq!(p.len(), n);
        self.buf[1..=n].copy_from_slice(p.as_slice());
        self.buf[0] = p[0];
        self.buf[n + 1] = outlet_pressure;
    }
}

/// All mutable per-cell state of a run, owned by the timestep loop and
/// passed by reference into each stage.
#[derive(Debug, Clone)]
pub struct SolverState {
    /// Velocity [m/s].
    pub u: DVector<f64>,
    /// Pressure [Pa].
    pub p: DVector<f64>,
    /// Temperature [K].
    pub t: DVector<f64>,
    pub p_ghost: GhostedPressure,
    /// Lagged momentum diagonal, retained across pressure-correction
    /// sub-iterations for the Rhie-Chow interpolation and the velocity
    /// correction. Seeded from the initial properties so the first
    /// continuity assembly never reads an uninitialized coefficient.
    pub b_u: Vec<f64>,
    /// Previous-timestep temperature, the backward-Euler reference.
    pub t_old: DVector<f64>,
    /// Per-cell mass source [kg/(m^2 s)], frozen after construction.
    pub sm: Vec<f64>,
    /// Per-cell momentum source [N/m^2], frozen after construction.
    pub su: Vec<f64>,
    /// Per-cell energy source [W/m^2], frozen after construction.
    pub st: Vec<f64>,
}

impl SolverState {
    pub fn new(grid: &Grid1D, config: &SimulationConfig, props: &impl FluidProperties) -> Self {
        let n = grid.nodes();
        let dz = grid.dz();

        let mut u = DVector::zeros(n);
        let mut p = DVector::zeros(n);
        let mut t = DVector::from_element(n, config.initial_temperature);

        // Initial fields honor the Dirichlet ends so the very first momentum
        // and energy assemblies see consistent boundary values.
        if let BoundaryCondition::Dirichlet(v) = config.boundaries.velocity.inlet {
            u[0] = v;
        }
        if let BoundaryCondition::Dirichlet(v) = config.boundaries.velocity.outlet {
            u[n - 1] = v;
        }
        if let BoundaryCondition::Dirichlet(v) = config.boundaries.temperature.inlet {
            t[0] = v;
        }
        if let BoundaryCondition::Dirichlet(v) = config.boundaries.temperature.outlet {
            t[n - 1] = v;
        }
        p[n - 1] = config.boundaries.outlet_pressure;

        let mut p_ghost = GhostedPressure::new(n);
        p_ghost.refresh(&p, config.boundaries.outlet_pressure);

        let b_u = (0..n)
            .map(|i| {
                let rho = props.density(t[i]);
                let mu = props.viscosity(t[i]);
                rho * dz / config.dt + 2.0 * mu / dz + mu * dz / config.permeability
            })
            .collect();

        let rasterize = |zones: &[crate::config::SourceZone]| -> Vec<f64> {
            let mut field = vec![0.0; n];
            for zone in zones {
                for (i, cell) in field.iter_mut().enumerate() {
                    let z = grid.z(i);
                    if z >= zone.start && z <= zone.end {
                        *cell += zone.rate;
                    }
                }
            }
            field
        };

        let t_old = t.clone();
        Self {
            u,
            p,
            t,
            p_ghost,
            b_u,
            t_old,
            sm: rasterize(&config.mass_sources),
            su: rasterize(&config.momentum_sources),
            st: rasterize(&config.energy_sources),
        }
    }
}
