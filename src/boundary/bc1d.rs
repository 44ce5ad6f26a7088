use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundaryCondition {
    Dirichlet(f64),
    ZeroGradient,
}

/// Boundary pair for one scalar field: inlet (z = 0) and outlet (z = L).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBoundary {
    pub inlet: BoundaryCondition,
    pub outlet: BoundaryCondition,
}

/// Outlet policy for the pressure-correction equation. Both forms appear in
/// practice: pinning the correction to zero keeps the outlet pressure frozen
/// at whatever it currently is, while the fixed-pressure row drives the
/// outlet cell back to the reference outlet pressure every sub-iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureCorrectionOutlet {
    ZeroCorrection,
    FixedPressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions1D {
    pub velocity: FieldBoundary,
    pub temperature: FieldBoundary,
    /// Reference pressure at the outlet, also used for the outlet ghost cell.
    pub outlet_pressure: f64,
    pub pressure_correction_outlet: PressureCorrectionOutlet,
}

impl BoundaryConditions1D {
    pub fn new(
        velocity: FieldBoundary,
        temperature: FieldBoundary,
        outlet_pressure: f64,
        pressure_correction_outlet: PressureCorrectionOutlet,
    ) -> Self {
        Self {
            velocity,
            temperature,
            outlet_pressure,
            pressure_correction_outlet,
        }
    }
}
