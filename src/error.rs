use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid grid size: {0}")]
    InvalidGridSize(String),
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Pressure-velocity coupling did not converge: residual {residual:.3e} (tolerance {tolerance:.3e})")]
    NotConverged { residual: f64, tolerance: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
