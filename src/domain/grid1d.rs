use crate::error::GridError;

/// Uniform 1D collocated grid: `nodes` control volumes over `length`, node
/// spacing `dz = length / (nodes - 1)`. Immutable for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid1D {
    nodes: usize,
    length: f64,
    dz: f64,
}

impl Grid1D {
    /// The Rhie-Chow face stencil reaches two cells either side of a face,
    /// so anything below five nodes has no genuine interior.
    pub const MIN_NODES: usize = 5;

    pub fn new(nodes: usize, length: f64) -> Result<Self, GridError> {
        if nodes < Self::MIN_NODES {
            return Err(GridError::InvalidGridSize(format!(
                "need at least {} nodes, got {}",
                Self::MIN_NODES,
                nodes
            )));
        }
        if !(length > 0.0) || !length.is_finite() {
            return Err(GridError::InvalidGridSize(format!(
                "domain length must be positive and finite, got {length}"
            )));
        }
        let dz = length / (nodes - 1) as f64;
        Ok(Self { nodes, length, dz })
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn dz(&self) -> f64 {
        self.dz
    }

    /// Axial coordinate of node `i`.
    pub fn z(&self, i: usize) -> f64 {
        i as f64 * self.dz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_creation() {
        let grid = Grid1D::new(501, 0.01).unwrap();
        assert_eq!(grid.nodes(), 501);
        assert_relative_eq!(grid.dz(), 0.01 / 500.0, epsilon = 1e-15);
        assert_relative_eq!(grid.z(500), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_grid_creation_invalid() {
        assert!(Grid1D::new(3, 1.0).is_err());
        assert!(Grid1D::new(10, 0.0).is_err());
        assert!(Grid1D::new(10, -1.0).is_err());
        assert!(Grid1D::new(10, f64::NAN).is_err());
    }
}
