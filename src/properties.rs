//! Temperature-dependent fluid property models.
//!
//! All correlations map temperature in Kelvin to SI-unit properties. Below
//! the validity floor (typically the solidification temperature) the
//! correlations are still evaluated and the extrapolated value returned;
//! callers can probe `validity` to surface a diagnostic instead of failing.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValidity {
    Valid,
    OutOfRange(f64),
}

pub trait FluidProperties {
    /// Density [kg/m^3].
    fn density(&self, t: f64) -> f64;
    /// Dynamic viscosity [Pa s].
    fn viscosity(&self, t: f64) -> f64;
    /// Thermal conductivity [W/(m K)].
    fn conductivity(&self, t: f64) -> f64;
    /// Specific heat capacity [J/(kg K)].
    fn specific_heat(&self, t: f64) -> f64;

    /// Lowest temperature at which the correlations are trusted.
    fn validity_floor(&self) -> f64;

    /// `OutOfRange` if and only if `t` is strictly below the validity floor.
    fn validity(&self, t: f64) -> PropertyValidity {
        if t < self.validity_floor() {
            PropertyValidity::OutOfRange(t)
        } else {
            PropertyValidity::Valid
        }
    }
}

/// Liquid sodium.
///
/// Density from the Fink/Leibowitz critical-point form, conductivity and
/// specific heat from polynomial fits, viscosity from the Shpil'rain
/// correlation (valid 371 K to 2500 K).
#[derive(Debug, Clone, Copy, Default)]
pub struct SodiumLiquid;

impl SodiumLiquid {
    pub const T_CRIT: f64 = 2509.46;
    pub const T_MELT: f64 = 370.98;
}

impl FluidProperties for SodiumLiquid {
    fn density(&self, t: f64) -> f64 {
        let x = 1.0 - t / Self::T_CRIT;
        219.0 + 275.32 * x + 511.58 * x.abs().sqrt()
    }

    fn viscosity(&self, t: f64) -> f64 {
        (-6.4406 - 0.3958 * t.ln() + 556.835 / t).exp()
    }

    fn conductivity(&self, t: f64) -> f64 {
        124.67 - 0.11381 * t + 5.5226e-5 * t * t - 1.1842e-8 * t * t * t
    }

    fn specific_heat(&self, t: f64) -> f64 {
        let dt = t - 273.15;
        1436.72 - 0.58 * dt + 4.627e-4 * dt * dt
    }

    fn validity_floor(&self) -> f64 {
        Self::T_MELT
    }
}

/// Temperature-independent properties, mainly for verification cases where
/// an analytic reference exists.
#[derive(Debug, Clone, Copy)]
pub struct ConstantProperties {
    pub rho: f64,
    pub mu: f64,
    pub k: f64,
    pub cp: f64,
}

impl FluidProperties for ConstantProperties {
    fn density(&self, _t: f64) -> f64 {
        self.rho
    }

    fn viscosity(&self, _t: f64) -> f64 {
        self.mu
    }

    fn conductivity(&self, _t: f64) -> f64 {
        self.k
    }

    fn specific_heat(&self, _t: f64) -> f64 {
        self.cp
    }

    fn validity_floor(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sodium_values_are_plausible() {
        let na = SodiumLiquid;
        // At 1000 K liquid sodium is roughly 780 kg/m^3 and 0.18 mPa s.
        let rho = na.density(1000.0);
        assert!((750.0..800.0).contains(&rho), "rho = {rho}");
        let mu = na.viscosity(1000.0);
        assert!((1e-4..3e-4).contains(&mu), "mu = {mu}");
        let k = na.conductivity(1000.0);
        assert!((50.0..80.0).contains(&k), "k = {k}");
        let cp = na.specific_heat(1000.0);
        assert!((1100.0..1400.0).contains(&cp), "cp = {cp}");
    }

    #[test]
    fn test_sodium_density_decreases_with_temperature() {
        let na = SodiumLiquid;
        assert!(na.density(400.0) > na.density(800.0));
        assert!(na.density(800.0) > na.density(1500.0));
    }

    #[test]
    fn test_validity_floor_is_strict() {
        let na = SodiumLiquid;
        assert_eq!(na.validity(SodiumLiquid::T_MELT), PropertyValidity::Valid);
        assert_eq!(na.validity(SodiumLiquid::T_MELT + 10.0), PropertyValidity::Valid);
        match na.validity(SodiumLiquid::T_MELT - 1e-6) {
            PropertyValidity::OutOfRange(t) => assert!(t < SodiumLiquid::T_MELT),
            PropertyValidity::Valid => panic!("expected OutOfRange below the floor"),
        }
    }

    #[test]
    fn test_out_of_range_still_extrapolates() {
        let na = SodiumLiquid;
        let rho = na.density(300.0);
        assert!(rho.is_finite() && rho > 0.0);
        let mu = na.viscosity(300.0);
        assert!(mu.is_finite() && mu > 0.0);
    }

    #[test]
    fn test_constant_properties_ignore_temperature() {
        let props = ConstantProperties { rho: 1.0, mu: 0.1, k: 2.0, cp: 3.0 };
        assert_eq!(props.density(300.0), props.density(9000.0));
        assert_eq!(props.validity(10.0), PropertyValidity::Valid);
    }
}
