use std::f64;

// pi

pub const PI: f64 = f64::consts::PI;
pub const FOURPI: f64 = 4.0 * f64::consts::PI;
pub const PI_SQUARED: f64 = f64::consts::PI * f64::consts::PI;
pub const THREE_PI_SQUARED: f64 = 3.0 * PI_SQUARED;

// fractional exponents used by the density functionals

pub const T13: f64 = 1.0 / 3.0;
pub const T23: f64 = 2.0 / 3.0;
pub const T43: f64 = 4.0 / 3.0;
pub const T53: f64 = 5.0 / 3.0;
pub const T73: f64 = 7.0 / 3.0;
pub const T83: f64 = 8.0 / 3.0;

// 2^(4/3) - 2, denominator of the spin interpolation f(zeta)

pub const FZETA_DENOM: f64 = 0.5198420997897464;

// numerical convergence

pub const EPS10: f64 = 1E-10;
pub const EPS12: f64 = 1E-12;
pub const EPS15: f64 = 1E-15;
