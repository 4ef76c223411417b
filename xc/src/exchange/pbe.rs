//! Perdew-Burke-Ernzerhof exchange
//!
//! `ex = ex_lda(rho) * F(p)` with the reduced gradient `p = s^2 =
//! sigma / (4 (3π²)^(2/3) rho^(8/3))` and the enhancement factor
//! `F(p) = 1 + κ - κ / (1 + μ p / κ)`.

use dwconsts::{EPS12, PI, T13, T23, T43, T83, THREE_PI_SQUARED};

use super::spin_scale_gga;
use crate::builtin::FamilyKernel;
use crate::traits::{BuiltinModel, GgaKernel, KernelTraits};

pub const PBE_KAPPA: f64 = 0.804;
pub const PBE_MU: f64 = 0.2195149727645171;

/// `(ex, vrho, vsigma)` of PBE exchange for an unpolarized point.
#[inline]
pub fn pbe_x_unpolarized(rho: f64, sigma: f64) -> (f64, f64, f64) {
    let cx = -0.75 * (3.0 / PI).powf(T13);
    let a = 0.25 / THREE_PI_SQUARED.powf(T23);

    let rho13 = rho.powf(T13);
    let p = a * sigma / rho.powf(T83);

    let den = 1.0 + PBE_MU * p / PBE_KAPPA;
    let fx = 1.0 + PBE_KAPPA - PBE_KAPPA / den;
    let dfx = PBE_MU / (den * den);

    let ex = cx * rho13 * fx;

    let vrho = cx * rho13 * (T43 * fx - T83 * p * dfx);

    let vsigma = cx * a * dfx / (rho * rho13);

    (ex, vrho, vsigma)
}

/// PBE exchange of a spin-polarized point; `sigma_ab` is not used.
#[inline]
pub fn pbe_x_polarized(rho: [f64; 2], sigma: [f64; 3]) -> (f64, [f64; 2], [f64; 3]) {
    spin_scale_gga(rho, sigma, PBEExchange::DENS_TOL, pbe_x_unpolarized)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PBEExchange;

impl KernelTraits for PBEExchange {
    const NAME: &'static str = "pbe_x";
    const IS_GGA: bool = true;
    const DENS_TOL: f64 = EPS12;
}

impl GgaKernel for PBEExchange {
    fn eval_exc_vxc_unpolar(rho: f64, sigma: f64) -> (f64, f64, f64) {
        pbe_x_unpolarized(rho, sigma)
    }

    fn eval_exc_vxc_polar(rho: [f64; 2], sigma: [f64; 3]) -> (f64, [f64; 2], [f64; 3]) {
        pbe_x_polarized(rho, sigma)
    }
}

impl BuiltinModel for PBEExchange {
    fn family_kernel() -> FamilyKernel {
        FamilyKernel::gga::<Self>()
    }
}
