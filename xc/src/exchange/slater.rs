//! Slater exchange functional
//!
//! The simplest local exchange approximation, derived from the uniform
//! electron gas model.

use dwconsts::{PI, T13};

use super::spin_scale_lda;
use crate::builtin::FamilyKernel;
use crate::traits::{BuiltinModel, KernelTraits, LdaKernel};

/// Computes the Slater exchange energy density and potential (unpolarized)
///
/// # Returns
/// * `(ex, vx)` - Exchange energy per particle and potential
///
/// - vx = cx * rho^(1/3), where cx = -(3/π)^(1/3)
/// - ex = (3/4) * vx
#[inline]
pub fn slater_unpolarized(rho: f64) -> (f64, f64) {
    let cx: f64 = -(3.0 / PI).powf(T13);

    let vx = cx * rho.powf(T13);

    let ex = 0.75 * vx;

    (ex, vx)
}

/// Slater exchange of a spin-polarized point, `(ex, [vx_up, vx_dn])`.
#[inline]
pub fn slater_polarized(rho: [f64; 2]) -> (f64, [f64; 2]) {
    spin_scale_lda(rho, SlaterExchange::DENS_TOL, slater_unpolarized)
}

/// LDA exchange of the uniform electron gas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlaterExchange;

impl KernelTraits for SlaterExchange {
    const NAME: &'static str = "slater";
    const IS_LDA: bool = true;
}

impl LdaKernel for SlaterExchange {
    fn eval_exc_vxc_unpolar(rho: f64) -> (f64, f64) {
        slater_unpolarized(rho)
    }

    fn eval_exc_vxc_polar(rho: [f64; 2]) -> (f64, [f64; 2]) {
        slater_polarized(rho)
    }
}

impl BuiltinModel for SlaterExchange {
    fn family_kernel() -> FamilyKernel {
        FamilyKernel::lda::<Self>()
    }
}
