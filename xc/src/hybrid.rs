//! Hybrid functionals: a semi-local part evaluated here plus a fraction
//! `EXX_COEFF` of exact exchange that the caller adds from the orbitals.

use dwconsts::EPS12;

use crate::builtin::FamilyKernel;
use crate::correlation::pbe::{pbe_c_polarized, pbe_c_unpolarized};
use crate::exchange::pbe::{pbe_x_polarized, pbe_x_unpolarized};
use crate::traits::{BuiltinModel, GgaKernel, KernelTraits};

/// PBE0: `(1 - a) E_x^PBE + E_c^PBE + a E_x^HF` with `a = 1/4`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PBE0;

impl KernelTraits for PBE0 {
    const NAME: &'static str = "pbe0";
    const IS_GGA: bool = true;
    const IS_HYB: bool = true;
    const EXX_COEFF: f64 = 0.25;
    const DENS_TOL: f64 = EPS12;
}

impl GgaKernel for PBE0 {
    fn eval_exc_vxc_unpolar(rho: f64, sigma: f64) -> (f64, f64, f64) {
        let wx = 1.0 - Self::EXX_COEFF;

        let (ex, vrx, vsx) = pbe_x_unpolarized(rho, sigma);
        let (ec, vrc, vsc) = pbe_c_unpolarized(rho, sigma);

        (wx * ex + ec, wx * vrx + vrc, wx * vsx + vsc)
    }

    fn eval_exc_vxc_polar(rho: [f64; 2], sigma: [f64; 3]) -> (f64, [f64; 2], [f64; 3]) {
        let wx = 1.0 - Self::EXX_COEFF;

        let (ex, vrx, vsx) = pbe_x_polarized(rho, sigma);
        let (ec, vrc, vsc) = pbe_c_polarized(rho, sigma);

        let mut vrho = [0.0; 2];
        let mut vsigma = [0.0; 3];

        for (v, (x, c)) in vrho.iter_mut().zip(vrx.iter().zip(vrc.iter())) {
            *v = wx * x + c;
        }

        for (v, (x, c)) in vsigma.iter_mut().zip(vsx.iter().zip(vsc.iter())) {
            *v = wx * x + c;
        }

        (wx * ex + ec, vrho, vsigma)
    }
}

impl BuiltinModel for PBE0 {
    fn family_kernel() -> FamilyKernel {
        FamilyKernel::gga::<Self>()
    }
}
