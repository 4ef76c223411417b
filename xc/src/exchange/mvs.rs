//! Made-very-simple (MVS) meta-GGA exchange of Sun, Perdew and Ruzsinszky.
//!
//! `F(p, α) = (1 + k0 f(α)) / (1 + b p²)^(1/8)` with
//! `f(α) = (1 - α) / ((1 + e1 α²)² + c1 α⁴)^(1/4)` and the iso-orbital
//! indicator `α = (τ - τ_W) / τ_unif`. The Laplacian does not enter.

use dwconsts::{EPS12, PI, T13, T23, T43, T53, T83, THREE_PI_SQUARED};

use super::spin_scale_mgga;
use crate::builtin::FamilyKernel;
use crate::traits::{BuiltinModel, KernelTraits, MggaKernel, MggaPoint};

const K0: f64 = 0.174;
const E1: f64 = -1.6665;
const C1: f64 = 0.7438;
const B: f64 = 0.0233;

pub fn mvs_x_unpolarized(rho: f64, sigma: f64, _lapl: f64, tau: f64) -> MggaPoint<1, 1> {
    let cx = -0.75 * (3.0 / PI).powf(T13);
    let a = 0.25 / THREE_PI_SQUARED.powf(T23);
    let cf = 0.3 * THREE_PI_SQUARED.powf(T23);

    let rho13 = rho.powf(T13);
    let rho83 = rho.powf(T83);

    let p = a * sigma / rho83;

    let tau_w = sigma / (8.0 * rho);
    let tau_unif = cf * rho.powf(T53);
    let alpha = (tau - tau_w) / tau_unif;

    // f(α) and its derivative
    let alpha2 = alpha * alpha;
    let q = 1.0 + E1 * alpha2;
    let d = q * q + C1 * alpha2 * alpha2;
    let d14 = d.powf(0.25);
    let dd = 4.0 * E1 * alpha * q + 4.0 * C1 * alpha2 * alpha;

    let f = (1.0 - alpha) / d14;
    let df = -1.0 / d14 - (1.0 - alpha) * dd / (4.0 * d * d14);

    // (1 + b p²)^(-1/8) and its derivative
    let h = 1.0 + B * p * p;
    let g = h.powf(-0.125);
    let dg = -0.25 * B * p * g / h;

    let fx = (1.0 + K0 * f) * g;
    let fx_alpha = K0 * df * g;
    let fx_p = (1.0 + K0 * f) * dg;

    let dp_drho = -T83 * p / rho;
    let dp_dsigma = a / rho83;

    let dalpha_drho = tau_w / (rho * tau_unif) - T53 * alpha / rho;
    let dalpha_dsigma = -1.0 / (8.0 * rho * tau_unif);
    let dalpha_dtau = 1.0 / tau_unif;

    let e_lda = cx * rho * rho13;

    MggaPoint {
        eps: cx * rho13 * fx,
        vrho: [T43 * cx * rho13 * fx + e_lda * (fx_p * dp_drho + fx_alpha * dalpha_drho)],
        vsigma: [e_lda * (fx_p * dp_dsigma + fx_alpha * dalpha_dsigma)],
        vlapl: [0.0],
        vtau: [e_lda * fx_alpha * dalpha_dtau],
    }
}

pub fn mvs_x_polarized(
    rho: [f64; 2],
    sigma: [f64; 3],
    lapl: [f64; 2],
    tau: [f64; 2],
) -> MggaPoint<2, 3> {
    spin_scale_mgga(rho, sigma, lapl, tau, MVSExchange::DENS_TOL, mvs_x_unpolarized)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MVSExchange;

impl KernelTraits for MVSExchange {
    const NAME: &'static str = "mvs_x";
    const IS_MGGA: bool = true;
    const DENS_TOL: f64 = EPS12;
}

impl MggaKernel for MVSExchange {
    fn eval_exc_vxc_unpolar(rho: f64, sigma: f64, lapl: f64, tau: f64) -> MggaPoint<1, 1> {
        mvs_x_unpolarized(rho, sigma, lapl, tau)
    }

    fn eval_exc_vxc_polar(
        rho: [f64; 2],
        sigma: [f64; 3],
        lapl: [f64; 2],
        tau: [f64; 2],
    ) -> MggaPoint<2, 3> {
        mvs_x_polarized(rho, sigma, lapl, tau)
    }
}

impl BuiltinModel for MVSExchange {
    fn family_kernel() -> FamilyKernel {
        FamilyKernel::mgga::<Self>()
    }
}
