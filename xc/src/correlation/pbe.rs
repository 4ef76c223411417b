//! Perdew-Burke-Ernzerhof correlation
//!
//! `ec = ec_PW92(rs, ζ) + H(rs, ζ, t)` with the gradient correction
//! `H = γ φ³ ln(1 + (β/γ) t² (1 + A t²) / (1 + A t² + A² t⁴))`,
//! `A = (β/γ) / (exp(-ec_PW92 / (γ φ³)) - 1)` and the spin-scaling factor
//! `φ = ((1+ζ)^(2/3) + (1-ζ)^(2/3)) / 2`.

use std::f64::consts::LN_2;

use dwconsts::{EPS10, EPS12, PI, PI_SQUARED, T13, T23, T73, THREE_PI_SQUARED};

use super::pw92::{pw92_correlation, wigner_seitz_radius};
use crate::builtin::FamilyKernel;
use crate::traits::{BuiltinModel, GgaKernel, KernelTraits};

pub const PBE_BETA: f64 = 0.06672455060314922;

/// Partial derivatives of `e = rho * ec` in the `(rho, zeta, sigma)` variables.
#[derive(Debug, Clone, Copy)]
struct PbeC {
    e: f64,
    e_rho: f64,
    e_zeta: f64,
    e_sigma: f64,
}

fn pbe_c(rho: f64, zeta: f64, sigma: f64) -> PbeC {
    let gamma = (1.0 - LN_2) / PI_SQUARED;
    let bg = PBE_BETA / gamma;

    let rs = wigner_seitz_radius(rho);

    let (ec, dec_drs, dec_dzeta) = pw92_correlation(rs, zeta);
    let dec_drho = -rs / (3.0 * rho) * dec_drs;

    let (phi, dphi) = if zeta == 0.0 {
        (1.0, 0.0)
    } else {
        let up = 1.0 + zeta;
        let dn = 1.0 - zeta;

        (
            0.5 * (up.powf(T23) + dn.powf(T23)),
            T13 * (up.powf(-T13) - dn.powf(-T13)),
        )
    };

    let phi2 = phi * phi;
    let g3 = gamma * phi2 * phi;
    let dg3_dphi = 3.0 * gamma * phi2;

    // t² = σ π / (16 φ² (3π²)^(1/3) ρ^(7/3))
    let dt2_dsigma = PI / (16.0 * THREE_PI_SQUARED.powf(T13) * phi2 * rho.powf(T73));
    let t2 = sigma * dt2_dsigma;
    let dt2_drho = -T73 * t2 / rho;
    let dt2_dphi = -2.0 * t2 / phi;

    let ex = (-ec / g3).exp();
    let em1 = ex - 1.0;

    let a = bg / em1;
    let da_dec = bg * ex / (g3 * em1 * em1);
    let da_dg3 = -bg * ex * ec / (g3 * g3 * em1 * em1);

    let n = 1.0 + a * t2;
    let d = n + a * a * t2 * t2;

    let q = bg * t2 * n / d;
    let lq = (1.0 + q).ln();

    let h = g3 * lq;

    let dq_dt2 = bg * (n / d + t2 * (a / d - n * (a + 2.0 * a * a * t2) / (d * d)));
    let dq_da = bg * t2 * (t2 / d - n * (t2 + 2.0 * a * t2 * t2) / (d * d));

    let dh_dq = g3 / (1.0 + q);
    let dh_dt2 = dh_dq * dq_dt2;
    let dh_da = dh_dq * dq_da;

    let dh_drho = dh_da * da_dec * dec_drho + dh_dt2 * dt2_drho;

    let dh_dzeta = ((lq + dh_da * da_dg3) * dg3_dphi + dh_dt2 * dt2_dphi) * dphi
        + dh_da * da_dec * dec_dzeta;

    let dh_dsigma = dh_dt2 * dt2_dsigma;

    PbeC {
        e: rho * (ec + h),
        e_rho: ec + h + rho * (dec_drho + dh_drho),
        e_zeta: rho * (dec_dzeta + dh_dzeta),
        e_sigma: rho * dh_dsigma,
    }
}

/// `(ec, vrho, vsigma)` of PBE correlation for an unpolarized point.
pub fn pbe_c_unpolarized(rho: f64, sigma: f64) -> (f64, f64, f64) {
    let c = pbe_c(rho, 0.0, sigma);

    (c.e / rho, c.e_rho, c.e_sigma)
}

/// PBE correlation of a spin-polarized point; depends on the total
/// `sigma = sigma_aa + 2 sigma_ab + sigma_bb`.
pub fn pbe_c_polarized(rho: [f64; 2], sigma: [f64; 3]) -> (f64, [f64; 2], [f64; 3]) {
    let rho_t = rho[0] + rho[1];

    let zeta = ((rho[0] - rho[1]) / rho_t).clamp(-1.0 + EPS10, 1.0 - EPS10);

    let sigma_t = (sigma[0] + 2.0 * sigma[1] + sigma[2]).max(0.0);

    let c = pbe_c(rho_t, zeta, sigma_t);

    let vrho = [
        c.e_rho + c.e_zeta * (1.0 - zeta) / rho_t,
        c.e_rho - c.e_zeta * (1.0 + zeta) / rho_t,
    ];

    let vsigma = [c.e_sigma, 2.0 * c.e_sigma, c.e_sigma];

    (c.e / rho_t, vrho, vsigma)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PBECorrelation;

impl KernelTraits for PBECorrelation {
    const NAME: &'static str = "pbe_c";
    const IS_GGA: bool = true;
    const DENS_TOL: f64 = EPS12;
}

impl GgaKernel for PBECorrelation {
    fn eval_exc_vxc_unpolar(rho: f64, sigma: f64) -> (f64, f64, f64) {
        pbe_c_unpolarized(rho, sigma)
    }

    fn eval_exc_vxc_polar(rho: [f64; 2], sigma: [f64; 3]) -> (f64, [f64; 2], [f64; 3]) {
        pbe_c_polarized(rho, sigma)
    }
}

impl BuiltinModel for PBECorrelation {
    fn family_kernel() -> FamilyKernel {
        FamilyKernel::gga::<Self>()
    }
}
