//! Perdew-Zunger correlation functional
//!
//! The Perdew-Zunger correlation functional uses different parameterizations
//! for high-density (rs < 1) and low-density (rs >= 1) regimes, where
//! rs = (3/(4π*rho))^(1/3) is the Wigner-Seitz radius.
//!
//! The functional is a fit to quantum Monte Carlo data for the uniform
//! electron gas.

use dwconsts::{FOURPI, FZETA_DENOM, T13, T43};

use crate::builtin::FamilyKernel;
use crate::traits::{BuiltinModel, KernelTraits, LdaKernel};

/// Perdew-Zunger correlation parameters
#[derive(Debug, Clone, Copy)]
pub struct PZParams {
    /// Low-density regime parameters (rs >= 1)
    pub gamma: f64,
    pub beta1: f64,
    pub beta2: f64,
    /// High-density regime parameters (rs < 1)
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Unpolarized (paramagnetic) PZ correlation parameters
pub const PZ_UNPOLARIZED: PZParams = PZParams {
    gamma: -0.1423,
    beta1: 1.0529,
    beta2: 0.3334,
    a: 0.0311,
    b: -0.048,
    c: 0.0020,
    d: -0.0116,
};

/// Polarized (ferromagnetic) PZ correlation parameters
pub const PZ_POLARIZED: PZParams = PZParams {
    gamma: -0.0843,
    beta1: 1.3981,
    beta2: 0.2611,
    a: 0.01555,
    b: -0.0269,
    c: 0.0007,
    d: -0.0048,
};

/// Computes the Perdew-Zunger correlation energy density and potential
///
/// # Returns
/// * `(ec, vc)` - Correlation energy per particle and potential
#[inline]
pub fn pz_correlation(rho: f64, params: PZParams) -> (f64, f64) {
    let rs = (3.0 / FOURPI / rho).powf(T13);

    if rs > 1.0 {
        let rroot = rs.sqrt();

        let dt = 1.0 + params.beta1 * rroot + params.beta2 * rs;

        let ec = params.gamma / dt;

        // vc = d(rho*ec)/d(rho) = ec - rs/3 * dec/drs
        let nt = 1.0 + 7.0 / 6.0 * params.beta1 * rroot + T43 * params.beta2 * rs;

        let vc = ec * nt / dt;

        (ec, vc)
    } else {
        let rln = rs.ln();

        let ec = params.a * rln + params.b + params.c * rs * rln + params.d * rs;

        let vc = params.a * rln
            + (params.b - params.a / 3.0)
            + 2.0 / 3.0 * params.c * rs * rln
            + 1.0 / 3.0 * (2.0 * params.d - params.c) * rs;

        (ec, vc)
    }
}

#[inline]
pub fn pz_unpolarized(rho: f64) -> (f64, f64) {
    pz_correlation(rho, PZ_UNPOLARIZED)
}

/// Computes the Perdew-Zunger correlation for polarized systems
///
/// Interpolates between the paramagnetic and ferromagnetic fits with
/// f(zeta) = [(1+zeta)^(4/3) + (1-zeta)^(4/3) - 2] / [2^(4/3) - 2].
///
/// # Returns
/// * `(ec, [vc_up, vc_dn])`
#[inline]
pub fn pz_polarized(rho: [f64; 2]) -> (f64, [f64; 2]) {
    let rho_t = rho[0] + rho[1];

    let zeta = ((rho[0] - rho[1]) / rho_t).clamp(-1.0, 1.0);

    let (ec_u, vc_u) = pz_correlation(rho_t, PZ_UNPOLARIZED);
    let (ec_p, vc_p) = pz_correlation(rho_t, PZ_POLARIZED);

    let f = ((1.0 + zeta).powf(T43) + (1.0 - zeta).powf(T43) - 2.0) / FZETA_DENOM;

    let ec = ec_u + f * (ec_p - ec_u);

    let vc_comm = vc_u + f * (vc_p - vc_u);

    let df = T43 * ((1.0 + zeta).powf(T13) - (1.0 - zeta).powf(T13)) / FZETA_DENOM;

    let vc_up = vc_comm + df * (ec_p - ec_u) * (1.0 - zeta);
    let vc_dn = vc_comm + df * (ec_p - ec_u) * (-1.0 - zeta);

    (ec, [vc_up, vc_dn])
}

/// Perdew-Zunger 1981 LDA correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PZ81;

impl KernelTraits for PZ81 {
    const NAME: &'static str = "pz81";
    const IS_LDA: bool = true;
}

impl LdaKernel for PZ81 {
    fn eval_exc_vxc_unpolar(rho: f64) -> (f64, f64) {
        pz_unpolarized(rho)
    }

    fn eval_exc_vxc_polar(rho: [f64; 2]) -> (f64, [f64; 2]) {
        pz_polarized(rho)
    }
}

impl BuiltinModel for PZ81 {
    fn family_kernel() -> FamilyKernel {
        FamilyKernel::lda::<Self>()
    }
}
