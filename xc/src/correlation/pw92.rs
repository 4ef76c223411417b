//! Perdew-Wang 1992 correlation of the uniform electron gas.
//!
//! `ec(rs, ζ) = ec0 + αc f(ζ)/f''(0) (1 - ζ⁴) + (ec1 - ec0) f(ζ) ζ⁴`, each of
//! `ec0`, `ec1` and `-αc` given by the interpolation `G(rs)` below.

use dwconsts::{FOURPI, FZETA_DENOM, T13, T43};

use crate::builtin::FamilyKernel;
use crate::traits::{BuiltinModel, KernelTraits, LdaKernel};

#[derive(Debug, Clone, Copy)]
pub struct PWParams {
    pub a: f64,
    pub alpha1: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub beta3: f64,
    pub beta4: f64,
}

/// ec0: paramagnetic
pub const PW_EC0: PWParams = PWParams {
    a: 0.031091,
    alpha1: 0.21370,
    beta1: 7.5957,
    beta2: 3.5876,
    beta3: 1.6382,
    beta4: 0.49294,
};

/// ec1: ferromagnetic
pub const PW_EC1: PWParams = PWParams {
    a: 0.015545,
    alpha1: 0.20548,
    beta1: 14.1189,
    beta2: 6.1977,
    beta3: 3.3662,
    beta4: 0.62517,
};

/// -αc: minus the spin stiffness
pub const PW_MAC: PWParams = PWParams {
    a: 0.016887,
    alpha1: 0.11125,
    beta1: 10.357,
    beta2: 3.6231,
    beta3: 0.88026,
    beta4: 0.49671,
};

const FPP0: f64 = 1.709921;

/// `G(rs) = -2A (1 + α1 rs) ln(1 + 1 / (2A (β1 rs^½ + β2 rs + β3 rs^(3/2) + β4 rs²)))`
/// and its derivative with respect to rs.
#[inline]
pub fn pw_g(rs: f64, p: PWParams) -> (f64, f64) {
    let srs = rs.sqrt();

    let q = 2.0 * p.a * (p.beta1 * srs + p.beta2 * rs + p.beta3 * rs * srs + p.beta4 * rs * rs);
    let dq = 2.0 * p.a * (0.5 * p.beta1 / srs + p.beta2 + 1.5 * p.beta3 * srs + 2.0 * p.beta4 * rs);

    let l = (1.0 + 1.0 / q).ln();
    let dl = -dq / (q * q + q);

    let g = -2.0 * p.a * (1.0 + p.alpha1 * rs) * l;
    let dg = -2.0 * p.a * p.alpha1 * l - 2.0 * p.a * (1.0 + p.alpha1 * rs) * dl;

    (g, dg)
}

/// `(ec, dec/drs, dec/dζ)` at Wigner-Seitz radius `rs` and polarization `zeta`.
pub fn pw92_correlation(rs: f64, zeta: f64) -> (f64, f64, f64) {
    let (ec0, dec0) = pw_g(rs, PW_EC0);

    if zeta == 0.0 {
        return (ec0, dec0, 0.0);
    }

    let (ec1, dec1) = pw_g(rs, PW_EC1);
    let (mac, dmac) = pw_g(rs, PW_MAC);

    let f = ((1.0 + zeta).powf(T43) + (1.0 - zeta).powf(T43) - 2.0) / FZETA_DENOM;
    let df = T43 * ((1.0 + zeta).powf(T13) - (1.0 - zeta).powf(T13)) / FZETA_DENOM;

    let z3 = zeta * zeta * zeta;
    let z4 = z3 * zeta;

    let ec = ec0 - mac * f * (1.0 - z4) / FPP0 + (ec1 - ec0) * f * z4;

    let dec_drs = dec0 - dmac * f * (1.0 - z4) / FPP0 + (dec1 - dec0) * f * z4;

    let dec_dzeta =
        -mac / FPP0 * (df * (1.0 - z4) - 4.0 * z3 * f) + (ec1 - ec0) * (df * z4 + 4.0 * z3 * f);

    (ec, dec_drs, dec_dzeta)
}

#[inline]
pub fn wigner_seitz_radius(rho: f64) -> f64 {
    (3.0 / FOURPI / rho).powf(T13)
}

pub fn pw92_unpolarized(rho: f64) -> (f64, f64) {
    let rs = wigner_seitz_radius(rho);

    let (ec, dec_drs, _) = pw92_correlation(rs, 0.0);

    (ec, ec - rs / 3.0 * dec_drs)
}

pub fn pw92_polarized(rho: [f64; 2]) -> (f64, [f64; 2]) {
    let rho_t = rho[0] + rho[1];
    let zeta = ((rho[0] - rho[1]) / rho_t).clamp(-1.0, 1.0);

    let rs = wigner_seitz_radius(rho_t);

    let (ec, dec_drs, dec_dzeta) = pw92_correlation(rs, zeta);

    let vc = ec - rs / 3.0 * dec_drs;

    (ec, [vc + (1.0 - zeta) * dec_dzeta, vc - (1.0 + zeta) * dec_dzeta])
}

/// Perdew-Wang 1992 LDA correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PW92;

impl KernelTraits for PW92 {
    const NAME: &'static str = "pw92";
    const IS_LDA: bool = true;
}

impl LdaKernel for PW92 {
    fn eval_exc_vxc_unpolar(rho: f64) -> (f64, f64) {
        pw92_unpolarized(rho)
    }

    fn eval_exc_vxc_polar(rho: [f64; 2]) -> (f64, [f64; 2]) {
        pw92_polarized(rho)
    }
}

impl BuiltinModel for PW92 {
    fn family_kernel() -> FamilyKernel {
        FamilyKernel::lda::<Self>()
    }
}
