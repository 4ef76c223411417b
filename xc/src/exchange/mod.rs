//! Exchange functionals.
//!
//! Exchange obeys the exact spin-scaling relation
//! `E_x[rho_a, rho_b] = (E_x[2 rho_a] + E_x[2 rho_b]) / 2`, so every polarized
//! exchange formula here is assembled from its unpolarized one. A channel
//! whose scaled density does not exceed `tol` contributes nothing.

use crate::traits::MggaPoint;

pub mod mvs;
pub mod pbe;
pub mod slater;

pub use mvs::MVSExchange;
pub use pbe::PBEExchange;
pub use slater::SlaterExchange;

pub(crate) fn spin_scale_lda(
    rho: [f64; 2],
    tol: f64,
    unpolar: impl Fn(f64) -> (f64, f64),
) -> (f64, [f64; 2]) {
    let mut e = 0.0;
    let mut vrho = [0.0; 2];

    for s in 0..2 {
        let r = 2.0 * rho[s];

        if r > tol {
            let (eps, v) = unpolar(r);

            e += 0.5 * r * eps;
            vrho[s] = v;
        }
    }

    (e / (rho[0] + rho[1]), vrho)
}

pub(crate) fn spin_scale_gga(
    rho: [f64; 2],
    sigma: [f64; 3],
    tol: f64,
    unpolar: impl Fn(f64, f64) -> (f64, f64, f64),
) -> (f64, [f64; 2], [f64; 3]) {
    let mut e = 0.0;
    let mut vrho = [0.0; 2];
    let mut vsigma = [0.0; 3];

    // sigma_aa and sigma_bb sit at 0 and 2; sigma_ab does not enter exchange
    for s in 0..2 {
        let r = 2.0 * rho[s];

        if r > tol {
            let (eps, v1, v2) = unpolar(r, 4.0 * sigma[2 * s]);

            e += 0.5 * r * eps;
            vrho[s] = v1;
            vsigma[2 * s] = 2.0 * v2;
        }
    }

    (e / (rho[0] + rho[1]), vrho, vsigma)
}

pub(crate) fn spin_scale_mgga(
    rho: [f64; 2],
    sigma: [f64; 3],
    lapl: [f64; 2],
    tau: [f64; 2],
    tol: f64,
    unpolar: impl Fn(f64, f64, f64, f64) -> MggaPoint<1, 1>,
) -> MggaPoint<2, 3> {
    let mut out = MggaPoint::<2, 3>::zero();
    let mut e = 0.0;

    for s in 0..2 {
        let r = 2.0 * rho[s];

        if r > tol {
            let p = unpolar(r, 4.0 * sigma[2 * s], 2.0 * lapl[s], 2.0 * tau[s]);

            e += 0.5 * r * p.eps;
            out.vrho[s] = p.vrho[0];
            out.vsigma[2 * s] = 2.0 * p.vsigma[0];
            out.vlapl[s] = p.vlapl[0];
            out.vtau[s] = p.vtau[0];
        }
    }

    out.eps = e / (rho[0] + rho[1]);

    out
}
