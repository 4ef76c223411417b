use itertools::multizip;

use super::{check_len, pair};
use crate::error::Result;
use crate::spin::Spin;
use crate::traits::LdaKernel;

pub fn host_eval_exc_helper<K: LdaKernel>(
    polar: Spin,
    npts: usize,
    rho: &[f64],
    exc: &mut [f64],
) -> Result<()> {
    let ns = polar.nspin();

    check_len("rho", rho.len(), npts, ns)?;
    check_len("exc", exc.len(), npts, 1)?;

    let rho = &rho[..npts * ns];
    let exc = &mut exc[..npts];

    match polar {
        Spin::Unpolarized => {
            for (r, e) in multizip((rho.iter(), exc.iter_mut())) {
                *e = if *r <= K::DENS_TOL {
                    0.0
                } else {
                    K::eval_exc_unpolar(*r)
                };
            }
        }

        Spin::Polarized => {
            for (r, e) in multizip((rho.chunks_exact(2), exc.iter_mut())) {
                let r = pair(r);

                *e = if r[0] + r[1] <= K::DENS_TOL {
                    0.0
                } else {
                    K::eval_exc_polar(r)
                };
            }
        }
    }

    Ok(())
}

pub fn host_eval_exc_vxc_helper<K: LdaKernel>(
    polar: Spin,
    npts: usize,
    rho: &[f64],
    exc: &mut [f64],
    vrho: &mut [f64],
) -> Result<()> {
    let ns = polar.nspin();

    check_len("rho", rho.len(), npts, ns)?;
    check_len("exc", exc.len(), npts, 1)?;
    check_len("vrho", vrho.len(), npts, ns)?;

    let rho = &rho[..npts * ns];
    let exc = &mut exc[..npts];
    let vrho = &mut vrho[..npts * ns];

    match polar {
        Spin::Unpolarized => {
            for (r, e, v) in multizip((rho.iter(), exc.iter_mut(), vrho.iter_mut())) {
                let (eps, vr) = if *r <= K::DENS_TOL {
                    (0.0, 0.0)
                } else {
                    K::eval_exc_vxc_unpolar(*r)
                };

                *e = eps;
                *v = vr;
            }
        }

        Spin::Polarized => {
            for (r, e, v) in multizip((
                rho.chunks_exact(2),
                exc.iter_mut(),
                vrho.chunks_exact_mut(2),
            )) {
                let r = pair(r);

                let (eps, vr) = if r[0] + r[1] <= K::DENS_TOL {
                    (0.0, [0.0; 2])
                } else {
                    K::eval_exc_vxc_polar(r)
                };

                *e = eps;
                v.copy_from_slice(&vr);
            }
        }
    }

    Ok(())
}
